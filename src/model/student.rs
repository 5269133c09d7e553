use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Student identifier as handed out by the API. Documents stored by the
/// dashboard use string identifiers, but numeric ones are accepted as well.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StudentId {
    fn from(n: i64) -> Self {
        StudentId::Number(n)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId::Text(s.to_owned())
    }
}

/// RFID tag of a student. A missing `rfidUid` field and an explicit `null`
/// both decode to `Absent`, and all absent tags are the same key when
/// looking for duplicates.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(from = "Option<String>")]
pub enum RfidTag {
    Present(String),
    #[default]
    Absent,
}

impl From<Option<String>> for RfidTag {
    fn from(tag: Option<String>) -> Self {
        tag.map_or(RfidTag::Absent, RfidTag::Present)
    }
}

impl fmt::Display for RfidTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RfidTag::Present(tag) => f.write_str(tag),
            RfidTag::Absent => f.write_str("None"),
        }
    }
}

/// A student as listed by the API. Only `rfidUid` drives deduplication and
/// `id` is needed only to delete a duplicate, so the other fields never make
/// the list fail to decode.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default)]
    pub id: Option<StudentId>,
    #[serde(default, deserialize_with = "label")]
    pub name: Option<String>,
    #[serde(default)]
    pub rfid_uid: RfidTag,
    #[serde(default)]
    pub roll_no: Option<Value>,
    #[serde(default)]
    pub branch: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
}

/// Any JSON value is accepted as a label; non-strings are shown as JSON.
fn label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl StudentRecord {
    #[cfg(test)]
    pub fn new(id: impl Into<StudentId>, name: Option<&str>, rfid_uid: Option<&str>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.map(String::from),
            rfid_uid: rfid_uid.map(String::from).into(),
            roll_no: None,
            branch: None,
            year: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("None")
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} (ID: {id})", self.display_name()),
            None => write!(f, "{} (ID: None)", self.display_name()),
        }
    }
}

#[test]
fn test_decode_student() {
    let students: Vec<StudentRecord> = serde_json::from_str(
        r#"[
            {"id": "65f0a1", "name": "Asha", "rfidUid": "A1B2", "rollNo": "CS-12", "branch": "CSE", "year": 3},
            {"id": 7, "rfidUid": null},
            {"id": "65f0a3", "name": "Ravi", "email": "ravi@example.com"}
        ]"#,
    )
    .unwrap();
    assert_eq!(students[0].id, Some(StudentId::from("65f0a1")));
    assert_eq!(students[0].rfid_uid, RfidTag::Present("A1B2".into()));
    assert_eq!(students[0].roll_no, Some(Value::from("CS-12")));
    assert_eq!(students[0].year, Some(Value::from(3)));
    assert_eq!(students[1].id, Some(StudentId::Number(7)));
    assert_eq!(students[1].rfid_uid, RfidTag::Absent);
    assert_eq!(students[1].display_name(), "None");
    assert_eq!(students[2].rfid_uid, RfidTag::Absent);
    assert_eq!(students[2].to_string(), "Ravi (ID: 65f0a3)");
}

#[test]
fn test_record_without_id_decodes() {
    let students: Vec<StudentRecord> = serde_json::from_str(
        r#"[{"id": "1", "rfidUid": "A"}, {"name": "orphan", "rfidUid": "Z"}, {"id": "3", "rfidUid": "A"}]"#,
    )
    .unwrap();
    assert_eq!(students.len(), 3);
    assert_eq!(students[1].id, None);
    assert_eq!(students[1].to_string(), "orphan (ID: None)");
}

#[test]
fn test_unexpected_field_types_decode() {
    let students: Vec<StudentRecord> = serde_json::from_str(
        r#"[
            {"id": "1", "rfidUid": "A", "year": "3"},
            {"id": "2", "rfidUid": "A", "rollNo": 12, "branch": ["CSE"], "name": 42}
        ]"#,
    )
    .unwrap();
    assert_eq!(students[0].year, Some(Value::from("3")));
    assert_eq!(students[1].roll_no, Some(Value::from(12)));
    assert_eq!(students[1].display_name(), "42");
    assert_eq!(students[1].rfid_uid, RfidTag::Present("A".into()));
}

use crate::model::{RfidTag, StudentId, StudentRecord};
use eyre::{Error, eyre};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A record whose tag was already carried by an earlier record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Duplicate {
    pub id: StudentId,
    pub tag: RfidTag,
    pub name: Option<String>,
}

#[derive(Debug, Default)]
pub struct Duplicates {
    /// Distinct tags in the order they were first seen.
    pub retained_tags: Vec<RfidTag>,
    /// Records to delete, in encounter order.
    pub duplicates: Vec<Duplicate>,
}

impl Duplicates {
    pub fn ids(&self) -> Vec<StudentId> {
        self.duplicates.iter().map(|d| d.id.clone()).collect()
    }
}

/// Single pass over `records`: the first record bearing a given tag is kept,
/// every later one is a duplicate. Records without a tag share the absent
/// tag, so only the first of them is kept. A duplicate without an id cannot
/// be deleted and fails the whole scan.
#[instrument(skip_all, fields(records = records.len()))]
pub fn find_duplicates(records: &[StudentRecord]) -> Result<Duplicates, Error> {
    let mut seen = HashSet::new();
    let mut result = Duplicates::default();
    for record in records {
        if seen.contains(&record.rfid_uid) {
            debug!(
                student = %record,
                tag = %record.rfid_uid,
                roll_no = ?record.roll_no,
                branch = ?record.branch,
                year = ?record.year,
                "duplicate tag"
            );
            let id = record.id.clone().ok_or_else(|| {
                eyre!(
                    "student {} has duplicate RFID {} but no id",
                    record.display_name(),
                    record.rfid_uid
                )
            })?;
            result.duplicates.push(Duplicate {
                id,
                tag: record.rfid_uid.clone(),
                name: record.name.clone(),
            });
        } else {
            seen.insert(record.rfid_uid.clone());
            result.retained_tags.push(record.rfid_uid.clone());
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, tag: Option<&str>) -> StudentRecord {
        StudentRecord::new(id, Some("student"), tag)
    }

    fn ids(v: &[i64]) -> Vec<StudentId> {
        v.iter().copied().map(StudentId::from).collect()
    }

    #[test]
    fn test_single_duplicate() {
        let records = vec![student(1, Some("A")), student(2, Some("B")), student(3, Some("A"))];
        let d = find_duplicates(&records).unwrap();
        assert_eq!(d.ids(), ids(&[3]));
        assert_eq!(
            d.retained_tags,
            vec![RfidTag::Present("A".into()), RfidTag::Present("B".into())]
        );
    }

    #[test]
    fn test_repeated_tag_keeps_first() {
        let records = vec![student(1, Some("A")), student(2, Some("A")), student(3, Some("A"))];
        assert_eq!(find_duplicates(&records).unwrap().ids(), ids(&[2, 3]));
    }

    #[test]
    fn test_empty_input() {
        let d = find_duplicates(&[]).unwrap();
        assert!(d.duplicates.is_empty());
        assert!(d.retained_tags.is_empty());
    }

    #[test]
    fn test_absent_tags_are_duplicates_of_each_other() {
        let records = vec![student(1, None), student(2, Some("A")), student(3, None)];
        let d = find_duplicates(&records).unwrap();
        assert_eq!(d.ids(), ids(&[3]));
        assert_eq!(d.duplicates[0].tag, RfidTag::Absent);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let records = vec![
            student(1, Some("A")),
            student(2, None),
            student(3, Some("A")),
            student(4, None),
            student(5, Some("C")),
        ];
        assert_eq!(find_duplicates(&records).unwrap().ids(), find_duplicates(&records).unwrap().ids());
    }

    #[test]
    fn test_one_retained_record_per_tag() {
        let tags = ["A", "B", "A", "C", "B", "B", "D", "A"];
        let records = tags
            .iter()
            .zip(1..)
            .map(|(&t, id)| student(id, Some(t)))
            .collect::<Vec<_>>();
        let d = find_duplicates(&records).unwrap();
        let deleted = d.ids();
        let retained = records
            .iter()
            .filter(|r| !r.id.as_ref().is_some_and(|id| deleted.contains(id)))
            .collect::<Vec<_>>();
        assert_eq!(
            retained.iter().filter_map(|r| r.id.clone()).collect::<Vec<_>>(),
            ids(&[1, 2, 4, 7])
        );
        assert_eq!(retained.len(), d.retained_tags.len());
        for (r, t) in retained.iter().zip(&d.retained_tags) {
            assert_eq!(&r.rfid_uid, t);
        }
    }

    #[test]
    fn test_kept_record_without_id() {
        let mut orphan = student(0, Some("Z"));
        orphan.id = None;
        let records = vec![student(1, Some("A")), orphan, student(3, Some("A"))];
        let d = find_duplicates(&records).unwrap();
        assert_eq!(d.ids(), ids(&[3]));
        assert_eq!(d.retained_tags.len(), 2);
    }

    #[test]
    fn test_duplicate_without_id_fails() {
        let mut orphan = student(0, Some("A"));
        orphan.id = None;
        let records = vec![student(1, Some("A")), orphan, student(3, Some("A"))];
        let err = find_duplicates(&records).unwrap_err();
        assert_eq!(err.to_string(), "student student has duplicate RFID A but no id");
    }
}

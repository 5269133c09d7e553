use crate::dedup::Duplicate;
use crate::model::StudentId;
use std::io::{self, Write};

pub fn display_fetch_failure(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Failed to fetch students")
}

pub fn display_duplicate(out: &mut impl Write, d: &Duplicate) -> io::Result<()> {
    writeln!(
        out,
        "Found duplicate RFID: {} for student {} (ID: {})",
        d.tag,
        d.name.as_deref().unwrap_or("None"),
        d.id
    )
}

pub fn display_deletion(out: &mut impl Write, id: &StudentId) -> io::Result<()> {
    writeln!(out, "Deleting duplicate student ID: {id}")
}

pub fn display_dry_run(out: &mut impl Write, id: &StudentId) -> io::Result<()> {
    writeln!(out, "Would delete duplicate student ID: {id}")
}

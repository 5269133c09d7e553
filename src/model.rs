pub use self::student::{RfidTag, StudentId, StudentRecord};

mod student;

//! Per-student snapshot types stored by the repository.
//!
//! The storage contract is upsert-by-identity: each snapshot supersedes the
//! previous one wholesale, there is no merge at the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::course::{AttendanceRecord, EnrolledCourse, MarksRecord, PersonalDetails};
use super::timetable::MergedTimetable;

/// Student identity: the portal login id (an institutional email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stored timetable snapshot: the merged grid plus pass-through metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRecord {
    pub student: StudentId,
    /// Cohort whose grid was merged.
    pub cohort: String,
    pub timetable: MergedTimetable,
    pub personal_details: PersonalDetails,
    /// The raw extracted course list, kept verbatim for auditing.
    pub course_data: Vec<EnrolledCourse>,
    /// SHA-256 of the course payload; lets a refresh detect unchanged data.
    pub checksum: String,
    pub updated_at: DateTime<Utc>,
}

/// Stored attendance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSnapshot {
    pub student: StudentId,
    pub registration_number: String,
    pub records: Vec<AttendanceRecord>,
    pub updated_at: DateTime<Utc>,
}

/// Stored marks snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksSnapshot {
    pub student: StudentId,
    pub registration_number: String,
    pub records: Vec<MarksRecord>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_is_transparent_in_json() {
        let id = StudentId::new("ab1234@university.edu");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!("ab1234@university.edu")
        );
        assert_eq!(id.to_string(), "ab1234@university.edu");
    }
}

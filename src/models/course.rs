//! Records extracted from portal pages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One course a student is registered for, as published on the timetable page.
///
/// Constructed once per scrape and never mutated; only the merge *result* is
/// persisted, the course list itself rides along as pass-through data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    /// Course identifier, e.g. `18CSC302J`. May repeat across categories.
    pub code: String,
    /// Human-readable course title.
    pub title: String,
    /// Raw slot token(s) exactly as published: a single code (`"A"`), an
    /// alternation (`"A/X"`), or a hyphen-joined lab sequence
    /// (`"P37-P38-P39-"` / the abbreviated `"P37-38-39-"`).
    pub slot_code: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub course_type: String,
    /// Secondary identifier published alongside the course (the GCR code).
    #[serde(default)]
    pub secondary_code: String,
}

/// Per-course attendance row from the attendance page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub course_code: String,
    pub course_title: String,
    pub category: String,
    pub faculty: String,
    pub slot: String,
    pub hours_conducted: u32,
    pub hours_absent: u32,
    pub attendance_percentage: f64,
    /// Lab rows are flagged because the portal frequently publishes them with
    /// missing or malformed hour counts.
    pub is_lab: bool,
}

/// Marks obtained in a single test, parsed from the nested test table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMark {
    /// Test identifier, e.g. `CLA-1`.
    pub test_code: String,
    pub max_marks: f64,
    pub obtained: MarkValue,
}

/// Obtained marks as published. The portal shows non-numeric values
/// ("Abs" and friends), so the raw text is preserved when it is not a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkValue {
    Score(f64),
    Raw(String),
}

impl MarkValue {
    /// Parse a trimmed cell text, keeping the raw text when it is not numeric.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(score) => MarkValue::Score(score),
            Err(_) => MarkValue::Raw(text.trim().to_string()),
        }
    }

    pub fn as_score(&self) -> Option<f64> {
        match self {
            MarkValue::Score(s) => Some(*s),
            MarkValue::Raw(_) => None,
        }
    }
}

/// Test performance for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksRecord {
    pub course_name: String,
    pub tests: Vec<TestMark>,
}

/// Label/value pairs harvested from the personal-details block
/// (Name, Registration Number, Batch, Program, ...).
pub type PersonalDetails = BTreeMap<String, String>;

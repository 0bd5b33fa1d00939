//! Data Transfer Objects for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, AttendanceSnapshot, EnrolledCourse, MarksRecord, MarksSnapshot,
    PersonalDetails, StudentId, TimetableRecord,
};
use crate::services::job_tracker::{JobStatus, LogEntry};

/// Request body for portal login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login: the API bearer token plus the job id of
/// the initial refresh kicked off in the background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub job_id: String,
    pub message: String,
}

/// Response for a refresh request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub job_id: String,
    pub message: String,
}

/// Job status response for background refresh jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub result: Option<serde_json::Value>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Stored timetable, served both as the ordered day list and as the nested
/// day → time → cell map frontends consume directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableResponse {
    pub cohort: String,
    pub timetable: serde_json::Value,
    pub personal_details: PersonalDetails,
    pub course_data: Vec<EnrolledCourse>,
    pub updated_at: DateTime<Utc>,
}

impl From<TimetableRecord> for TimetableResponse {
    fn from(record: TimetableRecord) -> Self {
        Self {
            cohort: record.cohort,
            timetable: record.timetable.to_nested_map(),
            personal_details: record.personal_details,
            course_data: record.course_data,
            updated_at: record.updated_at,
        }
    }
}

/// Stored attendance snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub registration_number: String,
    pub records: Vec<AttendanceRecord>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceSnapshot> for AttendanceResponse {
    fn from(snapshot: AttendanceSnapshot) -> Self {
        Self {
            registration_number: snapshot.registration_number,
            records: snapshot.records,
            updated_at: snapshot.updated_at,
        }
    }
}

/// Stored marks snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarksResponse {
    pub registration_number: String,
    pub records: Vec<MarksRecord>,
    pub updated_at: DateTime<Utc>,
}

impl From<MarksSnapshot> for MarksResponse {
    fn from(snapshot: MarksSnapshot) -> Self {
        Self {
            registration_number: snapshot.registration_number,
            records: snapshot.records,
            updated_at: snapshot.updated_at,
        }
    }
}

/// Personal details stored with the timetable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub student: StudentId,
    pub personal_details: PersonalDetails,
    pub updated_at: DateTime<Utc>,
}

impl From<TimetableRecord> for ProfileResponse {
    fn from(record: TimetableRecord) -> Self {
        Self {
            student: record.student,
            personal_details: record.personal_details,
            updated_at: record.updated_at,
        }
    }
}

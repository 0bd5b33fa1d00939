//! Repository trait for per-student storage.
//!
//! The storage contract is a key-value store keyed by student identity with
//! upsert-by-identity semantics: every store supersedes the whole previous
//! record, there is no merge at the storage layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceSnapshot, MarksSnapshot, StudentId, TimetableRecord};
use crate::scrape::ScrapeSession;

mod error;

pub use error::{RepositoryError, RepositoryResult};

/// An API session: an opaque bearer token mapped to the student it
/// authenticates plus the portal cookie session captured at login, so a
/// refresh can re-scrape without asking for credentials again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub student: StudentId,
    pub portal: ScrapeSession,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(student: StudentId, portal: ScrapeSession) -> Self {
        Self {
            student,
            portal,
            created_at: Utc::now(),
        }
    }
}

/// Repository for student snapshots and API sessions.
///
/// # Thread safety
/// Implementations must be `Send + Sync`; the HTTP layer shares one instance
/// behind an `Arc` across all handlers.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Timetable ====================

    /// Store (or wholly replace) a student's merged timetable record.
    async fn upsert_timetable(&self, record: &TimetableRecord) -> RepositoryResult<()>;

    /// Fetch a student's stored timetable record.
    async fn get_timetable(&self, student: &StudentId) -> RepositoryResult<TimetableRecord>;

    // ==================== Attendance ====================

    /// Store (or wholly replace) a student's attendance snapshot.
    async fn upsert_attendance(&self, snapshot: &AttendanceSnapshot) -> RepositoryResult<()>;

    /// Fetch a student's stored attendance snapshot.
    async fn get_attendance(&self, student: &StudentId) -> RepositoryResult<AttendanceSnapshot>;

    // ==================== Marks ====================

    /// Store (or wholly replace) a student's marks snapshot.
    async fn upsert_marks(&self, snapshot: &MarksSnapshot) -> RepositoryResult<()>;

    /// Fetch a student's stored marks snapshot.
    async fn get_marks(&self, student: &StudentId) -> RepositoryResult<MarksSnapshot>;

    // ==================== API sessions ====================

    /// Store an API session under its bearer token.
    async fn put_session(&self, token: &str, session: &StoredSession) -> RepositoryResult<()>;

    /// Resolve a bearer token to its stored session.
    async fn get_session(&self, token: &str) -> RepositoryResult<StoredSession>;

    /// Drop a bearer token (logout or expiry).
    async fn delete_session(&self, token: &str) -> RepositoryResult<()>;

    // ==================== Introspection ====================

    /// Identities with at least one stored snapshot.
    async fn list_students(&self) -> RepositoryResult<Vec<StudentId>>;
}

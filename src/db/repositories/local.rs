//! In-memory local repository implementation.
//!
//! Stores everything in `HashMap`s behind an `RwLock`: fast, deterministic
//! and isolated, which is exactly what unit tests and local development need.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::{
    RepositoryError, RepositoryResult, StoredSession, StudentRepository,
};
use crate::models::{AttendanceSnapshot, MarksSnapshot, StudentId, TimetableRecord};

/// In-memory student repository.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    timetables: HashMap<StudentId, TimetableRecord>,
    attendance: HashMap<StudentId, AttendanceSnapshot>,
    marks: HashMap<StudentId, MarksSnapshot>,
    sessions: HashMap<String, StoredSession>,
    is_healthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        let repo = Self::default();
        repo.data.write().unwrap().is_healthy = true;
        repo
    }

    /// Flip the health flag, for exercising connection-failure paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Drop all stored data, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let healthy = data.is_healthy;
        *data = LocalData::default();
        data.is_healthy = healthy;
    }

    /// Number of students with a stored timetable.
    pub fn timetable_count(&self) -> usize {
        self.data.read().unwrap().timetables.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().unwrap().is_healthy {
            return Err(RepositoryError::connection("repository is not healthy"));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn upsert_timetable(&self, record: &TimetableRecord) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .unwrap()
            .timetables
            .insert(record.student.clone(), record.clone());
        Ok(())
    }

    async fn get_timetable(&self, student: &StudentId) -> RepositoryResult<TimetableRecord> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .timetables
            .get(student)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("no timetable stored for {student}"))
            })
    }

    async fn upsert_attendance(&self, snapshot: &AttendanceSnapshot) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .unwrap()
            .attendance
            .insert(snapshot.student.clone(), snapshot.clone());
        Ok(())
    }

    async fn get_attendance(&self, student: &StudentId) -> RepositoryResult<AttendanceSnapshot> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .attendance
            .get(student)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("no attendance stored for {student}"))
            })
    }

    async fn upsert_marks(&self, snapshot: &MarksSnapshot) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .unwrap()
            .marks
            .insert(snapshot.student.clone(), snapshot.clone());
        Ok(())
    }

    async fn get_marks(&self, student: &StudentId) -> RepositoryResult<MarksSnapshot> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .marks
            .get(student)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("no marks stored for {student}")))
    }

    async fn put_session(&self, token: &str, session: &StoredSession) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .unwrap()
            .sessions
            .insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, token: &str) -> RepositoryResult<StoredSession> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("unknown session token"))
    }

    async fn delete_session(&self, token: &str) -> RepositoryResult<()> {
        self.check_health()?;
        self.data.write().unwrap().sessions.remove(token);
        Ok(())
    }

    async fn list_students(&self) -> RepositoryResult<Vec<StudentId>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut students: Vec<StudentId> = data
            .timetables
            .keys()
            .chain(data.attendance.keys())
            .chain(data.marks.keys())
            .cloned()
            .collect();
        students.sort();
        students.dedup();
        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergedTimetable;
    use chrono::Utc;

    fn timetable_record(student: &str) -> TimetableRecord {
        TimetableRecord {
            student: StudentId::new(student),
            cohort: "1".into(),
            timetable: MergedTimetable {
                cohort: "1".into(),
                days: vec![],
            },
            personal_details: Default::default(),
            course_data: vec![],
            checksum: "c0ffee".into(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn health_check_reflects_the_flag() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(repo
            .get_timetable(&StudentId::new("x"))
            .await
            .unwrap_err()
            .is_retryable());
    }

    #[tokio::test]
    async fn upsert_supersedes_the_whole_record() {
        let repo = LocalRepository::new();
        let student = StudentId::new("ab1234@university.edu");

        let mut record = timetable_record(student.as_str());
        repo.upsert_timetable(&record).await.unwrap();

        record.cohort = "2".into();
        record.checksum = "deadbeef".into();
        repo.upsert_timetable(&record).await.unwrap();

        let stored = repo.get_timetable(&student).await.unwrap();
        assert_eq!(stored.cohort, "2");
        assert_eq!(stored.checksum, "deadbeef");
        assert_eq!(repo.timetable_count(), 1);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let repo = LocalRepository::new();
        let student = StudentId::new("missing@university.edu");
        assert!(repo.get_timetable(&student).await.unwrap_err().is_not_found());
        assert!(repo.get_attendance(&student).await.unwrap_err().is_not_found());
        assert!(repo.get_marks(&student).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn session_roundtrip_and_delete() {
        let repo = LocalRepository::new();
        let session = StoredSession::new(
            StudentId::new("ab1234@university.edu"),
            crate::scrape::ScrapeSession::new("ab1234@university.edu", Default::default()),
        );

        repo.put_session("tok-1", &session).await.unwrap();
        let stored = repo.get_session("tok-1").await.unwrap();
        assert_eq!(stored.student, session.student);

        repo.delete_session("tok-1").await.unwrap();
        assert!(repo.get_session("tok-1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_students_deduplicates_across_snapshots() {
        let repo = LocalRepository::new();
        let record = timetable_record("ab1234@university.edu");
        repo.upsert_timetable(&record).await.unwrap();
        repo.upsert_attendance(&AttendanceSnapshot {
            student: StudentId::new("ab1234@university.edu"),
            registration_number: "RA2011003010042".into(),
            records: vec![],
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

        let students = repo.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
    }
}

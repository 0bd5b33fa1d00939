//! The background refresh pipeline against a canned portal client and the
//! in-memory repository.

mod support;

use std::collections::BTreeMap;
use std::sync::Arc;

use academia_backend::db::{LocalRepository, StudentRepository};
use academia_backend::models::{MarkValue, StudentId};
use academia_backend::scrape::ScrapeSession;
use academia_backend::services::job_tracker::{JobStatus, JobTracker};
use academia_backend::services::refresh::run_refresh_job;
use academia_backend::timetable::Reconciler;

use support::{StaticPortalClient, EMAIL, REGISTRATION};

fn fixture_session() -> ScrapeSession {
    let cookies: BTreeMap<String, String> = [("JSESSIONID", "fixture")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ScrapeSession::new(EMAIL, cookies)
}

fn setup() -> (JobTracker, Arc<LocalRepository>, Arc<Reconciler>) {
    (
        JobTracker::new(),
        Arc::new(LocalRepository::new()),
        Arc::new(Reconciler::with_builtin_grids()),
    )
}

#[tokio::test]
async fn successful_refresh_stores_all_three_snapshots() {
    let (tracker, repo, reconciler) = setup();
    let portal = Arc::new(StaticPortalClient::new());
    let job_id = tracker.create_job();

    let outcome = run_refresh_job(
        job_id.clone(),
        tracker.clone(),
        repo.clone(),
        portal,
        reconciler,
        fixture_session(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.cohort, "1");
    assert_eq!(outcome.registration_number.as_deref(), Some(REGISTRATION));

    let job = tracker.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.as_ref().unwrap()["cohort"], "1");

    let student = StudentId::new(EMAIL);
    let timetable = repo.get_timetable(&student).await.unwrap();
    assert_eq!(timetable.cohort, "1");
    assert_eq!(timetable.course_data.len(), 5);
    assert!(!timetable.checksum.is_empty());
    assert_eq!(
        timetable.personal_details.get("Registration Number").map(String::as_str),
        Some(REGISTRATION)
    );
    // The merged grid is fully populated.
    assert_eq!(timetable.timetable.cell_count(), 60);

    let attendance = repo.get_attendance(&student).await.unwrap();
    assert_eq!(attendance.registration_number, REGISTRATION);
    assert_eq!(attendance.records.len(), 2);
    assert!(attendance.records[1].is_lab);

    let marks = repo.get_marks(&student).await.unwrap();
    assert_eq!(marks.records.len(), 1);
    // Title resolved through the attendance records, not the marks table.
    assert_eq!(marks.records[0].course_name, "Design and Analysis of Algorithms");
    assert_eq!(marks.records[0].tests[1].obtained, MarkValue::Raw("Abs".into()));
}

#[tokio::test]
async fn expired_portal_session_fails_with_nothing_stored() {
    let (tracker, repo, reconciler) = setup();
    let portal = Arc::new(StaticPortalClient {
        session_expired: true,
        ..StaticPortalClient::new()
    });
    let job_id = tracker.create_job();

    let err = run_refresh_job(
        job_id.clone(),
        tracker.clone(),
        repo.clone(),
        portal,
        reconciler,
        fixture_session(),
    )
    .await
    .unwrap_err();
    assert!(err.contains("session expired"));

    assert_eq!(tracker.get_job(&job_id).unwrap().status, JobStatus::Failed);
    assert!(repo
        .get_timetable(&StudentId::new(EMAIL))
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn unknown_batch_fails_the_job_before_persisting() {
    let (tracker, repo, reconciler) = setup();
    let portal = Arc::new(StaticPortalClient::with_batch("7"));
    let job_id = tracker.create_job();

    let err = run_refresh_job(
        job_id.clone(),
        tracker.clone(),
        repo.clone(),
        portal,
        reconciler,
        fixture_session(),
    )
    .await
    .unwrap_err();
    assert!(err.contains("Could not determine schedule"));

    assert_eq!(tracker.get_job(&job_id).unwrap().status, JobStatus::Failed);
    assert!(repo
        .get_timetable(&StudentId::new(EMAIL))
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn missing_attendance_degrades_but_timetable_lands() {
    let (tracker, repo, reconciler) = setup();
    let portal = Arc::new(StaticPortalClient {
        attendance_html: "<html><body><p>not published yet</p></body></html>".to_string(),
        ..StaticPortalClient::new()
    });
    let job_id = tracker.create_job();

    let outcome = run_refresh_job(
        job_id.clone(),
        tracker.clone(),
        repo.clone(),
        portal,
        reconciler,
        fixture_session(),
    )
    .await
    .unwrap();
    assert_eq!(outcome.registration_number, None);

    let job = tracker.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let student = StudentId::new(EMAIL);
    assert!(repo.get_timetable(&student).await.is_ok());
    assert!(repo.get_attendance(&student).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn second_refresh_supersedes_the_stored_record() {
    let (tracker, repo, reconciler) = setup();
    let portal = Arc::new(StaticPortalClient::new());

    for _ in 0..2 {
        let job_id = tracker.create_job();
        run_refresh_job(
            job_id,
            tracker.clone(),
            repo.clone(),
            portal.clone(),
            reconciler.clone(),
            fixture_session(),
        )
        .await
        .unwrap();
    }

    assert_eq!(repo.timetable_count(), 1);
    let students = repo.list_students().await.unwrap();
    assert_eq!(students, vec![StudentId::new(EMAIL)]);
}

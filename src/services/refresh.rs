//! Background refresh pipeline.
//!
//! One refresh run drives the whole scrape-extract-reconcile-persist chain
//! for a single student, emitting progress logs so the frontend can stream
//! what is happening. Designed to be spawned as a background task.
//!
//! Persistence only happens after the timetable merge succeeded; a failed
//! cohort resolution or a missing course table fails the job with nothing
//! written. The attendance/marks leg degrades instead: its tables are
//! sometimes published late in the semester, so their absence is logged and
//! the timetable still lands.

use chrono::Utc;
use std::sync::Arc;

use crate::db::{calculate_checksum, StudentRepository};
use crate::extract;
use crate::models::{
    AttendanceSnapshot, EnrolledCourse, MarksSnapshot, PersonalDetails, StudentId, TimetableRecord,
};
use crate::scrape::{PortalClient, PortalPage, ScrapeSession};
use crate::services::job_tracker::{JobTracker, LogLevel};
use crate::timetable::Reconciler;

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub student: StudentId,
    pub cohort: String,
    pub registration_number: Option<String>,
    /// Grid cells left carrying a raw slot code (degraded, not failed).
    pub unresolved_cells: usize,
}

struct TimetablePageData {
    courses: Vec<EnrolledCourse>,
    detected_cohort: Option<String>,
    personal_details: PersonalDetails,
}

/// Run one full refresh for the student owning `session`.
///
/// Progress and errors are reported through the job tracker; the returned
/// error string mirrors the failure entry for callers that join the task.
pub async fn run_refresh_job(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn StudentRepository>,
    portal: Arc<dyn PortalClient>,
    reconciler: Arc<Reconciler>,
    session: ScrapeSession,
) -> Result<RefreshOutcome, String> {
    let student = StudentId::new(session.email.clone());
    tracker.log(&job_id, LogLevel::Info, "Starting portal refresh...");

    // Step 1: timetable page.
    tracker.log(&job_id, LogLevel::Info, "Fetching timetable page...");
    let timetable_html = match portal.fetch_page(&session, PortalPage::Timetable).await {
        Ok(html) => html,
        Err(e) => {
            let msg = format!("Failed to fetch timetable page: {e}");
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    // Step 2: extract the course list and page metadata off the async runtime.
    let page_data = match tokio::task::spawn_blocking(move || {
        let courses = extract::extract_courses(&timetable_html)?;
        Ok::<_, extract::ExtractionError>(TimetablePageData {
            courses,
            detected_cohort: extract::detect_cohort(&timetable_html),
            personal_details: extract::extract_personal_details(&timetable_html),
        })
    })
    .await
    {
        Ok(Ok(data)) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!("Extracted {} enrolled courses", data.courses.len()),
            );
            data
        }
        Ok(Err(e)) => {
            let msg = format!("Failed to extract course table: {e}");
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
        Err(e) => {
            let msg = format!("Extraction task panicked: {e}");
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    // Step 3: reconcile against the cohort grid.
    let cohort_hint = page_data
        .detected_cohort
        .clone()
        .or_else(|| page_data.personal_details.get("Batch").cloned());
    match &cohort_hint {
        Some(cohort) => tracker.log(
            &job_id,
            LogLevel::Info,
            format!("Detected batch {cohort}; merging timetable..."),
        ),
        None => tracker.log(
            &job_id,
            LogLevel::Warning,
            "No batch label found on the page",
        ),
    }

    let merged = match reconciler.reconcile(&page_data.courses, cohort_hint.as_deref()) {
        Ok(merged) => merged,
        Err(e) => {
            let msg = format!("Could not determine schedule: {e}");
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };
    let unresolved = merged.unresolved_cells();
    if unresolved > 0 {
        tracker.log(
            &job_id,
            LogLevel::Warning,
            format!("{unresolved} timetable cells left unresolved"),
        );
    }
    tracker.log(
        &job_id,
        LogLevel::Success,
        format!("Merged timetable for batch {}", merged.cohort),
    );

    // Step 4: attendance page (degraded on failure, see module docs).
    let mut registration_number: Option<String> = None;
    let mut attendance_records = Vec::new();
    let mut marks_records = Vec::new();
    tracker.log(&job_id, LogLevel::Info, "Fetching attendance page...");
    match portal.fetch_page(&session, PortalPage::Attendance).await {
        Ok(attendance_html) => {
            let parsed = tokio::task::spawn_blocking(move || {
                let registration = extract::extract_registration_number(&attendance_html);
                let attendance = extract::extract_attendance(&attendance_html);
                let marks = attendance.as_ref().map_or_else(
                    |_| extract::extract_marks(&attendance_html, &[]),
                    |records| extract::extract_marks(&attendance_html, records),
                );
                (registration, attendance, marks)
            })
            .await;

            match parsed {
                Ok((registration, attendance, marks)) => {
                    registration_number = registration;
                    match attendance {
                        Ok(records) => {
                            tracker.log(
                                &job_id,
                                LogLevel::Success,
                                format!("Extracted {} attendance records", records.len()),
                            );
                            attendance_records = records;
                        }
                        Err(e) => tracker.log(
                            &job_id,
                            LogLevel::Warning,
                            format!("Attendance not extracted: {e}"),
                        ),
                    }
                    match marks {
                        Ok(records) => {
                            tracker.log(
                                &job_id,
                                LogLevel::Success,
                                format!("Extracted marks for {} courses", records.len()),
                            );
                            marks_records = records;
                        }
                        Err(e) => tracker.log(
                            &job_id,
                            LogLevel::Warning,
                            format!("Marks not extracted: {e}"),
                        ),
                    }
                }
                Err(e) => tracker.log(
                    &job_id,
                    LogLevel::Warning,
                    format!("Attendance extraction task panicked: {e}"),
                ),
            }
        }
        Err(e) => tracker.log(
            &job_id,
            LogLevel::Warning,
            format!("Attendance page not fetched: {e}"),
        ),
    }

    // Step 5: persist, timetable first. The checksum lets us log whether the
    // portal actually published anything new.
    let payload = serde_json::to_string(&page_data.courses)
        .map_err(|e| format!("Failed to serialize course payload: {e}"))?;
    let checksum = calculate_checksum(&payload);
    if let Ok(existing) = repo.get_timetable(&student).await {
        if existing.checksum == checksum {
            tracker.log(
                &job_id,
                LogLevel::Info,
                "Course data unchanged since last refresh",
            );
        }
    }

    let now = Utc::now();
    let record = TimetableRecord {
        student: student.clone(),
        cohort: merged.cohort.clone(),
        timetable: merged.clone(),
        personal_details: page_data.personal_details,
        course_data: page_data.courses,
        checksum,
        updated_at: now,
    };
    if let Err(e) = repo.upsert_timetable(&record).await {
        let msg = format!("Failed to store timetable: {e}");
        tracker.fail_job(&job_id, &msg);
        return Err(msg);
    }

    let registration = registration_number.clone().unwrap_or_default();
    if !attendance_records.is_empty() {
        let snapshot = AttendanceSnapshot {
            student: student.clone(),
            registration_number: registration.clone(),
            records: attendance_records,
            updated_at: now,
        };
        if let Err(e) = repo.upsert_attendance(&snapshot).await {
            tracker.log(
                &job_id,
                LogLevel::Warning,
                format!("Failed to store attendance: {e}"),
            );
        }
    }
    if !marks_records.is_empty() {
        let snapshot = MarksSnapshot {
            student: student.clone(),
            registration_number: registration.clone(),
            records: marks_records,
            updated_at: now,
        };
        if let Err(e) = repo.upsert_marks(&snapshot).await {
            tracker.log(
                &job_id,
                LogLevel::Warning,
                format!("Failed to store marks: {e}"),
            );
        }
    }

    tracker.log(&job_id, LogLevel::Success, "Refresh complete");
    let outcome = RefreshOutcome {
        student,
        cohort: merged.cohort.clone(),
        registration_number,
        unresolved_cells: unresolved,
    };
    tracker.complete_job(
        &job_id,
        Some(serde_json::json!({
            "cohort": outcome.cohort,
            "registration_number": outcome.registration_number,
            "unresolved_cells": outcome.unresolved_cells,
        })),
    );

    Ok(outcome)
}

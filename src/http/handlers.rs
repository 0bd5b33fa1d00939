//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer, the repository, or the portal client.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use uuid::Uuid;

use super::dto::{
    AttendanceResponse, HealthResponse, JobStatusResponse, LoginRequest, LoginResponse,
    MarksResponse, ProfileResponse, RefreshResponse, TimetableResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::{StoredSession, StudentRepository};
use crate::models::StudentId;
use crate::scrape::{Credentials, PortalClient};
use crate::services::refresh::run_refresh_job;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
}

/// Resolve the bearer token to the stored session, mapping an unknown token
/// to 401 rather than 404.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<StoredSession, AppError> {
    let token = bearer_token(headers)?;
    state.repository.get_session(token).await.map_err(|e| {
        if e.is_not_found() {
            AppError::Unauthorized("invalid or expired token".to_string())
        } else {
            e.into()
        }
    })
}

/// Spawn a background refresh job for the given portal session.
fn spawn_refresh(state: &AppState, session: crate::scrape::ScrapeSession) -> String {
    let job_id = state.job_tracker.create_job();
    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let portal = state.portal.clone();
    let reconciler = state.reconciler.clone();
    let id = job_id.clone();
    tokio::spawn(async move {
        let _ = run_refresh_job(id, tracker, repo, portal, reconciler, session).await;
    });
    job_id
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Auth & Refresh
// =============================================================================

/// POST /v1/auth/login
///
/// Logs in to the portal through the gateway, stores the captured cookie
/// session under a fresh bearer token, and kicks off the initial refresh.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<LoginResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let credentials = Credentials::new(request.email.trim(), request.password);
    let session = state.portal.login(&credentials).await?;

    let token = Uuid::new_v4().to_string();
    let stored = StoredSession::new(StudentId::new(&*credentials.email), session.clone());
    state.repository.put_session(&token, &stored).await?;

    let job_id = spawn_refresh(&state, session);
    Ok(Json(LoginResponse {
        token,
        message: format!("Login successful. Track the initial refresh at /v1/jobs/{job_id}"),
        job_id,
    }))
}

/// POST /v1/refresh
///
/// Re-scrapes using the portal session stored at login. Returns 202 with a
/// job id; an expired portal session surfaces on the job as a failure.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<RefreshResponse>), AppError> {
    let stored = authorize(&state, &headers).await?;
    let job_id = spawn_refresh(&state, stored.portal);
    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            message: format!("Refresh started. Track progress at /v1/jobs/{job_id}/logs"),
            job_id,
        }),
    ))
}

// =============================================================================
// Job status
// =============================================================================

/// GET /v1/jobs/{job_id}
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: job.status,
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events until the job finishes.
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut sent = 0;
        loop {
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(sent) {
                let data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(data));
            }
            sent = logs.len();

            match tracker.get_job(&job_id) {
                Some(job) if job.status.is_finished() => {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
                Some(_) => {}
                None => break,
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}

// =============================================================================
// Stored snapshots
// =============================================================================

/// GET /v1/me/timetable
pub async fn get_timetable(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<TimetableResponse> {
    let stored = authorize(&state, &headers).await?;
    let record = state.repository.get_timetable(&stored.student).await?;
    Ok(Json(record.into()))
}

/// GET /v1/me/attendance
pub async fn get_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<AttendanceResponse> {
    let stored = authorize(&state, &headers).await?;
    let snapshot = state.repository.get_attendance(&stored.student).await?;
    Ok(Json(snapshot.into()))
}

/// GET /v1/me/marks
pub async fn get_marks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<MarksResponse> {
    let stored = authorize(&state, &headers).await?;
    let snapshot = state.repository.get_marks(&stored.student).await?;
    Ok(Json(snapshot.into()))
}

/// GET /v1/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<ProfileResponse> {
    let stored = authorize(&state, &headers).await?;
    let record = state.repository.get_timetable(&stored.student).await?;
    Ok(Json(record.into()))
}

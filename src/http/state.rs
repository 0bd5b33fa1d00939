//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::StudentRepository;
use crate::scrape::PortalClient;
use crate::services::JobTracker;
use crate::timetable::Reconciler;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository for stored student snapshots and API sessions
    pub repository: Arc<dyn StudentRepository>,
    /// Tracker for background refresh jobs
    pub job_tracker: JobTracker,
    /// Client talking to the browser-automation gateway
    pub portal: Arc<dyn PortalClient>,
    /// The timetable reconciliation engine (read-only after startup)
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn StudentRepository>,
        portal: Arc<dyn PortalClient>,
        reconciler: Arc<Reconciler>,
    ) -> Self {
        Self {
            repository,
            job_tracker: JobTracker::new(),
            portal,
            reconciler,
        }
    }
}

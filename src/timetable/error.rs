//! Reconciliation and grid-configuration failures.

/// Fatal error for one reconciliation attempt.
///
/// Malformed individual slot codes never raise; they degrade to unmapped
/// cells. The only hard failure is a cohort that cannot be pinned down, since
/// without a grid there is nothing to merge against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    /// The cohort was missing, undetectable, or outside the configured set.
    /// Not retryable for this attempt: the caller must re-acquire the page or
    /// supply the cohort explicitly.
    #[error("unknown cohort: {}", .0.as_deref().unwrap_or("not detected"))]
    UnknownCohort(Option<String>),
}

/// Errors loading or validating the cohort grid configuration.
#[derive(Debug, thiserror::Error)]
pub enum GridConfigError {
    #[error("failed to read timetable config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse timetable config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid timetable config: {0}")]
    Invalid(String),
}

//! The timetable reconciliation engine.
//!
//! Merges a fixed institutional slot grid (per cohort, see [`grid`]) against
//! a student's enrolled-course list to produce the personalized weekly
//! schedule. The merge is a pure, synchronous computation over in-memory
//! data: no I/O, no locking, safe to run concurrently for different students
//! since the configured grids are read-only after startup.
//!
//! Failure semantics: an unresolvable cohort aborts the whole run (no partial
//! grid); malformed individual slot codes never do, they degrade to unmapped
//! cells that keep the raw code visible.

pub mod error;
pub mod grid;
mod merge;
pub mod slots;

pub use error::{GridConfigError, ReconciliationError};
pub use grid::{CohortGrid, DayGrid, TimetableConfig};

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{EnrolledCourse, MergedTimetable};
use merge::CourseSlotIndex;

fn digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex must parse"))
}

/// Reconciles enrolled courses against the configured cohort grids.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: TimetableConfig,
}

impl Reconciler {
    pub fn new(config: TimetableConfig) -> Self {
        Self { config }
    }

    /// A reconciler over the compiled-in default grids.
    pub fn with_builtin_grids() -> Self {
        Self::new(TimetableConfig::builtin())
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    /// Resolve a raw cohort value against the configured set.
    ///
    /// Accepts the bare id (`"2"`) or a labelled form (`"Batch 2"`); the
    /// first digit group wins. `None`, an undetectable value, or an id
    /// outside the configured set is a fatal [`ReconciliationError`].
    pub fn resolve_cohort(&self, raw: Option<&str>) -> Result<&CohortGrid, ReconciliationError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(ReconciliationError::UnknownCohort(None));
        };

        let candidate = if self.config.cohort(raw).is_some() {
            raw.to_string()
        } else {
            digit_re()
                .find(raw)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| raw.to_string())
        };

        self.config
            .cohort(&candidate)
            .ok_or_else(|| ReconciliationError::UnknownCohort(Some(raw.to_string())))
    }

    /// Produce the merged weekly timetable for one student.
    ///
    /// `cohort` is the explicitly supplied or page-detected raw cohort value;
    /// resolution failure aborts the run. Past that point the merge is
    /// best-effort: every grid cell is emitted and unmatched codes degrade
    /// rather than fail.
    pub fn reconcile(
        &self,
        courses: &[EnrolledCourse],
        cohort: Option<&str>,
    ) -> Result<MergedTimetable, ReconciliationError> {
        let grid = self.resolve_cohort(cohort)?;
        let index = CourseSlotIndex::build(courses);
        let days = merge::merge_grid(grid, &self.config.periods, &index);
        Ok(MergedTimetable {
            cohort: grid.id.clone(),
            days,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::with_builtin_grids()
    }
}

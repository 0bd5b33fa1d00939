//! Cohort grid configuration.
//!
//! The institution publishes one fixed weekly slot grid per cohort. The grids
//! are reference data loaded from a TOML file (with a compiled-in default
//! copy), never mutated at runtime, so one [`TimetableConfig`] can be shared
//! freely across worker threads.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GridConfigError;

/// Default grids compiled into the binary; overridable via a config file.
const DEFAULT_TIMETABLES: &str = include_str!("../../config/timetables.toml");

/// One weekday of a cohort grid: one slot code per teaching period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGrid {
    /// Weekday label, e.g. `"Day 1"`.
    pub name: String,
    /// Slot codes in period order; `slots[i]` belongs to `periods[i]`.
    pub slots: Vec<String>,
}

/// The full weekly grid for one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortGrid {
    /// Cohort identifier as published, e.g. `"1"`.
    pub id: String,
    pub days: Vec<DayGrid>,
}

/// The configured set of cohort grids plus the shared period time labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    /// Time-range label per teaching period, in day order.
    pub periods: Vec<String>,
    pub cohorts: Vec<CohortGrid>,
}

impl TimetableConfig {
    /// The compiled-in default grids.
    pub fn builtin() -> Self {
        let config: TimetableConfig =
            toml::from_str(DEFAULT_TIMETABLES).expect("embedded timetable config is valid");
        config
            .validated()
            .expect("embedded timetable config is consistent")
    }

    /// Load grids from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| GridConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse grids from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, GridConfigError> {
        let config: TimetableConfig = toml::from_str(content)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, GridConfigError> {
        if self.periods.is_empty() {
            return Err(GridConfigError::Invalid("no periods defined".into()));
        }
        if self.cohorts.is_empty() {
            return Err(GridConfigError::Invalid("no cohorts defined".into()));
        }
        for cohort in &self.cohorts {
            let duplicates = self.cohorts.iter().filter(|c| c.id == cohort.id).count();
            if duplicates > 1 {
                return Err(GridConfigError::Invalid(format!(
                    "cohort {:?} is defined more than once",
                    cohort.id
                )));
            }
            if cohort.days.is_empty() {
                return Err(GridConfigError::Invalid(format!(
                    "cohort {:?} has no days",
                    cohort.id
                )));
            }
            for day in &cohort.days {
                if day.slots.len() != self.periods.len() {
                    return Err(GridConfigError::Invalid(format!(
                        "cohort {:?} {:?} has {} slots, expected {}",
                        cohort.id,
                        day.name,
                        day.slots.len(),
                        self.periods.len()
                    )));
                }
            }
        }
        Ok(self)
    }

    /// Grid for a cohort id, if configured.
    pub fn cohort(&self, id: &str) -> Option<&CohortGrid> {
        self.cohorts.iter().find(|c| c.id == id)
    }

    /// The configured cohort ids, in file order.
    pub fn cohort_ids(&self) -> impl Iterator<Item = &str> {
        self.cohorts.iter().map(|c| c.id.as_str())
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

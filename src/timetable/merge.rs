//! Course index construction and grid merge.

use std::collections::{HashMap, HashSet};

use super::grid::CohortGrid;
use super::slots;
use crate::models::{CoursePlacement, DaySchedule, EnrolledCourse, MergedCell};

/// Reserved marker for a break period shared across cohorts. It never
/// resolves to a course, no matter what the course list claims.
const BREAK_MARKER: &str = "X";

/// Grid cells the institution publishes as free periods.
fn is_empty_slot(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || matches!(code.to_lowercase().as_str(), "empty" | "break" | "-")
}

/// Ephemeral mapping from atomic slot code to the enrolled course claiming
/// it. Built fresh per reconciliation run and discarded afterwards.
#[derive(Debug, Default)]
pub(crate) struct CourseSlotIndex {
    by_code: HashMap<String, CoursePlacement>,
    /// Compound lab token → the atoms it was decomposed into.
    lab_sequences: HashMap<String, Vec<String>>,
}

impl CourseSlotIndex {
    /// Register every course under each atomic code it occupies.
    ///
    /// Multi-period lab tokens are registered under every atom *and* under
    /// the original compound string (some lookups key on the compound form
    /// directly). When two courses claim the same atom the later one wins;
    /// the collision is logged but deliberately not fatal, since observed
    /// institutional schedules reuse codes across non-overlapping contexts.
    pub fn build(courses: &[EnrolledCourse]) -> Self {
        let mut index = Self::default();
        for course in courses {
            let slot = course.slot_code.trim();
            if slot.is_empty() {
                continue;
            }
            let placement = CoursePlacement::from(course);

            let atoms = slots::atomic_codes(slot);
            for code in &atoms {
                index.register(code.clone(), placement.clone());
            }
            if slots::is_lab_sequence(slot) {
                index.register(slot.to_string(), placement.clone());
                index.lab_sequences.insert(slot.to_string(), atoms);
            }
        }

        if !index.lab_sequences.is_empty() {
            tracing::debug!(
                labs = index.lab_sequences.len(),
                "expanded multi-period lab slots"
            );
        }
        index
    }

    fn register(&mut self, code: String, placement: CoursePlacement) {
        if code == BREAK_MARKER {
            return;
        }
        if let Some(previous) = self.by_code.insert(code.clone(), placement) {
            let current = &self.by_code[&code];
            if previous.code != current.code {
                tracing::warn!(
                    slot = %code,
                    kept = %current.code,
                    displaced = %previous.code,
                    "two courses claim the same slot code; keeping the later one"
                );
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&CoursePlacement> {
        self.by_code.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    #[cfg(test)]
    pub fn lab_atoms(&self, compound: &str) -> Option<&[String]> {
        self.lab_sequences.get(compound).map(Vec::as_slice)
    }
}

/// Grid codes with no corresponding course: rendered as breaks, not leaked
/// into the display. Alternation cells contribute their unmatched parts.
fn break_codes(grid: &CohortGrid, index: &CourseSlotIndex) -> HashSet<String> {
    let mut breaks = HashSet::new();
    for day in &grid.days {
        for code in &day.slots {
            if code.contains('/') {
                for part in code.split('/').map(str::trim).filter(|p| !p.is_empty()) {
                    if !index.contains(part) {
                        breaks.insert(part.to_string());
                    }
                }
            } else if !code.is_empty() && !index.contains(code) {
                breaks.insert(code.clone());
            }
        }
    }
    breaks
}

/// Merge the cohort grid against the course index.
///
/// Every (day, period) cell of the grid is emitted, breaks included. Cells
/// never fail: anything unmatched degrades to an empty cell or, for unmapped
/// non-break codes, to the raw code kept visible in the display.
pub(crate) fn merge_grid(
    grid: &CohortGrid,
    periods: &[String],
    index: &CourseSlotIndex,
) -> Vec<DaySchedule> {
    let breaks = break_codes(grid, index);

    let mut days = Vec::with_capacity(grid.days.len());
    for day in &grid.days {
        let mut cells = Vec::with_capacity(day.slots.len());
        for (period, code) in day.slots.iter().enumerate() {
            let time = periods[period].clone();
            let mut cell = MergedCell {
                time: time.clone(),
                original_slot: code.clone(),
                display: String::new(),
                courses: Vec::new(),
            };

            if !is_empty_slot(code) {
                if code.contains('/') {
                    let matched: Vec<CoursePlacement> = code
                        .split('/')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .filter_map(|p| index.get(p))
                        .cloned()
                        .collect();
                    if !matched.is_empty() {
                        let titles: Vec<&str> =
                            matched.iter().map(|c| c.title.as_str()).collect();
                        cell.display = format!("{} ({})", titles.join(" / "), time);
                        cell.courses = matched;
                    }
                } else if let Some(course) = index.get(code) {
                    cell.display = format!("{} ({})", course.title, time);
                    cell.courses = vec![course.clone()];
                } else if !breaks.contains(code) && code != "X" {
                    // Unmapped institutional code: keep it visible rather
                    // than silently dropping the cell.
                    cell.display = code.clone();
                }
            }

            cells.push(cell);
        }
        days.push(DaySchedule {
            day: day.name.clone(),
            cells,
        });
    }
    days
}

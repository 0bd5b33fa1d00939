//! The merged weekly timetable produced by the reconciler.

use serde::{Deserialize, Serialize};

use super::course::EnrolledCourse;

/// Course data carried into a resolved timetable cell.
///
/// A reduced view of [`EnrolledCourse`]: the slot code is dropped (the cell
/// already records where the course landed) and only the fields a schedule
/// view needs survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePlacement {
    pub code: String,
    pub title: String,
    pub faculty: String,
    pub room: String,
    pub course_type: String,
}

impl From<&EnrolledCourse> for CoursePlacement {
    fn from(course: &EnrolledCourse) -> Self {
        Self {
            code: course.code.clone(),
            title: course.title.clone(),
            faculty: course.faculty.clone(),
            room: course.room.clone(),
            course_type: course.course_type.clone(),
        }
    }
}

/// One (weekday, period) cell of the merged grid.
///
/// Every cell of the cohort grid is present in the output, breaks included;
/// `original_slot` always carries the grid's unresolved slot code so
/// downstream consumers can audit mismatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedCell {
    /// Time-range label of the period, e.g. `"08:00-08:50"`.
    pub time: String,
    /// The cohort grid's slot code for this cell, unresolved.
    pub original_slot: String,
    /// Rendered label: course title(s) with the time appended, the raw slot
    /// code for unmapped non-break codes, or empty for breaks.
    pub display: String,
    /// Courses resolved into this cell. Empty for breaks and unmapped codes.
    pub courses: Vec<CoursePlacement>,
}

impl MergedCell {
    /// A break or free period: nothing resolved and nothing to show.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.display.is_empty()
    }
}

/// One weekday of the merged grid, periods in institutional order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Weekday label, e.g. `"Day 1"`.
    pub day: String,
    pub cells: Vec<MergedCell>,
}

/// The fully merged weekly timetable for one student.
///
/// Superseded wholesale on each re-scrape; there is no incremental update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedTimetable {
    /// The cohort whose grid was merged, e.g. `"1"`.
    pub cohort: String,
    pub days: Vec<DaySchedule>,
}

impl MergedTimetable {
    /// Look up a single cell by weekday label and time-range label.
    pub fn cell(&self, day: &str, time: &str) -> Option<&MergedCell> {
        self.days
            .iter()
            .find(|d| d.day == day)?
            .cells
            .iter()
            .find(|c| c.time == time)
    }

    /// Total number of cells across all days.
    pub fn cell_count(&self) -> usize {
        self.days.iter().map(|d| d.cells.len()).sum()
    }

    /// Cells that carry an unmapped raw slot code instead of a resolved
    /// course. These mark institutional codes the course list did not cover.
    pub fn unresolved_cells(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| &d.cells)
            .filter(|c| c.courses.is_empty() && !c.display.is_empty())
            .count()
    }

    /// The nested map-of-maps view the API layer serves: weekday label →
    /// time-range label → cell. Insertion order follows the institutional
    /// day/period order (`serde_json` is built with `preserve_order`).
    pub fn to_nested_map(&self) -> serde_json::Value {
        let mut days = serde_json::Map::new();
        for day in &self.days {
            let mut slots = serde_json::Map::new();
            for cell in &day.cells {
                slots.insert(
                    cell.time.clone(),
                    serde_json::to_value(cell).unwrap_or(serde_json::Value::Null),
                );
            }
            days.insert(day.day.clone(), serde_json::Value::Object(slots));
        }
        serde_json::Value::Object(days)
    }
}

//! Domain models.
//!
//! Everything in this module is a plain value type: records extracted from
//! portal pages, the merged weekly timetable the reconciler produces, and the
//! snapshot types the repository stores per student. No I/O, no interior
//! mutability.

pub mod course;
pub mod student;
pub mod timetable;

pub use course::{
    AttendanceRecord, EnrolledCourse, MarkValue, MarksRecord, PersonalDetails, TestMark,
};
pub use student::{AttendanceSnapshot, MarksSnapshot, StudentId, TimetableRecord};
pub use timetable::{CoursePlacement, DaySchedule, MergedCell, MergedTimetable};

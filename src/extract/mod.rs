//! HTML extraction for scraped portal pages.
//!
//! Portal markup is not guaranteed stable, so every extractor locates its
//! table by structural heuristics (recognizable header text) rather than by
//! exact markup. Extraction is a single pure parse pass over the page string:
//! no I/O, no retries. Rows that do not fit are skipped as tolerated noise;
//! only a missing table is an error.

mod attendance;
mod courses;
mod error;
mod marks;
mod profile;
mod tables;

pub use attendance::extract_attendance;
pub use courses::extract_courses;
pub use error::ExtractionError;
pub use marks::extract_marks;
pub use profile::{detect_cohort, extract_personal_details, extract_registration_number};

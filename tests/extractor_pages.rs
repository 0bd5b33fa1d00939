//! Extraction against full fixture pages, where several tables coexist and
//! extractors must not trip over each other's markup.

mod support;

use academia_backend::extract::{
    detect_cohort, extract_attendance, extract_courses, extract_marks,
    extract_personal_details, extract_registration_number,
};

#[test]
fn course_extraction_from_full_page() {
    let html = support::timetable_page("2");
    let courses = extract_courses(&html).unwrap();
    assert_eq!(courses, support::expected_courses());
}

#[test]
fn cohort_and_profile_from_timetable_page() {
    let html = support::timetable_page("2");
    assert_eq!(detect_cohort(&html).as_deref(), Some("2"));
    assert_eq!(
        extract_registration_number(&html).as_deref(),
        Some(support::REGISTRATION)
    );

    let details = extract_personal_details(&html);
    assert_eq!(details.get("Name").map(String::as_str), Some("A. Student"));
    assert_eq!(details.get("Batch").map(String::as_str), Some("2"));
    assert_eq!(details.get("Program").map(String::as_str), Some("B.Tech"));
}

#[test]
fn attendance_page_feeds_both_attendance_and_marks() {
    let html = support::attendance_page();

    let attendance = extract_attendance(&html).unwrap();
    assert_eq!(attendance.len(), 2);
    assert_eq!(attendance[0].course_code, "18CSC302J");
    assert_eq!(attendance[0].hours_conducted, 40);
    assert!(attendance[1].is_lab);

    let marks = extract_marks(&html, &attendance).unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].course_name, "Design and Analysis of Algorithms");
    assert_eq!(marks[0].tests.len(), 2);
}

#[test]
fn marks_rows_do_not_leak_into_attendance() {
    // The marks table also mentions "Course Code" but its rows are too short
    // to be attendance rows; none of them may show up as attendance records.
    let html = support::attendance_page();
    let attendance = extract_attendance(&html).unwrap();
    assert!(attendance.iter().all(|r| r.hours_conducted > 0));
}

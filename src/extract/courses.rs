//! Raw course extraction from the timetable page.

use scraper::Html;

use super::error::ExtractionError;
use super::tables::{cells_of, find_column, header_texts, rows_of, selector, text_of};
use crate::models::EnrolledCourse;

/// Parse the enrolled-course table out of a scraped timetable page.
///
/// The table is located by structural heuristics: the well-known
/// `course_tbl` class when present, otherwise any table whose header row
/// mentions "Course Code". Rows with too few cells are skipped; cell text is
/// trimmed but slot codes are otherwise passed through untouched (slot
/// normalization is the reconciler's job).
pub fn extract_courses(html: &str) -> Result<Vec<EnrolledCourse>, ExtractionError> {
    let document = Html::parse_document(html);

    let by_class = selector("table.course_tbl");
    let any_table = selector("table");
    let table = document
        .select(&by_class)
        .next()
        .or_else(|| {
            document
                .select(&any_table)
                .find(|t| text_of(*t).contains("Course Code"))
        })
        .ok_or(ExtractionError::NoTableFound { page: "course" })?;

    let rows = rows_of(table);
    let headers = header_texts(table);

    // Column layout is resolved from header text; the mandatory trio must be
    // present for the table to count as a course table at all.
    let idx_code = find_column(&headers, "Course Code");
    let idx_title = find_column(&headers, "Course Title");
    let idx_slot = find_column(&headers, "Slot");
    let (Some(idx_code), Some(idx_title), Some(idx_slot)) = (idx_code, idx_title, idx_slot) else {
        return Err(ExtractionError::NoTableFound { page: "course" });
    };
    let idx_gcr = find_column(&headers, "GCR Code");
    let idx_faculty = find_column(&headers, "Faculty");
    let idx_ctype = find_column(&headers, "Course Type");
    let idx_room = find_column(&headers, "Room");

    let required = idx_code
        .max(idx_title)
        .max(idx_slot)
        .max(idx_faculty.unwrap_or(0))
        .max(idx_ctype.unwrap_or(0))
        .max(idx_room.unwrap_or(0));

    let mut courses = Vec::new();
    for row in rows.into_iter().skip(1) {
        let cells: Vec<String> = cells_of(row, table).into_iter().map(text_of).collect();
        if cells.len() <= required {
            continue; // tolerated noise: spacer and sub-header rows
        }

        let cell = |idx: Option<usize>| -> String {
            idx.and_then(|i| cells.get(i)).cloned().unwrap_or_default()
        };

        let code = cells[idx_code].clone();
        let title = cells[idx_title].clone();
        if code.is_empty() || title.is_empty() {
            continue;
        }

        courses.push(EnrolledCourse {
            code,
            title,
            slot_code: cells[idx_slot].clone(),
            faculty: cell(idx_faculty),
            room: cell(idx_room),
            course_type: cell(idx_ctype),
            secondary_code: cell(idx_gcr),
        });
    }

    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_page(rows: &str) -> String {
        format!(
            r#"<html><body><table class="course_tbl">
            <tr><th>S.No</th><th>Course Code</th><th>Course Title</th><th>Credit</th>
                <th>Course Type</th><th>Faculty Name</th><th>Slot</th><th>GCR Code</th><th>Room No.</th></tr>
            {rows}
            </table></body></html>"#
        )
    }

    #[test]
    fn extracts_courses_in_document_order() {
        let html = course_page(
            r#"<tr><td>1</td><td>18CSC302J</td><td>DAA</td><td>4</td><td>Theory</td>
                   <td>Dr. A</td><td>A/X</td><td>gcr-1</td><td>TP101</td></tr>
               <tr><td>2</td><td>18CSC303L</td><td>DAA Lab</td><td>2</td><td>Practical</td>
                   <td>Dr. B</td><td>P37-P38-P39-</td><td>gcr-2</td><td>LAB2</td></tr>"#,
        );
        let courses = extract_courses(&html).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "18CSC302J");
        assert_eq!(courses[0].slot_code, "A/X");
        assert_eq!(courses[0].room, "TP101");
        assert_eq!(courses[1].slot_code, "P37-P38-P39-");
        assert_eq!(courses[1].secondary_code, "gcr-2");
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let html = course_page(
            r#"<tr><td colspan="9">Even semester</td></tr>
               <tr><td>1</td><td>18MAB201T</td><td>Transforms</td><td>4</td><td>Theory</td>
                   <td>Dr. C</td><td>B</td><td></td><td>TP204</td></tr>"#,
        );
        let courses = extract_courses(&html).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "18MAB201T");
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = extract_courses("<html><body><p>loading...</p></body></html>").unwrap_err();
        assert_eq!(err, ExtractionError::NoTableFound { page: "course" });
    }

    #[test]
    fn header_only_fallback_without_class_attr() {
        let html = r#"<table>
            <tr><td>Course Code</td><td>Course Title</td><td>Slot</td></tr>
            <tr><td>18PDH101T</td><td>Soft Skills</td><td>G</td></tr>
        </table>"#;
        let courses = extract_courses(html).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].slot_code, "G");
        assert!(courses[0].faculty.is_empty());
    }
}

//! Marks extraction from the test-performance table.

use scraper::{ElementRef, Html};

use super::error::ExtractionError;
use super::tables::{cells_of, rows_of, selector, text_of};
use crate::models::{AttendanceRecord, MarkValue, MarksRecord, TestMark};

/// Parse the per-course test marks out of a scraped attendance/marks page.
///
/// The marks table is the one whose header row mentions "Test Performance".
/// Each row carries the course code, a fallback title, and a nested table of
/// test cells shaped `<strong>CODE/MAX</strong><br>OBTAINED`. When attendance
/// records are available the course title is resolved through them, since the
/// marks table often abbreviates titles.
pub fn extract_marks(
    html: &str,
    attendance: &[AttendanceRecord],
) -> Result<Vec<MarksRecord>, ExtractionError> {
    let document = Html::parse_document(html);

    let any_table = selector("table");
    let table = document
        .select(&any_table)
        .find(|t| {
            rows_of(*t)
                .first()
                .map(|header| text_of(*header).contains("Test Performance"))
                .unwrap_or(false)
        })
        .ok_or(ExtractionError::NoTableFound { page: "marks" })?;

    let mut records = Vec::new();
    for row in rows_of(table).into_iter().skip(1) {
        let cells = cells_of(row, table);
        if cells.len() < 3 {
            continue;
        }

        let course_code = text_of(cells[0]);
        let fallback_title = text_of(cells[1]);
        if course_code.is_empty() {
            continue;
        }
        let course_name =
            resolve_course_title(&course_code, attendance).unwrap_or(fallback_title);

        let tests = match cells[2].select(&any_table).next() {
            Some(nested) => parse_test_cells(nested),
            None => Vec::new(),
        };

        records.push(MarksRecord { course_name, tests });
    }

    Ok(records)
}

/// Parse the nested table of per-test cells.
fn parse_test_cells(nested: ElementRef<'_>) -> Vec<TestMark> {
    let td = selector("td");
    let strong = selector("strong");

    let mut tests = Vec::new();
    for cell in nested.select(&td) {
        let Some(label) = cell.select(&strong).next() else {
            continue;
        };
        let label_text = text_of(label);
        let (test_code, max_marks) = match label_text.split_once('/') {
            Some((code, max)) => (code.trim().to_string(), max.trim().parse().unwrap_or(0.0)),
            None => (label_text.trim().to_string(), 0.0),
        };

        // The obtained marks are the cell's text outside the <strong> label
        // (the portal separates them with a <br>).
        let label_id = label.id();
        let mut obtained = String::new();
        for node in cell.descendants() {
            if let Some(text) = node.value().as_text() {
                let inside_label = node.ancestors().any(|a| a.id() == label_id);
                if !inside_label {
                    obtained.push_str(text);
                }
            }
        }
        let obtained = obtained.trim();
        let obtained = if obtained.is_empty() {
            MarkValue::Score(0.0)
        } else {
            MarkValue::parse(obtained)
        };

        tests.push(TestMark {
            test_code,
            max_marks,
            obtained,
        });
    }
    tests
}

/// Map a marks-table course code onto the attendance table's title.
/// Case-insensitive, with the "Regular" suffix ignored on both sides.
fn resolve_course_title(code: &str, attendance: &[AttendanceRecord]) -> Option<String> {
    let normalize = |s: &str| s.replace("Regular", "").trim().to_lowercase();
    attendance
        .iter()
        .find(|r| r.course_code.eq_ignore_ascii_case(code))
        .or_else(|| {
            attendance
                .iter()
                .find(|r| normalize(&r.course_code) == normalize(code))
        })
        .map(|r| r.course_title.clone())
}

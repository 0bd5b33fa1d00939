//! Attendance extraction from the attendance page.

use scraper::Html;
use std::collections::HashSet;

use super::error::ExtractionError;
use super::tables::{cells_of, rows_of, selector, text_of};
use crate::models::AttendanceRecord;

/// Parse per-course attendance rows out of a scraped attendance page.
///
/// Every table mentioning "Course Code" is treated as an attendance table
/// (the portal splits theory and practical courses across tables). Rows need
/// at least eight cells; hour counts that fail to parse default to zero and a
/// missing percentage is recomputed from the hours. Duplicate course codes
/// keep the first occurrence.
pub fn extract_attendance(html: &str) -> Result<Vec<AttendanceRecord>, ExtractionError> {
    let document = Html::parse_document(html);

    let any_table = selector("table");
    let tables: Vec<_> = document
        .select(&any_table)
        .filter(|t| text_of(*t).contains("Course Code"))
        .collect();
    if tables.is_empty() {
        return Err(ExtractionError::NoTableFound { page: "attendance" });
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for table in tables {
        for row in rows_of(table).into_iter().skip(1) {
            let cells: Vec<String> = cells_of(row, table).into_iter().map(text_of).collect();
            if cells.len() < 8 {
                continue;
            }

            let course_code = cells[0].clone();
            let course_title = cells[1].clone();
            if course_code.is_empty() {
                continue;
            }

            // Labs regularly ship with blank or garbled hour cells, so the
            // numeric columns are best-effort with zero defaults.
            let hours_conducted = cells[5].parse::<u32>().unwrap_or(0);
            let hours_absent = cells[6].parse::<u32>().unwrap_or(0);
            let attendance_percentage = match cells[7].parse::<f64>() {
                Ok(pct) => pct,
                Err(_) if hours_conducted > 0 => {
                    (hours_conducted.saturating_sub(hours_absent)) as f64
                        / hours_conducted as f64
                        * 100.0
                }
                Err(_) => 0.0,
            };

            let is_lab = course_code.to_uppercase().contains("LAB")
                || course_title.to_uppercase().contains("LAB");

            if seen.insert(course_code.clone()) {
                records.push(AttendanceRecord {
                    course_code,
                    course_title,
                    category: cells[2].clone(),
                    faculty: cells[3].clone(),
                    slot: cells[4].clone(),
                    hours_conducted,
                    hours_absent,
                    attendance_percentage,
                    is_lab,
                });
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendance_page(rows: &str) -> String {
        format!(
            r#"<html><body><table>
            <tr><th>Course Code</th><th>Course Title</th><th>Category</th><th>Faculty Name</th>
                <th>Slot</th><th>Hours Conducted</th><th>Hours Absent</th><th>Attn %</th></tr>
            {rows}
            </table></body></html>"#
        )
    }

    #[test]
    fn parses_rows_and_flags_labs() {
        let html = attendance_page(
            r#"<tr><td>18CSC302J</td><td>DAA</td><td>PC</td><td>Dr. A</td>
                   <td>A/X</td><td>40</td><td>4</td><td>90.00</td></tr>
               <tr><td>18CSC303L</td><td>Semiconductor Lab</td><td>PC</td><td>Dr. B</td>
                   <td>P37-P38-P39-</td><td>12</td><td>0</td><td>100.00</td></tr>"#,
        );
        let records = extract_attendance(&html).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].is_lab);
        assert!(records[1].is_lab);
        assert_eq!(records[0].hours_conducted, 40);
        assert_eq!(records[0].attendance_percentage, 90.0);
    }

    #[test]
    fn missing_percentage_is_recomputed_from_hours() {
        let html = attendance_page(
            r#"<tr><td>18CSC304J</td><td>Networks</td><td>PC</td><td>Dr. C</td>
                   <td>C</td><td>40</td><td>10</td><td>n/a</td></tr>"#,
        );
        let records = extract_attendance(&html).unwrap();
        assert_eq!(records[0].attendance_percentage, 75.0);
    }

    #[test]
    fn garbled_hours_default_to_zero() {
        let html = attendance_page(
            r#"<tr><td>18CSC305L</td><td>Project Lab</td><td>PC</td><td>Dr. D</td>
                   <td>L31</td><td>-</td><td></td><td>x</td></tr>"#,
        );
        let records = extract_attendance(&html).unwrap();
        assert_eq!(records[0].hours_conducted, 0);
        assert_eq!(records[0].hours_absent, 0);
        assert_eq!(records[0].attendance_percentage, 0.0);
    }

    #[test]
    fn duplicate_course_codes_keep_the_first_row() {
        let html = attendance_page(
            r#"<tr><td>18CSC302J</td><td>DAA</td><td>PC</td><td>Dr. A</td>
                   <td>A</td><td>40</td><td>4</td><td>90.00</td></tr>
               <tr><td>18CSC302J</td><td>DAA (Repeat)</td><td>PC</td><td>Dr. A</td>
                   <td>A</td><td>10</td><td>10</td><td>0.00</td></tr>"#,
        );
        let records = extract_attendance(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_title, "DAA");
    }

    #[test]
    fn page_without_attendance_table_is_an_error() {
        let err = extract_attendance("<html><body></body></html>").unwrap_err();
        assert_eq!(err, ExtractionError::NoTableFound { page: "attendance" });
    }
}

//! Student profile scraping: registration number, personal details,
//! and cohort ("batch") detection.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

use super::tables::{selector, text_of};
use crate::models::PersonalDetails;

/// Labels harvested into the personal-details map. Matching is exact after
/// stripping a trailing colon, so "Name" does not swallow "Faculty Name".
const PROFILE_LABELS: [&str; 7] = [
    "Registration Number",
    "Name",
    "Batch",
    "Mobile",
    "Program",
    "Department",
    "Semester",
];

fn registration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"RA\d{10,}").expect("static regex must parse"))
}

fn batch_markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Batch:?\s*</td>\s*<td[^>]*>\s*(\d+)\s*</td>")
            .expect("static regex must parse")
    })
}

/// All `<td>` cells of a document in document order.
fn all_cells(document: &Html) -> Vec<ElementRef<'_>> {
    let td = selector("td");
    document.select(&td).collect()
}

/// Registration number from a scraped page, if present.
///
/// Looks for a "Registration Number" label cell followed by a value cell
/// (possibly wrapped in `<strong>`/`<b>`), then falls back to the
/// institutional `RA<digits>` pattern anywhere in the page text.
pub fn extract_registration_number(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let cells = all_cells(&document);

    // Label cell followed by the value cell in document order.
    for (i, cell) in cells.iter().enumerate() {
        let label = text_of(*cell);
        if !label.contains("Registration Number") && !(label == "Registration") {
            continue;
        }
        if let Some(value_cell) = cells.get(i + 1) {
            let bold = selector("strong, b");
            let value = value_cell
                .select(&bold)
                .next()
                .map(text_of)
                .unwrap_or_else(|| text_of(*value_cell));
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    // Last resort: the RA-prefixed number appears somewhere in the page.
    let page_text = document.root_element().text().collect::<String>();
    registration_re()
        .find(&page_text)
        .map(|m| m.as_str().to_string())
}

/// Cohort ("batch") number detected from a scraped page fragment.
///
/// Searches for a "Batch" label near a digit cell, then falls back to a raw
/// markup pattern and finally to a lone single-digit `<strong>`. Returns the
/// digit as published; validating it against the configured cohort set is the
/// reconciler's job.
pub fn detect_cohort(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let cells = all_cells(&document);

    for (i, cell) in cells.iter().enumerate() {
        if !text_of(*cell).contains("Batch") {
            continue;
        }
        if let Some(value_cell) = cells.get(i + 1) {
            let value = text_of(*value_cell);
            if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                return Some(value);
            }
        }
    }

    if let Some(caps) = batch_markup_re().captures(html) {
        return Some(caps[1].to_string());
    }

    let strong = selector("strong");
    document
        .select(&strong)
        .map(text_of)
        .find(|t| t.len() == 1 && t.chars().all(|c| c.is_ascii_digit()))
}

/// Personal details harvested from label/value cell pairs.
pub fn extract_personal_details(html: &str) -> PersonalDetails {
    let document = Html::parse_document(html);
    let cells = all_cells(&document);

    let mut details = PersonalDetails::new();
    for (i, cell) in cells.iter().enumerate() {
        let label = text_of(*cell);
        let label = label.trim_end_matches(':').trim();
        if !PROFILE_LABELS.contains(&label) {
            continue;
        }
        if let Some(value_cell) = cells.get(i + 1) {
            let value = text_of(*value_cell);
            if !value.is_empty() && !details.contains_key(label) {
                details.insert(label.to_string(), value);
            }
        }
    }

    if !details.contains_key("Registration Number") {
        if let Some(reg) = extract_registration_number(html) {
            details.insert("Registration Number".to_string(), reg);
        }
    }

    details
}

//! Shared helpers for table-shaped scraping.

use scraper::{ElementRef, Selector};

/// Build a selector from a static, known-good pattern.
pub(crate) fn selector(pattern: &str) -> Selector {
    Selector::parse(pattern).expect("static selector must parse")
}

/// Text content of an element, whitespace-collapsed and trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The closest enclosing `<table>` of an element, if any.
fn enclosing_table<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Rows belonging to `table` itself, excluding rows of any nested table.
pub(crate) fn rows_of<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let tr = selector("tr");
    table
        .select(&tr)
        .filter(|row| enclosing_table(*row).map(|t| t.id()) == Some(table.id()))
        .collect()
}

/// `<td>` cells of a row that belong to `table` itself (nested-table cells
/// are excluded, the nested table still hangs off the owning cell).
pub(crate) fn cells_of<'a>(row: ElementRef<'a>, table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let td = selector("td");
    row.select(&td)
        .filter(|cell| enclosing_table(*cell).map(|t| t.id()) == Some(table.id()))
        .collect()
}

/// Header texts of a table: the `<th>`/`<td>` cells of its first row.
pub(crate) fn header_texts(table: ElementRef<'_>) -> Vec<String> {
    let header_cells = selector("th, td");
    match rows_of(table).first() {
        Some(row) => row.select(&header_cells).map(text_of).collect(),
        None => Vec::new(),
    }
}

/// Index of the first header whose text contains `name`.
pub(crate) fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.contains(name))
}

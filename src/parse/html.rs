//! Lifts the observation table out of the scraped page.

use scraper::{ElementRef, Html, Selector};

use super::{Error, Table};

/// Table selectors in priority order: the station page's data table first,
/// then any table at all.
const TABLE_SELECTORS: [&str; 2] = ["table.tabla-datos", "table"];

/// Finds the first usable table in the document and lifts its cells.
pub(crate) fn read_table(document: &str) -> Result<Table, Error> {
    let html = Html::parse_document(document);

    let mut last_failure = Error::NoTable;
    for candidate in TABLE_SELECTORS {
        let selector = Selector::parse(candidate).unwrap();
        for table in html.select(&selector) {
            match lift_table(table) {
                Ok(lifted) => return Ok(lifted),
                Err(failure) => last_failure = failure,
            }
        }
    }

    Err(last_failure)
}

fn lift_table(table: ElementRef) -> Result<Table, Error> {
    let row_selector = Selector::parse("tr").unwrap();
    let header_cell_selector = Selector::parse("th").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    // The header row is the first one carrying <th> cells; anything above
    // it is discarded.
    let mut rows = table.select(&row_selector);
    let header_row = rows
        .find(|row| row.select(&header_cell_selector).next().is_some())
        .ok_or(Error::NoHeaderRow)?;
    let headers = cells_of(header_row, &cell_selector);

    let data_rows: Vec<Vec<String>> = rows.map(|row| cells_of(row, &cell_selector)).collect();
    if data_rows.is_empty() {
        return Err(Error::NoBodyRows);
    }

    Ok(Table {
        headers,
        rows: data_rows,
    })
}

fn cells_of(row: ElementRef, cells: &Selector) -> Vec<String> {
    row.select(cells).map(clean_text).collect()
}

/// Joins an element's text nodes and collapses internal whitespace.
fn clean_text(element: ElementRef) -> String {
    let joined = element.text().collect::<String>();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -- Tests -------------------------------------------------------------------

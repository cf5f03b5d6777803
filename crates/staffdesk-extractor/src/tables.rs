//! Table extraction from tabular (PDF) documents.
//!
//! Pages are read in order and their text is scanned for blocks of
//! consecutive lines that split into two or more whitespace-aligned cells.
//! The first row of a block is the header, the rest are data. A document
//! with no such blocks yields an empty result, which is valid, not an
//! error.

use crate::error::ExtractError;
use staffdesk_domain::Table;
use std::path::Path;
use tracing::debug;

/// Extract zero or more tables from a PDF, in page order.
pub fn extract_tables(path: &Path) -> Result<Vec<Table>, ExtractError> {
    let document =
        lopdf::Document::load(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut tables = Vec::new();
    // get_pages returns a BTreeMap, so iteration is already page order.
    for page_number in document.get_pages().keys() {
        let text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Pdf(format!("page {}: {}", page_number, e)))?;

        let page_tables = parse_page_tables(&text);
        debug!("Page {}: {} table(s)", page_number, page_tables.len());
        tables.extend(page_tables);
    }

    Ok(tables)
}

/// Detect tables in one page's text.
///
/// A line is a row candidate when it splits into at least two cells on tab
/// or multi-space gaps; at least two consecutive row candidates form a
/// table.
pub(crate) fn parse_page_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let cells = split_row(line);
        if cells.len() >= 2 {
            block.push(cells);
        } else {
            flush_block(&mut block, &mut tables);
        }
    }
    flush_block(&mut block, &mut tables);

    tables
}

fn flush_block(block: &mut Vec<Vec<String>>, tables: &mut Vec<Table>) {
    if block.len() >= 2 {
        if let Some(table) = Table::from_raw(std::mem::take(block)) {
            tables.push(table);
        }
    } else {
        block.clear();
    }
}

/// Split a line into cells on tabs or runs of two-plus spaces.
fn split_row(line: &str) -> Vec<String> {
    line.replace('\t', "  ")
        .split("  ")
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

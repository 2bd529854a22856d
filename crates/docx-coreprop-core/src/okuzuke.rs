//! Trailing colophon ("okuzuke") table.

use docx_coreprop_config::{Okuzuke, StyleScope};
use docx_coreprop_package::Document;
use tracing::{debug, info};

use crate::error::ApplyResult;
use crate::styles::require_style;

/// Appends a page break followed by a table holding one row per entry.
///
/// Styles are resolved before anything is appended. Returns the number of
/// rows written; an entry list with no rows appends nothing.
pub fn append_okuzuke(document: &mut Document, okuzuke: &Okuzuke) -> ApplyResult<usize> {
    if okuzuke.rows.is_empty() {
        debug!("okuzuke has no rows");
        return Ok(0);
    }

    let catalog = document.styles();
    let table_style = okuzuke
        .table_style
        .as_deref()
        .map(|name| require_style(catalog, StyleScope::Table, name))
        .transpose()?;
    let para_style = okuzuke
        .para_style
        .as_deref()
        .map(|name| require_style(catalog, StyleScope::Paragraph, name))
        .transpose()?;

    let cols = okuzuke.rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    document.add_page_break()?;
    let mut table = document.add_table(okuzuke.rows.len(), cols, table_style.as_deref())?;
    for (row_idx, col_idx, mut cell) in table.cells_mut() {
        if let Some(text) = okuzuke.rows.get(row_idx).and_then(|row| row.get(col_idx)) {
            cell.set_text(text);
        }
        if para_style.is_some() {
            cell.set_paragraph_style_id(para_style.as_deref());
        }
    }

    info!(rows = okuzuke.rows.len(), cols, "okuzuke appended");
    Ok(okuzuke.rows.len())
}

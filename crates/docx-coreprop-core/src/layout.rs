//! Table layout, settings flags and section mutators.

use docx_coreprop_config::{
    LayoutSettings, KEY_TABLE_ALIGNMENT, KEY_CELL_VERTICAL_ALIGNMENT,
};
use docx_coreprop_package::{CellVerticalAlignment, Document, TableAlignment};
use tracing::info;

use crate::error::{ApplyError, ApplyResult};

/// Parses the configured keywords up front so a typo fails before any edit.
pub fn parse_table_alignment(value: &str) -> ApplyResult<TableAlignment> {
    value.trim().parse().map_err(|()| ApplyError::InvalidKeyword {
        key: KEY_TABLE_ALIGNMENT,
        value: value.to_owned(),
    })
}

pub fn parse_cell_vertical_alignment(value: &str) -> ApplyResult<CellVerticalAlignment> {
    value.trim().parse().map_err(|()| ApplyError::InvalidKeyword {
        key: KEY_CELL_VERTICAL_ALIGNMENT,
        value: value.to_owned(),
    })
}

/// Sets `w:jc` on every table; returns the number of tables.
pub fn align_tables(document: &mut Document, alignment: TableAlignment) -> usize {
    let mut count = 0;
    document.for_each_table(|mut table| {
        table.set_alignment(alignment);
        count += 1;
    });
    info!(count, "table alignment = {alignment}");
    count
}

pub fn align_cells(document: &mut Document, alignment: CellVerticalAlignment) -> usize {
    let mut count = 0;
    document.for_each_cell(|mut cell| {
        cell.set_vertical_alignment(alignment);
        count += 1;
    });
    info!(count, "cell vertical alignment = {alignment}");
    count
}

/// Switches every table to a fixed layout.
pub fn disable_autofit(document: &mut Document) -> usize {
    let mut count = 0;
    document.for_each_table(|mut table| {
        table.set_autofit(false);
        count += 1;
    });
    info!(count, "table autofit disabled");
    count
}

pub fn set_word2010_compatible(document: &mut Document) -> ApplyResult<()> {
    document.settings_mut()?.set_word2010_compatibility();
    info!("compatibility mode = Word 2010");
    Ok(())
}

pub fn set_read_only_recommended(document: &mut Document) -> ApplyResult<()> {
    document.settings_mut()?.set_read_only_recommended(true);
    info!("read-only recommended");
    Ok(())
}

pub fn add_extra_section(document: &mut Document) -> ApplyResult<()> {
    document.add_section()?;
    info!("extra section added");
    Ok(())
}

/// Keyword settings parsed ahead of the document edits.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolvedLayout {
    pub table_alignment: Option<TableAlignment>,
    pub cell_vertical_alignment: Option<CellVerticalAlignment>,
}

impl ResolvedLayout {
    pub fn resolve(layout: &LayoutSettings) -> ApplyResult<Self> {
        Ok(ResolvedLayout {
            table_alignment: layout
                .table_alignment
                .as_deref()
                .map(parse_table_alignment)
                .transpose()?,
            cell_vertical_alignment: layout
                .cell_vertical_alignment
                .as_deref()
                .map(parse_cell_vertical_alignment)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_table_alignment(" CENTER ").unwrap(), TableAlignment::Center);
        assert_eq!(
            parse_cell_vertical_alignment("Bottom").unwrap(),
            CellVerticalAlignment::Bottom
        );
    }

    #[test]
    fn unknown_keywords_name_their_key() {
        let err = parse_table_alignment("middle").unwrap_err();
        assert!(matches!(
            err,
            ApplyError::InvalidKeyword { key: KEY_TABLE_ALIGNMENT, ref value } if value == "middle"
        ));
    }
}

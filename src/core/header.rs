use crate::config::KeywordConfig;
use crate::domain::model::{ColumnMapping, Field, SheetGrid};

/// Rows scanned for header keywords.
pub const HEADER_ROWS: usize = 2;

/// Builds the column mapping of a sheet from its first two rows.
///
/// Cells are visited row 1 then row 2, left to right; the first cell matching a
/// field's keyword claims that field. Returns the missing required fields when
/// source, destination or service cannot be found.
///
/// A data row sitting in row 2 whose text equals a keyword is taken as a header
/// cell. That row then counts as a header row and is not converted.
pub fn resolve_columns(
    grid: &SheetGrid,
    keywords: &KeywordConfig,
) -> Result<ColumnMapping, Vec<Field>> {
    let mut mapping = ColumnMapping::default();

    for row in 0..HEADER_ROWS.min(grid.height()) {
        for (col, cell) in grid.row(row).iter().enumerate() {
            let text = cell.trim();
            if text.is_empty() {
                continue;
            }
            if let Some(field) = keywords.field_for(text) {
                mapping.insert(field, row, col, text);
            }
        }
    }

    let missing = mapping.missing_required();
    if missing.is_empty() {
        Ok(mapping)
    } else {
        Err(missing)
    }
}

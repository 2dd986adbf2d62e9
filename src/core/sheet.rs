use crate::config::KeywordConfig;
use crate::core::header::resolve_columns;
use crate::core::row::{validate_row, RowOutcome};
use crate::domain::model::{ColumnMapping, Field, RowLocation, SheetGrid, SkipRecord};

#[derive(Debug, Clone)]
pub enum SheetOutcome {
    /// Required header keywords were not found in the first two rows.
    Skipped(SkipRecord),
    /// Non-blank data rows, in sheet order.
    Converted {
        mapping: ColumnMapping,
        rows: Vec<RowOutcome>,
    },
}

pub fn convert_sheet(file: &str, grid: &SheetGrid, keywords: &KeywordConfig) -> SheetOutcome {
    let mapping = match resolve_columns(grid, keywords) {
        Ok(mapping) => mapping,
        Err(missing) => {
            return SheetOutcome::Skipped(SkipRecord::new(
                RowLocation::sheet(file, grid.name()),
                missing_keywords_reason(&missing, keywords),
            ));
        }
    };

    let rows = (mapping.first_data_row()..grid.height())
        .map(|index| {
            validate_row(
                grid.row(index),
                &mapping,
                keywords,
                RowLocation::row(file, grid.name(), index + 1),
            )
        })
        .filter(|outcome| !matches!(outcome, RowOutcome::Blank))
        .collect();

    SheetOutcome::Converted { mapping, rows }
}

fn missing_keywords_reason(missing: &[Field], keywords: &KeywordConfig) -> String {
    let parts: Vec<String> = missing
        .iter()
        .map(|field| format!("{} {:?}", field, keywords.keywords(*field)))
        .collect();
    format!("Missing keywords: {}", parts.join(", "))
}

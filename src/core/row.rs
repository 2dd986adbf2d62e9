use crate::config::KeywordConfig;
use crate::core::normalize::{normalize_service, split_multi_value};
use crate::domain::model::{Action, ChangeRequestRow, ColumnMapping, Field, RowLocation, SkipRecord};
use std::fmt;

/// 單列檢查結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(ChangeRequestRow),
    Skipped(SkipRecord),
    /// Every mapped cell is empty.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    Missing { field: Field, label: String },
    ActionConflict { remove: String, add: String },
    InvalidService(String),
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::Missing { field, label } => write!(f, "Miss {} '{}'", field, label),
            RowIssue::ActionConflict { remove, add } => {
                write!(f, "Have Both ('{}'&'{}')", add, remove)
            }
            RowIssue::InvalidService(token) => write!(f, "Unparseable service '{}'", token),
        }
    }
}

fn cell_text<'a>(cells: &'a [String], mapping: &ColumnMapping, field: Field) -> &'a str {
    mapping
        .column(field)
        .and_then(|c| cells.get(c.index))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Validates and normalizes one data row.
pub fn validate_row(
    cells: &[String],
    mapping: &ColumnMapping,
    keywords: &KeywordConfig,
    location: RowLocation,
) -> RowOutcome {
    let cell = |field: Field| cell_text(cells, mapping, field);

    if mapping.fields().all(|f| cell(f).is_empty()) {
        return RowOutcome::Blank;
    }

    let mut issues = Vec::new();
    let required = |field: Field, issues: &mut Vec<RowIssue>| {
        let values = split_multi_value(cell(field));
        if values.is_empty() {
            issues.push(RowIssue::Missing {
                field,
                label: mapping.label(field).to_string(),
            });
        }
        values
    };

    let source = required(Field::Source, &mut issues);
    let destination = required(Field::Destination, &mut issues);
    let raw_services = required(Field::Service, &mut issues);

    let mut service = Vec::with_capacity(raw_services.len());
    for token in &raw_services {
        match normalize_service(&keywords.replace_service(token)) {
            Some(normalized) => service.push(normalized),
            None => issues.push(RowIssue::InvalidService(token.clone())),
        }
    }

    // 只含分隔符號的格子視為未勾選
    let marked = |field: Field| !split_multi_value(cell(field)).is_empty();
    let action = match (marked(Field::Remove), marked(Field::Add)) {
        (true, true) => {
            issues.push(RowIssue::ActionConflict {
                remove: mapping.label(Field::Remove).to_string(),
                add: mapping.label(Field::Add).to_string(),
            });
            Action::None
        }
        (true, false) => Action::Remove,
        (false, true) => Action::Add,
        (false, false) => Action::None,
    };

    if !issues.is_empty() {
        let reason = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return RowOutcome::Skipped(SkipRecord::new(location, reason));
    }

    let comment = [Field::Usage, Field::Comment]
        .into_iter()
        .map(cell)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join("|");

    RowOutcome::Accepted(ChangeRequestRow {
        location,
        source,
        destination,
        service,
        action,
        comment,
    })
}

use crate::domain::model::ChangeRequestRow;

pub const VALUE_SEPARATOR: &str = "; ";

pub fn join_values(values: &[String]) -> String {
    values.join(VALUE_SEPARATOR)
}

/// Renders the advanced-options block Secure Change expects for one row.
pub fn format_block(row: &ChangeRequestRow) -> String {
    let mut lines = vec![
        format!("# {}", row.location),
        format!("source: {}", join_values(&row.source)),
        format!("destination: {}", join_values(&row.destination)),
        format!("service: {}", join_values(&row.service)),
        format!("action: {}", row.action.label()),
    ];
    if !row.comment.is_empty() {
        lines.push(format!("comment: {}", row.comment));
    }
    lines.join("\n")
}

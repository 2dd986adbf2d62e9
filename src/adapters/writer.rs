//! Timestamped output workbook.

use crate::core::format::join_values;
use crate::domain::model::{ConversionResult, SheetResult, SkipRecord};
use crate::utils::error::Result;
use chrono::{DateTime, TimeZone};
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::sync::LazyLock;

pub const OUTPUT_EXTENSION: &str = "xlsx";
pub const SKIPPED_SHEET: &str = "Skipped";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H_%M_%S";
const MAX_SHEET_NAME: usize = 31;
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

static OUTPUT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}_\d{2}_\d{2}(-\d+)?\.xlsx$")
        .expect("output file name pattern is valid")
});

/// Column indices of a converted sheet
mod cols {
    pub const SOURCE: u16 = 0;
    pub const DESTINATION: u16 = 1;
    pub const SERVICE: u16 = 2;
    pub const ACTION: u16 = 3;
    pub const COMMENT: u16 = 4;
}

pub fn output_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.{}", at.format(TIMESTAMP_FORMAT), OUTPUT_EXTENSION)
}

/// `2026-10-18T09_15_00.xlsx` -> `2026-10-18T09_15_00-2.xlsx`
pub fn numbered_file_name(base: &str, n: usize) -> String {
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{}-{}.{}", stem, n, ext),
        None => format!("{}-{}", base, n),
    }
}

pub fn is_output_file_name(name: &str) -> bool {
    OUTPUT_NAME.is_match(name)
}

/// Builds the output workbook: one sheet per converted input sheet, then the
/// skip list.
pub fn build_output_workbook(result: &ConversionResult) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    // Excel 保留名稱
    let mut used: HashSet<String> = ["history".to_string(), SKIPPED_SHEET.to_lowercase()]
        .into_iter()
        .collect();

    for sheet in &result.sheets {
        let name = unique_sheet_name(&sheet.sheet, &mut used);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_sheet(worksheet, sheet, &header_format)?;
    }

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SKIPPED_SHEET)?;
    write_skipped(worksheet, &result.skipped, &header_format)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(ws: &mut Worksheet, sheet: &SheetResult, header_format: &Format) -> Result<()> {
    ws.set_column_width(cols::SOURCE, 15)?;
    ws.set_column_width(cols::DESTINATION, 15)?;
    ws.set_column_width(cols::SERVICE, 15)?;
    ws.set_column_width(cols::ACTION, 8)?;
    ws.set_column_width(cols::COMMENT, 130)?;

    ws.write_string_with_format(0, cols::SOURCE, "Source", header_format)?;
    ws.write_string_with_format(0, cols::DESTINATION, "Destination", header_format)?;
    ws.write_string_with_format(0, cols::SERVICE, "Service", header_format)?;
    ws.write_string_with_format(0, cols::ACTION, "Action", header_format)?;
    ws.write_string_with_format(0, cols::COMMENT, "Comment", header_format)?;

    let mut row: u32 = 1;
    for record in &sheet.rows {
        ws.write_string(row, cols::SOURCE, join_values(&record.source))?;
        ws.write_string(row, cols::DESTINATION, join_values(&record.destination))?;
        ws.write_string(row, cols::SERVICE, join_values(&record.service))?;
        write_text(ws, row, cols::ACTION, record.action.label())?;
        write_text(ws, row, cols::COMMENT, &record.comment)?;
        row += 1;
    }

    Ok(())
}

fn write_skipped(ws: &mut Worksheet, skipped: &[SkipRecord], header_format: &Format) -> Result<()> {
    ws.set_column_width(0, 30)?;
    ws.set_column_width(1, 20)?;
    ws.set_column_width(2, 6)?;
    ws.set_column_width(3, 100)?;

    for (col, title) in ["File", "Sheet", "Row", "Reason"].into_iter().enumerate() {
        ws.write_string_with_format(0, col as u16, title, header_format)?;
    }

    let mut row: u32 = 1;
    for skip in skipped {
        ws.write_string(row, 0, &skip.location.file)?;
        write_text(ws, row, 1, skip.location.sheet.as_deref().unwrap_or(""))?;
        if let Some(number) = skip.location.row {
            ws.write_number(row, 2, number as f64)?;
        }
        ws.write_string(row, 3, &skip.reason)?;
        row += 1;
    }

    Ok(())
}

/// Empty cells stay blank instead of holding an empty string.
fn write_text(ws: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<()> {
    if !text.is_empty() {
        ws.write_string(row, col, text)?;
    }
    Ok(())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Excel sheet names: at most 31 chars, no `[]:*?/\`, unique ignoring case.
fn unique_sheet_name(raw: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    let base = if cleaned.is_empty() { "Sheet" } else { cleaned };

    let mut candidate = truncate_chars(base, MAX_SHEET_NAME);
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        candidate = format!(
            "{}{}",
            truncate_chars(base, MAX_SHEET_NAME - suffix.chars().count()),
            suffix
        );
        n += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}

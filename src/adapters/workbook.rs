use crate::adapters::writer::is_output_file_name;
use crate::domain::model::{RowLocation, SheetGrid, SkipRecord};
use crate::utils::error::Result;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs;
use std::path::{Path, PathBuf};

pub const WORKBOOK_EXTENSION: &str = "xlsx";
const LOCK_FILE_PREFIX: &str = "~$";

#[derive(Debug)]
pub struct WorkbookData {
    pub file_name: String,
    pub sheets: Vec<SheetGrid>,
    /// Sheets calamine could not read.
    pub failures: Vec<SkipRecord>,
}

/// `.xlsx` only; Office lock files and earlier run outputs are left out.
pub fn is_workbook_name(name: &str) -> bool {
    let is_xlsx = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
        .unwrap_or(false);

    is_xlsx && !name.starts_with(LOCK_FILE_PREFIX) && !is_output_file_name(name)
}

/// 找出目錄中所有待轉換的活頁簿，依檔名排序
pub fn discover_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_workbook_name(name) {
            files.push(path);
        } else {
            tracing::debug!("Ignoring {}", name);
        }
    }

    files.sort();
    Ok(files)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads every sheet of a workbook; the file is closed before returning.
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let file_name = display_name(path);
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut sheets = Vec::new();
    let mut failures = Vec::new();

    for sheet_name in workbook.sheet_names() {
        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => sheets.push(grid_from_range(&sheet_name, &range)),
            Err(e) => failures.push(SkipRecord::new(
                RowLocation::sheet(&file_name, &sheet_name),
                format!("cannot read sheet: {}", e),
            )),
        }
    }

    Ok(WorkbookData {
        file_name,
        sheets,
        failures,
    })
}

/// calamine ranges start at the first used cell; pad so indices are absolute.
pub fn grid_from_range(name: &str, range: &Range<Data>) -> SheetGrid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }

    SheetGrid::new(name, rows)
}

pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // 整數型的浮點數 (例如埠號 22.0) 不顯示小數
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

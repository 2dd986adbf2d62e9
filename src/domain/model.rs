use std::collections::BTreeMap;
use std::fmt;

/// Logical columns of a change-request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Source,
    Destination,
    Service,
    Remove,
    Add,
    Usage,
    Comment,
}

impl Field {
    pub const REQUIRED: [Field; 3] = [Field::Source, Field::Destination, Field::Service];

    pub fn name(self) -> &'static str {
        match self {
            Field::Source => "source",
            Field::Destination => "destination",
            Field::Service => "service",
            Field::Remove => "remove",
            Field::Add => "add",
            Field::Usage => "usage",
            Field::Comment => "comment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    Remove,
    Add,
    #[default]
    None,
}

impl Action {
    /// Secure Change 的動作字樣
    pub fn label(self) -> &'static str {
        match self {
            Action::Remove => "remove",
            Action::Add => "accept",
            Action::None => "",
        }
    }
}

/// 0 -> A, 25 -> Z, 26 -> AA
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut index = index;
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub index: usize,
    pub label: String,
}

/// Column positions discovered for one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<Field, HeaderColumn>,
    last_header_row: usize,
}

impl ColumnMapping {
    /// Records a header cell; returns false when the field was already mapped.
    pub fn insert(&mut self, field: Field, row: usize, index: usize, label: &str) -> bool {
        if self.columns.contains_key(&field) {
            return false;
        }
        self.columns.insert(
            field,
            HeaderColumn {
                index,
                label: label.to_string(),
            },
        );
        self.last_header_row = self.last_header_row.max(row);
        true
    }

    pub fn column(&self, field: Field) -> Option<&HeaderColumn> {
        self.columns.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.keys().copied()
    }

    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    /// Header text as it appears in the sheet, falling back to the field name.
    pub fn label(&self, field: Field) -> &str {
        self.column(field)
            .map(|c| c.label.as_str())
            .unwrap_or_else(|| field.name())
    }

    /// 0-based index of the first data row.
    pub fn first_data_row(&self) -> usize {
        self.last_header_row + 1
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|(field, col)| format!("{}={}", field, column_letter(col.index)))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Where a row (or a whole sheet / file) came from. Rows are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLocation {
    pub file: String,
    pub sheet: Option<String>,
    pub row: Option<usize>,
}

impl RowLocation {
    pub fn file(file: &str) -> Self {
        Self {
            file: file.to_string(),
            sheet: None,
            row: None,
        }
    }

    pub fn sheet(file: &str, sheet: &str) -> Self {
        Self {
            file: file.to_string(),
            sheet: Some(sheet.to_string()),
            row: None,
        }
    }

    pub fn row(file: &str, sheet: &str, row: usize) -> Self {
        Self {
            file: file.to_string(),
            sheet: Some(sheet.to_string()),
            row: Some(row),
        }
    }
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(sheet) = &self.sheet {
            write!(f, " / {}", sheet)?;
        }
        if let Some(row) = self.row {
            write!(f, " / row {}", row)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequestRow {
    pub location: RowLocation,
    pub source: Vec<String>,
    pub destination: Vec<String>,
    pub service: Vec<String>,
    pub action: Action,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    pub location: RowLocation,
    pub reason: String,
}

impl SkipRecord {
    pub fn new(location: RowLocation, reason: impl Into<String>) -> Self {
        Self {
            location,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SkipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} skipped: {}", self.location, self.reason)
    }
}

/// Cell text of one worksheet, addressed by absolute 0-based row/column.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    name: String,
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> &[String] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct SheetResult {
    pub sheet: String,
    pub rows: Vec<ChangeRequestRow>,
}

/// Everything one run produced, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ConversionResult {
    pub sheets: Vec<SheetResult>,
    pub skipped: Vec<SkipRecord>,
}

impl ConversionResult {
    pub fn accepted_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

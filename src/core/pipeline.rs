use crate::adapters::workbook::{discover_workbooks, display_name, read_workbook};
use crate::adapters::writer::{build_output_workbook, numbered_file_name, output_file_name};
use crate::config::KeywordConfig;
use crate::core::format::format_block;
use crate::core::row::RowOutcome;
use crate::core::sheet::{convert_sheet, SheetOutcome};
use crate::core::{ConversionResult, Pipeline, Storage};
use crate::domain::model::{RowLocation, SheetResult, SkipRecord};
use crate::utils::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Converts every workbook of a directory into one timestamped output workbook.
pub struct SheetFormatterPipeline<S: Storage> {
    storage: S,
    keywords: KeywordConfig,
    input_dir: PathBuf,
}

impl<S: Storage> SheetFormatterPipeline<S> {
    pub fn new(storage: S, keywords: KeywordConfig, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            keywords,
            input_dir: input_dir.into(),
        }
    }

    fn convert_workbook(&self, path: &Path, result: &mut ConversionResult) {
        let file_name = display_name(path);
        tracing::info!("--- Processing file: {} ---", file_name);

        let workbook = match read_workbook(path) {
            Ok(workbook) => workbook,
            Err(e) => {
                tracing::error!("❌ Cannot open {}: {}", file_name, e);
                result
                    .skipped
                    .push(SkipRecord::new(RowLocation::file(&file_name), e.to_string()));
                return;
            }
        };

        for failure in workbook.failures {
            tracing::error!("❌ {}", failure);
            result.skipped.push(failure);
        }

        for grid in &workbook.sheets {
            match convert_sheet(&workbook.file_name, grid, &self.keywords) {
                SheetOutcome::Skipped(skip) => {
                    tracing::warn!("> Sheet: [{}] Skipped. ({})", grid.name(), skip.reason);
                    result.skipped.push(skip);
                }
                SheetOutcome::Converted { mapping, rows } => {
                    tracing::info!("> Sheet: [{}] columns {}", grid.name(), mapping);

                    let mut sheet = SheetResult {
                        sheet: grid.name().to_string(),
                        rows: Vec::new(),
                    };
                    for outcome in rows {
                        match outcome {
                            RowOutcome::Accepted(row) => {
                                tracing::info!("\n{}", format_block(&row));
                                sheet.rows.push(row);
                            }
                            RowOutcome::Skipped(skip) => {
                                tracing::warn!(
                                    "  ├─ Row {} Skipped. {}",
                                    skip.location.row.unwrap_or_default(),
                                    skip.reason
                                );
                                result.skipped.push(skip);
                            }
                            RowOutcome::Blank => {}
                        }
                    }
                    result.sheets.push(sheet);
                }
            }
        }
    }

    /// 以時間戳記命名；同名檔案已存在時加上序號
    fn next_output_name(&self) -> String {
        let base = output_file_name(&Local::now());
        let mut name = base.clone();
        let mut n = 1;
        while self.storage.exists(&name) {
            n += 1;
            name = numbered_file_name(&base, n);
        }
        name
    }
}

impl<S: Storage> Pipeline for SheetFormatterPipeline<S> {
    fn extract(&self) -> Result<Vec<PathBuf>> {
        tracing::debug!("Scanning {}", self.input_dir.display());
        discover_workbooks(&self.input_dir)
    }

    fn transform(&self, inputs: Vec<PathBuf>) -> Result<ConversionResult> {
        let mut result = ConversionResult::default();
        for path in &inputs {
            self.convert_workbook(path, &mut result);
        }
        Ok(result)
    }

    fn load(&self, result: &ConversionResult) -> Result<String> {
        let buffer = build_output_workbook(result)?;
        let name = self.next_output_name();

        tracing::debug!("Writing output workbook ({} bytes) as {}", buffer.len(), name);
        self.storage.write_file(&name, &buffer)
    }
}

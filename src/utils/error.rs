use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatterError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    WorkbookReadError(#[from] calamine::XlsxError),

    #[error("Workbook write error: {0}")]
    WorkbookWriteError(#[from] rust_xlsxwriter::XlsxError),
}

impl FormatterError {
    /// 設定錯誤無法繼續執行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FormatterError::ConfigError { .. } | FormatterError::InvalidConfigValueError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FormatterError::ConfigError { .. } | FormatterError::InvalidConfigValueError { .. } => {
                "Make sure config.json sits next to the spreadsheets and lists header keywords for source, destination and service"
            }
            FormatterError::IoError(_) => {
                "Check that the working directory is writable and the files are not open in another program"
            }
            FormatterError::WorkbookReadError(_) => {
                "Re-save the workbook as .xlsx and make sure it is not password protected"
            }
            FormatterError::WorkbookWriteError(_) => {
                "Check free disk space and permissions of the working directory"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatterError>;

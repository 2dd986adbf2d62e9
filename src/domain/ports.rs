use crate::domain::model::ConversionResult;
use crate::utils::error::Result;
use std::path::PathBuf;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    /// Writes a new file and returns its full path. Never overwrites.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<PathBuf>>;
    fn transform(&self, inputs: Vec<PathBuf>) -> Result<ConversionResult>;
    fn load(&self, result: &ConversionResult) -> Result<String>;
}

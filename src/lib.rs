pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::KeywordConfig;
pub use crate::core::{etl::ConversionEngine, pipeline::SheetFormatterPipeline};
pub use utils::error::{FormatterError, Result};

pub mod etl;
pub mod format;
pub mod header;
pub mod normalize;
pub mod pipeline;
pub mod row;
pub mod sheet;

pub use crate::domain::model::ConversionResult;
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;

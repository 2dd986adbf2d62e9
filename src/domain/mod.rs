// Domain layer: row/sheet models and ports. No spreadsheet crates here.

pub mod model;
pub mod ports;

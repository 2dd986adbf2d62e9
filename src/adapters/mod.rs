// Adapters layer: spreadsheet I/O (calamine in, rust_xlsxwriter out) and local storage.

pub mod storage;
pub mod workbook;
pub mod writer;

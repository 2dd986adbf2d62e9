use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::error::Result;

/// 日誌檔輸出層：附加寫入、不含色碼、逐行附時間戳記
pub fn file_layer<S>(log_path: &Path) -> Result<fmt::Layer<S, DefaultFields, Format, Mutex<File>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    Ok(fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file)))
}

/// 同時輸出到終端機與日誌檔
pub fn init_cli_logger(verbose: bool, log_path: &Path) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sc_formatter=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sc_formatter=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .without_time()
                .compact(),
        )
        .with(file_layer(log_path)?)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::config::KeywordConfig;
    use crate::core::etl::ConversionEngine;
    use crate::core::pipeline::SheetFormatterPipeline;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_request(dir: &Path) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Rules").unwrap();
        let rows: [[&str; 3]; 3] = [
            ["Source", "Destination", "Service"],
            ["10.0.0.1;10.0.0.2", "192.168.1.10", "22"],
            ["10.0.0.3", "192.168.1.11", "ftp"],
        ];
        for (r, cells) in rows.iter().enumerate() {
            for (c, text) in cells.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *text).unwrap();
            }
        }
        workbook.save(dir.join("request.xlsx")).unwrap();
    }

    #[test]
    fn test_log_file_records_blocks_and_skips() {
        let work_dir = TempDir::new().unwrap();
        let log_dir = TempDir::new().unwrap();
        let log_path = log_dir.path().join("output.log");
        write_request(work_dir.path());

        let keywords = KeywordConfig::from_json_str(
            r#"{"source": "Source", "destination": "Destination", "service": "Service"}"#,
        )
        .unwrap();
        let pipeline =
            SheetFormatterPipeline::new(LocalStorage::new(work_dir.path()), keywords, work_dir.path());

        let subscriber = tracing_subscriber::registry().with(file_layer(&log_path).unwrap());
        let summary = tracing::subscriber::with_default(subscriber, || {
            ConversionEngine::new(pipeline).run().unwrap()
        });
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.skipped, 1);

        let log = std::fs::read_to_string(&log_path).unwrap();

        assert!(log.contains("source: 10.0.0.1; 10.0.0.2"));
        assert!(log.contains("service: TCP 22"));
        assert!(log.contains("Row 3 Skipped. Unparseable service 'ftp'"));
        assert!(!log.contains("\x1b["));
        // 每筆事件以時間戳記開頭
        let first = log.lines().next().unwrap();
        assert!(first.starts_with(|c: char| c.is_ascii_digit()), "{}", first);
    }

    #[test]
    fn test_log_file_is_appended() {
        let log_dir = TempDir::new().unwrap();
        let log_path = log_dir.path().join("output.log");
        std::fs::write(&log_path, "previous run\n").unwrap();

        let subscriber = tracing_subscriber::registry().with(file_layer(&log_path).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("second run");
        });

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.starts_with("previous run\n"));
        assert!(log.contains("second run"));
    }
}

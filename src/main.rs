use clap::Parser;
use sc_formatter::utils::{logger, validation::Validate};
use sc_formatter::{CliConfig, ConversionEngine, KeywordConfig, LocalStorage, SheetFormatterPipeline};
use std::io::BufRead;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌 (終端機 + output.log)
    if let Err(e) = logger::init_cli_logger(config.verbose, &config.log_path()) {
        eprintln!("❌ Cannot open log file {}: {}", config.log_path().display(), e);
        std::process::exit(1);
    }

    tracing::info!("Current Directory: {}", config.dir.display());

    let exit_code = match run(&config) {
        Ok(()) => 0,
        Err(e) if e.is_fatal() => {
            tracing::error!("❌ Configuration error, nothing was converted: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            1
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            1
        }
    };

    if !config.no_pause {
        wait_for_enter(&config);
    }

    std::process::exit(exit_code);
}

fn run(config: &CliConfig) -> sc_formatter::Result<()> {
    config.validate()?;

    let config_path = config.config_path();
    tracing::debug!("Loading keywords from {}", config_path.display());
    let keywords = KeywordConfig::from_file(&config_path)?;

    let storage = LocalStorage::new(config.dir.clone());
    let pipeline = SheetFormatterPipeline::new(storage, keywords, config.dir.clone());
    let summary = ConversionEngine::new(pipeline).run()?;

    tracing::info!(
        "✅ Done: {} workbook(s), {} row(s) accepted, {} skipped",
        summary.workbooks,
        summary.accepted,
        summary.skipped
    );
    Ok(())
}

fn wait_for_enter(config: &CliConfig) {
    tracing::info!(
        "回車關閉此終端。此終端訊息皆存於 {}",
        config.log_path().display()
    );
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

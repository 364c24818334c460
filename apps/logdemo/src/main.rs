use anyhow::{Context, Result};
use clap::Parser;
use logger::{Configurator, LoggingConfig, Severity};
use report::JsonLinesReporter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "logdemo")]
#[command(about = "Configure a logger from a JSON file and emit one entry per severity")]
struct Args {
    /// JSON logging configuration. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `log_level` from the configuration file.
    #[arg(long)]
    level: Option<String>,

    /// Overrides `log_file` from the configuration file.
    #[arg(long)]
    file: Option<String>,

    /// Route `tracing` events through the configured logger as well.
    #[arg(long)]
    install: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => LoggingConfig::default(),
    };
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(file) = args.file {
        config.file = file;
    }

    // Error reports go to stderr as JSON lines.
    let logger = Configurator::new()
        .with_reporter(JsonLinesReporter::new(std::io::stderr()))
        .configure(&config)
        .context("Failed to configure logging")?;

    for severity in Severity::ALL.into_iter().filter(|s| *s <= Severity::Error) {
        logger.log_with(severity, format!("sample {severity} entry"), [("sample", true)]);
    }

    let request = logger.with_field("request_id", 42);
    request.info_with("request handled", [("status", 200), ("elapsed_ms", 12)]);

    if args.install {
        logger
            .install()
            .context("Failed to install tracing subscriber")?;

        let span = tracing::info_span!("job", name = "reindex");
        let _guard = span.enter();
        tracing::info!(batch = 1, "entry routed through tracing");
        tracing::warn!(retries = 2, "job is running late");
        log::info!("log facade records are bridged too");
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<LoggingConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

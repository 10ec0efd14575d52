use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Fine-tune a frozen BERT encoder with CNN/LSTM heads for binary stance
/// classification.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON application configuration
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    stance_classifier::app::run(&cli.config)
}

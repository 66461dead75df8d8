//! Acuity: Hospital mortality risk predictor.
//!
//! Main entry point for the terminal application.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use acuity::adapters::sanitize::SanitizingMakeWriter;
use acuity::adapters::ArtifactPipeline;
use acuity::application::PredictionService;
use acuity::tui::App;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // IMPORTANT: writing logs to the terminal would corrupt the TUI
    // (alternate screen). Default behavior:
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let log_mode = std::env::var("ACUITY_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file =
            std::env::var("ACUITY_LOG_FILE").unwrap_or_else(|_| "acuity.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Acuity...");

    // Load the trained pipeline artifact once; it is read-only for the rest
    // of the process. A malformed artifact aborts startup.
    let model_path =
        std::env::var("ACUITY_MODEL_PATH").unwrap_or_else(|_| "models".to_string());
    let model_path = std::path::Path::new(&model_path);

    if !model_path.exists() {
        return Err(anyhow!(
            "Model path not found at {:?}. Set ACUITY_MODEL_PATH to a pipeline JSON file or a directory containing pipeline.json.",
            model_path
        ));
    }

    let pipeline = ArtifactPipeline::load(model_path)
        .with_context(|| format!("Failed to load pipeline from {model_path:?}"))?;
    let service = Arc::new(PredictionService::new(Arc::new(pipeline)));

    let mut app = App::new(service);
    app.run()?;

    tracing::info!("Acuity shutdown complete.");
    Ok(())
}

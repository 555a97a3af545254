use crate::cli::OutputFormat;
use crate::config::{self, JavamapConfig};
use crate::engine::Engine;
use crate::output;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub coupling_threshold: Option<f64>,
    pub max_file_size: Option<u64>,
    pub parallel: bool,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let settings = resolve_settings(&config)?;

    let mut engine = Engine::new(settings);
    if !config.parallel {
        engine = engine.sequential();
    }

    let outcome = engine
        .analyze(&config.path)
        .with_context(|| format!("Failed to analyze {}", config.path.display()))?;

    let export = output::build_export(&outcome);
    match config.format {
        OutputFormat::Json => output::output_json(&export, config.output.as_deref())?,
        OutputFormat::Terminal => output::output_terminal(&export, config.output.as_deref())?,
    }

    Ok(())
}

/// Discovered configuration with command-line overrides applied.
///
/// The merged result is validated again so an invalid override (a bad
/// glob, a negative threshold) fails before any file is touched.
fn resolve_settings(config: &AnalyzeConfig) -> Result<JavamapConfig> {
    let mut settings = config::load_config(&config.path)
        .with_context(|| format!("Failed to load configuration for {}", config.path.display()))?;

    settings
        .files
        .exclude
        .extend(config.exclude.iter().cloned());
    if let Some(threshold) = config.coupling_threshold {
        settings.boundaries.coupling_threshold = threshold;
    }
    if let Some(limit) = config.max_file_size {
        settings.files.max_file_size_bytes = limit;
    }

    settings.validate()?;
    Ok(settings)
}

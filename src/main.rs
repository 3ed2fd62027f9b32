use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use sword_xml::cli::{Cli, OutputFormat, VerbosityLevel};
use sword_xml::config::{Config, ConfigManager};
use sword_xml::file_discovery::FileDiscovery;
use sword_xml::output::Output;
use sword_xml::validator::{EngineConfig, ValidationEngine};

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn verbosity(config: &Config) -> VerbosityLevel {
    if config.output.quiet {
        VerbosityLevel::Quiet
    } else if config.output.verbose {
        VerbosityLevel::Verbose
    } else {
        VerbosityLevel::Normal
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let config = ConfigManager::load_config(cli).context("Failed to load configuration")?;
    tracing::debug!(?config, "effective configuration");

    let discovery = FileDiscovery::new()
        .with_extensions(config.files.extensions.clone())
        .with_include_patterns(config.files.include_patterns.clone())
        .context("Invalid include pattern")?
        .with_exclude_patterns(config.files.exclude_patterns.clone())
        .context("Invalid exclude pattern")?;

    let engine = ValidationEngine::new(EngineConfig {
        threads: config.processing.threads,
        marshal: config.output.marshal,
        validation: config.validation.clone(),
    });
    let results = engine
        .validate_path(&cli.path, &discovery)
        .with_context(|| format!("Failed to check {}", cli.path.display()))?;

    let format: OutputFormat = config.output.format.into();
    let output = Output::new(verbosity(&config), format);
    let rendered = output.format_results(&results);
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end());
    }

    Ok(results.exit_code(config.processing.strict))
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level);

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return ExitCode::from(2);
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

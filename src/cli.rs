use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show documents with problems
    Quiet,
    /// Show a line per document and the problem findings
    #[default]
    Normal,
    /// Show the complete report tree
    Verbose,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented report tree
    #[default]
    Human,
    /// JSON document holding every report
    Json,
    /// Severity counts only
    Summary,
}

/// Check deposit protocol documents (service, entry and error documents)
#[derive(Parser, Debug, Clone)]
#[command(name = "sword-validate")]
#[command(
    about = "Parse deposit protocol XML documents and report how well they conform to the vocabulary"
)]
#[command(version)]
#[command(after_help = "EXAMPLES:
  sword-validate service.xml
  sword-validate --format json responses/
  sword-validate --strict --quiet responses/")]
pub struct Cli {
    /// Document or directory to check
    #[arg(help = "Directory or file to validate")]
    pub path: PathBuf,

    /// File extensions to process (comma-separated)
    #[arg(short = 'e', long = "extensions", default_value = "xml")]
    pub extensions: String,

    /// Number of documents processed concurrently
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Print every node of every report
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only print documents with problems
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Treat warnings as failures for the exit status
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print the re-marshalled document after its report
    #[arg(long = "marshal")]
    pub marshal: bool,

    /// Report unknown child elements as INFO findings
    #[arg(long = "report-unknown-elements")]
    pub report_unknown_elements: bool,

    /// Do not require absolute URIs where the vocabulary expects them
    #[arg(long = "relaxed-uris")]
    pub relaxed_uris: bool,

    /// Log filter (e.g. "warn", "sword_xml=debug")
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Err(format!("Path does not exist: {}", self.path.display()));
        }
        if self.threads == Some(0) {
            return Err("Number of threads must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

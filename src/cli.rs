//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ProdReport - per-professor production category reports
///
/// Counts each professor's productions by category, using a category
/// order file to map raw aliases to display names, and writes a LaTeX,
/// Markdown or JSON report with SVG charts.
///
/// Examples:
///   prodreport
///   prodreport --data report_data.csv --professors lista/professores.txt
///   prodreport --format markdown --output report.md --no-charts
///   prodreport --threshold 12 --charts-dir figures
///   prodreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Production data CSV (Professor,PDF_File,Categories,CategoryAlias)
    ///
    /// Default: from config or report_data.csv.
    #[arg(short, long, value_name = "FILE", env = "PRODREPORT_DATA")]
    pub data: Option<PathBuf>,

    /// Professor roster, one name per line
    ///
    /// When missing, professors are taken from the production data.
    #[arg(short, long, value_name = "FILE")]
    pub professors: Option<PathBuf>,

    /// Category order file (alias,'Display Name',sort_key per line)
    #[arg(long, value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Default: category_report.tex, .md or .json depending on --format.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (latex, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Directory where chart images are written
    #[arg(long, value_name = "DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Do not generate chart images
    #[arg(long)]
    pub no_charts: bool,

    /// Productions a professor needs to meet the threshold
    #[arg(long, value_name = "COUNT")]
    pub threshold: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .prodreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .prodreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// LaTeX document (default)
    #[default]
    Latex,
    /// Markdown document
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension used for the default output path.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Latex => "tex",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(threshold) = self.threshold {
            if threshold == 0 {
                return Err("Threshold must be at least 1".to_string());
            }
        }

        if let Some(ref dir) = self.charts_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Charts path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            professors: None,
            categories: None,
            output: None,
            format: None,
            charts_dir: None,
            no_charts: false,
            threshold: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "prodreport",
            "--data",
            "data.csv",
            "--format",
            "markdown",
            "--threshold",
            "5",
            "--no-charts",
        ])
        .unwrap();

        assert_eq!(args.data, Some(PathBuf::from("data.csv")));
        assert_eq!(args.format, Some(OutputFormat::Markdown));
        assert_eq!(args.threshold, Some(5));
        assert!(args.no_charts);
    }

    #[test]
    fn test_validation_zero_threshold() {
        let mut args = make_args();
        args.threshold = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_config() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/nonexistent/.prodreport.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_defaults_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Latex.extension(), "tex");
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}

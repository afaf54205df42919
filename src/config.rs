//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.prodreport.toml` files.

use crate::cli::OutputFormat;
use crate::models::{ReportLabels, DEFAULT_THRESHOLD};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".prodreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input file locations.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// Input file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Production data CSV.
    #[serde(default = "default_data")]
    pub data: PathBuf,

    /// Professor roster.
    #[serde(default = "default_professors")]
    pub professors: PathBuf,

    /// Category order file.
    #[serde(default = "default_categories")]
    pub categories: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            professors: default_professors(),
            categories: default_categories(),
        }
    }
}

fn default_data() -> PathBuf {
    PathBuf::from("report_data.csv")
}

fn default_professors() -> PathBuf {
    PathBuf::from("lista/professores.txt")
}

fn default_categories() -> PathBuf {
    PathBuf::from("config/categories_to_count.txt")
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output file. Derived from the format when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Productions needed to meet the threshold.
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Institution name on the cover page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// City line on the cover page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Source note printed under figures and tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,

    /// Logo image for the cover page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: OutputFormat::default(),
            threshold: default_threshold(),
            title: default_title(),
            institution: None,
            city: None,
            source_note: None,
            logo: None,
        }
    }
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_title() -> String {
    "Faculty Production Category Report".to_string()
}

/// Chart generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Generate chart images.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory charts are written to.
    #[serde(default = "default_charts_dir")]
    pub directory: PathBuf,

    /// Category histogram file name.
    #[serde(default = "default_histogram")]
    pub histogram: String,

    /// Threshold pie chart file name.
    #[serde(default = "default_threshold_pie")]
    pub threshold_pie: String,

    /// Global category pie chart file name.
    #[serde(default = "default_categories_pie")]
    pub categories_pie: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_charts_dir(),
            histogram: default_histogram(),
            threshold_pie: default_threshold_pie(),
            categories_pie: default_categories_pie(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_charts_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_histogram() -> String {
    "category_histogram.svg".to_string()
}

fn default_threshold_pie() -> String {
    "professors_threshold_pie.svg".to_string()
}

fn default_categories_pie() -> String {
    "global_categories_pie.svg".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.sources.data = data.clone();
        }
        if let Some(ref professors) = args.professors {
            self.sources.professors = professors.clone();
        }
        if let Some(ref categories) = args.categories {
            self.sources.categories = categories.clone();
        }

        if let Some(ref output) = args.output {
            self.report.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(threshold) = args.threshold {
            self.report.threshold = threshold;
        }

        if let Some(ref dir) = args.charts_dir {
            self.charts.directory = dir.clone();
        }

        // Flags always override
        if args.no_charts {
            self.charts.enabled = false;
        }
    }

    /// Effective report output path.
    pub fn output_path(&self) -> PathBuf {
        self.report.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("category_report.{}", self.report.format.extension()))
        })
    }

    /// Cover and caption text for the report.
    pub fn labels(&self) -> ReportLabels {
        ReportLabels {
            title: self.report.title.clone(),
            institution: self.report.institution.clone(),
            city: self.report.city.clone(),
            source_note: self.report.source_note.clone(),
            logo: self.report.logo.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sources.data, PathBuf::from("report_data.csv"));
        assert_eq!(config.report.threshold, 9);
        assert_eq!(config.report.format, OutputFormat::Latex);
        assert!(config.charts.enabled);
        assert_eq!(config.output_path(), PathBuf::from("category_report.tex"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[sources]
data = "data/productions.csv"

[report]
format = "markdown"
threshold = 12
institution = "Federal University"

[charts]
enabled = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.sources.data, PathBuf::from("data/productions.csv"));
        assert_eq!(
            config.sources.professors,
            PathBuf::from("lista/professores.txt")
        );
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.threshold, 12);
        assert_eq!(
            config.report.institution.as_deref(),
            Some("Federal University")
        );
        assert!(!config.charts.enabled);
        assert_eq!(config.output_path(), PathBuf::from("category_report.md"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config: Config = toml::from_str(
            r#"
[sources]
data = "from_config.csv"
categories = "order.txt"

[report]
threshold = 12
"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "prodreport",
            "--data",
            "from_cli.csv",
            "--format",
            "json",
            "--no-charts",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.sources.data, PathBuf::from("from_cli.csv"));
        assert_eq!(config.sources.categories, PathBuf::from("order.txt"));
        assert_eq!(config.report.threshold, 12);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(!config.charts.enabled);
        assert_eq!(config.output_path(), PathBuf::from("category_report.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report]\ntitle = \"Custom\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.report.title, "Custom");
        assert_eq!(config.labels().title, "Custom");
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report\nthreshold = ").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[sources]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[charts]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.threshold, 9);
    }
}

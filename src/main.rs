//! ProdReport - per-professor production category reports
//!
//! A CLI tool that counts each professor's productions by category,
//! maps raw category aliases to display names through a category order
//! file, and writes a LaTeX, Markdown or JSON report with SVG charts.
//!
//! Exit codes:
//!   0 - Success (missing or malformed inputs only produce warnings)
//!   1 - Invalid arguments or configuration, or the report could not be written

mod analysis;
mod categories;
mod cli;
mod config;
mod diagnostics;
mod models;
mod report;
mod sources;

use anyhow::{Context, Result};
use categories::CategoryOrder;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use diagnostics::Diagnostics;
use models::ReportMetadata;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ProdReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(&args) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .prodreport.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize input files, threshold, labels and charts.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`/`--quiet`.
fn init_logging(args: &Args) {
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow.
fn run_report(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    if config.report.threshold == 0 {
        anyhow::bail!("Threshold must be at least 1");
    }

    let mut diagnostics = Diagnostics::default();

    // Step 1: Load the inputs
    if !args.quiet {
        println!("📥 Loading inputs...");
    }

    let order = CategoryOrder::load(&config.sources.categories, &mut diagnostics);
    info!(
        "Loaded {} display categories from {}",
        order.ordered().len(),
        config.sources.categories.display()
    );

    let records = sources::load_records(&config.sources.data, &mut diagnostics);

    let roster = sources::load_roster(&config.sources.professors, &mut diagnostics);
    if roster.is_none() {
        info!("Deriving roster from production data");
    }

    // Step 2: Aggregate
    let aggregation = analysis::aggregate(
        &records,
        roster.as_deref(),
        order.alias_map(),
        config.report.threshold,
        &mut diagnostics,
    );

    if !diagnostics.is_empty() {
        info!("{} warning(s) raised while reading inputs", diagnostics.len());
    }

    // Step 3: Build the report
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        data_file: config.sources.data.clone(),
        roster_file: config.sources.professors.clone(),
        roster_derived: roster.is_none(),
        categories_file: config.sources.categories.clone(),
        threshold: config.report.threshold,
    };

    let mut report = report::assemble_report(
        &aggregation,
        &order,
        metadata,
        config.labels(),
        diagnostics,
    );

    if config.charts.enabled {
        if !args.quiet {
            println!("📈 Writing charts to {}", config.charts.directory.display());
        }
        report.charts = report::write_charts(&report, &config.charts)?;
    } else {
        debug!("Chart generation disabled");
    }

    // Step 4: Generate and save the report
    if !args.quiet {
        println!("📝 Generating report...");
    }

    let output = match config.report.format {
        OutputFormat::Latex => report::generate_latex_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    let output_path = config.output_path();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if args.quiet {
        return Ok(());
    }

    // Print summary
    let summary = &report.summary;
    println!("\n📊 Report Summary:");
    println!("   Productions: {}", summary.total_productions);
    println!("   Professors: {}", summary.total_professors);
    println!(
        "   - {}+ productions: {} | Below: {}",
        config.report.threshold,
        summary.professors_meeting_threshold,
        summary.professors_below_threshold
    );
    if !report.diagnostics.is_empty() {
        println!("   ⚠️  Warnings: {}", report.diagnostics.len());
    }
    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );

    if config.report.format == OutputFormat::Latex {
        println!("\n{}", report::compile_instructions(&output_path));
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

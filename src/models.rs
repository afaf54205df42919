//! Data models for the production report.
//!
//! This module contains the input record type, the aggregate values built
//! from it, and the assembled [`Report`] that every renderer consumes.

use crate::diagnostics::Diagnostic;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Display name of the bucket for records without any category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Literal value of the `Categories` column marking a record with no category.
pub const NO_CATEGORY_SENTINEL: &str = "NoCategory";

/// Default number of productions a professor needs to meet the threshold.
pub const DEFAULT_THRESHOLD: usize = 9;

/// Counts keyed by category display name.
pub type CategoryCounts = BTreeMap<String, usize>;

/// A single production (one PDF) attributed to a professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionRecord {
    /// Professor the production belongs to.
    pub professor: String,
    /// Raw category aliases. Empty means the record has no category.
    pub category_aliases: BTreeSet<String>,
    /// Source PDF file, kept for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<String>,
    /// Alias column as exported by the collector, kept for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_alias: Option<String>,
}

impl ProductionRecord {
    /// Creates a record from a professor name and a raw `Categories` field.
    pub fn new(professor: impl Into<String>, categories: &str) -> Self {
        Self {
            professor: professor.into(),
            category_aliases: parse_categories(categories),
            pdf_file: None,
            category_alias: None,
        }
    }

    /// True when the record contributes to the uncategorized bucket.
    pub fn is_uncategorized(&self) -> bool {
        self.category_aliases.is_empty()
    }
}

/// Splits a `|`-delimited `Categories` field into a set of aliases.
///
/// The sentinel value and blank fields both yield an empty set.
pub fn parse_categories(field: &str) -> BTreeSet<String> {
    let field = field.trim();
    if field == NO_CATEGORY_SENTINEL {
        return BTreeSet::new();
    }

    field
        .split('|')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(String::from)
        .collect()
}

/// Per-professor counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfessorAggregate {
    pub professor: String,
    /// Number of records for this professor (one per production).
    pub total_productions: usize,
    /// Occurrences per display category. A multi-category record counts
    /// once in every bucket it names, so the sum may exceed the total.
    pub category_counts: CategoryCounts,
    /// Whether `total_productions` reaches the configured threshold.
    pub meets_threshold: bool,
}

impl ProfessorAggregate {
    /// Creates an empty aggregate.
    pub fn new(professor: impl Into<String>) -> Self {
        Self {
            professor: professor.into(),
            total_productions: 0,
            category_counts: CategoryCounts::new(),
            meets_threshold: false,
        }
    }
}

/// Counts across every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalAggregate {
    pub total_productions: usize,
    pub category_counts: CategoryCounts,
    pub total_professors: usize,
    pub professors_meeting_threshold: usize,
}

/// One (category, count) pair as presented to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Per-professor section of the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessorSection {
    pub professor: String,
    pub total_productions: usize,
    pub meets_threshold: bool,
    /// Nonzero categories in presentation order.
    pub categories: Vec<CategoryCount>,
}

/// Scalar totals shown in the global section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_productions: usize,
    pub total_professors: usize,
    pub professors_meeting_threshold: usize,
    pub professors_below_threshold: usize,
}

/// A row of the detailed professor × category table.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub professor: String,
    /// Counts aligned with [`DetailedTable::columns`].
    pub counts: Vec<usize>,
    pub total: usize,
}

/// The detailed professor × category table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetailedTable {
    /// Category columns, uncategorized excluded.
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Per-column sums over every row.
    pub column_totals: Vec<usize>,
    /// Global production count.
    pub grand_total: usize,
}

/// Paths of the chart images written for this report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_pie: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories_pie: Option<PathBuf>,
}

/// Metadata about the report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub data_file: PathBuf,
    pub roster_file: PathBuf,
    /// True when the roster file was missing and professors were taken from the data.
    pub roster_derived: bool,
    pub categories_file: PathBuf,
    pub threshold: usize,
}

/// Text shown on the cover page and in figure captions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportLabels {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
}

/// The complete production report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub labels: ReportLabels,
    pub summary: ReportSummary,
    /// Nonzero global categories in presentation order.
    pub global_categories: Vec<CategoryCount>,
    /// One section per roster professor, in roster order.
    pub professors: Vec<ProfessorSection>,
    pub table: DetailedTable,
    pub charts: ChartSet,
    pub diagnostics: Vec<Diagnostic>,
}

/// Returns "production" or "productions" for a count.
pub fn productions_label(count: usize) -> &'static str {
    if count == 1 {
        "production"
    } else {
        "productions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_splits_on_pipe() {
        let aliases = parse_categories("ART| LIV |CAP");
        let expected: BTreeSet<String> = ["ART", "CAP", "LIV"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(aliases, expected);
    }

    #[test]
    fn test_parse_categories_sentinel_and_blank() {
        assert!(parse_categories("NoCategory").is_empty());
        assert!(parse_categories("  NoCategory ").is_empty());
        assert!(parse_categories("").is_empty());
        assert!(parse_categories("||").is_empty());
    }

    #[test]
    fn test_parse_categories_deduplicates() {
        let aliases = parse_categories("ART|ART");
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn test_record_is_uncategorized() {
        assert!(ProductionRecord::new("Ana", "NoCategory").is_uncategorized());
        assert!(!ProductionRecord::new("Ana", "ART").is_uncategorized());
    }

    #[test]
    fn test_productions_label() {
        assert_eq!(productions_label(0), "productions");
        assert_eq!(productions_label(1), "production");
        assert_eq!(productions_label(2), "productions");
    }
}

//! Report assembly and rendering.
//!
//! [`assemble_report`] turns an [`Aggregation`] into the presentation-ordered
//! [`Report`] value; the submodules render it as LaTeX, Markdown or SVG
//! charts, and [`generate_json_report`] dumps it as JSON.

pub mod charts;
pub mod latex;
pub mod markdown;

pub use charts::write_charts;
pub use latex::{compile_instructions, generate_latex_report};
pub use markdown::generate_markdown_report;

use crate::analysis::{present, table_columns, Aggregation};
use crate::categories::CategoryOrder;
use crate::diagnostics::Diagnostics;
use crate::models::{
    ChartSet, DetailedTable, ProfessorAggregate, ProfessorSection, Report, ReportLabels,
    ReportMetadata, ReportSummary, TableRow,
};
use anyhow::Result;

/// Build the report from aggregated counts.
///
/// Chart paths are left empty; they are filled in once the charts are written.
pub fn assemble_report(
    aggregation: &Aggregation,
    order: &CategoryOrder,
    metadata: ReportMetadata,
    labels: ReportLabels,
    diagnostics: Diagnostics,
) -> Report {
    let global = &aggregation.global;

    let summary = ReportSummary {
        total_productions: global.total_productions,
        total_professors: global.total_professors,
        professors_meeting_threshold: global.professors_meeting_threshold,
        professors_below_threshold: global
            .total_professors
            .saturating_sub(global.professors_meeting_threshold),
    };

    let professors = aggregation
        .professors
        .iter()
        .map(|professor| ProfessorSection {
            professor: professor.professor.clone(),
            total_productions: professor.total_productions,
            meets_threshold: professor.meets_threshold,
            categories: present(&professor.category_counts, order),
        })
        .collect();

    Report {
        metadata,
        labels,
        summary,
        global_categories: present(&global.category_counts, order),
        professors,
        table: build_table(aggregation, order),
        charts: ChartSet::default(),
        diagnostics: diagnostics.into_vec(),
    }
}

/// Professor × category table with a totals row.
fn build_table(aggregation: &Aggregation, order: &CategoryOrder) -> DetailedTable {
    let columns = table_columns(&aggregation.global.category_counts, order);

    let rows: Vec<TableRow> = aggregation
        .professors
        .iter()
        .map(|professor| table_row(professor, &columns))
        .collect();

    let column_totals = (0..columns.len())
        .map(|i| rows.iter().map(|row| row.counts[i]).sum())
        .collect();

    DetailedTable {
        columns,
        rows,
        column_totals,
        grand_total: aggregation.global.total_productions,
    }
}

fn table_row(professor: &ProfessorAggregate, columns: &[String]) -> TableRow {
    TableRow {
        professor: professor.professor.clone(),
        counts: columns
            .iter()
            .map(|column| {
                professor
                    .category_counts
                    .get(column)
                    .copied()
                    .unwrap_or(0)
            })
            .collect(),
        total: professor.total_productions,
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::models::ProductionRecord;
    use chrono::Utc;
    use std::path::PathBuf;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: Utc::now(),
            data_file: PathBuf::from("report_data.csv"),
            roster_file: PathBuf::from("lista/professores.txt"),
            roster_derived: false,
            categories_file: PathBuf::from("config/categories_to_count.txt"),
            threshold: 2,
        }
    }

    fn build(records: &[ProductionRecord], roster: &[String], order_source: &str) -> Report {
        let mut diagnostics = Diagnostics::default();
        let order = CategoryOrder::parse(order_source, &mut diagnostics);
        let aggregation = aggregate(
            records,
            Some(roster),
            order.alias_map(),
            2,
            &mut diagnostics,
        );
        assemble_report(
            &aggregation,
            &order,
            metadata(),
            ReportLabels::default(),
            diagnostics,
        )
    }

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_assemble_summary_and_sections() {
        let records = vec![
            ProductionRecord::new("p1", "A"),
            ProductionRecord::new("p1", "B"),
            ProductionRecord::new("p2", "NoCategory"),
        ];
        let report = build(
            &records,
            &roster(&["p1", "p2", "p3"]),
            "A,'Alpha',1\nB,'Beta',2\n",
        );

        assert_eq!(report.summary.total_productions, 3);
        assert_eq!(report.summary.total_professors, 3);
        assert_eq!(report.summary.professors_meeting_threshold, 1);
        assert_eq!(report.summary.professors_below_threshold, 2);

        let names: Vec<&str> = report
            .professors
            .iter()
            .map(|p| p.professor.as_str())
            .collect();
        assert_eq!(names, vec!["p1", "p2", "p3"]);
        assert!(report.professors[0].meets_threshold);
        assert!(report.professors[2].categories.is_empty());

        let global: Vec<&str> = report
            .global_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(global, vec!["Alpha", "Beta", "uncategorized"]);
    }

    #[test]
    fn test_table_totals_match_column_sums() {
        let records = vec![
            ProductionRecord::new("p1", "A|B"),
            ProductionRecord::new("p2", "A"),
            ProductionRecord::new("p2", "X"),
            ProductionRecord::new("p2", "NoCategory"),
        ];
        let report = build(&records, &roster(&["p1", "p2"]), "A,'Alpha',1\nB,'Beta',2\n");
        let table = &report.table;

        assert_eq!(table.columns, vec!["Alpha", "Beta", "X"]);
        for (i, total) in table.column_totals.iter().enumerate() {
            let sum: usize = table.rows.iter().map(|row| row.counts[i]).sum();
            assert_eq!(*total, sum);
        }
        assert_eq!(table.column_totals, vec![2, 1, 1]);
        assert_eq!(table.grand_total, 4);
        assert_eq!(table.rows[1].counts, vec![1, 0, 1]);
        assert_eq!(table.rows[1].total, 3);
    }

    #[test]
    fn test_configured_columns_kept_without_counts() {
        let records = vec![ProductionRecord::new("p1", "A")];
        let report = build(&records, &roster(&["p1"]), "A,'Alpha',1\nB,'Beta',2\n");

        assert_eq!(report.table.columns, vec!["Alpha", "Beta"]);
        assert_eq!(report.table.column_totals, vec![1, 0]);
    }

    #[test]
    fn test_diagnostics_carried_into_report() {
        let records = vec![ProductionRecord::new("outsider", "A")];
        let report = build(&records, &roster(&["p1"]), "A,'Alpha',1\n");

        assert_eq!(report.summary.total_productions, 1);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_generate_json_report() {
        let records = vec![ProductionRecord::new("p1", "A")];
        let report = build(&records, &roster(&["p1"]), "A,'Alpha',1\n");
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"global_categories\""));
        assert!(json.contains("\"Alpha\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total_productions"], 1);
    }
}

//! Markdown report generation.
//!
//! Same fixed layout as the LaTeX document, for reading the results
//! without a TeX toolchain.

use super::charts::chart_reference;
use crate::diagnostics::Diagnostic;
use crate::models::{
    productions_label, CategoryCount, DetailedTable, ProfessorSection, Report, ReportMetadata,
    ReportSummary,
};

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", escape_inline(&report.labels.title)));
    if let Some(ref institution) = report.labels.institution {
        output.push_str(&format!("*{}*\n\n", escape_inline(institution)));
    }

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_summary_section(
        &report.summary,
        &report.global_categories,
        report.metadata.threshold,
    ));
    output.push_str(&generate_charts_section(report));
    output.push_str(&generate_professors_section(&report.professors));
    output.push_str(&generate_detailed_table_section(&report.table));
    output.push_str(&generate_diagnostics_section(&report.diagnostics));

    // Footer
    output.push_str(&generate_footer(report.labels.source_note.as_deref()));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Production Data:** `{}`\n",
        metadata.data_file.display()
    ));
    if metadata.roster_derived {
        section.push_str("- **Roster:** derived from production data\n");
    } else {
        section.push_str(&format!(
            "- **Roster:** `{}`\n",
            metadata.roster_file.display()
        ));
    }
    section.push_str(&format!(
        "- **Category Order:** `{}`\n",
        metadata.categories_file.display()
    ));
    section.push_str(&format!(
        "- **Threshold:** {} productions\n",
        metadata.threshold
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Professors](#professors)\n");

    for professor in &report.professors {
        toc.push_str(&format!(
            "  - [{}](#{})\n",
            escape_inline(&professor.professor),
            anchor(&professor.professor)
        ));
    }

    toc.push_str("- [Detailed Table](#detailed-table)\n");

    if !report.diagnostics.is_empty() {
        toc.push_str("- [Warnings](#warnings)\n");
    }

    toc.push('\n');

    toc
}

/// Heading slug as generated by GitHub: lowercase, punctuation dropped,
/// spaces turned into hyphens.
fn anchor(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Escape characters that Markdown would treat as inline formatting.
fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn generate_category_table(categories: &[CategoryCount]) -> String {
    let mut table = String::new();

    table.push_str("| Category | Productions |\n");
    table.push_str("|:---|:---:|\n");
    for category in categories {
        table.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&category.category),
            category.count
        ));
    }
    table.push('\n');

    table
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the summary section.
fn generate_summary_section(
    summary: &ReportSummary,
    categories: &[CategoryCount],
    threshold: usize,
) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    section.push_str(&format!(
        "| Productions | Professors | {}+ Productions | Below {} |\n",
        threshold, threshold
    ));
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | {} | {} | {} |\n\n",
        summary.total_productions,
        summary.total_professors,
        summary.professors_meeting_threshold,
        summary.professors_below_threshold
    ));

    section.push_str("### Productions by Category\n\n");
    if categories.is_empty() {
        section.push_str("No production category found for the global total.\n\n");
    } else {
        section.push_str(&generate_category_table(categories));
    }

    section
}

/// Generate image links for the charts that were written.
fn generate_charts_section(report: &Report) -> String {
    let charts = [
        ("Professors meeting the threshold", &report.charts.threshold_pie),
        ("Global category distribution", &report.charts.categories_pie),
        ("Category histogram", &report.charts.histogram),
    ];

    let mut section = String::new();
    for (title, path) in charts {
        if let Some(path) = path {
            section.push_str(&format!("![{}]({})\n\n", title, chart_reference(path)));
        }
    }

    if section.is_empty() {
        return section;
    }

    format!("### Charts\n\n{}", section)
}

fn generate_professor_section(professor: &ProfessorSection) -> String {
    let mut section = String::new();

    let badge = if professor.meets_threshold { "✅" } else { "❌" };
    section.push_str(&format!("### {}\n\n", escape_inline(&professor.professor)));
    section.push_str(&format!(
        "*Meets threshold: {} | Total: {} {}*\n\n",
        badge,
        professor.total_productions,
        productions_label(professor.total_productions)
    ));

    if professor.categories.is_empty() {
        section.push_str("No productions found for this professor.\n\n");
    } else {
        section.push_str(&generate_category_table(&professor.categories));
    }

    section
}

/// Generate the per-professor sections.
fn generate_professors_section(professors: &[ProfessorSection]) -> String {
    let mut section = String::new();

    section.push_str("## Professors\n\n");
    if professors.is_empty() {
        section.push_str("No professors found.\n\n");
        return section;
    }

    for professor in professors {
        section.push_str(&generate_professor_section(professor));
    }

    section
}

/// Generate the professor × category table.
fn generate_detailed_table_section(table: &DetailedTable) -> String {
    let mut section = String::new();

    section.push_str("## Detailed Table\n\n");

    let mut header = vec!["Professor".to_string()];
    header.extend(table.columns.iter().map(|c| escape_cell(c)));
    header.push("Total".to_string());
    section.push_str(&format!("| {} |\n", header.join(" | ")));
    section.push_str(&format!(
        "|:---|{}:---:|\n",
        ":---:|".repeat(table.columns.len())
    ));

    for row in &table.rows {
        let mut cells = vec![escape_cell(&row.professor)];
        cells.extend(row.counts.iter().map(|c| c.to_string()));
        cells.push(row.total.to_string());
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    let mut totals = vec!["**Total per Category**".to_string()];
    totals.extend(table.column_totals.iter().map(|t| format!("**{}**", t)));
    totals.push(format!("**{}**", table.grand_total));
    section.push_str(&format!("| {} |\n\n", totals.join(" | ")));

    section
}

/// Generate the warnings section.
fn generate_diagnostics_section(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Warnings\n\n");
    for diagnostic in diagnostics {
        section.push_str(&format!("- {}\n", diagnostic));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer(source_note: Option<&str>) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    if let Some(note) = source_note {
        footer.push_str(&format!("*Source: {}*\n\n", note));
    }
    footer.push_str("*Report generated by prodreport*\n");

    footer
}

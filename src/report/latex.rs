//! LaTeX report generation.
//!
//! Produces an abntex2 document: cover page, table of contents, global
//! statistics with charts, one section per professor, and a landscape
//! table of professor × category counts.

use super::charts::chart_reference;
use crate::models::{
    productions_label, CategoryCount, ChartSet, DetailedTable, ProfessorSection, Report,
    ReportLabels, ReportSummary,
};
use std::path::Path;

/// Escape LaTeX special characters.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '{' | '}' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Generate a complete LaTeX report.
pub fn generate_latex_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&generate_preamble());
    output.push_str("\\begin{document}\n");
    output.push_str("\\fancyhf{}\n");
    output.push_str("\\fancyhead[R]{\\hyperlink{toc_start}{[Back to Contents]}}\n");

    output.push_str(&generate_cover_page(
        &report.labels,
        &report.metadata.generated_at.format("%Y").to_string(),
    ));
    output.push_str(&generate_table_of_contents());

    output.push_str("\\textual\n");
    output.push_str("\\pagestyle{fancy}\n");

    output.push_str(&generate_global_section(report));
    output.push_str(&generate_professors_section(
        &report.professors,
        report.metadata.threshold,
    ));
    output.push_str(&generate_detailed_table_section(
        &report.table,
        report.labels.source_note.as_deref(),
    ));

    output.push_str("\\end{document}\n");

    output
}

/// Steps for turning a generated document into a PDF.
///
/// `\includesvg` converts each chart through Inkscape, so pdflatex must be
/// allowed to run external commands.
pub fn compile_instructions(tex_path: &Path) -> String {
    let pdf_name = tex_path
        .file_stem()
        .map(|stem| format!("{}.pdf", stem.to_string_lossy()))
        .unwrap_or_else(|| "the PDF".to_string());

    let mut steps = String::new();
    steps.push_str("To compile the LaTeX report:\n");
    steps.push_str("  1. Install a LaTeX distribution (TeX Live, MiKTeX) and Inkscape; the svg package uses Inkscape to convert the charts.\n");
    steps.push_str("  2. From the directory prodreport was run in (chart paths are relative to it), run:\n");
    steps.push_str(&format!(
        "       pdflatex -shell-escape {}\n",
        tex_path.display()
    ));
    steps.push_str("  3. Run the same command once or twice more to fill in the table of contents and references.\n");
    steps.push_str(&format!("  4. The document is written to {}.\n", pdf_name));

    steps
}

fn generate_preamble() -> String {
    let mut preamble = String::new();

    preamble.push_str("\\documentclass[a4paper]{abntex2}\n");
    preamble.push_str("% Figures use the svg package: compile with pdflatex -shell-escape (Inkscape required)\n");
    for package in [
        "[utf8]{inputenc}",
        "[T1]{fontenc}",
        "{graphicx}",
        "{svg}",
        "{amsmath}",
        "{amssymb}",
        "{float}",
        "{fancyhdr}",
        "{hyperref}",
        "{longtable}",
        "{booktabs}",
        "{array}",
        "{tabularx}",
        "{geometry}",
        "{afterpage}",
    ] {
        preamble.push_str(&format!("\\usepackage{}\n", package));
    }

    preamble.push_str("\\geometry{a4paper, left=3cm, right=2cm, top=3cm, bottom=2cm}\n");
    preamble.push_str("\\newcolumntype{L}{>{\\raggedright\\arraybackslash}X}\n");
    preamble.push_str("\\newcolumntype{C}{>{\\centering\\arraybackslash}X}\n");
    preamble.push_str("\\renewcommand{\\thesection}{\\arabic{section}}\n");

    preamble
}

fn generate_cover_page(labels: &ReportLabels, year: &str) -> String {
    let mut cover = String::new();

    cover.push_str("\\thispagestyle{empty}\n");
    cover.push_str("\\begin{center}\n");
    if let Some(ref logo) = labels.logo {
        cover.push_str(&format!(
            "    \\includegraphics[width=0.3\\textwidth]{{{}}}\\\\\n",
            logo.to_string_lossy()
        ));
        cover.push_str("    \\vspace{1cm}\n");
    }
    if let Some(ref institution) = labels.institution {
        cover.push_str(&format!(
            "    {{\\LARGE \\textbf{{{}}}}}\\\\\n",
            escape_latex(&institution.to_uppercase())
        ));
    }
    cover.push_str("    \\vspace{7cm}\n");
    cover.push_str(&format!(
        "    {{\\LARGE \\textbf{{{}}}}}\n",
        escape_latex(&labels.title)
    ));
    cover.push_str("    \\vfill\n");
    if let Some(ref city) = labels.city {
        cover.push_str(&format!(
            "    {{\\large \\textbf{{{}}}}}\\\\\n",
            escape_latex(&city.to_uppercase())
        ));
    }
    cover.push_str(&format!("    {{\\large \\textbf{{{}}}}}\n", year));
    cover.push_str("\\end{center}\n");
    cover.push_str("\\newpage\n");

    cover
}

fn generate_table_of_contents() -> String {
    let mut toc = String::new();

    toc.push_str("\\thispagestyle{empty}\n");
    toc.push_str("\\hypertarget{toc_start}{}\n");
    toc.push_str("\\tableofcontents*\n");
    toc.push_str("\\listoffigures\n");
    toc.push_str("\\listoftables\n");
    toc.push_str("\\newpage\n");

    toc
}

fn generate_figure(
    caption: &str,
    path: &Path,
    label: &str,
    source_note: Option<&str>,
) -> String {
    let mut figure = String::new();

    figure.push_str("\\begin{figure}[H]\n");
    figure.push_str(&format!("    \\caption{{{}}}\n", escape_latex(caption)));
    figure.push_str("    \\centering\n");
    figure.push_str(&format!(
        "    \\includesvg[width=12cm]{{{}}}\n",
        chart_reference(path)
    ));
    figure.push_str(&format!("    \\label{{{}}}\n", label));
    figure.push_str(&generate_source_note(source_note));
    figure.push_str("\\end{figure}\n");

    figure
}

fn generate_source_note(source_note: Option<&str>) -> String {
    match source_note {
        Some(note) => format!(
            "    \\par\\vspace{{0.2cm}}\\noindent\\textbf{{Source:}} {}\n",
            escape_latex(note)
        ),
        None => String::new(),
    }
}

fn generate_chart_subsections(
    charts: &ChartSet,
    threshold: usize,
    source_note: Option<&str>,
) -> String {
    let mut section = String::new();

    if let Some(ref path) = charts.threshold_pie {
        section.push_str(&format!(
            "\\subsection{{Share of Professors with {}+ Productions}}\n",
            threshold
        ));
        section.push_str(&format!(
            "The share of professors meeting the criterion of {} or more productions is shown in the pie chart below (Figure \\ref{{fig:professors_threshold}}).\n",
            threshold
        ));
        section.push_str(&generate_figure(
            &format!("Share of professors with {}+ productions.", threshold),
            path,
            "fig:professors_threshold",
            source_note,
        ));
    }

    if let Some(ref path) = charts.categories_pie {
        section.push_str("\\subsection{Global Category Distribution}\n");
        section.push_str("The percentage distribution of all production categories is shown in the pie chart below (Figure \\ref{fig:global_categories}).\n");
        section.push_str(&generate_figure(
            "Global percentage distribution of production categories.",
            path,
            "fig:global_categories",
            source_note,
        ));
    }

    if let Some(ref path) = charts.histogram {
        section.push_str("\\subsection{Category Histogram}\n");
        section.push_str("The distribution of categories found in the productions is shown in the histogram below (Figure \\ref{fig:histogram}).\n");
        section.push_str(&generate_figure(
            "Global distribution of production categories.",
            path,
            "fig:histogram",
            source_note,
        ));
    }

    section
}

fn generate_category_items(categories: &[CategoryCount]) -> String {
    let mut items = String::new();

    items.push_str("\\begin{itemize}\n");
    for category in categories {
        items.push_str(&format!(
            "    \\item \\textbf{{{}}}: {} {}\n",
            escape_latex(&category.category),
            category.count,
            productions_label(category.count)
        ));
    }
    items.push_str("\\end{itemize}\n");

    items
}

fn generate_totals(summary: &ReportSummary, threshold: usize) -> String {
    let mut totals = String::new();

    totals.push_str(&format!(
        "\\noindent\\textbf{{Global Total of Productions}}: {} {}.\\\\\n",
        summary.total_productions,
        productions_label(summary.total_productions)
    ));
    totals.push_str(&format!(
        "\\noindent\\textbf{{Total Professors}}: {}.\\\\\n",
        summary.total_professors
    ));
    totals.push_str(&format!(
        "\\noindent\\textbf{{Professors with {}+ Productions}}: {}.\n",
        threshold, summary.professors_meeting_threshold
    ));

    totals
}

fn generate_global_section(report: &Report) -> String {
    let mut section = String::new();
    let threshold = report.metadata.threshold;

    section.push_str("\\section{Global Statistics by Category}\n");
    section.push_str(
        "This report presents the number of productions per metadata category across all faculty production.\n",
    );

    section.push_str(&generate_chart_subsections(
        &report.charts,
        threshold,
        report.labels.source_note.as_deref(),
    ));

    section.push_str("\\subsection{Detailed Count by Category}\n");
    if report.global_categories.is_empty() {
        section.push_str("No production category found for the global total.\n");
    } else {
        section.push_str(&generate_category_items(&report.global_categories));
    }

    section.push_str(&generate_totals(&report.summary, threshold));
    section.push_str("\\newpage\n");

    section
}

fn generate_professor_section(professor: &ProfessorSection, threshold: usize) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "\\subsection{{{}}}\n",
        escape_latex(&professor.professor)
    ));
    section.push_str(&format!(
        "\\noindent\\textbf{{{}+ Productions Criterion}}: {}.\n",
        threshold,
        if professor.meets_threshold { "YES" } else { "NO" }
    ));

    if professor.total_productions == 0 {
        section.push_str("No productions found for this professor.\n");
    } else if professor.categories.is_empty() {
        section.push_str("No recognized production category with a nonzero count for this professor.\n");
    } else {
        section.push_str(&generate_category_items(&professor.categories));
    }

    section.push_str(&format!(
        "\\noindent\\textbf{{Total Productions}}: {} {}.\n",
        professor.total_productions,
        productions_label(professor.total_productions)
    ));
    section.push_str("\\vspace{0.5cm}\n");

    section
}

fn generate_professors_section(professors: &[ProfessorSection], threshold: usize) -> String {
    let mut section = String::new();

    section.push_str("\\section{Category Count by Professor}\n");
    section.push_str("This section details the number of productions per category for each professor.\n");

    for professor in professors {
        section.push_str(&generate_professor_section(professor, threshold));
    }
    section.push_str("\\newpage\n");

    section
}

fn table_row(cells: &[String]) -> String {
    format!("            {} \\\\\n", cells.join(" & "))
}

fn generate_detailed_table_section(table: &DetailedTable, source_note: Option<&str>) -> String {
    let mut section = String::new();

    section.push_str("\\clearpage\n");
    section.push_str("\\afterpage{\n");
    section.push_str("    \\newgeometry{a3paper, landscape, margin=1cm}\n");
    section.push_str("    \\section{Detailed Table of Productions by Professor and Category}\n");
    section.push_str("    \\label{sec:detailed_table}\n");
    section.push_str("    This table presents the number of productions per category for each professor.\n");

    section.push_str("    \\begin{table}[H]\n");
    section.push_str("        \\caption{Productions by professor and category.}\n");
    section.push_str("        \\centering\n");
    section.push_str("        \\tiny\n");
    section.push_str(&format!(
        "        \\begin{{tabularx}}{{\\textwidth}}{{L|{}|c}}\n",
        "C".repeat(table.columns.len())
    ));
    section.push_str("            \\toprule\n");

    let mut header = vec!["\\textbf{Professor}".to_string()];
    header.extend(
        table
            .columns
            .iter()
            .map(|c| format!("\\textbf{{{}}}", escape_latex(c))),
    );
    header.push("\\textbf{Total}".to_string());
    section.push_str(&table_row(&header));
    section.push_str("            \\midrule\n");

    for row in &table.rows {
        let mut cells = vec![escape_latex(&row.professor)];
        cells.extend(row.counts.iter().map(|c| c.to_string()));
        cells.push(row.total.to_string());
        section.push_str(&table_row(&cells));
        section.push_str("            \\hline\n");
    }

    section.push_str("            \\midrule\n");
    let mut totals = vec!["\\textbf{Total per Category}".to_string()];
    totals.extend(
        table
            .column_totals
            .iter()
            .map(|t| format!("\\textbf{{{}}}", t)),
    );
    totals.push(format!("\\textbf{{{}}}", table.grand_total));
    section.push_str(&table_row(&totals));

    section.push_str("            \\bottomrule\n");
    section.push_str("        \\end{tabularx}\n");
    section.push_str(&generate_source_note(source_note));
    section.push_str("        \\label{tab:professor_category_counts}\n");
    section.push_str("    \\end{table}\n");
    section.push_str("    \\clearpage\n");
    section.push_str("    \\restoregeometry\n");
    section.push_str("}\n");
    section.push_str("\\newpage\n");

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportMetadata, TableRow};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                generated_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
                data_file: PathBuf::from("report_data.csv"),
                roster_file: PathBuf::from("lista/professores.txt"),
                roster_derived: false,
                categories_file: PathBuf::from("config/categories_to_count.txt"),
                threshold: 9,
            },
            labels: ReportLabels {
                title: "Production Report 2022-2024".to_string(),
                institution: Some("Federal University".to_string()),
                city: Some("Pelotas - RS".to_string()),
                source_note: Some("Physics Course Coordination, 2025.".to_string()),
                logo: None,
            },
            summary: ReportSummary {
                total_productions: 10,
                total_professors: 2,
                professors_meeting_threshold: 1,
                professors_below_threshold: 1,
            },
            global_categories: vec![
                CategoryCount::new("Articles", 9),
                CategoryCount::new("R&D_Reports", 1),
            ],
            professors: vec![
                ProfessorSection {
                    professor: "Ana Souza".to_string(),
                    total_productions: 10,
                    meets_threshold: true,
                    categories: vec![
                        CategoryCount::new("Articles", 9),
                        CategoryCount::new("R&D_Reports", 1),
                    ],
                },
                ProfessorSection {
                    professor: "Bruno Lima".to_string(),
                    total_productions: 0,
                    meets_threshold: false,
                    categories: Vec::new(),
                },
            ],
            table: DetailedTable {
                columns: vec!["Articles".to_string(), "R&D_Reports".to_string()],
                rows: vec![
                    TableRow {
                        professor: "Ana Souza".to_string(),
                        counts: vec![9, 1],
                        total: 10,
                    },
                    TableRow {
                        professor: "Bruno Lima".to_string(),
                        counts: vec![0, 0],
                        total: 0,
                    },
                ],
                column_totals: vec![9, 1],
                grand_total: 10,
            },
            charts: ChartSet {
                histogram: Some(PathBuf::from("./category_histogram.svg")),
                threshold_pie: None,
                categories_pie: None,
            },
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("R&D_50%"), r"R\&D\_50\%");
        assert_eq!(escape_latex("a\\b"), r"a\textbackslash{}b");
        assert_eq!(escape_latex("{x}"), r"\{x\}");
        assert_eq!(escape_latex("~^$#"), r"\textasciitilde{}\textasciicircum{}\$\#");
        assert_eq!(escape_latex("plain text"), "plain text");
    }

    #[test]
    fn test_generate_latex_report() {
        let latex = generate_latex_report(&create_test_report());

        assert!(latex.starts_with("\\documentclass[a4paper]{abntex2}"));
        assert!(latex.contains("\\usepackage{svg}"));
        assert!(latex.contains("FEDERAL UNIVERSITY"));
        assert!(latex.contains("{\\large \\textbf{2025}}"));
        assert!(latex.contains("\\section{Global Statistics by Category}"));
        assert!(latex.contains("\\item \\textbf{R\\&D\\_Reports}: 1 production\n"));
        assert!(latex.contains("\\item \\textbf{Articles}: 9 productions\n"));
        assert!(latex.contains("Global Total of Productions}: 10 productions."));
        assert!(latex.contains("\\subsection{Ana Souza}"));
        assert!(latex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_only_existing_charts_are_included() {
        let latex = generate_latex_report(&create_test_report());

        assert!(latex.contains("\\includesvg[width=12cm]{category_histogram.svg}"));
        assert!(!latex.contains("fig:professors_threshold"));
        assert!(!latex.contains("fig:global_categories"));
    }

    #[test]
    fn test_professor_sections() {
        let report = create_test_report();
        let ana = generate_professor_section(&report.professors[0], 9);
        let bruno = generate_professor_section(&report.professors[1], 9);

        assert!(ana.contains("9+ Productions Criterion}: YES."));
        assert!(ana.contains("Total Productions}: 10 productions."));
        assert!(bruno.contains("9+ Productions Criterion}: NO."));
        assert!(bruno.contains("No productions found for this professor."));
        assert!(!bruno.contains("\\begin{itemize}"));
    }

    #[test]
    fn test_detailed_table() {
        let report = create_test_report();
        let table = generate_detailed_table_section(&report.table, None);

        assert!(table.contains("{L|CC|c}"));
        assert!(table.contains(
            "\\textbf{Professor} & \\textbf{Articles} & \\textbf{R\\&D\\_Reports} & \\textbf{Total} \\\\"
        ));
        assert!(table.contains("Ana Souza & 9 & 1 & 10 \\\\"));
        assert!(table.contains(
            "\\textbf{Total per Category} & \\textbf{9} & \\textbf{1} & \\textbf{10} \\\\"
        ));
        assert!(!table.contains("Source:"));
    }

    #[test]
    fn test_preamble_notes_shell_escape() {
        let latex = generate_latex_report(&create_test_report());
        assert!(latex.contains("\\usepackage{svg}"));
        assert!(latex.contains("pdflatex -shell-escape"));
    }

    #[test]
    fn test_compile_instructions() {
        let steps = compile_instructions(Path::new("out/category_report.tex"));

        assert!(steps.contains("pdflatex -shell-escape out/category_report.tex"));
        assert!(steps.contains("Inkscape"));
        assert!(steps.contains("category_report.pdf"));
    }

    #[test]
    fn test_empty_global_categories() {
        let mut report = create_test_report();
        report.global_categories.clear();

        let section = generate_global_section(&report);
        assert!(section.contains("No production category found for the global total."));
    }
}

//! Production data loading.
//!
//! The data table is a CSV file with the header
//! `Professor,PDF_File,Categories,CategoryAlias`. Rows that cannot be read
//! are skipped with a diagnostic; the rest of the file is still used.

use super::read_source;
use crate::diagnostics::{Diagnostic, Diagnostics, SourceKind};
use crate::models::ProductionRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RecordRow {
    #[serde(rename = "Professor")]
    professor: String,
    #[serde(rename = "PDF_File", default)]
    pdf_file: Option<String>,
    #[serde(rename = "Categories", default)]
    categories: Option<String>,
    #[serde(rename = "CategoryAlias", default)]
    category_alias: Option<String>,
}

/// Read production records from any CSV reader.
pub fn parse_records<R: Read>(reader: R, diagnostics: &mut Diagnostics) -> Vec<ProductionRecord> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RecordRow>().enumerate() {
        let row_number = index + 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                diagnostics.push(Diagnostic::MalformedRecord {
                    row: row_number,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if row.professor.is_empty() {
            diagnostics.push(Diagnostic::MalformedRecord {
                row: row_number,
                reason: "empty Professor field".to_string(),
            });
            continue;
        }

        records.push(ProductionRecord {
            pdf_file: row.pdf_file,
            category_alias: row.category_alias,
            ..ProductionRecord::new(row.professor, row.categories.as_deref().unwrap_or_default())
        });
    }

    debug!("Parsed {} production records", records.len());
    records
}

/// Load production records from a CSV file.
///
/// A missing or unreadable file yields an empty record set. Rows that are
/// not valid UTF-8 are skipped like any other malformed row.
pub fn load_records(path: &Path, diagnostics: &mut Diagnostics) -> Vec<ProductionRecord> {
    let Some(bytes) = read_source(path, SourceKind::ProductionData, diagnostics) else {
        return Vec::new();
    };

    let records = parse_records(bytes.as_slice(), diagnostics);
    info!(
        "Loaded {} production records from {}",
        records.len(),
        path.display()
    );
    records
}

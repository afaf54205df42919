//! Non-fatal conditions raised while building a report.
//!
//! Nothing in the input pipeline aborts a run: missing sources, malformed
//! order lines and bad CSV rows all degrade to a documented fallback. Each
//! condition is recorded as a [`Diagnostic`], logged at WARN when raised,
//! and carried into the final report.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// The kind of input a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    CategoryOrder,
    Roster,
    ProductionData,
}

impl SourceKind {
    /// Describes what the run falls back to when this source is absent.
    pub fn fallback(&self) -> &'static str {
        match self {
            SourceKind::CategoryOrder => {
                "categories will be ordered by default priority, then alphabetically"
            }
            SourceKind::Roster => "the roster will be derived from the production data",
            SourceKind::ProductionData => "the report will be generated with zero productions",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::CategoryOrder => write!(f, "Category order file"),
            SourceKind::Roster => write!(f, "Professor roster"),
            SourceKind::ProductionData => write!(f, "Production data file"),
        }
    }
}

/// A recoverable problem found while reading inputs or aggregating.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("{kind} '{}' not found; {}", .path.display(), .kind.fallback())]
    MissingSource { kind: SourceKind, path: PathBuf },

    #[error("{kind} '{}' could not be read ({reason}); {}", .path.display(), .kind.fallback())]
    UnreadableSource {
        kind: SourceKind,
        path: PathBuf,
        reason: String,
    },

    #[error("{kind} '{}' contains bytes that are not valid UTF-8; they were replaced and the rest of the file was used", .path.display())]
    InvalidEncoding { kind: SourceKind, path: PathBuf },

    #[error("category order line {line} '{content}': {reason}")]
    MalformedOrderLine {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("alias '{alias}' redefined from '{previous}' to '{display_name}'")]
    RedefinedAlias {
        alias: String,
        previous: String,
        display_name: String,
    },

    #[error("production data row {row} skipped: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("professor '{professor}' listed more than once in the roster")]
    DuplicateProfessor { professor: String },

    #[error("professor '{professor}' has {records} production(s) but is not in the roster; counted in global totals only")]
    UnrosteredProfessor { professor: String, records: usize },
}

/// Ordered collection of diagnostics for a single run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_message_names_fallback() {
        let diagnostic = Diagnostic::MissingSource {
            kind: SourceKind::Roster,
            path: PathBuf::from("lista/professores.txt"),
        };

        let message = diagnostic.to_string();
        assert!(message.contains("lista/professores.txt"));
        assert!(message.contains("derived from the production data"));
    }

    #[test]
    fn test_invalid_encoding_message() {
        let diagnostic = Diagnostic::InvalidEncoding {
            kind: SourceKind::CategoryOrder,
            path: PathBuf::from("config/categories_to_count.txt"),
        };

        let message = diagnostic.to_string();
        assert!(message.starts_with("Category order file 'config/categories_to_count.txt'"));
        assert!(message.contains("not valid UTF-8"));
    }

    #[test]
    fn test_diagnostics_keep_insertion_order() {
        let mut diagnostics = Diagnostics::default();
        assert!(diagnostics.is_empty());

        diagnostics.push(Diagnostic::DuplicateProfessor {
            professor: "Ana".to_string(),
        });
        diagnostics.push(Diagnostic::MalformedRecord {
            row: 3,
            reason: "missing field `Professor`".to_string(),
        });

        assert_eq!(diagnostics.len(), 2);
        let items = diagnostics.into_vec();
        assert!(matches!(items[0], Diagnostic::DuplicateProfessor { .. }));
        assert!(matches!(items[1], Diagnostic::MalformedRecord { row: 3, .. }));
    }

    #[test]
    fn test_diagnostic_serializes_with_tag() {
        let diagnostic = Diagnostic::UnrosteredProfessor {
            professor: "Bruno".to_string(),
            records: 2,
        };

        let json = serde_json::to_string(&diagnostic).unwrap();
        assert!(json.contains("\"diagnostic\":\"unrostered_professor\""));
        assert!(json.contains("\"records\":2"));
    }
}

//! Category order definition loading.
//!
//! An order file maps raw aliases to display names and assigns each display
//! name a sort key, one definition per line:
//!
//! ```text
//! ART,'Journal Articles',1
//! CAP,'Book Chapters',2
//! ```
//!
//! Parsing never fails. Lines that do not match the format degrade through
//! [`ParsedLine`] variants to the default sort key, and a missing file
//! yields an order that only knows the uncategorized bucket.

use crate::diagnostics::{Diagnostic, Diagnostics, SourceKind};
use crate::models::UNCATEGORIZED;
use crate::sources::read_text;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Sort key for display names without an explicit or valid key.
pub const DEFAULT_SORT_KEY: i64 = 1000;

/// Sort key reserved for the uncategorized bucket when the file does not place it.
pub const RESERVED_SORT_KEY: i64 = 9999;

/// A single alias definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEntry {
    pub alias: String,
    pub display_name: String,
    pub sort_key: i64,
}

/// Why a line was accepted with the default sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineProblem {
    /// Three fields, but the last one is not an integer.
    InvalidSortKey(String),
    /// Only `alias,display name`.
    MissingSortKey,
}

/// Outcome of parsing one non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// `alias,'Display Name',sort_key`
    Valid(OrderEntry),
    /// Alias and display name recovered, sort key defaulted.
    RecoveredWithDefault {
        entry: OrderEntry,
        problem: LineProblem,
    },
    /// Whole line used as both alias and display name.
    Unparseable(OrderEntry),
}

impl ParsedLine {
    pub fn entry(&self) -> &OrderEntry {
        match self {
            ParsedLine::Valid(entry) | ParsedLine::Unparseable(entry) => entry,
            ParsedLine::RecoveredWithDefault { entry, .. } => entry,
        }
    }

    /// Human-readable reason for a degraded parse, `None` when valid.
    pub fn problem(&self) -> Option<String> {
        match self {
            ParsedLine::Valid(_) => None,
            ParsedLine::RecoveredWithDefault {
                problem: LineProblem::InvalidSortKey(raw),
                ..
            } => Some(format!(
                "invalid sort key '{}', using default priority {}",
                raw, DEFAULT_SORT_KEY
            )),
            ParsedLine::RecoveredWithDefault {
                problem: LineProblem::MissingSortKey,
                ..
            } => Some(format!(
                "expected alias,'Display Name',sort_key; using default priority {}",
                DEFAULT_SORT_KEY
            )),
            ParsedLine::Unparseable(_) => Some(format!(
                "no fields found, using the whole line as alias and display name with priority {}",
                DEFAULT_SORT_KEY
            )),
        }
    }
}

/// Parse one line of an order file. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.splitn(3, ',').collect();
    let parsed = match fields.as_slice() {
        [alias, display_name, sort_key] => {
            let raw_key = sort_key.trim();
            match raw_key.parse::<i64>() {
                Ok(key) => ParsedLine::Valid(make_entry(alias, display_name, key)),
                Err(_) => ParsedLine::RecoveredWithDefault {
                    entry: make_entry(alias, display_name, DEFAULT_SORT_KEY),
                    problem: LineProblem::InvalidSortKey(raw_key.to_string()),
                },
            }
        }
        [alias, display_name] => ParsedLine::RecoveredWithDefault {
            entry: make_entry(alias, display_name, DEFAULT_SORT_KEY),
            problem: LineProblem::MissingSortKey,
        },
        _ => ParsedLine::Unparseable(OrderEntry {
            alias: line.to_string(),
            display_name: line.to_string(),
            sort_key: DEFAULT_SORT_KEY,
        }),
    };

    Some(parsed)
}

fn make_entry(alias: &str, display_name: &str, sort_key: i64) -> OrderEntry {
    OrderEntry {
        alias: alias.trim().to_string(),
        display_name: clean_display_name(display_name),
        sort_key,
    }
}

/// Strips whitespace and surrounding quote characters.
fn clean_display_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

/// Loaded category order: alias map, sort keys and the ordered display list.
///
/// Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOrder {
    aliases: HashMap<String, String>,
    sort_keys: HashMap<String, i64>,
    ordered: Vec<String>,
    uncategorized_configured: bool,
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self::from_entries(Vec::new(), &mut Diagnostics::default())
    }
}

impl CategoryOrder {
    /// Parse an order definition from its text.
    pub fn parse(source: &str, diagnostics: &mut Diagnostics) -> Self {
        let mut entries = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let Some(parsed) = parse_line(line) else {
                continue;
            };

            if let Some(reason) = parsed.problem() {
                diagnostics.push(Diagnostic::MalformedOrderLine {
                    line: index + 1,
                    content: line.trim().to_string(),
                    reason,
                });
            }

            entries.push(parsed.entry().clone());
        }

        Self::from_entries(entries, diagnostics)
    }

    /// Load an order definition from a file.
    ///
    /// A missing or unreadable file is reported and yields [`CategoryOrder::default`].
    /// Invalid UTF-8 only affects the lines that contain it.
    pub fn load(path: &Path, diagnostics: &mut Diagnostics) -> Self {
        match read_text(path, SourceKind::CategoryOrder, diagnostics) {
            Some(content) => {
                info!("Loading category order from {}", path.display());
                Self::parse(&content, diagnostics)
            }
            None => Self::default(),
        }
    }

    /// Build the order from entries in definition order.
    pub fn from_entries(entries: Vec<OrderEntry>, diagnostics: &mut Diagnostics) -> Self {
        let mut aliases: HashMap<String, String> = HashMap::new();
        let mut sort_keys: HashMap<String, i64> = HashMap::new();
        // Display names in first-definition order.
        let mut displays: Vec<String> = Vec::new();

        for entry in entries {
            if let Some(previous) = aliases.insert(entry.alias.clone(), entry.display_name.clone())
            {
                if previous != entry.display_name {
                    diagnostics.push(Diagnostic::RedefinedAlias {
                        alias: entry.alias.clone(),
                        previous,
                        display_name: entry.display_name.clone(),
                    });
                }
            }

            match sort_keys.get_mut(&entry.display_name) {
                Some(key) => *key = (*key).min(entry.sort_key),
                None => {
                    sort_keys.insert(entry.display_name.clone(), entry.sort_key);
                    displays.push(entry.display_name);
                }
            }
        }

        // Stable: equal keys keep definition order.
        displays.sort_by_key(|name| sort_keys[name]);

        let uncategorized_configured = sort_keys.contains_key(UNCATEGORIZED);
        if !uncategorized_configured {
            displays.push(UNCATEGORIZED.to_string());
            sort_keys.insert(UNCATEGORIZED.to_string(), RESERVED_SORT_KEY);
        }

        debug!(
            "Category order: {} aliases, display order {:?}",
            aliases.len(),
            displays
        );

        Self {
            aliases,
            sort_keys,
            ordered: displays,
            uncategorized_configured,
        }
    }

    /// Alias to display name map.
    pub fn alias_map(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Display names in configured order, uncategorized included.
    pub fn ordered(&self) -> &[String] {
        &self.ordered
    }

    /// Sort key for a display name, [`DEFAULT_SORT_KEY`] when unknown.
    pub fn sort_key(&self, display_name: &str) -> i64 {
        self.sort_keys
            .get(display_name)
            .copied()
            .unwrap_or(DEFAULT_SORT_KEY)
    }

    /// True when the display name is part of the ordered list.
    pub fn contains(&self, display_name: &str) -> bool {
        self.sort_keys.contains_key(display_name)
    }

    /// True when the order file itself places the uncategorized bucket.
    pub fn uncategorized_configured(&self) -> bool {
        self.uncategorized_configured
    }
}

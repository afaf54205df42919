//! Professor roster loading.

use super::read_text;
use crate::diagnostics::{Diagnostic, Diagnostics, SourceKind};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Parse a roster: one professor per line, blank lines skipped.
///
/// Repeated names are kept once, at their first position.
pub fn parse_roster(content: &str, diagnostics: &mut Diagnostics) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut roster = Vec::new();

    for name in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if seen.insert(name) {
            roster.push(name.to_string());
        } else {
            diagnostics.push(Diagnostic::DuplicateProfessor {
                professor: name.to_string(),
            });
        }
    }

    roster
}

/// Load the roster file.
///
/// Returns `None` when the file is missing or unreadable; callers then
/// derive the roster from the production data.
pub fn load_roster(path: &Path, diagnostics: &mut Diagnostics) -> Option<Vec<String>> {
    let content = read_text(path, SourceKind::Roster, diagnostics)?;

    let roster = parse_roster(&content, diagnostics);
    info!(
        "Read {} professors from {}",
        roster.len(),
        path.display()
    );
    debug!("Roster: {:?}", roster);
    Some(roster)
}

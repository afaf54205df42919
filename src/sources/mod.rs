//! Input sources: professor roster and production data.
//!
//! Every input goes through [`read_source`], so a missing or unreadable
//! file is reported the same way whichever loader asked for it.

pub mod records;
pub mod roster;

pub use records::load_records;
pub use roster::load_roster;

use crate::diagnostics::{Diagnostic, Diagnostics, SourceKind};
use std::io::ErrorKind;
use std::path::Path;

/// Read a source file as bytes.
///
/// Returns `None` after recording `MissingSource` or `UnreadableSource`.
pub fn read_source(
    path: &Path,
    kind: SourceKind,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            diagnostics.push(Diagnostic::MissingSource {
                kind,
                path: path.to_path_buf(),
            });
            None
        }
        Err(e) => {
            diagnostics.push(Diagnostic::UnreadableSource {
                kind,
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Read a line-oriented text source.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD so the remaining lines
/// are still parsed; an `InvalidEncoding` diagnostic is recorded when that
/// happens.
pub fn read_text(path: &Path, kind: SourceKind, diagnostics: &mut Diagnostics) -> Option<String> {
    let bytes = read_source(path, kind, diagnostics)?;

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            diagnostics.push(Diagnostic::InvalidEncoding {
                kind,
                path: path.to_path_buf(),
            });
            Some(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

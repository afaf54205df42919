//! Alias to display-name resolution.

use std::collections::HashMap;

/// Resolve a raw alias to its display name.
///
/// Unknown aliases resolve to themselves so unconfigured categories still
/// show up in the report under their raw code. The no-category sentinel is
/// the caller's concern and must not be passed here.
pub fn resolve<'a>(raw_alias: &'a str, alias_map: &'a HashMap<String, String>) -> &'a str {
    alias_map
        .get(raw_alias)
        .map(String::as_str)
        .unwrap_or(raw_alias)
}

//! Production aggregation.
//!
//! Counts productions per display category, globally and per professor,
//! and derives the per-professor threshold flag.

use crate::categories::resolve;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{GlobalAggregate, ProductionRecord, ProfessorAggregate, UNCATEGORIZED};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Result of aggregating a record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub global: GlobalAggregate,
    /// One aggregate per roster professor, in roster order.
    pub professors: Vec<ProfessorAggregate>,
}

/// Display-name buckets a record contributes to.
pub fn record_buckets<'a>(
    record: &'a ProductionRecord,
    alias_map: &'a HashMap<String, String>,
) -> Vec<&'a str> {
    if record.is_uncategorized() {
        return vec![UNCATEGORIZED];
    }

    record
        .category_aliases
        .iter()
        .map(|alias| resolve(alias, alias_map))
        .collect()
}

/// Distinct professors in order of first appearance.
pub fn derive_roster(records: &[ProductionRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.professor.as_str()))
        .map(|r| r.professor.clone())
        .collect()
}

/// Aggregate records per professor and globally.
///
/// With `roster` set, per-professor aggregates follow its order and include
/// professors without records; records of professors outside the roster
/// still count in the global totals. Without a roster, professors are taken
/// from the records in first-appearance order.
pub fn aggregate(
    records: &[ProductionRecord],
    roster: Option<&[String]>,
    alias_map: &HashMap<String, String>,
    threshold: usize,
    diagnostics: &mut Diagnostics,
) -> Aggregation {
    let roster = match roster {
        Some(names) => names.to_vec(),
        None => derive_roster(records),
    };

    let mut professors: Vec<ProfessorAggregate> = Vec::with_capacity(roster.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for name in roster {
        if !index.contains_key(&name) {
            index.insert(name.clone(), professors.len());
            professors.push(ProfessorAggregate::new(name));
        }
    }

    let mut global = GlobalAggregate::default();
    let mut unrostered: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        let buckets = record_buckets(record, alias_map);

        global.total_productions += 1;
        for bucket in &buckets {
            *global.category_counts.entry(bucket.to_string()).or_default() += 1;
        }

        match index.get(&record.professor) {
            Some(&i) => {
                let professor = &mut professors[i];
                professor.total_productions += 1;
                for bucket in &buckets {
                    *professor
                        .category_counts
                        .entry(bucket.to_string())
                        .or_default() += 1;
                }
            }
            None => *unrostered.entry(record.professor.as_str()).or_default() += 1,
        }
    }

    for professor in &mut professors {
        professor.meets_threshold = professor.total_productions >= threshold;
    }

    global.total_professors = professors.len();
    global.professors_meeting_threshold = professors.iter().filter(|p| p.meets_threshold).count();

    for (professor, count) in unrostered {
        diagnostics.push(Diagnostic::UnrosteredProfessor {
            professor: professor.to_string(),
            records: count,
        });
    }

    debug!(
        "Aggregated {} productions for {} professors ({} with {}+)",
        global.total_productions,
        global.total_professors,
        global.professors_meeting_threshold,
        threshold
    );

    Aggregation { global, professors }
}

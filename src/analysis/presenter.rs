//! Ordering of aggregated counts for presentation.

use crate::categories::CategoryOrder;
use crate::models::{CategoryCount, CategoryCounts, UNCATEGORIZED};

/// Order nonzero category counts for reporting.
///
/// Configured display names come first, in configured order. Names found in
/// the data but missing from the order follow, by sort key and then
/// alphabetically. The uncategorized bucket keeps its configured position,
/// or goes last when the order file does not mention it.
pub fn present(counts: &CategoryCounts, order: &CategoryOrder) -> Vec<CategoryCount> {
    let mut presented = Vec::new();

    for name in order.ordered() {
        if name == UNCATEGORIZED && !order.uncategorized_configured() {
            continue;
        }
        if let Some(&count) = counts.get(name) {
            if count > 0 {
                presented.push(CategoryCount::new(name.clone(), count));
            }
        }
    }

    presented.extend(
        unconfigured(counts, order)
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| CategoryCount::new(name, count)),
    );

    if !order.uncategorized_configured() {
        if let Some(&count) = counts.get(UNCATEGORIZED) {
            if count > 0 {
                presented.push(CategoryCount::new(UNCATEGORIZED, count));
            }
        }
    }

    presented
}

/// Columns of the detailed table: configured names, then unconfigured names
/// with a nonzero count in `counts`. Uncategorized is left out.
pub fn table_columns(counts: &CategoryCounts, order: &CategoryOrder) -> Vec<String> {
    order
        .ordered()
        .iter()
        .filter(|name| name.as_str() != UNCATEGORIZED)
        .cloned()
        .chain(
            unconfigured(counts, order)
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(name, _)| name.to_string()),
        )
        .collect()
}

/// Counted names that the order does not list, sorted by key then name.
fn unconfigured<'a>(counts: &'a CategoryCounts, order: &CategoryOrder) -> Vec<(&'a str, usize)> {
    let mut extra: Vec<(&str, usize)> = counts
        .iter()
        .filter(|(name, _)| !order.contains(name))
        .map(|(name, count)| (name.as_str(), *count))
        .collect();

    extra.sort_by(|a, b| {
        order
            .sort_key(a.0)
            .cmp(&order.sort_key(b.0))
            .then_with(|| a.0.cmp(b.0))
    });

    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    fn order(source: &str) -> CategoryOrder {
        CategoryOrder::parse(source, &mut Diagnostics::default())
    }

    fn counts(pairs: &[(&str, usize)]) -> CategoryCounts {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    fn names(presented: &[CategoryCount]) -> Vec<&str> {
        presented.iter().map(|c| c.category.as_str()).collect()
    }

    #[test]
    fn test_configured_order_then_unconfigured_then_uncategorized() {
        let order = order("B,'Beta',2\nA,'Alpha',1");
        let counts = counts(&[
            (UNCATEGORIZED, 4),
            ("Zed", 1),
            ("Beta", 2),
            ("Alpha", 3),
            ("Mid", 5),
        ]);

        let presented = present(&counts, &order);

        assert_eq!(
            names(&presented),
            vec!["Alpha", "Beta", "Mid", "Zed", UNCATEGORIZED]
        );
        assert_eq!(presented[0].count, 3);
        assert_eq!(presented[4].count, 4);
    }

    #[test]
    fn test_zero_counts_filtered() {
        let order = order("A,'Alpha',1\nB,'Beta',2");
        let counts = counts(&[("Alpha", 0), ("Beta", 1), ("X", 0)]);

        assert_eq!(names(&present(&counts, &order)), vec!["Beta"]);
    }

    #[test]
    fn test_configured_uncategorized_position() {
        let order = order("A,'Alpha',2\nNC,'uncategorized',1");
        let counts = counts(&[("Alpha", 1), (UNCATEGORIZED, 1), ("X", 1)]);

        assert_eq!(
            names(&present(&counts, &order)),
            vec![UNCATEGORIZED, "Alpha", "X"]
        );
    }

    #[test]
    fn test_without_order_file_unconfigured_sorted_alphabetically() {
        let order = CategoryOrder::default();
        let counts = counts(&[("Patents", 1), (UNCATEGORIZED, 2), ("Books", 3)]);

        assert_eq!(
            names(&present(&counts, &order)),
            vec!["Books", "Patents", UNCATEGORIZED]
        );
    }

    #[test]
    fn test_present_is_permutation_of_nonzero_counts() {
        let order = order("A,'Alpha',1\nNC,'uncategorized',0");
        let counts = counts(&[
            ("Alpha", 1),
            ("Beta", 2),
            (UNCATEGORIZED, 3),
            ("Gamma", 0),
            ("Delta", 7),
        ]);

        let presented = present(&counts, &order);
        let mut presented = names(&presented);
        presented.sort();
        let mut expected: Vec<&str> = counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(n, _)| n.as_str())
            .collect();
        expected.sort();

        assert_eq!(presented, expected);
    }

    #[test]
    fn test_table_columns() {
        let order = order("A,'Alpha',1\nB,'Beta',2");
        let counts = counts(&[("Alpha", 1), ("Q", 2), ("Empty", 0), (UNCATEGORIZED, 1)]);

        assert_eq!(table_columns(&counts, &order), vec!["Alpha", "Beta", "Q"]);
    }
}

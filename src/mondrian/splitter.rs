//! # Partition Splitting
//!
//! Two strategies divide a partition along one attribute:
//! - numeric: cut at the frequency median, routing by global sort position
//! - categorical: one child per hierarchy child node that covers members
//!
//! An empty result means "unsplittable this round" and is not an error.

/**
 * File: /src/mondrian/splitter.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Median split for numeric, hierarchy split for categorical
 * 2026-10-18		Zihan	Reject numeric cuts leaving fewer than k on the right
 */

use crate::domain::{AttributeDomain, GeneralizationHierarchy, NumericRange, WidthState};
use crate::mondrian::types::{AnonymizeError, Result, RunContext};
use crate::partition::Partition;
use log::debug;
use std::collections::BTreeMap;

/// Median cut of one numeric attribute inside a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianCut {
    /// Global position of the last value routed left
    pub cut: usize,
    /// Global position of the first value routed right
    pub next: usize,
}

/// Split `partition` along `attribute` with the strategy of its domain
pub fn split_partition(
    ctx: &RunContext,
    partition: &mut Partition,
    attribute: usize,
) -> Result<Vec<Partition>> {
    match &ctx.domains[attribute] {
        AttributeDomain::Numeric(range) => split_numeric(ctx, range, partition, attribute),
        AttributeDomain::Categorical(tree) => split_categorical(ctx, tree, partition, attribute),
    }
}

/// Frequency of each global sort position among the partition's members
pub fn frequency_set(
    ctx: &RunContext,
    range: &NumericRange,
    partition: &Partition,
    attribute: usize,
) -> Result<BTreeMap<usize, usize>> {
    let mut frequencies = BTreeMap::new();
    for &row in partition.members() {
        let position = numeric_position(ctx, range, partition, attribute, row)?;
        *frequencies.entry(position).or_insert(0) += 1;
    }
    Ok(frequencies)
}

/// Locate the frequency median. `None` when fewer than two distinct values
/// exist, when half the partition is smaller than k, or when the median is
/// the largest value.
pub fn find_median(frequencies: &BTreeMap<usize, usize>, k: usize) -> Option<MedianCut> {
    let total: usize = frequencies.values().sum();
    let target = total as f64 / 2.0;
    if frequencies.len() < 2 || target < k as f64 {
        return None;
    }

    let mut processed = 0;
    let mut positions = frequencies.iter().peekable();
    while let Some((&position, &count)) = positions.next() {
        processed += count;
        if processed as f64 >= target {
            let next = positions.peek().map_or(position, |(&next, _)| next);
            return (next != position).then_some(MedianCut {
                cut: position,
                next,
            });
        }
    }
    None
}

fn split_numeric(
    ctx: &RunContext,
    range: &NumericRange,
    partition: &mut Partition,
    attribute: usize,
) -> Result<Vec<Partition>> {
    let frequencies = frequency_set(ctx, range, partition, attribute)?;
    let (Some((&low, _)), Some((&high, _))) =
        (frequencies.first_key_value(), frequencies.last_key_value())
    else {
        return Ok(Vec::new());
    };

    // tighten to the values actually present, split or not
    partition.generalize(attribute, range.label(low, high), WidthState::Span { low, high });

    let Some(MedianCut { cut, next }) = find_median(&frequencies, ctx.k) else {
        return Ok(Vec::new());
    };
    let left_count: usize = frequencies.range(..=cut).map(|(_, count)| count).sum();
    if partition.size() - left_count < ctx.k {
        debug!(
            "attribute {}: cut at {} leaves {} < k on the right",
            attribute,
            range.value_at(cut),
            partition.size() - left_count
        );
        return Ok(Vec::new());
    }

    let mut left = Vec::with_capacity(left_count);
    let mut right = Vec::with_capacity(partition.size() - left_count);
    for &row in partition.members() {
        if numeric_position(ctx, range, partition, attribute, row)? <= cut {
            left.push(row);
        } else {
            right.push(row);
        }
    }

    debug!(
        "attribute {}: split {} records at {} into {} + {}",
        attribute,
        partition.size(),
        range.value_at(cut),
        left.len(),
        right.len()
    );

    Ok(vec![
        partition.child(
            left,
            attribute,
            range.label(low, cut),
            WidthState::Span { low, high: cut },
        ),
        partition.child(
            right,
            attribute,
            range.label(next, high),
            WidthState::Span { low: next, high },
        ),
    ])
}

fn split_categorical(
    ctx: &RunContext,
    tree: &GeneralizationHierarchy,
    partition: &Partition,
    attribute: usize,
) -> Result<Vec<Partition>> {
    let state = partition.attribute(attribute);
    let node = tree
        .node_id(&state.label)
        .filter(|&id| state.width == WidthState::Node(id))
        .ok_or_else(|| AnonymizeError::ModelInconsistency {
            attribute,
            partition_size: partition.size(),
            detail: format!("label {:?} disagrees with width {:?}", state.label, state.width),
        })?;

    let children = &tree.node(node).children;
    if children.is_empty() {
        return Ok(Vec::new());
    }

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); children.len()];
    for &row in partition.members() {
        let value = ctx.value(row, attribute);
        let slot = children
            .iter()
            .position(|&child| tree.covers(child, value))
            .ok_or_else(|| AnonymizeError::ModelInconsistency {
                attribute,
                partition_size: partition.size(),
                detail: format!(
                    "generalization hierarchy error: {:?} not covered by any child of {:?}",
                    value, state.label
                ),
            })?;
        groups[slot].push(row);
    }

    if groups.iter().any(|group| !group.is_empty() && group.len() < ctx.k) {
        debug!(
            "attribute {}: split of {:?} rejected, a group is smaller than k",
            attribute, state.label
        );
        return Ok(Vec::new());
    }

    Ok(children
        .iter()
        .zip(groups)
        .filter(|(_, group)| !group.is_empty())
        .map(|(&child, group)| {
            partition.child(
                group,
                attribute,
                tree.label(child).to_string(),
                WidthState::Node(child),
            )
        })
        .collect())
}

fn numeric_position(
    ctx: &RunContext,
    range: &NumericRange,
    partition: &Partition,
    attribute: usize,
    row: usize,
) -> Result<usize> {
    let value = ctx.value(row, attribute);
    range
        .position(value)
        .ok_or_else(|| AnonymizeError::ModelInconsistency {
            attribute,
            partition_size: partition.size(),
            detail: format!("value {:?} is not in the numeric domain", value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mondrian::types::{ParallelConfig, Record};

    fn records(values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .map(|v| vec![v.to_string(), "s".to_string()])
            .collect()
    }

    fn context<'a>(
        domains: &'a [AttributeDomain],
        records: &'a [Record],
        k: usize,
        parallel: &'a ParallelConfig,
    ) -> RunContext<'a> {
        RunContext {
            domains,
            records,
            k,
            qid_count: 1,
            parallel,
        }
    }

    fn numeric_domain(values: &[&str]) -> Vec<AttributeDomain> {
        vec![NumericRange::from_column(values.iter().copied()).unwrap().into()]
    }

    fn categorical_domain() -> Vec<AttributeDomain> {
        vec![GeneralizationHierarchy::parse("a1;A;*\na2;A;*\nb1;B;*\n")
            .unwrap()
            .into()]
    }

    #[test]
    fn test_find_median() {
        let frequencies = BTreeMap::from([(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]);
        assert_eq!(
            find_median(&frequencies, 2),
            Some(MedianCut { cut: 2, next: 3 })
        );
        // half of 6 is below k = 4
        assert_eq!(find_median(&frequencies, 4), None);
        assert_eq!(find_median(&BTreeMap::from([(3, 10)]), 1), None);
        // median lands on the largest value
        assert_eq!(find_median(&BTreeMap::from([(0, 1), (7, 9)]), 1), None);
    }

    #[test]
    fn test_numeric_split_at_median() {
        let values = ["1", "2", "3", "4", "5", "6"];
        let domains = numeric_domain(&values);
        let records = records(&values);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 2, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        let children = split_partition(&ctx, &mut root, 0).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].members(), &[0, 1, 2]);
        assert_eq!(children[1].members(), &[3, 4, 5]);
        assert_eq!(children[0].attribute(0).label, "1,3");
        assert_eq!(children[1].attribute(0).label, "4,6");
        assert_eq!(children[0].attribute(0).width, WidthState::Span { low: 0, high: 2 });
        assert_eq!(children[1].attribute(0).width, WidthState::Span { low: 3, high: 5 });
    }

    #[test]
    fn test_numeric_split_tightens_unsplittable_partition() {
        let domains = numeric_domain(&["1", "5", "9", "20"]);
        let records = records(&["5", "9", "9"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 2, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        assert_eq!(root.attribute(0).label, "1,20");
        let children = split_partition(&ctx, &mut root, 0).unwrap();
        assert!(children.is_empty());
        assert_eq!(root.attribute(0).label, "5,9");
        assert_eq!(root.attribute(0).width, WidthState::Span { low: 1, high: 2 });
    }

    #[test]
    fn test_numeric_split_keeps_k_on_the_right() {
        // median falls on "1" with three copies, leaving a single "2"
        let values = ["1", "1", "1", "2"];
        let domains = numeric_domain(&values);
        let records = records(&values);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 2, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        assert!(split_partition(&ctx, &mut root, 0).unwrap().is_empty());

        let ctx = context(&domains, &records, 1, &parallel);
        let children = split_partition(&ctx, &mut root, 0).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].attribute(0).label, "2");
    }

    #[test]
    fn test_numeric_value_outside_domain() {
        let domains = numeric_domain(&["1", "2"]);
        let records = records(&["1", "3"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 1, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        assert!(matches!(
            split_partition(&ctx, &mut root, 0),
            Err(AnonymizeError::ModelInconsistency { attribute: 0, partition_size: 2, .. })
        ));
    }

    #[test]
    fn test_categorical_split_k1() {
        let domains = categorical_domain();
        let records = records(&["a1", "a2", "b1"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 1, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        let children = split_partition(&ctx, &mut root, 0).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].members(), &[0, 1]);
        assert_eq!(children[0].attribute(0).label, "A");
        assert_eq!(children[1].members(), &[2]);
        assert_eq!(children[1].attribute(0).label, "B");
    }

    #[test]
    fn test_categorical_split_rejected_below_k() {
        let domains = categorical_domain();
        let records = records(&["a1", "a2", "b1"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 2, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        assert!(split_partition(&ctx, &mut root, 0).unwrap().is_empty());
        assert_eq!(root.attribute(0).label, "*");
    }

    #[test]
    fn test_categorical_split_skips_empty_groups() {
        let domains = categorical_domain();
        let records = records(&["a1", "a2"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 2, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        let children = split_partition(&ctx, &mut root, 0).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attribute(0).label, "A");
    }

    #[test]
    fn test_categorical_leaf_is_unsplittable() {
        let domains = categorical_domain();
        let records = records(&["b1"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 1, &parallel);

        let mut root = Partition::root(&domains, 1).unwrap();
        let mut children = split_partition(&ctx, &mut root, 0).unwrap();
        let mut b = children.pop().unwrap();
        let mut leaves = split_partition(&ctx, &mut b, 0).unwrap();
        assert_eq!(leaves[0].attribute(0).label, "b1");
        assert!(split_partition(&ctx, &mut leaves[0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_categorical_value_not_covered() {
        let domains = categorical_domain();
        let records = records(&["a1", "zz"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 1, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        let err = split_partition(&ctx, &mut root, 0).unwrap_err();
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn test_internal_label_value_fails_below_its_node() {
        let domains = categorical_domain();
        let records = records(&["A", "a1"]);
        let parallel = ParallelConfig::default();
        let ctx = context(&domains, &records, 1, &parallel);

        let mut root = Partition::root(&domains, records.len()).unwrap();
        let mut children = split_partition(&ctx, &mut root, 0).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attribute(0).label, "A");

        let err = split_partition(&ctx, &mut children[0], 0).unwrap_err();
        assert!(matches!(
            err,
            AnonymizeError::ModelInconsistency { attribute: 0, partition_size: 2, .. }
        ));
    }
}

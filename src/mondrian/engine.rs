//! # Mondrian Anonymization Engine
//!
//! Main entry point of the anonymizer: validates input, builds the root
//! partition, drives the split/retry state machine until every partition is
//! terminal, then aggregates rows and the information-loss metric.

/**
 * File: /src/mondrian/engine.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Work-stack driver replacing recursive anonymize
 * 2026-10-18		Zihan	Parallel sibling sub-trees with rayon
 */

use crate::domain::AttributeDomain;
use crate::mondrian::ncp::{expand_rows, ncp};
use crate::mondrian::selector::choose_dimension;
use crate::mondrian::splitter::split_partition;
use crate::mondrian::types::*;
use crate::partition::Partition;
use rayon::prelude::*;
use std::time::Instant;

/// Outcome of settling one active partition
#[derive(Debug)]
pub enum Step {
    /// No attribute left to split; the partition is final
    Terminal(Partition),
    /// A split succeeded; the parent is consumed
    Split(Vec<Partition>),
}

/// Mondrian k-anonymizer over numeric and categorical QIDs
pub struct MondrianAnonymizer {
    config: AnonymizerConfig,
}

impl MondrianAnonymizer {
    pub fn new(config: AnonymizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    /// Anonymize `records` against `domains` (one per QID, column order).
    ///
    /// # Algorithm
    /// 1. Root partition over all records, every QID fully generalized
    /// 2. Split along the widest splittable QID, disabling it on failure
    /// 3. Aggregate terminal partitions into rows and NCP
    pub fn run(
        &self,
        domains: &[AttributeDomain],
        records: &[Record],
    ) -> Result<AnonymizationResult> {
        let qid_count = self.validate(domains, records)?;
        let ctx = RunContext {
            domains: &domains[..qid_count],
            records,
            k: self.config.k,
            qid_count,
            parallel: &self.config.parallel,
        };

        log::info!(
            "Mondrian: anonymizing {} records over {} QIDs with k = {}",
            records.len(),
            qid_count,
            ctx.k
        );
        if ctx.k > records.len() {
            log::warn!(
                "k = {} exceeds the {} available records, output is one group",
                ctx.k,
                records.len()
            );
        }

        // Phase 1: partitioning
        let partition_start = Instant::now();
        let partitions = if records.is_empty() {
            Vec::new()
        } else {
            let root = Partition::root(ctx.domains, records.len())?;
            self.partition_all(&ctx, root)?
        };
        let elapsed = partition_start.elapsed();

        log::info!(
            "Mondrian Phase 1: {} terminal partitions in {:?}",
            partitions.len(),
            elapsed
        );

        // Phase 2: aggregation
        let aggregation_start = Instant::now();
        let loss = ncp(&ctx, &partitions)?;
        let rows = expand_rows(&ctx, &partitions);
        let aggregation_ms = aggregation_start.elapsed().as_millis() as u64;

        if rows.len() != records.len() {
            return Err(AnonymizeError::RecordLoss {
                expected: records.len(),
                actual: rows.len(),
            });
        }

        log::info!("Mondrian Phase 2: NCP = {:.2} %", loss);

        let stats = RunStats {
            partitions: partitions.len(),
            min_partition_size: partitions.iter().map(Partition::size).min().unwrap_or(0),
            max_partition_size: partitions.iter().map(Partition::size).max().unwrap_or(0),
            partitioning_ms: elapsed.as_millis() as u64,
            aggregation_ms,
        };

        Ok(AnonymizationResult {
            rows,
            metrics: RunMetrics {
                ncp: loss,
                elapsed_secs: elapsed.as_secs_f64(),
            },
            stats,
        })
    }

    /// Check shapes and resolve the QID count
    fn validate(&self, domains: &[AttributeDomain], records: &[Record]) -> Result<usize> {
        if self.config.k == 0 {
            return Err(AnonymizeError::InvalidInput("k must be at least 1".to_string()));
        }

        let qid_count = match (self.config.qid_count, records.first()) {
            (Some(n), _) if n > 0 => n,
            (Some(_), _) => {
                return Err(AnonymizeError::InvalidInput(
                    "QID count must be at least 1".to_string(),
                ))
            }
            (None, Some(first)) => first.len().saturating_sub(1),
            (None, None) => domains.len(),
        };
        if qid_count == 0 {
            return Err(AnonymizeError::InvalidInput(
                "records need at least one QID column before the sensitive value".to_string(),
            ));
        }
        if domains.len() < qid_count {
            return Err(AnonymizeError::InvalidInput(format!(
                "{} QIDs but only {} attribute domains",
                qid_count,
                domains.len()
            )));
        }

        if let Some(first) = records.first() {
            if first.len() < qid_count + 1 {
                return Err(AnonymizeError::InvalidInput(format!(
                    "records have {} columns, need {} QIDs plus a sensitive value",
                    first.len(),
                    qid_count
                )));
            }
            if let Some(row) = records.iter().position(|r| r.len() != first.len()) {
                return Err(AnonymizeError::InvalidInput(format!(
                    "record {} has {} columns, expected {}",
                    row,
                    records[row].len(),
                    first.len()
                )));
            }
        }

        Ok(qid_count)
    }

    fn partition_all(&self, ctx: &RunContext, root: Partition) -> Result<Vec<Partition>> {
        if !ctx.parallel.enabled {
            return anonymize(ctx, root);
        }
        match ctx.parallel.num_threads {
            Some(num_threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| AnonymizeError::InvalidInput(format!("Thread pool error: {}", e)))?;
                pool.install(|| anonymize_parallel(ctx, root, 0))
            }
            None => anonymize_parallel(ctx, root, 0),
        }
    }
}

/// Split/retry until `partition` is terminal or has been split.
///
/// Each failed split disables one attribute, so the loop runs at most
/// `qid_count + 1` times.
pub fn settle(ctx: &RunContext, mut partition: Partition) -> Result<Step> {
    for _ in 0..=ctx.qid_count {
        if partition.is_terminal() {
            return Ok(Step::Terminal(partition));
        }
        let attribute = choose_dimension(ctx, &partition)?;
        let children = split_partition(ctx, &mut partition, attribute)?;
        if children.is_empty() {
            partition.disable(attribute);
        } else {
            return Ok(Step::Split(children));
        }
    }

    Err(AnonymizeError::UnreachableState {
        partition_size: partition.size(),
        detail: format!(
            "disable-and-retry did not terminate, {} attributes still splittable",
            partition.splittable_count()
        ),
    })
}

/// Sequential driver over an explicit work stack. Terminal partitions come
/// out in depth-first, left-to-right order.
pub fn anonymize(ctx: &RunContext, root: Partition) -> Result<Vec<Partition>> {
    let mut terminal = Vec::new();
    let mut pending = vec![root];
    while let Some(partition) = pending.pop() {
        match settle(ctx, partition)? {
            Step::Terminal(partition) => terminal.push(partition),
            Step::Split(children) => pending.extend(children.into_iter().rev()),
        }
    }
    Ok(terminal)
}

/// Parallel driver: siblings near the root run as independent rayon tasks,
/// deeper or small sub-trees fall back to [`anonymize`]. Results are joined
/// in child order, so the output matches the sequential driver.
pub fn anonymize_parallel(ctx: &RunContext, root: Partition, depth: usize) -> Result<Vec<Partition>> {
    if !ctx.parallel.should_parallelize(depth, root.size()) {
        return anonymize(ctx, root);
    }

    match settle(ctx, root)? {
        Step::Terminal(partition) => Ok(vec![partition]),
        Step::Split(children) => {
            let nested = children
                .into_par_iter()
                .map(|child| anonymize_parallel(ctx, child, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            Ok(nested.into_iter().flatten().collect())
        }
    }
}

/// Basic Mondrian for k-anonymity over numeric and categorical QIDs.
///
/// `qid_count` defaults to every column but the last.
pub fn mondrian(
    domains: &[AttributeDomain],
    records: &[Record],
    k: usize,
    qid_count: Option<usize>,
) -> Result<AnonymizationResult> {
    let config = AnonymizerConfig {
        k,
        qid_count,
        ..Default::default()
    };
    MondrianAnonymizer::new(config).run(domains, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeneralizationHierarchy, NumericRange};

    fn rows(values: &[(&str, &str)]) -> Vec<Record> {
        values
            .iter()
            .map(|(q, s)| vec![q.to_string(), s.to_string()])
            .collect()
    }

    #[test]
    fn test_settle_retries_then_terminates() {
        let domains: Vec<AttributeDomain> =
            vec![NumericRange::from_column(["5", "5", "5"]).unwrap().into()];
        let records = rows(&[("5", "a"), ("5", "b"), ("5", "c")]);
        let parallel = ParallelConfig::default();
        let ctx = RunContext {
            domains: &domains,
            records: &records,
            k: 1,
            qid_count: 1,
            parallel: &parallel,
        };
        let root = Partition::root(&domains, 3).unwrap();
        match settle(&ctx, root).unwrap() {
            Step::Terminal(partition) => {
                assert_eq!(partition.size(), 3);
                assert!(partition.is_terminal());
            }
            Step::Split(_) => panic!("Expected a terminal partition"),
        }
    }

    #[test]
    fn test_end_to_end_numeric() {
        let domains: Vec<AttributeDomain> =
            vec![NumericRange::from_column(["10", "20", "30", "40"]).unwrap().into()];
        let records = rows(&[("10", "a"), ("20", "b"), ("30", "c"), ("40", "d")]);

        let result = mondrian(&domains, &records, 2, None).unwrap();
        assert_eq!(result.stats.partitions, 2);
        assert_eq!(result.stats.min_partition_size, 2);
        assert_eq!(result.stats.max_partition_size, 2);
        assert_eq!(
            result.rows,
            vec![
                vec!["10,20", "a"],
                vec!["10,20", "b"],
                vec!["30,40", "c"],
                vec!["30,40", "d"],
            ]
        );
        // each half spans 10 of 30
        let expected = 100.0 / 3.0;
        assert!((result.metrics.ncp - expected).abs() < 1e-9);
        assert!(result.metrics.elapsed_secs >= 0.0);
    }

    #[test]
    fn test_k_larger_than_dataset_keeps_root() {
        let domains: Vec<AttributeDomain> =
            vec![GeneralizationHierarchy::parse("a1;A;*\na2;A;*\nb1;B;*\n")
                .unwrap()
                .into()];
        let records = rows(&[("a1", "x"), ("b1", "y")]);
        let result = mondrian(&domains, &records, 5, None).unwrap();
        assert_eq!(result.stats.partitions, 1);
        assert!(result.rows.iter().all(|row| row[0] == "*"));
        assert!((result.metrics.ncp - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_input() {
        let domains: Vec<AttributeDomain> =
            vec![NumericRange::from_column(["1", "2"]).unwrap().into()];
        let records = rows(&[("1", "a"), ("2", "b")]);

        assert!(matches!(
            mondrian(&domains, &records, 0, None),
            Err(AnonymizeError::InvalidInput(_))
        ));
        assert!(matches!(
            mondrian(&domains, &records, 1, Some(2)),
            Err(AnonymizeError::InvalidInput(_))
        ));

        let mut ragged = records.clone();
        ragged[1].push("extra".to_string());
        assert!(matches!(
            mondrian(&domains, &ragged, 1, None),
            Err(AnonymizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let domains: Vec<AttributeDomain> =
            vec![NumericRange::from_column(["1"]).unwrap().into()];
        let result = mondrian(&domains, &[], 3, None).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.stats.partitions, 0);
        assert_eq!(result.metrics.ncp, 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let values: Vec<String> = (0..400).map(|i| ((i * 37) % 101).to_string()).collect();
        let domains: Vec<AttributeDomain> =
            vec![NumericRange::from_column(&values).unwrap().into()];
        let records: Vec<Record> = values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![v.clone(), format!("s{}", i)])
            .collect();

        let sequential = MondrianAnonymizer::new(AnonymizerConfig::new(3))
            .run(&domains, &records)
            .unwrap();
        let parallel = MondrianAnonymizer::new(AnonymizerConfig::new(3).with_parallel(
            ParallelConfig {
                enabled: true,
                parallel_depth: 4,
                min_partition_size: 10,
                num_threads: Some(2),
            },
        ))
        .run(&domains, &records)
        .unwrap();

        assert_eq!(sequential.rows, parallel.rows);
        assert_eq!(sequential.stats.partitions, parallel.stats.partitions);
        assert!((sequential.metrics.ncp - parallel.metrics.ncp).abs() < 1e-9);
    }
}

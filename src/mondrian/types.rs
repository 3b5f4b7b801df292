//! # Mondrian Data Structures
//!
//! Configuration, run context, results and the error taxonomy of the
//! Mondrian anonymization engine.

/**
 * File: /src/mondrian/types.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Created data structures for Mondrian
 * 2026-10-18		Zihan	Parallel configuration for sibling sub-trees
 */

use crate::domain::{AttributeDomain, DomainError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One raw row: QID values in column order, then the sensitive value
pub type Record = Vec<String>;

/// Parameters of one anonymization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Minimum group size
    pub k: usize,
    /// Number of leading QID columns (None = all columns but the last)
    #[serde(default)]
    pub qid_count: Option<usize>,
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl AnonymizerConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_qid_count(mut self, qid_count: usize) -> Self {
        self.qid_count = Some(qid_count);
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            k: 10,
            qid_count: None,
            parallel: ParallelConfig::default(),
        }
    }
}

/// When sibling sub-trees are handed to rayon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub enabled: bool,
    /// Split depth below which children are processed concurrently
    pub parallel_depth: usize,
    /// Smaller partitions stay on the current thread
    pub min_partition_size: usize,
    /// Number of threads (None = rayon's global pool)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            parallel_depth: 8,
            min_partition_size: 1000,
            num_threads: None,
        }
    }
}

impl ParallelConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Check if a partition at `depth` holding `size` records should fork
    pub fn should_parallelize(&self, depth: usize, size: usize) -> bool {
        self.enabled && depth < self.parallel_depth && size >= self.min_partition_size
    }
}

/// Immutable state shared by every operation of one run
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub domains: &'a [AttributeDomain],
    pub records: &'a [Record],
    pub k: usize,
    pub qid_count: usize,
    pub parallel: &'a ParallelConfig,
}

impl<'a> RunContext<'a> {
    /// Raw value of `attribute` for record `row`
    pub fn value(&self, row: usize, attribute: usize) -> &'a str {
        &self.records[row][attribute]
    }

    pub fn sensitive(&self, row: usize) -> &'a str {
        let record = &self.records[row];
        &record[record.len() - 1]
    }
}

/// Aggregate quality figures of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Normalized certainty penalty, percent in [0, 100]
    pub ncp: f64,
    /// Wall-clock partitioning time in seconds
    pub elapsed_secs: f64,
}

/// Shape of the terminal partition set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub partitions: usize,
    pub min_partition_size: usize,
    pub max_partition_size: usize,
    pub partitioning_ms: u64,
    pub aggregation_ms: u64,
}

/// Output of [`crate::mondrian::mondrian`]
#[derive(Debug, Clone)]
pub struct AnonymizationResult {
    /// Generalized QID labels followed by the untouched sensitive value
    pub rows: Vec<Record>,
    pub metrics: RunMetrics,
    pub stats: RunStats,
}

/// Fatal conditions of a run. A run either completes or returns one of these.
#[derive(Debug, Error)]
pub enum AnonymizeError {
    #[error("model inconsistency on attribute {attribute} (partition of {partition_size}): {detail}")]
    ModelInconsistency {
        attribute: usize,
        partition_size: usize,
        detail: String,
    },
    #[error("unreachable state (partition of {partition_size}): {detail}")]
    UnreachableState {
        partition_size: usize,
        detail: String,
    },
    #[error("losing records during anonymization: {actual} rows out, {expected} in")]
    RecordLoss { expected: usize, actual: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type Result<T> = std::result::Result<T, AnonymizeError>;

//! # Attribute Domains
//!
//! Read-only description of each quasi-identifier's value space. A domain is
//! either a numeric range (sorted distinct values) or a generalization
//! hierarchy (tree of categorical labels). Domains are built once before
//! partitioning starts and are shared by reference afterwards.

/**
 * File: /src/domain/mod.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Created domain module for Mondrian anonymization
 */

pub mod hierarchy;
pub mod numeric;

pub use hierarchy::{GeneralizationHierarchy, HierarchyBuilder, NodeId, ROOT_LABEL};
pub use numeric::{NumericRange, NumericStats};

use thiserror::Error;

/// Generalization width of one attribute inside a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthState {
    /// Inclusive index span into the numeric domain's sorted values
    Span { low: usize, high: usize },
    /// Current hierarchy node; its width is the node's leaf count
    Node(NodeId),
}

/// Value space of one QID attribute
#[derive(Debug, Clone)]
pub enum AttributeDomain {
    Numeric(NumericRange),
    Categorical(GeneralizationHierarchy),
}

impl AttributeDomain {
    pub fn is_categorical(&self) -> bool {
        matches!(self, AttributeDomain::Categorical(_))
    }

    /// Fully generalized width state
    pub fn initial_state(&self) -> WidthState {
        match self {
            AttributeDomain::Numeric(range) => {
                let (low, high) = range.full_span();
                WidthState::Span { low, high }
            }
            AttributeDomain::Categorical(tree) => WidthState::Node(tree.root()),
        }
    }

    /// Generalization label a width state stands for
    pub fn label(&self, state: WidthState) -> Result<String, DomainError> {
        match (self, state) {
            (AttributeDomain::Numeric(range), WidthState::Span { low, high })
                if low <= high && high < range.len() =>
            {
                Ok(range.label(low, high))
            }
            (AttributeDomain::Categorical(tree), WidthState::Node(id)) if id < tree.len() => {
                Ok(tree.label(id).to_string())
            }
            _ => Err(DomainError::StateMismatch(state)),
        }
    }

    /// Value difference (numeric) or leaf count (categorical)
    pub fn width(&self, state: WidthState) -> Result<f64, DomainError> {
        match (self, state) {
            (AttributeDomain::Numeric(range), WidthState::Span { low, high })
                if low <= high && high < range.len() =>
            {
                Ok(range.width(low, high))
            }
            (AttributeDomain::Categorical(tree), WidthState::Node(id)) if id < tree.len() => {
                Ok(tree.leaf_count(id) as f64)
            }
            _ => Err(DomainError::StateMismatch(state)),
        }
    }

    /// Normalization denominator: numeric range or root leaf count
    pub fn total_range(&self) -> f64 {
        match self {
            AttributeDomain::Numeric(range) => range.total_range(),
            AttributeDomain::Categorical(tree) => tree.total_leaves() as f64,
        }
    }

    /// `width / total_range`; a single-valued domain has nothing to lose.
    pub fn normalized_width(&self, state: WidthState) -> Result<f64, DomainError> {
        let width = self.width(state)?;
        let total = self.total_range();
        if total == 0.0 {
            return Ok(0.0);
        }
        Ok(width / total)
    }

    /// Direct descendants of a hierarchy label
    pub fn children_of(&self, label: &str) -> Result<&[NodeId], DomainError> {
        match self {
            AttributeDomain::Categorical(tree) => tree.children_of(label),
            AttributeDomain::Numeric(_) => Err(DomainError::NotCategorical),
        }
    }

    /// Membership of a raw value in a hierarchy node's coverage set
    pub fn covers(&self, node: NodeId, value: &str) -> bool {
        match self {
            AttributeDomain::Categorical(tree) => node < tree.len() && tree.covers(node, value),
            AttributeDomain::Numeric(_) => false,
        }
    }
}

impl From<NumericRange> for AttributeDomain {
    fn from(range: NumericRange) -> Self {
        AttributeDomain::Numeric(range)
    }
}

impl From<GeneralizationHierarchy> for AttributeDomain {
    fn from(tree: GeneralizationHierarchy) -> Self {
        AttributeDomain::Categorical(tree)
    }
}

/// Errors raised while building or querying a domain
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("value {0:?} is not numeric")]
    NotNumeric(String),
    #[error("domain has no values")]
    EmptyDomain,
    #[error("hierarchy label {0:?} appears under two different parents")]
    ConflictingParent(String),
    #[error("hierarchy label {0:?} does not exist")]
    UnknownLabel(String),
    #[error("hierarchy operation on a numeric domain")]
    NotCategorical,
    #[error("width state {0:?} does not belong to this domain")]
    StateMismatch(WidthState),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("statistics serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("domain error: {0}")]
    Other(String),
}

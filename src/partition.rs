/**
 * File: /src/partition.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Partition with per-attribute generalization state
 */
use crate::domain::{AttributeDomain, DomainError, WidthState};

/// Generalization state of one QID attribute within a partition
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeState {
    /// Current generalization label, always `domain.label(width)`
    pub label: String,
    pub width: WidthState,
    /// Cleared once a split along this attribute has failed
    pub splittable: bool,
}

/// A group of records sharing one generalization state.
///
/// Members are row indices into the record table owned by the run context,
/// so children share the records instead of copying them.
#[derive(Debug, Clone)]
pub struct Partition {
    members: Vec<usize>,
    attributes: Vec<AttributeState>,
}

impl Partition {
    pub fn new(members: Vec<usize>, attributes: Vec<AttributeState>) -> Self {
        Self {
            members,
            attributes,
        }
    }

    /// Partition over `record_count` rows, every attribute fully generalized
    pub fn root(domains: &[AttributeDomain], record_count: usize) -> Result<Self, DomainError> {
        let attributes = domains
            .iter()
            .map(|domain| {
                let width = domain.initial_state();
                Ok(AttributeState {
                    label: domain.label(width)?,
                    width,
                    splittable: true,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self::new((0..record_count).collect(), attributes))
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn attributes(&self) -> &[AttributeState] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &AttributeState {
        &self.attributes[index]
    }

    pub fn qid_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_splittable(&self, index: usize) -> bool {
        self.attributes[index].splittable
    }

    /// Terminal once no attribute may be split any more
    pub fn is_terminal(&self) -> bool {
        self.attributes.iter().all(|state| !state.splittable)
    }

    pub fn splittable_count(&self) -> usize {
        self.attributes.iter().filter(|state| state.splittable).count()
    }

    pub fn disable(&mut self, index: usize) {
        self.attributes[index].splittable = false;
    }

    /// Narrow one attribute in place, keeping label and width in step
    pub(crate) fn generalize(&mut self, index: usize, label: String, width: WidthState) {
        let state = &mut self.attributes[index];
        state.label = label;
        state.width = width;
    }

    /// Child over `members` inheriting every attribute state except `index`
    pub fn child(
        &self,
        members: Vec<usize>,
        index: usize,
        label: String,
        width: WidthState,
    ) -> Partition {
        let mut attributes = self.attributes.clone();
        attributes[index].label = label;
        attributes[index].width = width;
        Partition {
            members,
            attributes,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|state| state.label.as_str())
    }
}

//! # Generalization Hierarchy
//!
//! Arena-backed tree of categorical labels. Nodes address each other by
//! [`NodeId`]; parents are an index relation, children an owned id list.
//! The root label `*` means "fully generalized".

/**
 * File: /src/domain/hierarchy.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Arena hierarchy with precomputed coverage sets
 */

use crate::domain::DomainError;
use std::collections::{HashMap, HashSet};

pub const ROOT_LABEL: &str = "*";

/// Stable index of a node inside its hierarchy arena
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Own label plus every descendant label
    cover: HashSet<String>,
    /// Leaves strictly beneath this node (0 for a leaf)
    leaf_count: usize,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }
}

/// Immutable categorical value space of one attribute
#[derive(Debug, Clone)]
pub struct GeneralizationHierarchy {
    nodes: Vec<HierarchyNode>,
    by_label: HashMap<String, NodeId>,
}

impl GeneralizationHierarchy {
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    /// Parse `leaf;parent;...;top` lines, see [`HierarchyBuilder::parse`]
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        HierarchyBuilder::parse(text)?.build()
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id]
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.by_label.get(label).copied()
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id].label
    }

    /// Direct descendants of the node labelled `label`, in insertion order
    pub fn children_of(&self, label: &str) -> Result<&[NodeId], DomainError> {
        let id = self
            .node_id(label)
            .ok_or_else(|| DomainError::UnknownLabel(label.to_string()))?;
        Ok(&self.nodes[id].children)
    }

    pub fn covers(&self, id: NodeId, value: &str) -> bool {
        self.nodes[id].cover.contains(value)
    }

    pub fn leaf_count(&self, id: NodeId) -> usize {
        self.nodes[id].leaf_count
    }

    /// Leaf count of the root, the normalization denominator
    pub fn total_leaves(&self) -> usize {
        self.nodes[self.root()].leaf_count
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Ancestors of `id`, nearest first, ending at the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }
}

/// Incremental construction of a [`GeneralizationHierarchy`]
#[derive(Debug)]
pub struct HierarchyBuilder {
    nodes: Vec<HierarchyNode>,
    by_label: HashMap<String, NodeId>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        let root = HierarchyNode {
            label: ROOT_LABEL.to_string(),
            parent: None,
            children: Vec::new(),
            cover: HashSet::new(),
            leaf_count: 0,
        };
        Self {
            nodes: vec![root],
            by_label: HashMap::from([(ROOT_LABEL.to_string(), 0)]),
        }
    }

    /// One line per leaf: `leaf;parent;...;top`, trailing `*` optional.
    /// Reading stops at the first empty line.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut builder = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            let path: Vec<&str> = line.split(';').map(str::trim).collect();
            builder.add_path(&path)?;
        }
        Ok(builder)
    }

    /// Insert a leaf-first path. Labels already present must keep their parent.
    pub fn add_path(&mut self, path: &[&str]) -> Result<&mut Self, DomainError> {
        let mut parent = 0;
        for &label in path.iter().rev() {
            if label == ROOT_LABEL {
                if parent != 0 {
                    return Err(DomainError::ConflictingParent(label.to_string()));
                }
                continue;
            }
            if label.is_empty() {
                return Err(DomainError::UnknownLabel(String::new()));
            }
            parent = match self.by_label.get(label) {
                Some(&id) if self.nodes[id].parent == Some(parent) => id,
                Some(_) => return Err(DomainError::ConflictingParent(label.to_string())),
                None => self.push(label, parent),
            };
        }
        Ok(self)
    }

    /// Attach `label` directly under `parent_label`
    pub fn add_child(&mut self, parent_label: &str, label: &str) -> Result<&mut Self, DomainError> {
        let parent = *self
            .by_label
            .get(parent_label)
            .ok_or_else(|| DomainError::UnknownLabel(parent_label.to_string()))?;
        if self.by_label.contains_key(label) {
            return Err(DomainError::ConflictingParent(label.to_string()));
        }
        self.push(label, parent);
        Ok(self)
    }

    fn push(&mut self, label: &str, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(HierarchyNode {
            label: label.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            cover: HashSet::new(),
            leaf_count: 0,
        });
        self.nodes[parent].children.push(id);
        self.by_label.insert(label.to_string(), id);
        id
    }

    /// Materialize coverage sets and leaf counts
    pub fn build(self) -> Result<GeneralizationHierarchy, DomainError> {
        let Self { mut nodes, by_label } = self;
        if nodes[0].children.is_empty() {
            return Err(DomainError::EmptyDomain);
        }

        // children always have larger ids than their parent
        for id in (0..nodes.len()).rev() {
            let mut cover = HashSet::from([nodes[id].label.clone()]);
            let mut leaf_count = 0;
            for &child in &nodes[id].children {
                cover.extend(nodes[child].cover.iter().cloned());
                leaf_count += if nodes[child].is_leaf() {
                    1
                } else {
                    nodes[child].leaf_count
                };
            }
            nodes[id].cover = cover;
            nodes[id].leaf_count = leaf_count;
        }

        Ok(GeneralizationHierarchy { nodes, by_label })
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARITAL: &str = "Married-civ-spouse;Married;*\n\
                           Married-AF-spouse;Married;*\n\
                           Never-married;NM;*\n\
                           Divorced;leave;NM;*\n\
                           Separated;leave;NM;*\n";

    #[test]
    fn test_parse_builds_tree() {
        let tree = GeneralizationHierarchy::parse(MARITAL).unwrap();
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.total_leaves(), 5);

        let nm = tree.node_id("NM").unwrap();
        let leave = tree.node_id("leave").unwrap();
        assert_eq!(tree.leaf_count(nm), 3);
        assert_eq!(tree.leaf_count(leave), 2);
        assert_eq!(tree.leaf_count(tree.node_id("Divorced").unwrap()), 0);
        assert_eq!(tree.node(leave).parent, Some(nm));

        let children: Vec<&str> = tree
            .children_of("NM")
            .unwrap()
            .iter()
            .map(|&id| tree.label(id))
            .collect();
        assert_eq!(children, vec!["Never-married", "leave"]);
    }

    #[test]
    fn test_coverage_sets() {
        let tree = GeneralizationHierarchy::parse(MARITAL).unwrap();
        let nm = tree.node_id("NM").unwrap();
        assert!(tree.covers(nm, "Divorced"));
        assert!(tree.covers(nm, "leave"));
        assert!(tree.covers(nm, "NM"));
        assert!(!tree.covers(nm, "Married-AF-spouse"));
        assert!(tree.covers(tree.root(), "Married-AF-spouse"));
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let tree = GeneralizationHierarchy::parse(MARITAL).unwrap();
        let separated = tree.node_id("Separated").unwrap();
        let labels: Vec<&str> = tree.ancestors(separated).map(|id| tree.label(id)).collect();
        assert_eq!(labels, vec!["leave", "NM", "*"]);
    }

    #[test]
    fn test_paths_without_root_marker() {
        let tree = GeneralizationHierarchy::parse("a1;A\na2;A\nb1;B\n").unwrap();
        assert_eq!(tree.total_leaves(), 3);
        assert_eq!(tree.children_of("*").unwrap().len(), 2);
    }

    #[test]
    fn test_conflicting_parent_rejected() {
        let err = GeneralizationHierarchy::parse("x;A;*\nx;B;*\n").unwrap_err();
        assert!(matches!(err, DomainError::ConflictingParent(label) if label == "x"));
    }

    #[test]
    fn test_empty_hierarchy_rejected() {
        assert!(matches!(
            GeneralizationHierarchy::parse(""),
            Err(DomainError::EmptyDomain)
        ));
    }

    #[test]
    fn test_builder_add_child() {
        let mut builder = GeneralizationHierarchy::builder();
        builder
            .add_child("*", "A")
            .unwrap()
            .add_child("A", "a1")
            .unwrap()
            .add_child("*", "b1")
            .unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(tree.total_leaves(), 2);
        assert!(tree.node(tree.node_id("b1").unwrap()).is_leaf());
        assert!(matches!(
            tree.children_of("zzz"),
            Err(DomainError::UnknownLabel(_))
        ));
    }
}

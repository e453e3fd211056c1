//! Arena-backed organisation forest.
//!
//! The forest owns every node in a generational arena. A node refers to its
//! parent and children by arena [`Index`] only, so the parent back-reference
//! never participates in ownership and no reference cycle can form.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::Employee;

/// Tree position of one employee.
#[derive(Debug)]
pub struct OrgNode {
    /// The wrapped record
    pub employee: Employee,
    /// Index of the manager's node, None for root nodes
    pub parent: Option<Index>,
    /// Indices of direct reports, in roster order
    pub children: Vec<Index>,
}

impl OrgNode {
    fn new(employee: Employee) -> Self {
        Self {
            employee,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.employee.id()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Why a node with a declared manager ended up as a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionReason {
    /// The declared manager id does not exist in the roster.
    MissingManager(String),
    /// Attaching to the declared manager would close a reporting cycle.
    ReportingCycle(String),
}

impl fmt::Display for PromotionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionReason::MissingManager(id) => write!(f, "manager {} not found", id),
            PromotionReason::ReportingCycle(id) => {
                write!(f, "reporting to {} would create a cycle", id)
            }
        }
    }
}

/// A node that was promoted to root during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedRoot {
    pub employee_id: String,
    pub reason: PromotionReason,
}

/// Forest of employee trees plus an id index.
///
/// Invariants, upheld by [`crate::domain::TreeBuilder`]:
/// - `index` maps every live node's id to its arena slot (`|index| == |arena|`)
/// - `roots` lists exactly the nodes without a parent, in roster order
/// - parent links are acyclic, so every node is reachable from one root
#[derive(Debug, Default)]
pub struct OrgForest {
    arena: Arena<OrgNode>,
    index: HashMap<String, Index>,
    roots: Vec<Index>,
    promoted: Vec<PromotedRoot>,
    duplicate_ids: Vec<String>,
}

impl OrgForest {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------
    // construction (crate internal, driven by TreeBuilder)
    // ------------------------------------------------------------

    /// Insert a node for `employee` and index it by id.
    ///
    /// Returns the new slot and, if the id was already indexed, the record of
    /// the node it replaced. The replaced node is dropped from the arena.
    pub(crate) fn insert(&mut self, employee: Employee) -> (Index, Option<Employee>) {
        let id = employee.id().to_string();
        let idx = self.arena.insert(OrgNode::new(employee));
        let replaced = self
            .index
            .insert(id, idx)
            .and_then(|previous| self.arena.remove(previous))
            .map(|node| node.employee);
        (idx, replaced)
    }

    pub(crate) fn add_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    pub(crate) fn promote(&mut self, idx: Index, reason: PromotionReason) {
        if let Some(node) = self.arena.get(idx) {
            self.promoted.push(PromotedRoot {
                employee_id: node.id().to_string(),
                reason,
            });
        }
        self.roots.push(idx);
    }

    pub(crate) fn record_duplicate(&mut self, id: &str) {
        self.duplicate_ids.push(id.to_string());
    }

    /// Append `child` to `parent`'s reports and set the back-reference.
    pub(crate) fn attach(&mut self, child: Index, parent: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// True when `ancestor` lies on the management chain above `idx`, or is `idx` itself.
    pub(crate) fn is_in_chain(&self, idx: Index, ancestor: Index) -> bool {
        let mut current = Some(idx);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.arena.get(c).and_then(|n| n.parent);
        }
        false
    }

    // ------------------------------------------------------------
    // navigation
    // ------------------------------------------------------------

    pub fn get(&self, idx: Index) -> Option<&OrgNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.index.get(id).copied()
    }

    /// O(1) lookup by employee id.
    pub fn node_by_id(&self, id: &str) -> Option<&OrgNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    /// Direct reports in roster order; empty for unknown ids and leaves.
    #[instrument(level = "trace", skip(self))]
    pub fn direct_reports(&self, id: &str) -> Vec<&OrgNode> {
        self.node_by_id(id)
            .map(|node| self.children_of(node))
            .unwrap_or_default()
    }

    pub(crate) fn children_of(&self, node: &OrgNode) -> Vec<&OrgNode> {
        node.children
            .iter()
            .filter_map(|&c| self.arena.get(c))
            .collect()
    }

    /// Every descendant of `id` in pre-order, excluding the node itself.
    #[instrument(level = "trace", skip(self))]
    pub fn all_subordinates(&self, id: &str) -> Vec<&OrgNode> {
        match self.node_by_id(id) {
            Some(node) => PreOrderIter::new(self, node.children.iter().copied())
                .map(|(_, n)| n)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of managers between the node and its root; 0 for roots.
    pub fn depth(&self, idx: Index) -> usize {
        let mut depth = 0;
        let mut current = self.arena.get(idx).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.arena.get(parent).and_then(|n| n.parent);
        }
        depth
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.index_of(id).map(|idx| self.depth(idx))
    }

    /// Number of levels in the deepest tree; 0 for an empty forest.
    pub fn height(&self) -> usize {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| self.depth(idx) + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn total_employee_count(&self) -> usize {
        self.index.len()
    }

    pub fn root_node_count(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &OrgNode> + '_ {
        self.roots.iter().filter_map(|&idx| self.arena.get(idx))
    }

    /// Pre-order walk over all trees, roots in roster order.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.roots.iter().copied())
    }

    /// All node indices in pre-order; the stable order used for batch validation.
    pub fn all_nodes(&self) -> Vec<Index> {
        self.iter().map(|(idx, _)| idx).collect()
    }

    /// Employees without reports, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<&OrgNode> {
        self.iter()
            .map(|(_, node)| node)
            .filter(|node| node.is_leaf())
            .collect()
    }

    /// Nodes promoted to root because their manager could not be attached.
    pub fn promoted_roots(&self) -> &[PromotedRoot] {
        &self.promoted
    }

    /// Ids that appeared more than once; the last record won.
    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicate_ids
    }
}

/// Depth-first pre-order iterator: a node, then each child subtree left to right.
pub struct PreOrderIter<'a> {
    forest: &'a OrgForest,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(forest: &'a OrgForest, starts: impl DoubleEndedIterator<Item = Index>) -> Self {
        Self {
            forest,
            stack: starts.rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.forest.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

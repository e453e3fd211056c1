//! Tree builder turning a flat roster into an organisation forest.

use std::collections::HashSet;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::{OrgForest, PromotionReason};
use crate::domain::entities::Employee;
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// What to do when two records share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// The later record replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Refuse to build.
    Reject,
}

/// Constructs an [`OrgForest`] from employee records.
#[derive(Debug, Default, Clone)]
pub struct TreeBuilder {
    duplicate_ids: DuplicateIdPolicy,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_policy(duplicate_ids: DuplicateIdPolicy) -> Self {
        Self { duplicate_ids }
    }

    /// Build a forest, applying the configured duplicate id policy.
    ///
    /// Only [`DuplicateIdPolicy::Reject`] can fail; dangling manager
    /// references and reporting cycles never do.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: Vec<Employee>) -> TreeResult<OrgForest> {
        if self.duplicate_ids == DuplicateIdPolicy::Reject {
            let mut seen = HashSet::with_capacity(records.len());
            if let Some(dup) = records.iter().find(|e| !seen.insert(e.id())) {
                return Err(DomainError::DuplicateEmployeeId(dup.id().to_string()));
            }
        }
        Ok(build_tree(records))
    }
}

/// Two-pass construction.
///
/// Pass 1 creates and indexes one node per record, so managers listed after
/// their reports are still found. Pass 2 wires each node to its manager in
/// roster order, which fixes sibling order. A record whose manager is missing,
/// or whose attachment would close a cycle, becomes a root.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn build_tree(records: Vec<Employee>) -> OrgForest {
    let mut forest = OrgForest::new();
    let mut order: Vec<Index> = Vec::with_capacity(records.len());

    for employee in records {
        let (idx, replaced) = forest.insert(employee);
        if let Some(previous) = replaced {
            warn!(
                "duplicate employee id {}: replacing earlier record",
                previous.id()
            );
            forest.record_duplicate(previous.id());
        }
        order.push(idx);
    }

    for idx in order {
        // Superseded duplicates are gone from the arena
        let Some(manager_id) = forest
            .get(idx)
            .map(|node| node.employee.manager_id().map(str::to_string))
        else {
            continue;
        };

        let Some(manager_id) = manager_id else {
            forest.add_root(idx);
            continue;
        };

        match forest.index_of(&manager_id) {
            Some(parent) if forest.is_in_chain(parent, idx) => {
                warn!(
                    "reporting cycle via manager {}: treating {} as root",
                    manager_id,
                    employee_id(&forest, idx)
                );
                forest.promote(idx, PromotionReason::ReportingCycle(manager_id));
            }
            Some(parent) => forest.attach(idx, parent),
            None => {
                warn!(
                    "manager with id {} not found for employee {}",
                    manager_id,
                    employee_id(&forest, idx)
                );
                forest.promote(idx, PromotionReason::MissingManager(manager_id));
            }
        }
    }

    debug!(
        "built forest: {} employees, {} roots",
        forest.total_employee_count(),
        forest.root_node_count()
    );
    forest
}

fn employee_id(forest: &OrgForest, idx: Index) -> String {
    forest
        .get(idx)
        .map(|n| n.id().to_string())
        .unwrap_or_default()
}

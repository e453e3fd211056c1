//! Validation rules over the organisation forest.
//!
//! The rule set is closed: two salary bounds and one reporting-depth ceiling.
//! Each rule is a pure function producing a [`ValidationResult`]; [`Rule`]
//! names them as values so callers can iterate or select rules without any
//! dynamic dispatch.

use std::fmt;

use generational_arena::Index;
use serde::Serialize;

use crate::domain::arena::{OrgForest, OrgNode};
use crate::domain::entities::Employee;

/// A manager must earn at least this multiple of the direct-report average.
pub const MIN_SALARY_FACTOR: f64 = 1.20;

/// A manager may earn at most this multiple of the direct-report average.
pub const MAX_SALARY_FACTOR: f64 = 1.50;

/// Maximum number of managers between an employee and the root.
pub const MAX_REPORTING_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Ok,
    Underpaid,
    Overpaid,
    TooDeep,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::Ok => "ok",
            ViolationKind::Underpaid => "underpaid",
            ViolationKind::Overpaid => "overpaid",
            ViolationKind::TooDeep => "too deep",
        };
        f.write_str(s)
    }
}

/// Outcome of one rule applied to one employee.
///
/// `magnitude` is 0 when valid; otherwise the salary shortfall, the salary
/// excess, or the number of levels beyond the depth ceiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub kind: ViolationKind,
    pub magnitude: f64,
    pub subject: Employee,
}

impl ValidationResult {
    pub fn ok(subject: &Employee) -> Self {
        Self {
            valid: true,
            kind: ViolationKind::Ok,
            magnitude: 0.0,
            subject: subject.clone(),
        }
    }

    pub fn violation(kind: ViolationKind, magnitude: f64, subject: &Employee) -> Self {
        Self {
            valid: false,
            kind,
            magnitude,
            subject: subject.clone(),
        }
    }

    pub fn is_violation(&self) -> bool {
        !self.valid
    }
}

/// The closed set of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    MinimumSalary,
    MaximumSalary,
    ReportingDepth,
}

impl Rule {
    pub const SALARY: [Rule; 2] = [Rule::MinimumSalary, Rule::MaximumSalary];

    /// The violation kind this rule raises.
    pub fn violation_kind(self) -> ViolationKind {
        match self {
            Rule::MinimumSalary => ViolationKind::Underpaid,
            Rule::MaximumSalary => ViolationKind::Overpaid,
            Rule::ReportingDepth => ViolationKind::TooDeep,
        }
    }

    /// Salary rules only concern managers; the depth rule concerns everyone.
    pub fn applies_to(self, node: &OrgNode) -> bool {
        match self {
            Rule::MinimumSalary | Rule::MaximumSalary => !node.is_leaf(),
            Rule::ReportingDepth => true,
        }
    }

    /// Evaluate the rule for the node at `idx`. None if the index is stale.
    pub fn evaluate(self, forest: &OrgForest, idx: Index) -> Option<ValidationResult> {
        let node = forest.get(idx)?;
        let result = match self {
            Rule::MinimumSalary => minimum_salary(&node.employee, &forest.children_of(node)),
            Rule::MaximumSalary => maximum_salary(&node.employee, &forest.children_of(node)),
            Rule::ReportingDepth => reporting_depth(&node.employee, forest.depth(idx)),
        };
        Some(result)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rule::MinimumSalary => "minimum salary",
            Rule::MaximumSalary => "maximum salary",
            Rule::ReportingDepth => "reporting depth",
        };
        f.write_str(s)
    }
}

/// Mean salary of the given nodes; 0 for an empty slice.
pub fn average_salary(nodes: &[&OrgNode]) -> f64 {
    if nodes.is_empty() {
        return 0.0;
    }
    let total: f64 = nodes.iter().map(|n| n.employee.salary()).sum();
    total / nodes.len() as f64
}

/// Inclusive (floor, ceiling) salary band implied by the direct reports.
pub fn salary_band(direct_reports: &[&OrgNode]) -> (f64, f64) {
    let avg = average_salary(direct_reports);
    (avg * MIN_SALARY_FACTOR, avg * MAX_SALARY_FACTOR)
}

/// Underpaid when the manager earns below the floor. Exempt without reports.
pub fn minimum_salary(manager: &Employee, direct_reports: &[&OrgNode]) -> ValidationResult {
    if direct_reports.is_empty() {
        return ValidationResult::ok(manager);
    }
    let (floor, _) = salary_band(direct_reports);
    if manager.salary() >= floor {
        ValidationResult::ok(manager)
    } else {
        ValidationResult::violation(ViolationKind::Underpaid, floor - manager.salary(), manager)
    }
}

/// Overpaid when the manager earns above the ceiling. Exempt without reports.
pub fn maximum_salary(manager: &Employee, direct_reports: &[&OrgNode]) -> ValidationResult {
    if direct_reports.is_empty() {
        return ValidationResult::ok(manager);
    }
    let (_, ceiling) = salary_band(direct_reports);
    if manager.salary() <= ceiling {
        ValidationResult::ok(manager)
    } else {
        ValidationResult::violation(ViolationKind::Overpaid, manager.salary() - ceiling, manager)
    }
}

/// Too deep when more than [`MAX_REPORTING_DEPTH`] managers sit above the employee.
pub fn reporting_depth(subject: &Employee, depth: usize) -> ValidationResult {
    if depth <= MAX_REPORTING_DEPTH {
        ValidationResult::ok(subject)
    } else {
        ValidationResult::violation(
            ViolationKind::TooDeep,
            (depth - MAX_REPORTING_DEPTH) as f64,
            subject,
        )
    }
}

/// Run both salary rules on every manager in `nodes`, keeping violations only.
///
/// Results follow the order of `nodes`; for one manager the minimum-rule
/// violation precedes the maximum-rule one (at most one of them can fire).
pub fn validate_all_manager_salaries<I>(forest: &OrgForest, nodes: I) -> Vec<ValidationResult>
where
    I: IntoIterator<Item = Index>,
{
    evaluate_all(forest, nodes, &Rule::SALARY)
}

/// Run the depth rule on every node in `nodes`, keeping violations only.
pub fn validate_all_reporting_depths<I>(forest: &OrgForest, nodes: I) -> Vec<ValidationResult>
where
    I: IntoIterator<Item = Index>,
{
    evaluate_all(forest, nodes, &[Rule::ReportingDepth])
}

fn evaluate_all<I>(forest: &OrgForest, nodes: I, rules: &[Rule]) -> Vec<ValidationResult>
where
    I: IntoIterator<Item = Index>,
{
    let mut results = Vec::new();
    for idx in nodes {
        let Some(node) = forest.get(idx) else {
            continue;
        };
        for &rule in rules {
            if !rule.applies_to(node) {
                continue;
            }
            if let Some(result) = rule.evaluate(forest, idx).filter(ValidationResult::is_violation)
            {
                results.push(result);
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_reports_when_evaluating_salary_rules_then_exempt() {
        let manager = Employee::new("1", "A", "B", 0.0, None);
        assert!(minimum_salary(&manager, &[]).valid);
        assert!(maximum_salary(&manager, &[]).valid);
    }

    #[test]
    fn given_depth_beyond_ceiling_when_evaluating_then_reports_levels() {
        let e = Employee::new("6", "A", "B", 1.0, Some("5"));
        let result = reporting_depth(&e, 7);
        assert_eq!(result.kind, ViolationKind::TooDeep);
        assert_eq!(result.magnitude, 3.0);
    }

    #[test]
    fn given_rule_when_asking_kind_then_matches_violation() {
        assert_eq!(Rule::MinimumSalary.violation_kind(), ViolationKind::Underpaid);
        assert_eq!(Rule::MaximumSalary.violation_kind(), ViolationKind::Overpaid);
        assert_eq!(Rule::ReportingDepth.violation_kind(), ViolationKind::TooDeep);
    }
}

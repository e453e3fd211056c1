//! Presentation of forests and validation results
//!
//! Everything here is plain text; [`crate::cli::output`] adds color when printing.
//! Counts are derived from the result sequences the domain returns.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{
    Employee, EmployeeValidation, OrgForest, OrgNode, ValidationResult, ValidationSession,
    ViolationKind, MAX_REPORTING_DEPTH,
};

/// `$1234.50`
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// `First Last (ID: 7, Salary: $1000.00)`
pub fn node_label(employee: &Employee) -> String {
    format!(
        "{} (ID: {}, Salary: {})",
        employee.full_name(),
        employee.id(),
        money(employee.salary())
    )
}

fn subtree(forest: &OrgForest, node: &OrgNode) -> Tree<String> {
    let leaves: Vec<_> = node
        .children
        .iter()
        .filter_map(|&c| forest.get(c))
        .map(|child| subtree(forest, child))
        .collect();
    Tree::new(node_label(&node.employee)).with_leaves(leaves)
}

/// One rendered tree per root, in roster order.
pub fn render_forest(forest: &OrgForest) -> Vec<String> {
    forest
        .roots()
        .map(|root| subtree(forest, root).to_string())
        .collect()
}

/// Violation counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViolationSummary {
    pub underpaid: usize,
    pub overpaid: usize,
    pub too_deep: usize,
}

impl ViolationSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ValidationResult>) -> Self {
        let counts = results.into_iter().counts_by(|r| r.kind);
        let count = |kind| counts.get(&kind).copied().unwrap_or(0);
        Self {
            underpaid: count(ViolationKind::Underpaid),
            overpaid: count(ViolationKind::Overpaid),
            too_deep: count(ViolationKind::TooDeep),
        }
    }

    pub fn from_session(session: &ValidationSession) -> Self {
        Self::from_results(session.violations())
    }

    pub fn salary_ok(&self) -> bool {
        self.underpaid == 0 && self.overpaid == 0
    }

    pub fn total(&self) -> usize {
        self.underpaid + self.overpaid + self.too_deep
    }
}

/// Headline for a violation, e.g. `UNDERPAID: Joe Doe (ID: 1)`.
pub fn violation_headline(result: &ValidationResult) -> String {
    let label = match result.kind {
        ViolationKind::Ok => "OK",
        ViolationKind::Underpaid => "UNDERPAID",
        ViolationKind::Overpaid => "OVERPAID",
        ViolationKind::TooDeep => "TOO DEEP",
    };
    format!("{}: {}", label, result.subject)
}

/// Magnitude line, e.g. `Shortfall: $4000.00` or `Levels too deep: 1`.
pub fn violation_magnitude(result: &ValidationResult) -> String {
    match result.kind {
        ViolationKind::Underpaid => format!("Shortfall: {}", money(result.magnitude)),
        ViolationKind::Overpaid => format!("Excess: {}", money(result.magnitude)),
        ViolationKind::TooDeep => format!("Levels too deep: {}", result.magnitude as usize),
        ViolationKind::Ok => "No violation".to_string(),
    }
}

/// Salary context lines for a manager violation.
pub fn salary_context_lines(session: &ValidationSession, result: &ValidationResult) -> Vec<String> {
    let Some(ctx) = session.salary_context(result.subject.id()) else {
        return Vec::new();
    };
    let mut lines = vec![
        format!("Manager Salary: {}", money(result.subject.salary())),
        format!("Average Direct Report Salary: {}", money(ctx.average)),
        format!("Required Range: {} - {}", money(ctx.floor), money(ctx.ceiling)),
        "Direct Reports:".to_string(),
    ];
    lines.extend(ctx.direct_reports.iter().map(|e| format!("  - {}", node_label(e))));
    lines
}

/// Per-rule status lines for the detail view: (passed, text).
pub fn detail_lines(details: &EmployeeValidation) -> Vec<(bool, String)> {
    let mut lines = Vec::new();
    if let Some(min) = &details.minimum_salary {
        lines.push(match min.valid {
            true => (true, "Minimum salary requirement met".to_string()),
            false => (
                false,
                format!("Minimum salary violation: {} shortfall", money(min.magnitude)),
            ),
        });
    }
    if let Some(max) = &details.maximum_salary {
        lines.push(match max.valid {
            true => (true, "Maximum salary requirement met".to_string()),
            false => (
                false,
                format!("Maximum salary violation: {} excess", money(max.magnitude)),
            ),
        });
    }
    let depth = &details.reporting_depth;
    lines.push(match depth.valid {
        true => (
            true,
            format!(
                "Reporting depth acceptable ({} of max {})",
                details.depth, MAX_REPORTING_DEPTH
            ),
        ),
        false => (
            false,
            format!(
                "Reporting depth violation: {} levels too deep",
                depth.magnitude as usize
            ),
        ),
    });
    lines
}

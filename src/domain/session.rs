//! Validation session: one memoized batch pass over one forest.
//!
//! Detail queries read the cached batch results instead of re-running rules.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::arena::OrgForest;
use crate::domain::entities::Employee;
use crate::domain::error::DomainError;
use crate::domain::rules::{
    average_salary, salary_band, validate_all_manager_salaries, validate_all_reporting_depths,
    Rule, ValidationResult,
};

/// Cached violations for a forest snapshot.
#[derive(Debug)]
pub struct ValidationSession {
    forest: Arc<OrgForest>,
    salary_results: Vec<ValidationResult>,
    depth_results: Vec<ValidationResult>,
}

/// Salary context of a manager, for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryContext {
    pub direct_reports: Vec<Employee>,
    pub average: f64,
    pub floor: f64,
    pub ceiling: f64,
}

/// Per-employee view of the cached results. Rules that passed are reported
/// explicitly as OK; salary rules are None for non-managers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeValidation {
    pub employee: Employee,
    pub depth: usize,
    pub salary: Option<SalaryContext>,
    pub minimum_salary: Option<ValidationResult>,
    pub maximum_salary: Option<ValidationResult>,
    pub reporting_depth: ValidationResult,
}

impl EmployeeValidation {
    pub fn results(&self) -> impl Iterator<Item = &ValidationResult> {
        self.minimum_salary
            .iter()
            .chain(self.maximum_salary.iter())
            .chain(std::iter::once(&self.reporting_depth))
    }

    pub fn is_valid(&self) -> bool {
        self.results().all(|r| r.valid)
    }
}

impl ValidationSession {
    /// Run every batch evaluator once, in the forest's pre-order.
    #[instrument(level = "debug", skip_all, fields(employees = forest.total_employee_count()))]
    pub fn run(forest: Arc<OrgForest>) -> Self {
        let nodes = forest.all_nodes();
        let salary_results = validate_all_manager_salaries(&forest, nodes.iter().copied());
        let depth_results = validate_all_reporting_depths(&forest, nodes.iter().copied());
        debug!(
            "validation: {} salary violations, {} depth violations",
            salary_results.len(),
            depth_results.len()
        );
        Self {
            forest,
            salary_results,
            depth_results,
        }
    }

    pub fn forest(&self) -> &Arc<OrgForest> {
        &self.forest
    }

    pub fn salary_violations(&self) -> &[ValidationResult] {
        &self.salary_results
    }

    pub fn depth_violations(&self) -> &[ValidationResult] {
        &self.depth_results
    }

    pub fn violations(&self) -> impl Iterator<Item = &ValidationResult> {
        self.salary_results.iter().chain(self.depth_results.iter())
    }

    pub fn has_violations(&self) -> bool {
        !self.salary_results.is_empty() || !self.depth_results.is_empty()
    }

    /// Salary band and reports of a manager; None for unknown ids and leaves.
    pub fn salary_context(&self, id: &str) -> Option<SalaryContext> {
        let reports = self.forest.direct_reports(id);
        if reports.is_empty() {
            return None;
        }
        let (floor, ceiling) = salary_band(&reports);
        Some(SalaryContext {
            direct_reports: reports.iter().map(|n| n.employee.clone()).collect(),
            average: average_salary(&reports),
            floor,
            ceiling,
        })
    }

    /// Detail view for one employee, answered from the cached batch results.
    pub fn employee_details(&self, id: &str) -> Result<EmployeeValidation, DomainError> {
        let idx = self
            .forest
            .index_of(id)
            .ok_or_else(|| DomainError::UnknownEmployee(id.to_string()))?;
        let node = self
            .forest
            .get(idx)
            .ok_or_else(|| DomainError::UnknownEmployee(id.to_string()))?;
        let employee = &node.employee;

        let cached = |results: &[ValidationResult], rule: Rule| -> ValidationResult {
            results
                .iter()
                .find(|r| r.subject.id() == id && r.kind == rule.violation_kind())
                .cloned()
                .unwrap_or_else(|| ValidationResult::ok(employee))
        };

        let is_manager = Rule::MinimumSalary.applies_to(node);
        Ok(EmployeeValidation {
            employee: employee.clone(),
            depth: self.forest.depth(idx),
            salary: self.salary_context(id),
            minimum_salary: is_manager.then(|| cached(&self.salary_results, Rule::MinimumSalary)),
            maximum_salary: is_manager.then(|| cached(&self.salary_results, Rule::MaximumSalary)),
            reporting_depth: cached(&self.depth_results, Rule::ReportingDepth),
        })
    }
}

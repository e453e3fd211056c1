//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod rules;
pub mod session;

pub use arena::{OrgForest, OrgNode, PreOrderIter, PromotedRoot, PromotionReason};
pub use builder::{build_tree, DuplicateIdPolicy, TreeBuilder, TreeResult};
pub use entities::Employee;
pub use error::DomainError;
pub use generational_arena::Index;
pub use rules::{
    maximum_salary, minimum_salary, reporting_depth, validate_all_manager_salaries,
    validate_all_reporting_depths, Rule, ValidationResult, ViolationKind, MAX_REPORTING_DEPTH,
    MAX_SALARY_FACTOR, MIN_SALARY_FACTOR,
};
pub use session::{EmployeeValidation, SalaryContext, ValidationSession};

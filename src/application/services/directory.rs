//! Employee directory service
//!
//! Loads a roster, builds the organisation forest and owns the validation
//! session that detail queries read from.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::roster::{parse_roster, RosterOptions, SkippedRow};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    DuplicateIdPolicy, Employee, EmployeeValidation, OrgForest, TreeBuilder, ValidationSession,
};
use crate::infrastructure::traits::FileSystem;

/// Outcome of loading a roster file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Records handed to the tree builder
    pub records: usize,
    /// Rows the roster parser rejected
    pub skipped: Vec<SkippedRow>,
}

/// Service tying roster loading, tree construction and validation together.
///
/// Every load replaces the forest with a new `Arc`, so snapshots taken via
/// [`DirectoryService::forest`] stay valid. A load also discards the
/// validation session, which is scoped to one forest.
pub struct DirectoryService {
    fs: Arc<dyn FileSystem>,
    roster_options: RosterOptions,
    builder: TreeBuilder,
    forest: Arc<OrgForest>,
    session: Option<ValidationSession>,
}

impl DirectoryService {
    /// Create a new directory service with an empty forest.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        roster_options: RosterOptions,
        duplicate_ids: DuplicateIdPolicy,
    ) -> Self {
        Self {
            fs,
            roster_options,
            builder: TreeBuilder::with_duplicate_policy(duplicate_ids),
            forest: Arc::new(OrgForest::new()),
            session: None,
        }
    }

    /// Read, parse and build from a roster file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_file(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::RosterNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read roster", path)?;
        let roster = parse_roster(&content, &self.roster_options)?;
        let records = roster.employees.len();
        self.load(roster.employees)?;
        Ok(LoadReport {
            records,
            skipped: roster.skipped,
        })
    }

    /// Build a fresh forest from records, replacing the current one.
    pub fn load(&mut self, employees: Vec<Employee>) -> ApplicationResult<Arc<OrgForest>> {
        let forest = Arc::new(self.builder.build(employees)?);
        debug!(
            "load: {} employees, {} roots",
            forest.total_employee_count(),
            forest.root_node_count()
        );
        self.forest = Arc::clone(&forest);
        self.session = None;
        Ok(forest)
    }

    /// Snapshot of the current forest.
    pub fn forest(&self) -> Arc<OrgForest> {
        Arc::clone(&self.forest)
    }

    /// Run the batch pass for the current forest, reusing a cached session.
    pub fn run_validation(&mut self) -> &ValidationSession {
        let forest = &self.forest;
        self.session
            .get_or_insert_with(|| ValidationSession::run(Arc::clone(forest)))
    }

    /// The cached session; fails if validation has not been run on this forest.
    pub fn session(&self) -> ApplicationResult<&ValidationSession> {
        self.session.as_ref().ok_or(ApplicationError::ValidationNotRun)
    }

    /// Detail view for one employee from the cached session.
    pub fn employee_details(&self, id: &str) -> ApplicationResult<EmployeeValidation> {
        Ok(self.session()?.employee_details(id)?)
    }
}

//! Roster parsing: CSV text into employee records.
//!
//! Expected layout, one header line then one employee per line:
//!
//! ```text
//! Id,firstName,lastName,salary,managerId
//! 123,Joe,Doe,60000,
//! 124,Martin,Chekov,45000,123
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Employee;

pub const ROSTER_HEADER: &str = "Id,firstName,lastName,salary,managerId";

const FIELD_COUNT: usize = 5;

/// Parser behaviour, usually taken from [`crate::config::RosterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOptions {
    /// First line must start with [`ROSTER_HEADER`]
    pub require_header: bool,
    /// Skip malformed rows with a warning instead of failing
    pub skip_malformed_rows: bool,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            require_header: true,
            skip_malformed_rows: true,
        }
    }
}

/// A data row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the input
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// Parsed roster: records in input order plus whatever was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub employees: Vec<Employee>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse roster content.
pub fn parse_roster(content: &str, options: &RosterOptions) -> ApplicationResult<Roster> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut roster = Roster::default();

    if options.require_header {
        let header = lines.next().map(|(_, l)| l.trim_start_matches('\u{feff}'));
        if !header.is_some_and(|h| h.trim().starts_with(ROSTER_HEADER)) {
            return Err(ApplicationError::InvalidRoster {
                line: 1,
                message: format!("expected header: {}", ROSTER_HEADER),
            });
        }
    }

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(employee) => roster.employees.push(employee),
            Err(reason) if options.skip_malformed_rows => {
                warn!("skipping line {}: {} ({})", line_no, line, reason);
                roster.skipped.push(SkippedRow {
                    line: line_no,
                    content: line.to_string(),
                    reason,
                });
            }
            Err(reason) => {
                return Err(ApplicationError::InvalidRoster {
                    line: line_no,
                    message: reason,
                })
            }
        }
    }

    debug!(
        "parsed roster: {} employees, {} skipped",
        roster.employees.len(),
        roster.skipped.len()
    );
    Ok(roster)
}

/// Parse one data row. Empty fields are kept so a trailing `,` means "no manager".
fn parse_row(line: &str) -> Result<Employee, String> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != FIELD_COUNT {
        return Err(format!(
            "expected {} fields, got {}",
            FIELD_COUNT,
            parts.len()
        ));
    }

    let id = parts[0];
    if id.is_empty() {
        return Err("empty employee id".to_string());
    }
    let salary: f64 = parts[3]
        .parse()
        .map_err(|_| format!("invalid salary: {:?}", parts[3]))?;
    if !salary.is_finite() || salary < 0.0 {
        return Err(format!("salary must be a non-negative number: {}", parts[3]));
    }

    Ok(Employee::new(id, parts[1], parts[2], salary, Some(parts[4])))
}

//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// One employee record as supplied by the roster.
///
/// Immutable after construction; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    id: String,
    first_name: String,
    last_name: String,
    salary: f64,
    manager_id: Option<String>,
}

impl Employee {
    /// Create a record. An empty (or whitespace-only) manager id means "no manager".
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: f64,
        manager_id: Option<&str>,
    ) -> Self {
        let manager_id = manager_id
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            salary,
            manager_id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn manager_id(&self) -> Option<&str> {
        self.manager_id.as_deref()
    }

    /// `First Last`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (ID: {})", self.first_name, self.last_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_manager_id_when_creating_then_has_no_manager() {
        let e = Employee::new("1", "Joe", "Doe", 60000.0, Some(""));
        assert_eq!(e.manager_id(), None);

        let e = Employee::new("1", "Joe", "Doe", 60000.0, Some("   "));
        assert_eq!(e.manager_id(), None);
    }

    #[test]
    fn given_manager_id_when_creating_then_keeps_it() {
        let e = Employee::new("2", "Ann", "Smith", 40000.0, Some("1"));
        assert_eq!(e.manager_id(), Some("1"));
        assert_eq!(e.full_name(), "Ann Smith");
        assert_eq!(e.to_string(), "Ann Smith (ID: 2)");
    }
}

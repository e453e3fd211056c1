//! End-to-end tests for command dispatch and exit codes

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use orgtree::cli::{execute_command, Cli};
use orgtree::exitcode;
use orgtree::util::testing::init_test_setup;

const VALID: &str = "\
Id,firstName,lastName,salary,managerId
1,Joe,Doe,60000,
2,Ann,Lee,40000,1
3,Bob,Ray,50000,1
";

const UNDERPAID: &str = "\
Id,firstName,lastName,salary,managerId
1,Joe,Doe,50000,
2,Ann,Lee,40000,1
3,Bob,Ray,50000,1
";

fn setup(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("staff.csv");
    std::fs::write(&path, content).unwrap();
    (temp, path)
}

/// Run with the temp dir as config dir so no stray local config is picked up.
fn run(dir: &Path, args: &[&str]) -> Result<i32, orgtree::cli::CliError> {
    let dir = dir.to_string_lossy().to_string();
    let mut argv = vec!["orgtree", "-C", dir.as_str()];
    argv.extend_from_slice(args);
    execute_command(&Cli::parse_from(argv))
}

#[test]
fn given_clean_roster_when_validating_with_check_then_exit_ok() {
    init_test_setup();
    let (temp, path) = setup(VALID);
    let file = path.to_string_lossy().to_string();

    let code = run(temp.path(), &["validate", &file, "--check"]).unwrap();

    assert_eq!(code, exitcode::OK);
}

#[test]
fn given_violations_when_validating_with_check_then_exit_violations() {
    init_test_setup();
    let (temp, path) = setup(UNDERPAID);
    let file = path.to_string_lossy().to_string();

    let code = run(temp.path(), &["validate", &file, "--check"]).unwrap();

    assert_eq!(code, exitcode::VIOLATIONS);
}

#[test]
fn given_violations_when_validating_without_check_then_exit_ok() {
    init_test_setup();
    let (temp, path) = setup(UNDERPAID);
    let file = path.to_string_lossy().to_string();

    assert_eq!(run(temp.path(), &["validate", &file]).unwrap(), exitcode::OK);
    assert_eq!(run(temp.path(), &["report", &file]).unwrap(), exitcode::OK);
    assert_eq!(run(temp.path(), &["tree", &file]).unwrap(), exitcode::OK);
}

#[test]
fn given_known_employee_when_showing_and_listing_then_ok() {
    init_test_setup();
    let (temp, path) = setup(VALID);
    let file = path.to_string_lossy().to_string();

    assert_eq!(run(temp.path(), &["show", &file, "1"]).unwrap(), exitcode::OK);
    assert_eq!(
        run(temp.path(), &["reports", &file, "1", "--all"]).unwrap(),
        exitcode::OK
    );
}

#[test]
fn given_unknown_employee_when_showing_then_dataerr() {
    init_test_setup();
    let (temp, path) = setup(VALID);
    let file = path.to_string_lossy().to_string();

    let err = run(temp.path(), &["show", &file, "42"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);

    let err = run(temp.path(), &["reports", &file, "42"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_header_when_loading_then_dataerr() {
    init_test_setup();
    let (temp, path) = setup("1,Joe,Doe,60000,\n");
    let file = path.to_string_lossy().to_string();

    let err = run(temp.path(), &["tree", &file]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_local_config_rejecting_duplicates_when_loading_duplicates_then_dataerr() {
    init_test_setup();
    // Arrange
    let (temp, path) = setup(
        "Id,firstName,lastName,salary,managerId\n1,Joe,Doe,1,\n1,Ann,Lee,2,\n",
    );
    std::fs::write(
        temp.path().join(".orgtree.toml"),
        "[tree]\nduplicate_ids = \"reject\"\n",
    )
    .unwrap();
    let file = path.to_string_lossy().to_string();

    // Act
    let err = run(temp.path(), &["tree", &file]).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(err.to_string(), "duplicate employee id: 1");
}

#[test]
fn given_no_local_config_when_initialising_then_creates_then_refuses_overwrite() {
    init_test_setup();
    let temp = TempDir::new().unwrap();

    let code = run(temp.path(), &["config", "init"]).unwrap();
    assert_eq!(code, exitcode::OK);
    assert!(temp.path().join(".orgtree.toml").exists());

    let err = run(temp.path(), &["config", "init"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::CANTCREAT);
}

#[test]
fn given_missing_roster_when_validating_then_noinput() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("nope.csv").to_string_lossy().to_string();

    let err = run(temp.path(), &["validate", &file]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

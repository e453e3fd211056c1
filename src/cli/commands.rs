//! Command execution
//!
//! Each command loads settings, builds a directory service from the
//! container and prints through [`output`]. The returned value is the
//! process exit code.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{DirectoryService, LoadReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::report::{self, ViolationSummary};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, OrgForest, ValidationSession};
use crate::exitcode;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, ServiceContainer};

/// Dispatch the parsed command line; returns the exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let config_dir = resolve_config_dir(cli)?;

    match &cli.command {
        Some(Commands::Config { command }) => cmd_config(&config_dir, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(command) => {
            let settings = Settings::load(Some(&config_dir))?;
            debug!("settings: {:?}", settings);
            let container = ServiceContainer::new(settings);
            execute_roster_command(&container, command)
        }
        None => Err(CliError::Usage(
            "no command given, see `orgtree --help`".to_string(),
        )),
    }
}

fn resolve_config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine working directory", e).into()),
    }
}

fn execute_roster_command(container: &ServiceContainer, command: &Commands) -> CliResult<i32> {
    match command {
        Commands::Report { file } => cmd_report(container, file),
        Commands::Tree { file } => cmd_tree(container, file),
        Commands::Validate { file, check } => cmd_validate(container, file, *check),
        Commands::Reports { file, id, all } => cmd_reports(container, file, id, *all),
        Commands::Show { file, id } => cmd_show(container, file, id),
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "command does not read a roster".to_string(),
        )),
    }
}

// ============================================================
// Roster commands
// ============================================================

/// Load the roster and surface everything that was repaired on the way in.
fn load_directory(container: &ServiceContainer, file: &Path) -> CliResult<DirectoryService> {
    let mut service = container.directory_service();
    let load = service.load_file(file)?;
    print_load_warnings(&load, &service.forest());
    Ok(service)
}

fn print_load_warnings(load: &LoadReport, forest: &OrgForest) {
    for row in &load.skipped {
        output::warning(&format!(
            "skipped line {}: {} ({})",
            row.line, row.reason, row.content
        ));
    }
    for id in forest.duplicate_ids() {
        output::warning(&format!("duplicate employee id {}: later record kept", id));
    }
    for promoted in forest.promoted_roots() {
        output::warning(&format!(
            "employee {} treated as top-level: {}",
            promoted.employee_id, promoted.reason
        ));
    }
}

#[instrument(skip(container))]
fn cmd_report(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let mut service = load_directory(container, file)?;
    if container.settings.output.show_tree {
        print_tree(&service.forest());
        output::info("");
    }
    let session = service.run_validation();
    print_validation(session);
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let service = load_directory(container, file)?;
    let forest = service.forest();
    print_tree(&forest);
    output::info("");
    output::detail(&format!(
        "{} employees, {} top-level, {} levels",
        forest.total_employee_count(),
        forest.root_node_count(),
        forest.height()
    ));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, file: &Path, check: bool) -> CliResult<i32> {
    let mut service = load_directory(container, file)?;
    let session = service.run_validation();
    print_validation(session);
    if check && session.has_violations() {
        return Ok(exitcode::VIOLATIONS);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_reports(container: &ServiceContainer, file: &Path, id: &str, all: bool) -> CliResult<i32> {
    let service = load_directory(container, file)?;
    let forest = service.forest();
    let manager = forest
        .node_by_id(id)
        .ok_or_else(|| DomainError::UnknownEmployee(id.to_string()))
        .map_err(crate::application::ApplicationError::from)?;

    let reports = match all {
        true => forest.all_subordinates(id),
        false => forest.direct_reports(id),
    };
    let kind = if all { "All" } else { "Direct" };
    output::header(&format!("{} reports of {}", kind, manager.employee));
    if reports.is_empty() {
        output::detail(&"(none)");
    }
    for node in reports {
        output::detail(&report::node_label(&node.employee));
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<i32> {
    let mut service = load_directory(container, file)?;
    service.run_validation();
    let details = service.employee_details(id)?;

    output::header(&format!("Validation details: {}", details.employee));
    output::detail(&format!("Salary: {}", report::money(details.employee.salary())));
    output::detail(&format!("Reporting depth: {}", details.depth));
    if let Some(ctx) = &details.salary {
        output::detail(&format!(
            "Direct reports: {} (average {})",
            ctx.direct_reports.len(),
            report::money(ctx.average)
        ));
        output::detail(&format!(
            "Allowed range: {} - {}",
            report::money(ctx.floor),
            report::money(ctx.ceiling)
        ));
    }
    output::info("");
    for (passed, line) in report::detail_lines(&details) {
        match passed {
            true => output::success_detail(&line),
            false => output::failure(&line),
        }
    }
    Ok(exitcode::OK)
}

fn print_tree(forest: &OrgForest) {
    output::header(&"Organisation");
    if forest.is_empty() {
        output::detail(&"(no employees)");
    }
    for tree in report::render_forest(forest) {
        output::info(tree.trim_end());
    }
}

fn print_validation(session: &ValidationSession) {
    let summary = ViolationSummary::from_session(session);

    output::header(&"Salary validation");
    if summary.salary_ok() {
        output::success(&"All manager salaries are within the allowed range");
    }
    for result in session.salary_violations() {
        output::violation(&report::violation_headline(result));
        output::detail(&report::violation_magnitude(result));
        for line in report::salary_context_lines(session, result) {
            output::detail(&line);
        }
    }
    output::info("");

    output::header(&"Reporting line validation");
    if summary.too_deep == 0 {
        output::success(&"All reporting lines are within the depth limit");
    }
    for result in session.depth_violations() {
        output::violation(&report::violation_headline(result));
        output::detail(&report::violation_magnitude(result));
    }
    output::info("");

    output::header(&"Summary");
    output::detail(&format!("Underpaid managers: {}", summary.underpaid));
    output::detail(&format!("Overpaid managers: {}", summary.overpaid));
    output::detail(&format!("Reporting lines too deep: {}", summary.too_deep));
    output::detail(&format!("Total violations: {}", summary.total()));
}

// ============================================================
// Config and completion
// ============================================================

fn cmd_config(config_dir: &Path, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(config_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let local = local_config_path(config_dir);
            print_config_path("Global", global_config_path().as_deref());
            print_config_path("Local", Some(&local));
        }
        ConfigCommands::Init { global } => {
            let path = match global {
                true => global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?,
                false => local_config_path(config_dir),
            };
            init_config(&path)?;
            output::action("Created", &path.display());
        }
    }
    Ok(exitcode::OK)
}

fn print_config_path(label: &str, path: Option<&Path>) {
    match path {
        Some(p) if p.exists() => output::action(label, &p.display()),
        Some(p) => output::detail(&format!("{}: {} (not found)", label, p.display())),
        None => output::detail(&format!("{}: (unavailable)", label)),
    }
}

fn init_config(path: &Path) -> CliResult<()> {
    let fs = RealFileSystem;
    if fs.exists(path) {
        return Err(InfraError::AlreadyExists(path.to_path_buf()).into());
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io_at("create parent of", path, e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io_at("write", path, e))?;
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(exitcode::OK)
}

//! Command dispatch
//!
//! Loads settings and credentials once, wires the service container and
//! renders service results on the terminal.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{BatchEntry, BatchSummary, CredentialLoader, ReportService};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{optional, AdminRecord, ProvisionOutcome};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::InfraError;

pub const PROMPT_CSV_PATH: &str = "Enter the full path to the CSV file:";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Create) => {
            let container = build_container(cli)?;
            run_create(&container)
        }
        Some(Commands::BulkCreate { csv }) => {
            let container = build_container(cli)?;
            run_bulk_create(&container, csv.as_deref())
        }
        Some(Commands::Report { output }) => {
            let container = build_container(cli)?;
            run_report(&container, output.as_deref())
        }
        Some(Commands::Config { command }) => run_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given (try --help)".to_string(),
        )),
    }
}

/// Settings with the `--credentials` override applied.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load()?;
    if let Some(path) = &cli.credentials {
        settings.credentials_file = path.clone();
    }
    Ok(settings)
}

/// Credentials are loaded here, before any remote call; failures abort the command.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli)?;
    let loader = CredentialLoader::new(Arc::new(RealFileSystem));
    let credentials = loader.load(&settings.credentials_file)?;
    debug!("credentials: {:?}", credentials);
    Ok(ServiceContainer::new(settings, credentials)?)
}

#[instrument(skip(container))]
pub fn run_create(container: &ServiceContainer) -> CliResult<()> {
    let attempts = container.interactive().run(print_outcome)?;
    debug!("interactive session finished after {} attempts", attempts);
    Ok(())
}

#[instrument(skip(container))]
pub fn run_bulk_create(container: &ServiceContainer, csv: Option<&Path>) -> CliResult<()> {
    let csv = match csv {
        Some(path) => path.to_path_buf(),
        None => prompt_csv_path(container)?,
    };

    output::header(&format!("Creating admins from {}", csv.display()));
    let summary = container.batch().run_file(&csv, |entry| match entry {
        BatchEntry::Provisioned {
            row,
            record,
            outcome,
        } => {
            output::detail(&format!("row {row}:"));
            print_outcome(record, outcome);
        }
        BatchEntry::Skipped { error, .. } => output::failure(&format!("Skipped {error}")),
    })?;
    print_summary(&summary);
    Ok(())
}

fn prompt_csv_path(container: &ServiceContainer) -> CliResult<PathBuf> {
    let answer = container
        .prompter
        .ask(PROMPT_CSV_PATH)
        .map_err(|e| InfraError::io("read CSV path", e))?;
    optional(answer.as_deref())
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage("no CSV file given".to_string()))
}

#[instrument(skip(container))]
pub fn run_report(container: &ServiceContainer, output_file: Option<&Path>) -> CliResult<()> {
    output::status("Report of all users and associated phones:");
    let rows = container.reporter().rows()?;

    match output_file {
        Some(path) => {
            let file = container
                .fs
                .create(path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            ReportService::write_csv(&rows, file)?;
            output::status(&format!("Wrote {} rows to {}", rows.len(), path.display()));
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            ReportService::write_csv(&rows, &mut lock)?;
            lock.flush().map_err(|e| InfraError::io("flush stdout", e))?;
        }
    }
    Ok(())
}

fn run_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let settings = load_settings(cli)?;
            match global_config_path() {
                Some(path) => output::info(&format!("config:      {}", path.display())),
                None => output::warning("cannot determine config directory"),
            }
            output::info(&format!(
                "credentials: {}",
                settings.credentials_file.display()
            ));
        }
    }
    Ok(())
}

/// One outcome line naming the record and, where present, the admin id.
fn print_outcome(record: &AdminRecord, outcome: &ProvisionOutcome) {
    match outcome {
        ProvisionOutcome::Created(admin_id) => output::success(&format!(
            "Created admin {} <{}> with role {}; activation email sent (admin_id: {})",
            record.name, record.email, record.role, admin_id
        )),
        ProvisionOutcome::CreateFailed { reason } => output::failure(&format!(
            "Error creating admin {} <{}>: {}",
            record.name, record.email, reason
        )),
        ProvisionOutcome::ActivationFailed { admin_id, reason } => output::attention(&format!(
            "Created admin {} <{}> (admin_id: {}) but activation email failed: {}",
            record.name, record.email, admin_id, reason
        )),
    }
}

fn print_summary(summary: &BatchSummary) {
    output::header(&format!("Processed {} rows", summary.total()));
    output::detail(&format!("created:           {}", summary.created));
    output::detail(&format!("create failed:     {}", summary.create_failed));
    output::detail(&format!("activation failed: {}", summary.activation_failed));
    output::detail(&format!("skipped:           {}", summary.skipped));
    if summary.activation_failed > 0 {
        output::warning("some admins exist without an activation email; resend manually");
    }
}

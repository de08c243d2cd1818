//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Duo Admin API helper: provision admins, send activation emails, report user phones
#[derive(Parser, Debug)]
#[command(name = "duo-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Credentials JSON file (ikey, skey, host); overrides config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create admins interactively, one prompt round per admin
    Create,

    /// Create admins from a CSV file (columns: Email, Name, Role, optional Phone)
    BulkCreate {
        /// CSV file (prompted for when omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
    },

    /// Print a CSV report of users and their phones
    Report {
        /// Write the CSV to this file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}

//! duo-admin: provision Duo admins and report user phones via the Admin API.
//!
//! Layers, innermost first:
//! - `domain`: records, outcomes, report rows
//! - `application`: credential loading, provisioning, batch/interactive drivers, reporter
//! - `infrastructure`: I/O boundary traits, the signed HTTP client, DI container
//! - `cli`: argument parsing, dispatch, terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

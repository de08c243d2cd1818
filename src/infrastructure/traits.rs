//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use crate::application::ApplicationResult;
use crate::domain::{AdminId, AdminRecord, User};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Open a file for streaming reads.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Create (or truncate) a file for writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Line-oriented prompt abstraction for interactive input.
pub trait Prompter: Send + Sync {
    /// Show `prompt` and read one line.
    /// Returns None at end of input.
    fn ask(&self, prompt: &str) -> io::Result<Option<String>>;
}

/// The remote administration API.
///
/// Every call is a single attempt; errors come back as
/// `RemoteCreate`, `RemoteActivation` or `RemoteList`.
pub trait AdminApi: Send + Sync {
    /// Create an admin and return its id.
    fn create_admin(&self, record: &AdminRecord) -> ApplicationResult<AdminId>;

    /// Send the activation-link email for a freshly created admin.
    fn send_activation_email(&self, admin_id: &AdminId) -> ApplicationResult<()>;

    /// Fetch all users with their phones, draining pagination.
    fn list_users_with_phones(&self) -> ApplicationResult<Vec<User>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(io::BufReader::new(std::fs::File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(io::BufWriter::new(std::fs::File::create(path)?)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Real prompter reading from stdin, prompting on stdout.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&self, prompt: &str) -> io::Result<Option<String>> {
        use colored::Colorize;

        print!("{} ", prompt.cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

//! Bulk admin creation from CSV
//!
//! Header names are matched exactly: `Email`, `Name`, `Role` and optional `Phone`.
//! Only data values are trimmed, header cells are compared verbatim.
//! A bad row is reported and skipped; it never aborts the file.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, instrument, warn};

use crate::application::services::ProvisioningService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{AdminRecord, DomainError, ProvisionOutcome};
use crate::infrastructure::traits::FileSystem;

pub const EMAIL_COLUMN: &str = "Email";
pub const NAME_COLUMN: &str = "Name";
pub const ROLE_COLUMN: &str = "Role";
pub const PHONE_COLUMN: &str = "Phone";

/// Result for one CSV data row (rows are 1-based, header excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    Provisioned {
        row: usize,
        record: AdminRecord,
        outcome: ProvisionOutcome,
    },
    Skipped {
        row: usize,
        error: DomainError,
    },
}

impl BatchEntry {
    pub fn row(&self) -> usize {
        match self {
            Self::Provisioned { row, .. } | Self::Skipped { row, .. } => *row,
        }
    }
}

/// Per-run tally of batch results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub create_failed: usize,
    pub activation_failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, entry: &BatchEntry) {
        match entry {
            BatchEntry::Provisioned { outcome, .. } => match outcome {
                ProvisionOutcome::Created(_) => self.created += 1,
                ProvisionOutcome::CreateFailed { .. } => self.create_failed += 1,
                ProvisionOutcome::ActivationFailed { .. } => self.activation_failed += 1,
            },
            BatchEntry::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Number of rows that reached the provisioning workflow.
    pub fn provisioned(&self) -> usize {
        self.created + self.create_failed + self.activation_failed
    }

    pub fn total(&self) -> usize {
        self.provisioned() + self.skipped
    }
}

/// Column positions resolved from the header row.
struct Columns {
    email: Option<usize>,
    name: Option<usize>,
    role: Option<usize>,
    phone: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            email: find(EMAIL_COLUMN),
            name: find(NAME_COLUMN),
            role: find(ROLE_COLUMN),
            phone: find(PHONE_COLUMN),
        }
    }

    fn admin_record(&self, row: usize, record: &StringRecord) -> Result<AdminRecord, DomainError> {
        let get = |idx: Option<usize>| idx.and_then(|i| record.get(i));
        AdminRecord::from_fields(
            row,
            get(self.email),
            get(self.name),
            get(self.role),
            get(self.phone),
        )
    }
}

/// Drives the provisioning workflow over every row of a CSV input.
pub struct BatchService {
    fs: Arc<dyn FileSystem>,
    provisioning: ProvisioningService,
}

impl BatchService {
    pub fn new(fs: Arc<dyn FileSystem>, provisioning: ProvisioningService) -> Self {
        Self { fs, provisioning }
    }

    /// Process the CSV file at `path`.
    pub fn run_file<F>(&self, path: &Path, on_entry: F) -> ApplicationResult<BatchSummary>
    where
        F: FnMut(&BatchEntry),
    {
        let input = self
            .fs
            .open(path)
            .with_path_context("open CSV file", path)?;
        self.run(input, on_entry)
    }

    /// Process CSV rows strictly in input order.
    ///
    /// `on_entry` sees every row result as soon as it is known.
    #[instrument(skip_all)]
    pub fn run<R, F>(&self, input: R, mut on_entry: F) -> ApplicationResult<BatchSummary>
    where
        R: Read,
        F: FnMut(&BatchEntry),
    {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Fields)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| csv_failure("read CSV header", e))?
            .clone();
        let columns = Columns::locate(&headers);
        debug!("CSV header: {:?}", headers);

        let mut summary = BatchSummary::default();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let entry = match result {
                Ok(record) => match columns.admin_record(row, &record) {
                    Ok(record) => {
                        let outcome = self.provisioning.provision_one(&record);
                        BatchEntry::Provisioned {
                            row,
                            record,
                            outcome,
                        }
                    }
                    Err(error) => BatchEntry::Skipped { row, error },
                },
                Err(e) if e.is_io_error() => return Err(csv_failure("read CSV row", e)),
                Err(e) => BatchEntry::Skipped {
                    row,
                    error: DomainError::MalformedRow {
                        row,
                        message: e.to_string(),
                    },
                },
            };

            if let BatchEntry::Skipped { error, .. } = &entry {
                warn!("skipping: {}", error);
            }
            summary.record(&entry);
            on_entry(&entry);
        }

        debug!("batch summary: {:?}", summary);
        Ok(summary)
    }
}

fn csv_failure(context: &str, e: csv::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: context.to_string(),
        source: Box::new(e),
    }
}

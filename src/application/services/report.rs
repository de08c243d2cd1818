//! Users and phones report

use std::io::Write;
use std::sync::Arc;

use csv::{Terminator, WriterBuilder};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{flatten_user_phones, UserPhoneRow};
use crate::infrastructure::traits::AdminApi;

/// Builds one CSV row per (user, phone) pair.
pub struct ReportService {
    api: Arc<dyn AdminApi>,
}

impl ReportService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    /// Fetch all users and flatten their phones, keeping remote order.
    #[instrument(skip(self))]
    pub fn rows(&self) -> ApplicationResult<Vec<UserPhoneRow>> {
        let users = self.api.list_users_with_phones()?;
        let rows = flatten_user_phones(&users);
        debug!("{} users -> {} rows", users.len(), rows.len());
        Ok(rows)
    }

    /// Write header and rows as CSV (CRLF records, minimal quoting).
    pub fn write_csv<W: Write>(rows: &[UserPhoneRow], writer: W) -> ApplicationResult<()> {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(writer);

        wtr.write_record(UserPhoneRow::HEADER)
            .map_err(write_failure)?;
        for row in rows {
            wtr.write_record(row.as_record()).map_err(write_failure)?;
        }
        wtr.flush().map_err(|e| ApplicationError::OperationFailed {
            context: "flush report".to_string(),
            source: Box::new(e),
        })
    }
}

fn write_failure(e: csv::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "write report row".to_string(),
        source: Box::new(e),
    }
}

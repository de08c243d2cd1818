//! Admin provisioning workflow
//!
//! One record: create the admin, then send the activation email.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::ApplicationError;
use crate::domain::{AdminRecord, ProvisionOutcome};
use crate::infrastructure::traits::AdminApi;

/// Service turning an `AdminRecord` into a `ProvisionOutcome`.
#[derive(Clone)]
pub struct ProvisioningService {
    api: Arc<dyn AdminApi>,
}

impl ProvisioningService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    /// Create one admin and trigger its activation email.
    ///
    /// Never fails: remote errors become `CreateFailed` or `ActivationFailed`.
    /// Activation is only attempted when creation returned an id.
    #[instrument(skip(self, record), fields(email = %record.email))]
    pub fn provision_one(&self, record: &AdminRecord) -> ProvisionOutcome {
        let admin_id = match self.api.create_admin(record) {
            Ok(id) => id,
            Err(e) => {
                warn!("create failed for {}: {}", record.email, e);
                return ProvisionOutcome::CreateFailed {
                    reason: reason_of(e),
                };
            }
        };
        info!("created admin {} ({})", record.name, admin_id);

        match self.api.send_activation_email(&admin_id) {
            Ok(()) => ProvisionOutcome::Created(admin_id),
            Err(e) => {
                warn!("activation failed for {}: {}", admin_id, e);
                ProvisionOutcome::ActivationFailed {
                    admin_id,
                    reason: reason_of(e),
                }
            }
        }
    }
}

/// Strip the variant prefix from remote errors, keep everything else verbatim.
fn reason_of(err: ApplicationError) -> String {
    match err {
        ApplicationError::RemoteCreate { reason }
        | ApplicationError::RemoteActivation { reason, .. }
        | ApplicationError::RemoteList { reason } => reason,
        other => other.to_string(),
    }
}

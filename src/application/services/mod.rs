//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Prompter, AdminApi)
//! but are themselves concrete structs, not traits.

mod batch;
mod credentials;
mod interactive;
mod provisioning;
mod report;

pub use batch::{
    BatchEntry, BatchService, BatchSummary, EMAIL_COLUMN, NAME_COLUMN, PHONE_COLUMN, ROLE_COLUMN,
};
pub use credentials::CredentialLoader;
pub use interactive::{
    wants_another, InteractiveService, PROMPT_ANOTHER, PROMPT_EMAIL, PROMPT_NAME, PROMPT_PHONE,
    PROMPT_ROLE,
};
pub use provisioning::ProvisioningService;
pub use report::ReportService;

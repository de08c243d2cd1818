//! Duo Admin API binding of the `AdminApi` boundary trait

mod client;
pub mod signing;

pub use client::{
    activation_email_path, DuoAdminClient, ADMINS_PATH, MAX_PAGE_LIMIT, PLACEHOLDER_PASSWORD,
    USERS_PATH,
};

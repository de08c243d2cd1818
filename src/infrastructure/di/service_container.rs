//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    BatchService, InteractiveService, ProvisioningService, ReportService,
};
use crate::config::Settings;
use crate::domain::Credentials;
use crate::infrastructure::duo::DuoAdminClient;
use crate::infrastructure::traits::{
    AdminApi, FileSystem, Prompter, RealFileSystem, StdinPrompter,
};
use crate::infrastructure::InfraResult;

/// Container holding the boundary implementations every service needs.
///
/// Built once per process after settings and credentials are loaded.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive input
    pub prompter: Arc<dyn Prompter>,

    /// Remote administration API
    pub api: Arc<dyn AdminApi>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, credentials: Credentials) -> InfraResult<Self> {
        let api = DuoAdminClient::new(credentials, settings.page_limit)?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(StdinPrompter),
            Arc::new(api),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompter: Arc<dyn Prompter>,
        api: Arc<dyn AdminApi>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            prompter,
            api,
        }
    }

    pub fn provisioning(&self) -> ProvisioningService {
        ProvisioningService::new(self.api.clone())
    }

    pub fn batch(&self) -> BatchService {
        BatchService::new(self.fs.clone(), self.provisioning())
    }

    pub fn interactive(&self) -> InteractiveService {
        InteractiveService::new(self.prompter.clone(), self.provisioning())
    }

    pub fn reporter(&self) -> ReportService {
        ReportService::new(self.api.clone())
    }
}

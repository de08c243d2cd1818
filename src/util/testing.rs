//! Test support: logging setup and in-memory boundary doubles

use std::collections::VecDeque;
use std::env;
use std::io;
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{AdminId, AdminRecord, User};
use crate::infrastructure::traits::{AdminApi, Prompter};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["hyper", "reqwest", "rustls", "wiremock"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// A call observed by `FakeAdminApi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateAdmin(AdminRecord),
    SendActivationEmail(AdminId),
    ListUsers,
}

/// In-memory `AdminApi` that records calls and fails on request.
///
/// Created admins get ids `ADMIN1`, `ADMIN2`, ... in call order.
#[derive(Debug, Default)]
pub struct FakeAdminApi {
    /// Every call observed, in order
    pub calls: Mutex<Vec<ApiCall>>,
    /// Emails whose creation fails
    pub fail_create_for: Vec<String>,
    /// Admin ids whose activation fails
    pub fail_activation_for: Vec<String>,
    /// Users returned by `list_users_with_phones`
    pub users: Vec<User>,
    /// When set, listing fails with this reason
    pub fail_list: Option<String>,
}

impl FakeAdminApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::CreateAdmin(_)))
    }

    pub fn activation_calls(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::SendActivationEmail(_)))
    }

    fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: ApiCall) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }
}

impl AdminApi for FakeAdminApi {
    fn create_admin(&self, record: &AdminRecord) -> ApplicationResult<AdminId> {
        self.push(ApiCall::CreateAdmin(record.clone()));
        if self.fail_create_for.contains(&record.email) {
            return Err(ApplicationError::RemoteCreate {
                reason: format!("40003: duplicate email {}", record.email),
            });
        }
        Ok(AdminId::new(format!("ADMIN{}", self.create_calls())))
    }

    fn send_activation_email(&self, admin_id: &AdminId) -> ApplicationResult<()> {
        self.push(ApiCall::SendActivationEmail(admin_id.clone()));
        if self
            .fail_activation_for
            .iter()
            .any(|id| id == admin_id.as_str())
        {
            return Err(ApplicationError::RemoteActivation {
                admin_id: admin_id.clone(),
                reason: "smtp unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn list_users_with_phones(&self) -> ApplicationResult<Vec<User>> {
        self.push(ApiCall::ListUsers);
        match &self.fail_list {
            Some(reason) => Err(ApplicationError::RemoteList {
                reason: reason.clone(),
            }),
            None => Ok(self.users.clone()),
        }
    }
}

/// `Prompter` answering from a fixed script; EOF once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answers.lock().unwrap().pop_front())
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_script_when_exhausted_then_returns_none() {
        let prompter = ScriptedPrompter::new(["one"]);
        assert_eq!(prompter.ask("a").unwrap(), Some("one".to_string()));
        assert_eq!(prompter.ask("b").unwrap(), None);
        assert_eq!(prompter.prompts(), vec!["a", "b"]);
    }
}

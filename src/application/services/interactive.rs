//! Interactive admin creation loop

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::ProvisioningService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{optional, AdminRecord, ProvisionOutcome};
use crate::infrastructure::traits::Prompter;

pub const PROMPT_EMAIL: &str = "Enter admin email:";
pub const PROMPT_NAME: &str = "Enter admin name:";
pub const PROMPT_ROLE: &str = "Enter admin role:";
pub const PROMPT_PHONE: &str = "Enter admin phone (optional, press Enter to skip):";
pub const PROMPT_ANOTHER: &str = "Do you want to create another admin? (yes/no):";

/// Only an explicit "yes" (any case) continues the loop.
pub fn wants_another(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Prompts for one record at a time and provisions it.
pub struct InteractiveService {
    prompter: Arc<dyn Prompter>,
    provisioning: ProvisioningService,
}

impl InteractiveService {
    pub fn new(prompter: Arc<dyn Prompter>, provisioning: ProvisioningService) -> Self {
        Self {
            prompter,
            provisioning,
        }
    }

    /// Run until the operator declines to continue or input ends.
    ///
    /// Returns the number of provisioning attempts.
    #[instrument(skip_all)]
    pub fn run<F>(&self, mut on_outcome: F) -> ApplicationResult<usize>
    where
        F: FnMut(&AdminRecord, &ProvisionOutcome),
    {
        let mut attempts = 0;
        loop {
            let Some(record) = self.read_record()? else {
                debug!("input closed while reading record");
                break;
            };

            let outcome = self.provisioning.provision_one(&record);
            attempts += 1;
            on_outcome(&record, &outcome);

            let another = self.ask(PROMPT_ANOTHER)?;
            if !another.as_deref().is_some_and(wants_another) {
                break;
            }
        }
        Ok(attempts)
    }

    /// Collect one record; None when input ends first.
    fn read_record(&self) -> ApplicationResult<Option<AdminRecord>> {
        let Some(email) = self.ask_required(PROMPT_EMAIL)? else {
            return Ok(None);
        };
        let Some(name) = self.ask_required(PROMPT_NAME)? else {
            return Ok(None);
        };
        let Some(role) = self.ask_required(PROMPT_ROLE)? else {
            return Ok(None);
        };
        let Some(phone) = self.ask(PROMPT_PHONE)? else {
            return Ok(None);
        };

        Ok(Some(AdminRecord {
            email,
            name,
            role,
            phone: optional(Some(&phone)),
        }))
    }

    /// Re-ask until a non-blank answer arrives.
    fn ask_required(&self, prompt: &str) -> ApplicationResult<Option<String>> {
        loop {
            match self.ask(prompt)? {
                None => return Ok(None),
                Some(answer) => {
                    if let Some(value) = optional(Some(&answer)) {
                        return Ok(Some(value));
                    }
                }
            }
        }
    }

    fn ask(&self, prompt: &str) -> ApplicationResult<Option<String>> {
        self.prompter
            .ask(prompt)
            .map_err(|e| ApplicationError::OperationFailed {
                context: "read interactive input".to_string(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("yes", true)]
    #[case("YES", true)]
    #[case("  Yes \n", true)]
    #[case("y", false)]
    #[case("no", false)]
    #[case("", false)]
    fn given_answer_when_checking_continuation_then_only_yes_continues(
        #[case] answer: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(wants_another(answer), expected);
    }
}

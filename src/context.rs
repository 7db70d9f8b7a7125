//! Everything a core operation needs from the outside world, built once in
//! `main` and passed down explicitly.

use chrono::{DateTime, Utc};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode};

use crate::error::{Error, Result};
use crate::paths::Paths;
use crate::ui::Sink;

/// Environment variable that overrides the saved Z.AI token
pub const TOKEN_ENV_VAR: &str = "ZAI_AUTH_TOKEN";

pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

pub trait Prompter {
    /// Ask for a secret. `Ok(None)` means the user declined.
    fn secret(&self, message: &str) -> Result<Option<String>>;

    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Interactive terminal prompts
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn secret(&self, message: &str) -> Result<Option<String>> {
        let answer = Password::new(message)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt();

        match answer {
            Ok(token) => Ok(Some(token)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(Error::Prompt {
                message: e.to_string(),
            }),
        }
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        match Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(Error::Prompt {
                message: e.to_string(),
            }),
        }
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Injected collaborators for one invocation
pub struct Context<'a> {
    pub paths: &'a Paths,
    pub env: &'a dyn EnvSource,
    pub prompter: &'a dyn Prompter,
    pub clock: &'a dyn Clock,
    pub sink: &'a dyn Sink,
    /// Recorded in backup metadata
    pub version: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(
        paths: &'a Paths,
        env: &'a dyn EnvSource,
        prompter: &'a dyn Prompter,
        clock: &'a dyn Clock,
        sink: &'a dyn Sink,
    ) -> Self {
        Self {
            paths,
            env,
            prompter,
            clock,
            sink,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_process_env_reads_var() {
        unsafe { std::env::set_var("CLAUDE_SWITCH_TEST_VAR", "value") };
        assert_eq!(ProcessEnv.var("CLAUDE_SWITCH_TEST_VAR").as_deref(), Some("value"));

        unsafe { std::env::remove_var("CLAUDE_SWITCH_TEST_VAR") };
        assert_eq!(ProcessEnv.var("CLAUDE_SWITCH_TEST_VAR"), None);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let before = Utc::now();
        assert!(SystemClock.now() >= before);
    }
}

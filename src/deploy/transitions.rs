// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::environment::{EnvironmentChecker, EnvironmentError};
use crate::report::Reporter;
use crate::runner::CommandRunner;
use crate::validate::{self, ConfigError};

use super::Deployment;
use super::state::{Ready, Unvalidated, Validated};

/// Result type for transitions that hand the previous state back on failure.
pub type TransitionResult<T, S, E> = Result<Deployment<T>, (Deployment<S>, E)>;

impl Deployment<Unvalidated> {
    /// Validate the raw config. Nothing on disk changes.
    pub fn validate(self) -> TransitionResult<Validated, Unvalidated, ConfigError> {
        match validate::validate(&self.state.config) {
            Ok(config) => Ok(Deployment {
                state: Validated { config },
            }),
            Err(e) => Err((self, e)),
        }
    }
}

impl Deployment<Validated> {
    /// Confirm every tool the validated config needs is installed.
    pub async fn check_environment(
        self,
        runner: &dyn CommandRunner,
        reporter: &mut Reporter,
    ) -> TransitionResult<Ready, Validated, EnvironmentError> {
        match EnvironmentChecker::new(runner)
            .check(&self.state.config, reporter)
            .await
        {
            Ok(environment) => Ok(Deployment {
                state: Ready {
                    config: self.state.config,
                    environment,
                },
            }),
            Err(e) => Err((self, e)),
        }
    }
}

// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::DeploymentConfig;
use crate::environment::EnvironmentReport;
use crate::validate::ValidatedConfig;

use super::state::{Ready, Unvalidated, Validated};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries what has been established so far.
/// Stages can only be run on `Deployment<Ready>`, so a run cannot reach the
/// workspace without a validated config and a checked environment.
#[derive(Debug, Clone)]
pub struct Deployment<S> {
    pub(crate) state: S,
}

impl Deployment<Unvalidated> {
    pub fn new(config: DeploymentConfig) -> Self {
        Deployment {
            state: Unvalidated { config },
        }
    }

    /// The config as written.
    pub fn raw_config(&self) -> &DeploymentConfig {
        &self.state.config
    }
}

impl Deployment<Validated> {
    pub fn config(&self) -> &ValidatedConfig {
        &self.state.config
    }
}

impl Deployment<Ready> {
    pub fn config(&self) -> &ValidatedConfig {
        &self.state.config
    }

    pub fn environment(&self) -> &EnvironmentReport {
        &self.state.environment
    }
}

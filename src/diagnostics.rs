// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during a deployment run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Count warnings of one kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A dependency manifest (composer.json, package.json) is absent.
    pub fn missing_manifest(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingManifest,
            message: message.into(),
        }
    }

    /// A file marked as deleted upstream could not be removed from the target.
    pub fn prune(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Prune,
            message: message.into(),
        }
    }

    /// The workspace could not be removed after the run.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Cleanup,
            message: message.into(),
        }
    }

    /// A notification could not be delivered.
    pub fn notification(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Notification,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Dependency install skipped because its manifest is missing.
    MissingManifest,
    /// Removing a deleted file from the target failed.
    Prune,
    /// Removing the temporary workspace failed.
    Cleanup,
    /// Sending a notification failed.
    Notification,
}

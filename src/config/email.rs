// ABOUTME: Email notification settings.
// ABOUTME: Recipients may be given as a single address or a list.

use serde::Deserialize;

use super::deserialize::deserialize_one_or_many;

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub on_success: bool,

    #[serde(default = "default_on_error")]
    pub on_error: bool,

    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    pub recipients: Vec<String>,
}

impl EmailConfig {
    /// True when any outcome triggers a notification.
    pub fn is_enabled(&self) -> bool {
        self.on_success || self.on_error
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            on_success: false,
            on_error: default_on_error(),
            recipients: Vec::new(),
        }
    }
}

fn default_on_error() -> bool {
    true
}

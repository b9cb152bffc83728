// ABOUTME: Delivers the run transcript to operators when a deployment ends.
// ABOUTME: Delivery problems are reported back to the caller, never raised.

mod error;
mod mailer;

pub use error::NotifyError;
pub use mailer::{Mailer, Notification, SendmailMailer};

use regex::Regex;
use std::sync::LazyLock;

use crate::report::RunTranscript;
use crate::validate::EmailSettings;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s<>]+@[^@\s<>]+\.[^@\s<>.]+$").expect("address pattern is valid")
});

/// True for strings that look like a deliverable mailbox.
pub fn is_plausible_address(address: &str) -> bool {
    ADDRESS.is_match(address)
}

/// How the run ended, as far as notification is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Error => "ERROR",
        }
    }
}

/// What happened to each recipient.
#[derive(Debug, Default)]
pub struct NotifyReport {
    pub sent: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<(String, NotifyError)>,
}

impl NotifyReport {
    /// One warning message per skipped or failed recipient.
    pub fn problems(&self) -> Vec<String> {
        let skipped = self
            .skipped
            .iter()
            .map(|r| format!("not notifying `{r}`: not a valid email address"));
        let failed = self
            .failures
            .iter()
            .map(|(r, e)| format!("could not notify {r}: {e}"));
        skipped.chain(failed).collect()
    }
}

pub struct Notifier<M> {
    mailer: M,
    host: String,
}

impl<M: Mailer> Notifier<M> {
    /// A notifier that names this machine in the subject line.
    pub fn new(mailer: M) -> Self {
        let host = gethostname::gethostname().to_string_lossy().into_owned();
        Self { mailer, host }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Send `transcript` to every recipient if `settings` asks for `outcome`.
    ///
    /// Returns `None` when nothing was attempted.
    pub async fn notify(
        &self,
        transcript: &RunTranscript,
        outcome: Outcome,
        settings: &EmailSettings,
    ) -> Option<NotifyReport> {
        let wanted = match outcome {
            Outcome::Success => settings.on_success,
            Outcome::Error => settings.on_error,
        };
        if !wanted {
            return None;
        }
        let recipients = settings.recipients.as_ref()?;

        let subject = format!("gitship {} on {}", outcome.label(), self.host);
        let headers = priority_headers(outcome);
        let body = transcript.render();

        let mut report = NotifyReport::default();
        for recipient in recipients.iter() {
            if !is_plausible_address(recipient) {
                tracing::warn!(%recipient, "skipping implausible recipient");
                report.skipped.push(recipient.clone());
                continue;
            }
            let notification = Notification {
                to: recipient.clone(),
                subject: subject.clone(),
                headers: headers.clone(),
                body: body.clone(),
            };
            match self.mailer.send(&notification).await {
                Ok(()) => {
                    tracing::info!(%recipient, "sent notification");
                    report.sent.push(recipient.clone());
                }
                Err(e) => {
                    tracing::warn!(%recipient, error = %e, "notification failed");
                    report.failures.push((recipient.clone(), e));
                }
            }
        }
        Some(report)
    }
}

fn priority_headers(outcome: Outcome) -> Vec<(String, String)> {
    match outcome {
        Outcome::Success => Vec::new(),
        Outcome::Error => vec![
            ("X-Priority".to_string(), "1 (Highest)".to_string()),
            ("X-MSMail-Priority".to_string(), "High".to_string()),
            ("Importance".to_string(), "High".to_string()),
        ],
    }
}

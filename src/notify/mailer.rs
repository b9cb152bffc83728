// ABOUTME: Mail transport seam and the sendmail-backed default.
// ABOUTME: Messages are rendered as plain-text RFC 5322 and piped to `sendmail -t -i`.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

use super::NotifyError;

/// One message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Notification {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Full message text, headers first.
    pub fn render(&self) -> String {
        let mut message = String::new();
        message.push_str(&format!("To: {}\n", self.to));
        message.push_str(&format!("Subject: {}\n", self.subject));
        message.push_str(&format!("Date: {}\n", chrono::Local::now().to_rfc2822()));
        message.push_str("MIME-Version: 1.0\n");
        message.push_str("Content-Type: text/plain; charset=UTF-8\n");
        for (name, value) in &self.headers {
            message.push_str(&format!("{name}: {value}\n"));
        }
        message.push('\n');
        message.push_str(&self.body);
        if !self.body.ends_with('\n') {
            message.push('\n');
        }
        message
    }
}

/// Delivers notifications.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Hands messages to the local MTA.
#[derive(Debug, Clone)]
pub struct SendmailMailer {
    program: String,
    timeout: Option<Duration>,
}

impl SendmailMailer {
    pub fn new() -> Self {
        Self::with_program("sendmail")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Give up on (and kill) a transport that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn deliver(&self, mut child: Child, message: String) -> Result<(), NotifyError> {
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(message.as_bytes()).await {
                Ok(()) => {}
                // The exit status below says why the transport stopped reading.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(source) => {
                    return Err(NotifyError::Write {
                        program: self.program.clone(),
                        source,
                    });
                }
            }
            // Closing stdin ends the message.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| NotifyError::Write {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "mail transport rejected message"
            );
            return Err(NotifyError::Rejected {
                program: self.program.clone(),
                status: output.status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

impl Default for SendmailMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for SendmailMailer {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let child = Command::new(&self.program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let delivery = self.deliver(child, notification.render());
        match self.timeout {
            // Dropping the delivery kills the child.
            Some(limit) => tokio::time::timeout(limit, delivery).await.map_err(|_| {
                NotifyError::TimedOut {
                    program: self.program.clone(),
                    limit,
                }
            })?,
            None => delivery.await,
        }
    }
}

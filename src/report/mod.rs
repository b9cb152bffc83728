// ABOUTME: Run reporter: records the transcript and mirrors it to live output.
// ABOUTME: The transcript is handed to the notifier when the run ends.

mod transcript;

pub use transcript::{RunTranscript, TranscriptLine};

use crate::diagnostics::{Diagnostics, Warning};
use crate::output::{Output, OutputMode};
use crate::runner::CommandSpec;

/// Owns the transcript for one run and forwards every line as it is written.
#[derive(Debug)]
pub struct Reporter {
    transcript: RunTranscript,
    diagnostics: Diagnostics,
    output: Output,
}

impl Reporter {
    pub fn new(output: Output) -> Self {
        Self {
            transcript: RunTranscript::default(),
            diagnostics: Diagnostics::default(),
            output,
        }
    }

    /// A reporter that records but never prints.
    pub fn detached() -> Self {
        Self::new(Output::new(OutputMode::Quiet))
    }

    /// Append text, one transcript line per line of input.
    pub fn line(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.record(text);
            return;
        }
        for line in text.lines() {
            self.record(line.to_string());
        }
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.line(line);
        }
    }

    /// Record the command line about to run.
    pub fn command(&mut self, command: &CommandSpec) {
        self.line(format!("$ {command}"));
    }

    /// Record a non-fatal warning in the transcript and diagnostics.
    pub fn warn(&mut self, warning: Warning) {
        self.output.warning(&warning.message);
        self.transcript.push(format!("Warning: {}", warning.message));
        self.diagnostics.warn(warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.output.error(&message);
        self.transcript.push(format!("Error: {message}"));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.output.success(&message);
        self.transcript.push(message);
    }

    /// The transcript so far.
    pub fn snapshot(&self) -> RunTranscript {
        self.transcript.clone()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn transcript(&self) -> &RunTranscript {
        &self.transcript
    }

    pub fn into_transcript(self) -> RunTranscript {
        self.transcript
    }

    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    fn record(&mut self, text: String) {
        self.output.line(&text);
        self.transcript.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multiline_text() {
        let mut reporter = Reporter::detached();
        reporter.line("Deploying git@github.com:acme/site.git main\nTo /var/www/site");

        let texts: Vec<_> = reporter.transcript().texts().collect();
        assert_eq!(texts, ["Deploying git@github.com:acme/site.git main", "To /var/www/site"]);
    }

    #[test]
    fn blank_line_is_kept() {
        let mut reporter = Reporter::detached();
        reporter.line("");
        assert_eq!(reporter.transcript().len(), 1);
    }

    #[test]
    fn styles_commands_warnings_and_errors() {
        let mut reporter = Reporter::detached();
        reporter.command(&CommandSpec::new("git").args(["submodule", "update"]));
        reporter.warn(Warning::missing_manifest("composer.json does not exist"));
        reporter.error("rsync exited with status 23");

        let texts: Vec<_> = reporter.transcript().texts().collect();
        assert_eq!(
            texts,
            [
                "$ git submodule update",
                "Warning: composer.json does not exist",
                "Error: rsync exited with status 23",
            ]
        );
        assert_eq!(reporter.diagnostics().warnings().len(), 1);
    }

    #[test]
    fn snapshot_is_independent_of_later_writes() {
        let mut reporter = Reporter::detached();
        reporter.line("before");
        let snapshot = reporter.snapshot();
        reporter.line("after");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(reporter.transcript().len(), 2);
    }
}

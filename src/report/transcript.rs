// ABOUTME: Append-only transcript of one deployment run.
// ABOUTME: Timestamped lines in the order they were produced.

use chrono::{DateTime, Local};
use serde::Serialize;

/// One line of the run transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Everything a run wrote, in chronological order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunTranscript {
    lines: Vec<TranscriptLine>,
}

impl RunTranscript {
    pub(crate) fn push(&mut self, text: String) {
        self.lines.push(TranscriptLine {
            at: Local::now(),
            text,
        });
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The text of every line, without timestamps.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    /// True when any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Index of the first line containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.texts().position(|t| t.contains(needle))
    }

    /// Plain-text rendering with a time prefix on every line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&format!("[{}] {}\n", line.at.format("%H:%M:%S"), line.text));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut transcript = RunTranscript::default();
        transcript.push("first".to_string());
        transcript.push("second".to_string());
        transcript.push("third".to_string());

        let texts: Vec<_> = transcript.texts().collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert_eq!(transcript.position("second"), Some(1));
    }

    #[test]
    fn render_prefixes_each_line_with_time() {
        let mut transcript = RunTranscript::default();
        transcript.push("$ git fetch origin main".to_string());
        transcript.push("done".to_string());

        let rendered = transcript.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] $ git fetch origin main"));
    }

    #[test]
    fn empty_transcript() {
        let transcript = RunTranscript::default();
        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "");
        assert!(!transcript.contains("anything"));
    }
}

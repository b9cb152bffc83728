// ABOUTME: Human-readable byte sizes for backup archive reporting.
// ABOUTME: Base-1024 units with two-decimal rounding above one kilobyte.

use std::fmt;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// A byte count that displays as `0 bytes`, `1 byte`, `512 bytes`, `1.50 KB`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        if bytes >= GB {
            write!(f, "{:.2} GB", half_up(bytes, GB))
        } else if bytes >= MB {
            write!(f, "{:.2} MB", half_up(bytes, MB))
        } else if bytes >= KB {
            write!(f, "{:.2} KB", half_up(bytes, KB))
        } else if bytes == 1 {
            write!(f, "1 byte")
        } else {
            write!(f, "{bytes} bytes")
        }
    }
}

/// `bytes / unit` rounded to two decimals, ties away from zero.
fn half_up(bytes: u64, unit: u64) -> f64 {
    (bytes as f64 / unit as f64 * 100.0).round() / 100.0
}

// ABOUTME: Upper bound on how long any single external command may run.
// ABOUTME: Accepts `false`, whole seconds, or a humantime string such as "5m".

use serde::{Deserialize, Deserializer};
use std::time::Duration;

const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

/// Per-command time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLimit {
    Disabled,
    Limit(Duration),
}

impl TimeLimit {
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            TimeLimit::Disabled => None,
            TimeLimit::Limit(d) => Some(*d),
        }
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        TimeLimit::Limit(DEFAULT_TIME_LIMIT)
    }
}

impl<'de> Deserialize<'de> for TimeLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Seconds(u64),
            Human(#[serde(with = "humantime_serde")] Duration),
        }

        match Raw::deserialize(deserializer).map_err(|_| {
            serde::de::Error::custom(
                "time_limit must be false, a number of seconds, or a duration like \"5m\"",
            )
        })? {
            Raw::Flag(false) => Ok(TimeLimit::Disabled),
            Raw::Flag(true) => Err(serde::de::Error::custom(
                "time_limit must be false or a duration, not true",
            )),
            Raw::Seconds(secs) => Ok(TimeLimit::Limit(Duration::from_secs(secs))),
            Raw::Human(d) => Ok(TimeLimit::Limit(d)),
        }
    }
}

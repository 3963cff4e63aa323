use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The outcome of one scripted invocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "reply")]
    Reply(String),
    #[serde(rename = "failure")]
    Failure,
}

/// One scripted invocation: an outcome, optionally delayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetStep {
    /// What this invocation resolves to.
    pub outcome: PresetOutcome,
    /// If set, the invocation resolves only after this delay.
    pub delay: Option<Duration>,
}

impl PresetStep {
    /// Creates a step that replies with the specified text.
    #[inline]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            outcome: PresetOutcome::Reply(text.into()),
            delay: None,
        }
    }

    /// Creates a step that fails.
    #[inline]
    pub fn failure() -> Self {
        Self {
            outcome: PresetOutcome::Failure,
            delay: None,
        }
    }

    /// Delays the outcome by the specified duration.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

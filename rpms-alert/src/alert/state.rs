//! Emergency alert state machine.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Lifecycle of an emergency alert.
///
/// An alert is evaluated once and then either dispatched or suppressed.
/// Both outcomes are terminal so a reading can raise at most one alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertState {
    /// Nothing has been evaluated yet.
    #[default]
    Idle,
    /// The reading was classified but no message has gone out.
    Evaluated,
    /// The reading was abnormal and the alert was dispatched.
    Dispatched,
    /// The reading was normal; nothing was sent.
    Suppressed,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Evaluated => "EVALUATED",
            Self::Dispatched => "DISPATCHED",
            Self::Suppressed => "SUPPRESSED",
        }
    }

    /// Check if the alert has run to completion.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dispatched | Self::Suppressed)
    }

    /// Validate a state transition.
    pub fn can_transition_to(&self, target: AlertState) -> bool {
        use AlertState::*;

        if self.is_terminal() {
            return false;
        }

        match (self, target) {
            (Idle, Evaluated) => true,
            // Re-evaluation after a dispatch that failed on configuration
            (Evaluated, Evaluated) => true,
            (Evaluated, Dispatched | Suppressed) => true,
            _ => false,
        }
    }

    /// Attempt to transition to a new state.
    pub fn transition_to(&self, target: AlertState) -> Result<AlertState, Error> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(Error::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

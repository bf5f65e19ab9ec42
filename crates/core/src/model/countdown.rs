use serde::{Deserialize, Serialize};

/// Remaining time for an attempt, in whole seconds.
///
/// Only ever moves down and stops at zero; reaching zero does not end the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Countdown {
    remaining_secs: u32,
}

impl Countdown {
    /// Start a countdown for the given number of minutes.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            remaining_secs: minutes.saturating_mul(60),
        }
    }

    /// Resume a countdown at a previously mirrored value.
    #[must_use]
    pub fn from_remaining(remaining_secs: u32) -> Self {
        Self { remaining_secs }
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Advance by one second. Returns `false` once the countdown is already at zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        true
    }
}

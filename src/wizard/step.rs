//! Step sequencer: linear, clamped navigation over a fixed number of steps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

/// Tracks the current position in an ordered list of `total` steps.
///
/// Steps are 1-based. Navigation past either end is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSequencer {
    current: usize,
    total: usize,
}

impl StepSequencer {
    pub fn new(total: usize) -> Result<Self, ValidationError> {
        if total == 0 {
            return Err(ValidationError::EmptySequence);
        }
        Ok(Self { current: 1, total })
    }

    /// The four-step sequence used by worker registration.
    pub(crate) fn for_registration() -> Self {
        Self {
            current: 1,
            total: RegistrationStep::ALL.len(),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Move forward one step. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            debug!(step = self.current, "Advance ignored at last step");
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back one step. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            debug!("Retreat ignored at first step");
            return false;
        }
        self.current -= 1;
        true
    }

    /// `100 * current / total`.
    pub fn progress_percent(&self) -> f64 {
        100.0 * self.current as f64 / self.total as f64
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

/// The four screens of worker registration, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    PersonalInfo,
    Contact,
    Documents,
    Review,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 4] = [
        Self::PersonalInfo,
        Self::Contact,
        Self::Documents,
        Self::Review,
    ];

    /// Map a 1-based sequencer position to its step.
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn position(&self) -> usize {
        match self {
            Self::PersonalInfo => 1,
            Self::Contact => 2,
            Self::Documents => 3,
            Self::Review => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Info",
            Self::Contact => "Contact",
            Self::Documents => "Documents",
            Self::Review => "Review",
        }
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

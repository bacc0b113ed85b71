//! Part of the working day a task is scheduled for.

use super::ParseTimeWindowError;
use serde::{Deserialize, Serialize};

/// Coarse slot of the working day, in day order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// First thing, before routine work.
    First,
    /// Morning round.
    Morning,
    /// Midday round.
    Midday,
    /// Afternoon round.
    Afternoon,
    /// Evening round.
    Evening,
    /// Last thing, before closing.
    Last,
}

impl TimeWindow {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Last => "last",
        }
    }
}

impl TryFrom<&str> for TimeWindow {
    type Error = ParseTimeWindowError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "morning" => Ok(Self::Morning),
            "midday" => Ok(Self::Midday),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "last" => Ok(Self::Last),
            _ => Err(ParseTimeWindowError(value.to_owned())),
        }
    }
}

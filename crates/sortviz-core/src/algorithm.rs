#![forbid(unsafe_code)]

//! The fixed set of animated algorithms and their display names.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A sorting algorithm the engine knows how to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Algorithm {
    Bubble = 1,
    Insertion = 2,
    Selection = 3,
    Merge = 4,
    Quick = 5,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Insertion,
        Algorithm::Selection,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    /// Display name, as shown by the host and accepted by [`Algorithm::from_name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Insertion => "Insertion Sort",
            Self::Selection => "Selection Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
        }
    }

    /// Look up an algorithm by its exact display name. Anything else,
    /// including `"merge"` or `"bubble sort"`, yields `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    pub(crate) const fn to_raw(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Bubble),
            2 => Some(Self::Insertion),
            3 => Some(Self::Selection),
            4 => Some(Self::Merge),
            5 => Some(Self::Quick),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name matches none of the known algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting algorithm: {name:?}")]
pub struct ParseAlgorithmError {
    pub name: String,
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseAlgorithmError { name: s.to_string() })
    }
}

/// Per-document state definitions for tracking extraction progress
///
/// This module defines the states a document ID moves through during a run.
use std::fmt;

/// Represents the current state of a document ID in the extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdState {
    // ===== Active States =====
    /// ID is in the plan but has not been looked at yet
    Pending,

    /// Page is being read from the cache or fetched over the network
    Fetching,

    /// Record has been built from the page
    Extracted,

    // ===== Terminal States =====
    /// Record has been appended to the dataset
    Written,

    /// ID was already present in a previous partial output
    Skipped,
}

impl IdState {
    /// Returns true if no further processing happens for this ID
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Written | Self::Skipped)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// The only paths are `Pending → Fetching → Extracted → Written` and
    /// `Pending → Skipped`.
    pub fn can_transition_to(&self, next: IdState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Pending, Self::Skipped)
                | (Self::Fetching, Self::Extracted)
                | (Self::Extracted, Self::Written)
        )
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::Written => "written",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for IdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use crate::record::DocumentId;
use crate::state::IdState;
use crate::HarvestError;

/// Follows one document ID through the extraction state machine
#[derive(Debug, Clone)]
pub struct IdTracker {
    id: DocumentId,
    state: IdState,
}

impl IdTracker {
    /// Starts tracking `id` in the `Pending` state
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            state: IdState::Pending,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn state(&self) -> IdState {
        self.state
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn advance(&mut self, next: IdState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                id: self.id.value(),
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Document {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path() {
        let mut tracker = IdTracker::new(DocumentId(9));
        tracker.advance(IdState::Fetching).unwrap();
        tracker.advance(IdState::Extracted).unwrap();
        tracker.advance(IdState::Written).unwrap();
        assert_eq!(tracker.state(), IdState::Written);
    }

    #[test]
    fn test_invalid_transition_reports_id() {
        let mut tracker = IdTracker::new(DocumentId(9));
        let err = tracker.advance(IdState::Written).unwrap_err();

        match err {
            HarvestError::InvalidTransition { id, from, to } => {
                assert_eq!(id, 9);
                assert_eq!(from, IdState::Pending);
                assert_eq!(to, IdState::Written);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(tracker.state(), IdState::Pending);
    }
}

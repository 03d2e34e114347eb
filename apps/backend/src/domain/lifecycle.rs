//! Match lifecycle: `Created -> Active -> Completed`, and
//! `Created | Active -> Cancelled`. Terminal states have no exits.

use crate::entities::matches::MatchStatus;
use crate::errors::domain::DomainError;

/// Host-issued transition requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Start,
    Complete,
    Cancel,
}

impl MatchAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchAction::Start => "start",
            MatchAction::Complete => "complete",
            MatchAction::Cancel => "cancel",
        }
    }
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Created => "created",
            MatchStatus::Active => "active",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

/// Target status for `action` taken from `from`, or `InvalidState`.
pub fn transition(from: MatchStatus, action: MatchAction) -> Result<MatchStatus, DomainError> {
    use MatchAction::*;
    use MatchStatus::*;

    match (from, action) {
        (Created, Start) => Ok(Active),
        (Active, Complete) => Ok(Completed),
        (Created | Active, Cancel) => Ok(Cancelled),
        _ => Err(DomainError::invalid_state(format!(
            "Cannot {} a match that is {}",
            action.as_str(),
            from.as_str()
        ))),
    }
}

/// Roster edits, metadata edits and deletes are only allowed before play starts.
pub fn require_created(status: MatchStatus, what: &str) -> Result<(), DomainError> {
    if status == MatchStatus::Created {
        Ok(())
    } else {
        Err(DomainError::invalid_state(format!(
            "Cannot {what} a match that is {}",
            status.as_str()
        )))
    }
}

pub fn require_active(status: MatchStatus, what: &str) -> Result<(), DomainError> {
    if status == MatchStatus::Active {
        Ok(())
    } else {
        Err(DomainError::invalid_state(format!(
            "Cannot {what} while the match is {}",
            status.as_str()
        )))
    }
}

//! Inline category edit session
//!
//! Transient per-row state for editing a transaction's category
//! without leaving the list. At most one row is ever in the editing
//! state; beginning a new edit implicitly cancels the previous one.

/// Pending value used when the row has no category yet
pub const DEFAULT_PENDING_CATEGORY: &str = "General";

/// State of the inline edit session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    /// No row selected
    #[default]
    Idle,
    /// One row selected with a pending category name
    Editing {
        transaction_id: i64,
        pending: String,
    },
}

impl EditSession {
    /// Begin editing a row; any prior session is discarded
    ///
    /// `current_category` seeds the pending value; uncategorized rows
    /// start from [`DEFAULT_PENDING_CATEGORY`].
    pub fn begin(&mut self, transaction_id: i64, current_category: Option<&str>) {
        *self = Self::Editing {
            transaction_id,
            pending: current_category
                .unwrap_or(DEFAULT_PENDING_CATEGORY)
                .to_string(),
        };
    }

    /// Discard the pending value; no network call is implied
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Replace the pending category name, if a session is active
    pub fn set_pending(&mut self, name: &str) -> bool {
        match self {
            Self::Editing { pending, .. } => {
                *pending = name.to_string();
                true
            }
            Self::Idle => false,
        }
    }

    /// Take the session for committing, leaving `Idle` behind
    pub fn take(&mut self) -> Option<(i64, String)> {
        match std::mem::take(self) {
            Self::Editing {
                transaction_id,
                pending,
            } => Some((transaction_id, pending)),
            Self::Idle => None,
        }
    }

    /// Row currently being edited, if any
    pub fn editing_id(&self) -> Option<i64> {
        match self {
            Self::Editing { transaction_id, .. } => Some(*transaction_id),
            Self::Idle => None,
        }
    }

    /// Pending category name, if a session is active
    pub fn pending(&self) -> Option<&str> {
        match self {
            Self::Editing { pending, .. } => Some(pending),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_seeds_pending_from_current_category() {
        let mut session = EditSession::default();
        session.begin(3, Some("Food"));
        assert_eq!(session.editing_id(), Some(3));
        assert_eq!(session.pending(), Some("Food"));
    }

    #[test]
    fn begin_defaults_uncategorized_rows() {
        let mut session = EditSession::default();
        session.begin(9, None);
        assert_eq!(session.pending(), Some(DEFAULT_PENDING_CATEGORY));
    }

    #[test]
    fn begin_replaces_active_session() {
        let mut session = EditSession::default();
        session.begin(1, Some("Food"));
        session.begin(2, Some("Rent"));
        // Single-session invariant: only the latest row is editing
        assert_eq!(session.editing_id(), Some(2));
        assert_eq!(session.pending(), Some("Rent"));
    }

    #[test]
    fn cancel_discards_pending() {
        let mut session = EditSession::default();
        session.begin(1, Some("Food"));
        session.cancel();
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn set_pending_requires_active_session() {
        let mut session = EditSession::default();
        assert!(!session.set_pending("Transport"));
        session.begin(1, Some("Food"));
        assert!(session.set_pending("Transport"));
        assert_eq!(session.pending(), Some("Transport"));
    }

    #[test]
    fn take_leaves_idle() {
        let mut session = EditSession::default();
        session.begin(4, Some("Food"));
        assert_eq!(session.take(), Some((4, "Food".to_string())));
        assert_eq!(session, EditSession::Idle);
        assert_eq!(session.take(), None);
    }
}

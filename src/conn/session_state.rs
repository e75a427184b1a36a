use crate::protocol::parts::TransactionFlags;

// Snapshot of the transaction state of the session, updated from the
// TRANSACTION_FLAGS part of every reply that carries one.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub ta_state: TransactionState,
    pub isolation_level: Option<i32>,
    pub ddl_commit_mode_changed: bool,
    pub read_only_mode: bool,
    // the server requested that the session be terminated
    pub dead: bool,
}

#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) enum TransactionState {
    #[default]
    Initial,
    RolledBack,
    Committed,
}

impl SessionState {
    pub fn update(&mut self, ta_flags: &TransactionFlags) {
        if ta_flags.is_rolled_back() {
            self.ta_state = TransactionState::RolledBack;
        } else if ta_flags.is_committed() {
            self.ta_state = TransactionState::Committed;
        }
        if let Some(level) = ta_flags.has_new_isolation_level() {
            self.isolation_level = Some(level);
        }
        if ta_flags.has_ddl() {
            self.ddl_commit_mode_changed = true;
        }
        if let Some(read_only) = ta_flags.is_read_only() {
            self.read_only_mode = read_only;
        }
        if ta_flags.is_session_closing() {
            self.dead = true;
        }
    }

    pub fn is_committed(&self) -> bool {
        self.ta_state == TransactionState::Committed
    }

    pub fn is_rolled_back(&self) -> bool {
        self.ta_state == TransactionState::RolledBack
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState;
    use crate::protocol::parts::{OptionValue, TaFlagId, TransactionFlags};

    #[test]
    fn flags_are_reflected() {
        let mut state = SessionState::default();
        assert!(!state.is_committed());

        let mut ta_flags = TransactionFlags::default();
        ta_flags.insert(TaFlagId::Committed, OptionValue::BOOLEAN(true));
        state.update(&ta_flags);
        assert!(state.is_committed());
        assert!(!state.dead);

        let mut ta_flags = TransactionFlags::default();
        ta_flags.insert(TaFlagId::RolledBack, OptionValue::BOOLEAN(true));
        ta_flags.insert(TaFlagId::SessionClosingTaError, OptionValue::BOOLEAN(true));
        state.update(&ta_flags);
        assert!(state.is_rolled_back());
        assert!(state.dead);
    }
}

use crate::protocol::parts::{
    option_part::{OptionId, OptionPart},
    option_value::OptionValue,
};

// An option-list part attached to many replies, reporting the transaction
// state of the session.
pub(crate) type TransactionFlags = OptionPart<TaFlagId>;

impl TransactionFlags {
    pub fn is_committed(&self) -> bool {
        self.flag(&TaFlagId::Committed)
    }
    pub fn is_rolled_back(&self) -> bool {
        self.flag(&TaFlagId::RolledBack)
    }
    pub fn is_session_closing(&self) -> bool {
        self.flag(&TaFlagId::SessionClosingTaError)
    }
    pub fn is_read_only(&self) -> Option<bool> {
        self.get_opt(&TaFlagId::ReadOnlyMode)
            .and_then(|v| v.get_bool().ok())
    }
    pub fn has_ddl(&self) -> bool {
        self.flag(&TaFlagId::DdlCommitModeChanged)
    }
    pub fn has_new_isolation_level(&self) -> Option<i32> {
        self.get_opt(&TaFlagId::NewIsolationlevel)
            .and_then(|v| v.get_int_as_i32().ok())
    }

    fn flag(&self, id: &TaFlagId) -> bool {
        self.get_opt(id)
            .map(|v| v.get_bool().unwrap_or(false))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum TaFlagId {
    RolledBack,            // 0 // BOOL
    Committed,             // 1 // BOOL
    NewIsolationlevel,     // 2 // INT
    DdlCommitModeChanged,  // 3 // BOOL
    WriteTaStarted,        // 4 // BOOL
    NoWriteTaStarted,      // 5 // BOOL
    SessionClosingTaError, // 6 // BOOL
    ReadOnlyMode,          // 7 // BOOL
    __Unexpected__(u8),
}
impl OptionId<TaFlagId> for TaFlagId {
    fn to_u8(&self) -> u8 {
        match *self {
            Self::RolledBack => 0,
            Self::Committed => 1,
            Self::NewIsolationlevel => 2,
            Self::DdlCommitModeChanged => 3,
            Self::WriteTaStarted => 4,
            Self::NoWriteTaStarted => 5,
            Self::SessionClosingTaError => 6,
            Self::ReadOnlyMode => 7,
            Self::__Unexpected__(val) => val,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::RolledBack,
            1 => Self::Committed,
            2 => Self::NewIsolationlevel,
            3 => Self::DdlCommitModeChanged,
            4 => Self::WriteTaStarted,
            5 => Self::NoWriteTaStarted,
            6 => Self::SessionClosingTaError,
            7 => Self::ReadOnlyMode,
            val => {
                warn!("Unsupported value for TaFlagId received: {}", val);
                Self::__Unexpected__(val)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaFlagId, TransactionFlags};
    use crate::protocol::parts::option_value::OptionValue;

    #[test]
    fn flags_roundtrip() {
        let mut ta_flags = TransactionFlags::default();
        ta_flags.insert(TaFlagId::Committed, OptionValue::BOOLEAN(true));
        ta_flags.insert(TaFlagId::ReadOnlyMode, OptionValue::BOOLEAN(false));

        let mut buf = Vec::<u8>::new();
        ta_flags.emit(&mut buf).unwrap();
        assert_eq!(buf.len(), ta_flags.size());

        let parsed =
            TransactionFlags::parse(ta_flags.len(), &mut std::io::Cursor::new(buf)).unwrap();
        assert!(parsed.is_committed());
        assert!(!parsed.is_rolled_back());
        assert_eq!(parsed.is_read_only(), Some(false));
        assert!(!parsed.is_session_closing());
    }
}

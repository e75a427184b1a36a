use crate::protocol::parts::{
    option_part::{OptionId, OptionPart},
    option_value::OptionValue,
};

// An options part that is populated from previously received statement
// context information. The binary option content is opaque to the client;
// the statement sequence info is echoed back to the server with every
// request within the same transaction.
pub(crate) type StatementContext = OptionPart<StatementContextId>;

impl StatementContext {
    pub fn statement_sequence_info(&self) -> Option<i64> {
        match self.get_opt(&StatementContextId::StatementSequenceInfo) {
            Some(&OptionValue::BIGINT(value)) => Some(value),
            _ => None,
        }
    }

    pub fn set_statement_sequence_info(&mut self, value: i64) {
        self.insert(
            StatementContextId::StatementSequenceInfo,
            OptionValue::BIGINT(value),
        );
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum StatementContextId {
    StatementSequenceInfo, // 1 // BIGINT
    ServerProcessingTime,  // 2 // BIGINT, microseconds
    SchemaName,            // 3 // STRING
    FlagSet,               // 4 // INT
    QueryTimeout,          // 5 // BIGINT
    __Unexpected__(u8),
}
impl OptionId<StatementContextId> for StatementContextId {
    fn to_u8(&self) -> u8 {
        match *self {
            Self::StatementSequenceInfo => 1,
            Self::ServerProcessingTime => 2,
            Self::SchemaName => 3,
            Self::FlagSet => 4,
            Self::QueryTimeout => 5,
            Self::__Unexpected__(val) => val,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => Self::StatementSequenceInfo,
            2 => Self::ServerProcessingTime,
            3 => Self::SchemaName,
            4 => Self::FlagSet,
            5 => Self::QueryTimeout,
            val => {
                warn!("Unsupported value for StatementContextId received: {}", val);
                Self::__Unexpected__(val)
            }
        }
    }
}

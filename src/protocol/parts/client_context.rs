use crate::protocol::parts::{
    option_part::{OptionId, OptionPart},
    option_value::OptionValue,
};

// The CLIENT_CONTEXT part introduces the client to the server at connect
// time: client version, client type, application name, and locale.
pub(crate) type ClientContext = OptionPart<ClientContextId>;

impl ClientContext {
    pub fn new(application: &str, o_locale: Option<&str>) -> Self {
        let mut cc: Self = Self::default();
        cc.insert(
            ClientContextId::ClientVersion,
            OptionValue::STRING(env!("CARGO_PKG_VERSION").to_string()),
        );
        cc.insert(
            ClientContextId::ClientType,
            OptionValue::STRING(env!("CARGO_PKG_NAME").to_string()),
        );
        cc.insert(
            ClientContextId::ClientApplicationProgram,
            OptionValue::STRING(application.to_string()),
        );
        if let Some(locale) = o_locale {
            cc.insert(
                ClientContextId::ClientLocale,
                OptionValue::STRING(locale.to_string()),
            );
        }
        cc
    }
}

#[derive(Debug, Eq, PartialEq, Hash)]
pub(crate) enum ClientContextId {
    ClientVersion,            // 1 // STRING
    ClientType,               // 2 // STRING
    ClientApplicationProgram, // 3 // STRING
    ClientLocale,             // 4 // STRING
    __Unexpected__(u8),
}
impl OptionId<ClientContextId> for ClientContextId {
    fn to_u8(&self) -> u8 {
        match *self {
            Self::ClientVersion => 1,
            Self::ClientType => 2,
            Self::ClientApplicationProgram => 3,
            Self::ClientLocale => 4,
            Self::__Unexpected__(val) => val,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => Self::ClientVersion,
            2 => Self::ClientType,
            3 => Self::ClientApplicationProgram,
            4 => Self::ClientLocale,
            val => Self::__Unexpected__(val),
        }
    }
}

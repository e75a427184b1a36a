use crate::{hdb_error::impl_err, HdbResult};

// Identifies the content of a part. The protocol defines many more kinds;
// listed are those this client emits or understands in replies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PartKind {
    Command = 3,           // SQL Command Data
    ResultSet = 5,         // Tabular result data
    Error = 6,             // Error information
    StatementId = 10,      // Prepared statement identifier
    RowsAffected = 12,     // Number of affected rows of a DML statement
    ResultSetId = 13,      // Result set identifier
    TopologyInformation = 15, // Topology information
    ReadLobRequest = 17,   // Request data of a LOB
    ReadLobReply = 18,     // Reply to a ReadLobRequest
    WriteLobRequest = 28,  // Writes LOB data
    ClientContext = 29,    // Client context
    WriteLobReply = 30,    // Reply to a WriteLobRequest
    Parameters = 32,       // Parameter data
    Authentication = 33,   // Authentication data
    ClientId = 35,         // Client identification string
    StatementContext = 39, // Statement visibility context
    OutputParameters = 41, // Output parameter data
    FetchSize = 45,        // Number of rows to fetch
    ParameterMetadata = 47, // Parameter metadata
    ResultSetMetadata = 48, // Result set metadata
    TransactionFlags = 64, // Transaction handling flags
}

impl PartKind {
    pub fn from_i8(val: i8) -> HdbResult<Self> {
        match val {
            3 => Ok(Self::Command),
            5 => Ok(Self::ResultSet),
            6 => Ok(Self::Error),
            10 => Ok(Self::StatementId),
            12 => Ok(Self::RowsAffected),
            13 => Ok(Self::ResultSetId),
            15 => Ok(Self::TopologyInformation),
            17 => Ok(Self::ReadLobRequest),
            18 => Ok(Self::ReadLobReply),
            28 => Ok(Self::WriteLobRequest),
            29 => Ok(Self::ClientContext),
            30 => Ok(Self::WriteLobReply),
            32 => Ok(Self::Parameters),
            33 => Ok(Self::Authentication),
            35 => Ok(Self::ClientId),
            39 => Ok(Self::StatementContext),
            41 => Ok(Self::OutputParameters),
            45 => Ok(Self::FetchSize),
            47 => Ok(Self::ParameterMetadata),
            48 => Ok(Self::ResultSetMetadata),
            64 => Ok(Self::TransactionFlags),
            _ => Err(impl_err!("PartKind {val} not implemented")),
        }
    }
}

use crate::{hdb_error::impl_err, HdbResult};

/// Server-side classification of a reply, attached to every reply segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FunctionCode {
    /// Nothing to say about the reply (e.g. authentication round trips).
    Nil,
    /// A DDL statement was executed.
    Ddl,
    /// An INSERT was executed.
    Insert,
    /// An UPDATE was executed.
    Update,
    /// A DELETE was executed.
    Delete,
    /// A query was executed, a result set is attached.
    Select,
    /// A SELECT FOR UPDATE was executed.
    SelectForUpdate,
    /// An EXPLAIN was executed.
    Explain,
    /// A stored procedure was called.
    DbProcedureCall,
    /// A stored procedure with result rows was called.
    DbProcedureCallWithResult,
    /// Reply to a FETCH request.
    Fetch,
    /// Reply to a COMMIT request.
    Commit,
    /// Reply to a ROLLBACK request.
    Rollback,
    /// A savepoint was set.
    Savepoint,
    /// Reply to a CONNECT request.
    Connect,
    /// Reply to a WRITE_LOB request.
    WriteLob,
    /// Reply to a READ_LOB request.
    ReadLob,
    /// Reply to a DISCONNECT request.
    Disconnect,
    /// Reply to a CLOSE_RESULT_SET request.
    CloseCursor,
}

impl FunctionCode {
    pub(crate) fn from_i16(v: i16) -> HdbResult<Self> {
        match v {
            0 => Ok(Self::Nil),
            1 => Ok(Self::Ddl),
            2 => Ok(Self::Insert),
            3 => Ok(Self::Update),
            4 => Ok(Self::Delete),
            5 => Ok(Self::Select),
            6 => Ok(Self::SelectForUpdate),
            7 => Ok(Self::Explain),
            8 => Ok(Self::DbProcedureCall),
            9 => Ok(Self::DbProcedureCallWithResult),
            10 => Ok(Self::Fetch),
            11 => Ok(Self::Commit),
            12 => Ok(Self::Rollback),
            13 => Ok(Self::Savepoint),
            14 => Ok(Self::Connect),
            15 => Ok(Self::WriteLob),
            16 => Ok(Self::ReadLob),
            18 => Ok(Self::Disconnect),
            19 => Ok(Self::CloseCursor),
            _ => Err(impl_err!("FunctionCode {v} not implemented")),
        }
    }
}

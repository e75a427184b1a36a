//! Synchronous client for SAP HANA's SQL Command Network Protocol.
//!
//! `hdbclient` speaks the binary wire protocol over a plain TCP connection:
//! it authenticates a session with SCRAM-SHA256, prepares and executes SQL
//! statements, streams result sets in configurable fetch batches, streams
//! LOB content in both directions, and tracks the server's transaction
//! flags.
//!
//! The entry point is [`Connection`]:
//!
//! ```rust,no_run
//! use hdbclient::{Connection, ConnectParams, HdbResult};
//!
//! fn main() -> HdbResult<()> {
//!     let params = ConnectParams::new("hana.example.com", 30015, "SYSTEM", "manager");
//!     let connection = Connection::new(params)?;
//!     let result_set = connection.query("SELECT 'Hello world' FROM DUMMY")?;
//!     for row in result_set {
//!         println!("{}", row?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Setting the environment variable `HDB_TRACE=1` (or
//! [`ConnectionConfiguration::with_trace`]) makes the client emit hex dumps
//! of every packet through the `log` facade at trace level.

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;

mod conn;
mod connection;
mod hdb_error;
mod hdb_response;
mod hdb_return_value;
mod internal_returnvalue;
mod prepared_statement;
mod protocol;
mod resultset;
mod row;
mod types_impl;

pub use crate::conn::{ConnectParams, ConnectionConfiguration};
pub use crate::connection::Connection;
pub use crate::hdb_error::{HdbError, HdbResult};
pub use crate::hdb_response::HdbResponse;
pub use crate::hdb_return_value::HdbReturnValue;
pub use crate::prepared_statement::PreparedStatement;
pub use crate::protocol::parts::{
    ExecutionResult, ExecutionResults, FieldMetadata, HdbValue, OutputParameters,
    ParameterBinding, ParameterDescriptor, ParameterDescriptors, ParameterDirection,
    ResultSetMetadata, ServerError, Severity, TypeId,
};
pub use crate::protocol::FunctionCode;
pub use crate::resultset::ResultSet;
pub use crate::row::Row;

/// Non-standard types that appear within the [`HdbValue`]s of a
/// [`ResultSet`].
pub mod types {
    pub use crate::types_impl::{
        date::HdbDate,
        lob::{Lob, LobKind},
        time::HdbTime,
        timestamp::HdbTimestamp,
    };
}

/// Default number of result-set rows fetched in a single FETCH round trip.
///
/// Can be changed with [`Connection::set_fetch_size`].
pub const DEFAULT_FETCH_SIZE: u32 = 32;

/// Default number of LOB bytes pulled in a single READ_LOB round trip.
///
/// Can be changed with [`Connection::set_lob_read_length`].
pub const DEFAULT_LOB_READ_LENGTH: u32 = 1024;

/// Ceiling for the LOB bytes sent within a single request payload.
///
/// LOB values whose tail cannot be shipped in chunks of at most this size
/// are rejected with a usage error.
pub const DEFAULT_LOB_WRITE_LENGTH: usize = 128 * 1024;

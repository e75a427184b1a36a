use crate::conn::{AmConnCore, ConnectParams, ConnectionConfiguration};
use crate::internal_returnvalue::InternalReturnValue;
use crate::protocol::parts::ServerError;
use crate::protocol::{FunctionCode, MessageType, Part, Request};
use crate::{HdbResponse, HdbResult, HdbValue, PreparedStatement, ResultSet};

/// An authenticated session with a HANA server.
///
/// All database interaction starts here: direct execution of SQL,
/// preparation of statements, transaction control, and session shutdown.
///
/// A `Connection` serializes its requests: only one request/reply pair is
/// in flight at any point in time. Cloning is deliberately not offered;
/// use one connection per thread.
#[derive(Debug)]
pub struct Connection {
    am_conn_core: AmConnCore,
}

impl Connection {
    /// Connects to the given address and authenticates with user and
    /// password (SCRAM-SHA256), using the default configuration.
    pub fn new(params: ConnectParams) -> HdbResult<Self> {
        Self::with_configuration(params, ConnectionConfiguration::default())
    }

    /// Connects with an explicit configuration.
    pub fn with_configuration(
        params: ConnectParams,
        configuration: ConnectionConfiguration,
    ) -> HdbResult<Self> {
        let am_conn_core = AmConnCore::try_new(params, configuration)?;
        Ok(Self { am_conn_core })
    }

    /// Executes a single SQL statement.
    ///
    /// The returned [`HdbResponse`] covers all response possibilities: a
    /// result set, execution results, output parameters, or plain success.
    pub fn statement<S: AsRef<str>>(&self, stmt: S) -> HdbResult<HdbResponse> {
        let mut request = Request::new(MessageType::ExecuteDirect, 0);
        request.push(Part::Command(stmt.as_ref()));
        let reply = self.am_conn_core.full_send(request, None, None, &mut None)?;
        HdbResponse::try_new(InternalReturnValue::try_from_reply(reply)?)
    }

    /// Executes a query and returns its [`ResultSet`].
    ///
    /// Fails if the statement produces anything else.
    pub fn query<S: AsRef<str>>(&self, stmt: S) -> HdbResult<ResultSet> {
        self.statement(stmt)?.into_result_set()
    }

    /// Executes a DML statement and returns the number of affected rows.
    pub fn dml<S: AsRef<str>>(&self, stmt: S) -> HdbResult<usize> {
        self.statement(stmt)?.into_affected_rows()
    }

    /// Executes a statement and expects a plain success.
    pub fn exec<S: AsRef<str>>(&self, stmt: S) -> HdbResult<()> {
        self.statement(stmt)?.into_success()
    }

    /// Prepares a statement, returning a handle that can be executed
    /// repeatedly with varying parameters.
    pub fn prepare<S: AsRef<str>>(&self, stmt: S) -> HdbResult<PreparedStatement> {
        let mut request = Request::new(MessageType::Prepare, 0);
        request.push(Part::Command(stmt.as_ref()));
        let reply = self.am_conn_core.full_send(request, None, None, &mut None)?;
        PreparedStatement::try_new(
            self.am_conn_core.downgrade(),
            InternalReturnValue::try_from_reply(reply)?,
        )
    }

    /// Prepares a statement, executes it once with the given parameters,
    /// and drops it again.
    pub fn prepare_and_execute<S: AsRef<str>>(
        &self,
        stmt: S,
        parameters: Vec<HdbValue<'_>>,
    ) -> HdbResult<HdbResponse> {
        let mut prepared_statement = self.prepare(stmt)?;
        prepared_statement.execute(parameters)
    }

    /// Commits the current transaction.
    pub fn commit(&self) -> HdbResult<()> {
        let request = Request::new(MessageType::Commit, 0);
        let reply = self.am_conn_core.full_send(request, None, None, &mut None)?;
        reply.assert_expected_function_code(FunctionCode::Commit)
    }

    /// Rolls the current transaction back.
    pub fn rollback(&self) -> HdbResult<()> {
        let request = Request::new(MessageType::Rollback, 0);
        let reply = self.am_conn_core.full_send(request, None, None, &mut None)?;
        reply.assert_expected_function_code(FunctionCode::Rollback)
    }

    /// Sends a DISCONNECT to the server (best-effort) and closes the
    /// transport. Every subsequent operation on this connection and its
    /// dependent objects fails with
    /// [`HdbError::Closed`](crate::HdbError::Closed).
    pub fn close(&self) -> HdbResult<()> {
        let mut conn_core = self.am_conn_core.lock()?;
        if !conn_core.is_dead() && conn_core.is_authenticated() {
            let request = Request::new_for_disconnect();
            conn_core
                .roundtrip(&request, &self.am_conn_core, None, None, &mut None)
                .map(|_| ())
                .unwrap_or_else(|e| debug!("disconnect failed with {e:?}"));
        }
        conn_core.force_close();
        Ok(())
    }

    /// True if the session is gone, due to `close()` or to an
    /// unrecoverable error.
    pub fn is_closed(&self) -> HdbResult<bool> {
        Ok(self.am_conn_core.lock()?.is_dead())
    }

    /// Switches auto-commit on or off.
    pub fn set_auto_commit(&self, ac: bool) -> HdbResult<()> {
        self.am_conn_core
            .lock()?
            .configuration_mut()
            .set_auto_commit(ac);
        Ok(())
    }

    /// Whether auto-commit is on.
    pub fn is_auto_commit(&self) -> HdbResult<bool> {
        Ok(self.am_conn_core.lock()?.configuration().is_auto_commit())
    }

    /// Sets the number of rows requested per FETCH round trip.
    pub fn set_fetch_size(&self, fetch_size: u32) -> HdbResult<()> {
        self.am_conn_core
            .lock()?
            .configuration_mut()
            .set_fetch_size(fetch_size);
        Ok(())
    }

    /// The number of rows requested per FETCH round trip.
    pub fn fetch_size(&self) -> HdbResult<u32> {
        Ok(self.am_conn_core.lock()?.configuration().fetch_size())
    }

    /// Sets the number of LOB bytes requested per READ_LOB round trip.
    pub fn set_lob_read_length(&self, lob_read_length: u32) -> HdbResult<()> {
        self.am_conn_core
            .lock()?
            .configuration_mut()
            .set_lob_read_length(lob_read_length);
        Ok(())
    }

    /// The number of LOB bytes requested per READ_LOB round trip.
    pub fn lob_read_length(&self) -> HdbResult<u32> {
        Ok(self.am_conn_core.lock()?.configuration().lob_read_length())
    }

    /// Sets the socket read/write timeout.
    pub fn set_read_timeout(&self, read_timeout: Option<std::time::Duration>) -> HdbResult<()> {
        self.am_conn_core.lock()?.set_read_timeout(read_timeout)
    }

    /// Switches per-connection wire tracing on or off.
    pub fn set_trace(&self, trace: bool) -> HdbResult<()> {
        self.am_conn_core.lock()?.configuration_mut().set_trace(trace);
        Ok(())
    }

    /// The session id the server assigned at connect time.
    pub fn id(&self) -> HdbResult<i64> {
        Ok(self.am_conn_core.lock()?.session_id())
    }

    /// True if the last reply reported the transaction as committed.
    pub fn is_committed(&self) -> HdbResult<bool> {
        Ok(self.am_conn_core.lock()?.session_state().is_committed())
    }

    /// True if the last reply reported the transaction as rolled back.
    pub fn is_rolled_back(&self) -> HdbResult<bool> {
        Ok(self.am_conn_core.lock()?.session_state().is_rolled_back())
    }

    /// Returns the warnings the server sent since the last call, if any.
    pub fn pop_warnings(&self) -> HdbResult<Option<Vec<ServerError>>> {
        Ok(self.am_conn_core.lock()?.pop_warnings())
    }

    /// The failover hosts the server announced at connect time, if any.
    pub fn topology_hosts(&self) -> HdbResult<Option<Vec<(String, u16)>>> {
        Ok(self.am_conn_core.lock()?.topology_hosts())
    }
}

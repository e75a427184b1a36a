use crate::{
    conn::{
        authentication, initial_request, logging_reader::LoggingReader,
        logging_writer::LoggingWriter, tcp_client::TcpClient, AmConnCore, ConnectParams,
        ConnectionConfiguration, SessionState,
    },
    hdb_error::impl_err,
    protocol::{
        parts::{
            ParameterDescriptors, ResultSetMetadata, RsState, ServerError, Severity,
            StatementContext, Topology, TransactionFlags, WriteLobRequest,
        },
        FunctionCode, MessageType, Part, PartKind, Reply, Request,
    },
    HdbError, HdbResult,
};
use std::{mem, sync::Arc};

// Owner of the transport and of all session-level state: session id,
// packet sequence counter, auto-commit flag, transaction-flags snapshot.
#[derive(Debug)]
pub(crate) struct ConnectionCore {
    authenticated: bool,
    dead: bool,
    session_id: i64,
    seq_number: i32,
    configuration: ConnectionConfiguration,
    session_state: SessionState,
    statement_sequence: Option<i64>, // statement sequence within the transaction
    topology: Option<Topology>,
    pub(crate) warnings: Vec<ServerError>,
    tcp_client: TcpClient,
}

impl ConnectionCore {
    pub fn try_new(
        params: ConnectParams,
        configuration: ConnectionConfiguration,
    ) -> HdbResult<Self> {
        let mut tcp_client = TcpClient::try_new(params, &configuration)?;
        initial_request::send_and_receive(&mut tcp_client)?;
        Ok(Self {
            authenticated: false,
            dead: false,
            session_id: 0,
            seq_number: 0,
            configuration,
            session_state: SessionState::default(),
            statement_sequence: None,
            topology: None,
            warnings: Vec::<ServerError>::new(),
            tcp_client,
        })
    }

    pub fn authenticate_attempt(&mut self, am_conn_core: &AmConnCore) -> HdbResult<()> {
        authentication::authenticate(self, am_conn_core)?;
        self.authenticated = true;
        trace!("session_id: {}", self.session_id);
        Ok(())
    }

    pub fn connect_params(&self) -> &ConnectParams {
        self.tcp_client.connect_params()
    }

    pub fn configuration(&self) -> &ConnectionConfiguration {
        &self.configuration
    }

    pub fn configuration_mut(&mut self) -> &mut ConnectionConfiguration {
        &mut self.configuration
    }

    pub fn set_read_timeout(&mut self, timeout: Option<std::time::Duration>) -> HdbResult<()> {
        self.tcp_client.set_read_timeout(timeout)?;
        Ok(())
    }

    pub fn evaluate_statement_context(&mut self, stmt_ctx: &StatementContext) {
        trace!(
            "Received StatementContext with sequence_info = {:?}",
            stmt_ctx.statement_sequence_info()
        );
        self.statement_sequence = stmt_ctx.statement_sequence_info();
    }

    pub fn evaluate_ta_flags(&mut self, ta_flags: &TransactionFlags) -> HdbResult<()> {
        self.session_state.update(ta_flags);
        if self.session_state.dead {
            Err(HdbError::SessionClosingTransactionError)
        } else {
            Ok(())
        }
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    pub fn set_session_id(&mut self, session_id: i64) {
        if session_id != self.session_id {
            debug!(
                "ConnectionCore: setting session_id from {} to {}",
                self.session_id, session_id
            );
            self.session_id = session_id;
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn set_topology(&mut self, topology: Topology) {
        debug!(
            "ConnectionCore: topology with {} hosts received",
            topology.host_count()
        );
        self.topology = Some(topology);
    }

    pub fn topology_hosts(&self) -> Option<Vec<(String, u16)>> {
        self.topology.as_ref().map(Topology::hosts)
    }

    pub fn statement_sequence(&self) -> &Option<i64> {
        &self.statement_sequence
    }

    pub fn next_seq_number(&mut self) -> i32 {
        self.seq_number += 1;
        self.seq_number
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    // Moves the session to its final state and closes the transport.
    // Every subsequent operation fails with `HdbError::Closed`.
    pub fn force_close(&mut self) {
        self.dead = true;
        self.tcp_client.close();
    }

    pub fn pop_warnings(&mut self) -> Option<Vec<ServerError>> {
        if self.warnings.is_empty() {
            None
        } else {
            let mut v = Vec::<ServerError>::new();
            mem::swap(&mut v, &mut self.warnings);
            Some(v)
        }
    }

    pub fn augment_request(&mut self, request: &mut Request) {
        if self.authenticated {
            if let Some(ssi_value) = *self.statement_sequence() {
                request.add_statement_context(ssi_value);
            }
        }
    }

    // Sends the request as one packet and parses the one reply packet.
    // Session-level parts (STATEMENT_CONTEXT, TRANSACTION_FLAGS) are
    // applied to the connection state before returning, also when the
    // reply carries an ERROR part.
    //
    // The second member of the returned pair holds the tails of LOB
    // parameters that exceeded the inline budget; the caller must ship
    // them with `send_lob_tails`.
    pub(crate) fn roundtrip(
        &mut self,
        request: &Request,
        am_conn_core: &AmConnCore,
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        o_rs: &mut Option<&mut RsState>,
    ) -> HdbResult<(Reply, Vec<Vec<u8>>)> {
        if self.dead {
            return Err(HdbError::Closed);
        }
        let default_error_handling = !matches!(request.message_type(), MessageType::Authenticate);
        let (session_id, nsn) = (self.session_id, self.next_seq_number());
        let auto_commit = self.configuration.is_auto_commit();
        let lob_write_length = self.configuration.lob_write_length();
        let trace = self.configuration.is_trace();

        let lob_tails = {
            let w: &mut dyn std::io::Write = self.tcp_client.writer();
            if trace {
                let mut w = LoggingWriter::new(w);
                request.emit(
                    session_id,
                    nsn,
                    auto_commit,
                    o_a_descriptors,
                    lob_write_length,
                    &mut w,
                )?
            } else {
                request.emit(
                    session_id,
                    nsn,
                    auto_commit,
                    o_a_descriptors,
                    lob_write_length,
                    w,
                )?
            }
        };

        let mut reply = {
            let rdr: &mut dyn std::io::Read = self.tcp_client.reader();
            if trace {
                let mut rdr = LoggingReader::new(rdr);
                Reply::parse(o_a_rsmd, o_a_descriptors, o_rs, am_conn_core, &mut rdr)?
            } else {
                Reply::parse(o_a_rsmd, o_a_descriptors, o_rs, am_conn_core, rdr)?
            }
        };

        if default_error_handling {
            self.handle_db_error(&mut reply)?;
        }
        Ok((reply, lob_tails))
    }

    // Applies session-level parts and turns ERROR parts into HdbError::Db.
    // Warnings are collected on the connection instead of raising.
    fn handle_db_error(&mut self, reply: &mut Reply) -> HdbResult<()> {
        self.warnings.clear();

        while let Some(Part::StatementContext(stmt_ctx)) =
            reply.parts.remove_first_of_kind(PartKind::StatementContext)
        {
            self.evaluate_statement_context(&stmt_ctx);
        }
        let mut o_session_closing = None;
        while let Some(Part::TransactionFlags(ta_flags)) =
            reply.parts.remove_first_of_kind(PartKind::TransactionFlags)
        {
            if let Err(e) = self.evaluate_ta_flags(&ta_flags) {
                o_session_closing = Some(e);
            }
        }

        // retrieve server errors from returned parts
        if let Some(Part::Error(server_warnings_and_errors)) =
            reply.parts.remove_first_of_kind(PartKind::Error)
        {
            let (warnings, server_errors): (Vec<ServerError>, Vec<ServerError>) =
                server_warnings_and_errors
                    .into_iter()
                    .partition(|se| se.severity() == &Severity::Warning);
            self.warnings = warnings;
            if !server_errors.is_empty() {
                return Err(o_session_closing.unwrap_or(HdbError::Db(server_errors)));
            }
        }

        match o_session_closing {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // Sends the follow-up chunks of LOB parameters that exceeded the
    // inline budget of their EXECUTE request.
    pub(crate) fn send_lob_tails(
        &mut self,
        am_conn_core: &AmConnCore,
        locator_ids: &[u64],
        lob_tails: Vec<Vec<u8>>,
    ) -> HdbResult<()> {
        if locator_ids.len() != lob_tails.len() {
            return Err(impl_err!(
                "server returned {} locators for {} unfinished LOB parameters",
                locator_ids.len(),
                lob_tails.len()
            ));
        }
        let lob_write_length = self.configuration.lob_write_length();
        for (locator_id, tail) in locator_ids.iter().zip(lob_tails) {
            let mut offset = 0_usize;
            while offset < tail.len() {
                let end = std::cmp::min(offset + lob_write_length, tail.len());
                let last_data = end == tail.len();
                let mut request = Request::new(MessageType::WriteLob, 0);
                request.push(Part::WriteLobRequest(WriteLobRequest::new(
                    *locator_id,
                    i64::try_from(offset).map_err(|_| impl_err!("LOB offset overflow"))?,
                    &tail[offset..end],
                    last_data,
                )));
                let (reply, _) = self.roundtrip(&request, am_conn_core, None, None, &mut None)?;
                reply.assert_expected_function_code(FunctionCode::WriteLob)?;
                offset = end;
            }
        }
        Ok(())
    }
}

impl Drop for ConnectionCore {
    // try to send a disconnect to the database, ignore all errors
    fn drop(&mut self) {
        debug!("Drop of ConnectionCore, session_id = {}", self.session_id);
        if self.authenticated && !self.dead {
            let request = Request::new_for_disconnect();
            let session_id = self.session_id;
            let nsn = self.next_seq_number();
            let w: &mut dyn std::io::Write = self.tcp_client.writer();
            request
                .emit(session_id, nsn, false, None, 0, w)
                .map_err(|e| {
                    warn!("Disconnect request failed with {e:?}");
                    e
                })
                .ok();
        }
    }
}

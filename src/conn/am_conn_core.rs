use crate::{
    conn::{ConnectParams, ConnectionConfiguration, ConnectionCore},
    hdb_error::impl_err,
    protocol::{
        parts::{ParameterDescriptors, ResultSetMetadata, RsState},
        Part, PartKind, Reply, Request,
    },
    HdbResult,
};
use std::sync::{Arc, Mutex, Weak};

// A thread-safe handle to the connection core. All requests of a session
// are serialized through the contained mutex (single request/reply in
// flight per session).
#[derive(Clone, Debug)]
pub(crate) struct AmConnCore(Arc<Mutex<ConnectionCore>>);

impl AmConnCore {
    pub fn try_new(
        params: ConnectParams,
        configuration: ConnectionConfiguration,
    ) -> HdbResult<Self> {
        let conn_core = ConnectionCore::try_new(params, configuration)?;
        let am_conn_core = Self(Arc::new(Mutex::new(conn_core)));
        let auth_result = am_conn_core.lock()?.authenticate_attempt(&am_conn_core);
        if let Err(e) = auth_result {
            // a failed handshake ends the session, the transport is closed
            if let Ok(mut conn_core) = am_conn_core.lock() {
                conn_core.force_close();
            }
            return Err(e);
        }
        Ok(am_conn_core)
    }

    pub fn lock(&self) -> HdbResult<std::sync::MutexGuard<'_, ConnectionCore>> {
        Ok(self.0.lock()?)
    }

    pub fn downgrade(&self) -> WeakAmConnCore {
        WeakAmConnCore(Arc::downgrade(&self.0))
    }

    // Sends a request and evaluates the reply: session-level parts are
    // applied to the connection state, server errors are raised.
    // A fatal error moves the session to closed.
    pub fn full_send(
        &self,
        mut request: Request,
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        o_rs: &mut Option<&mut RsState>,
    ) -> HdbResult<Reply> {
        trace!("AmConnCore::full_send()");
        let mut conn_core = self.lock()?;
        conn_core.augment_request(&mut request);
        let result = (|| {
            let (mut reply, lob_tails) =
                conn_core.roundtrip(&request, self, o_a_rsmd, o_a_descriptors, o_rs)?;
            if !lob_tails.is_empty() {
                // the value of a LOB parameter was not yet complete;
                // ship the rest to the locators the server assigned
                let Some(Part::WriteLobReply(write_lob_reply)) =
                    reply.parts.remove_first_of_kind(PartKind::WriteLobReply)
                else {
                    return Err(impl_err!(
                        "no WriteLobReply despite unfinished LOB parameters"
                    ));
                };
                conn_core.send_lob_tails(self, &write_lob_reply.into_locator_ids(), lob_tails)?;
            }
            Ok(reply)
        })();
        match result {
            Ok(reply) => Ok(reply),
            Err(e) => {
                if e.is_fatal() {
                    debug!("full_send(): fatal error, closing the session");
                    conn_core.force_close();
                }
                Err(e)
            }
        }
    }
}

// The weak counterpart of `AmConnCore`, held by result sets, prepared
// statements, and LOB handles. It does not keep the session alive.
#[derive(Clone, Debug)]
pub(crate) struct WeakAmConnCore(Weak<Mutex<ConnectionCore>>);

impl WeakAmConnCore {
    pub fn upgrade(&self) -> HdbResult<AmConnCore> {
        self.0
            .upgrade()
            .map(AmConnCore)
            .ok_or(crate::HdbError::Closed)
    }
}

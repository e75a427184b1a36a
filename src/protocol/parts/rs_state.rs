use crate::{
    conn::{AmConnCore, WeakAmConnCore},
    hdb_error::impl_err,
    protocol::{
        parts::{Parts, ResultSetMetadata},
        FunctionCode, MessageType, Part, PartAttributes, PartKind, Request,
    },
    HdbResult, HdbValue, Row,
};
use std::sync::Arc;

// The server-side cursor: resultset id plus the attributes of the last
// received RESULT_SET part. The session reference is weak: a result set
// does not keep its session alive.
#[derive(Debug)]
pub(crate) struct RsCore {
    am_conn_core: WeakAmConnCore,
    resultset_id: u64,
    attributes: PartAttributes,
}

impl RsCore {
    fn new(am_conn_core: &AmConnCore, attributes: PartAttributes, resultset_id: u64) -> Self {
        Self {
            am_conn_core: am_conn_core.downgrade(),
            resultset_id,
            attributes,
        }
    }

    fn set_attributes(&mut self, attributes: PartAttributes) {
        self.attributes = attributes;
    }

    fn is_closed_on_server(&self) -> bool {
        self.attributes.resultset_is_closed() || self.attributes.is_last_packet()
    }
}

impl Drop for RsCore {
    // inform the server that the result set is no longer needed, unless it
    // already closed the result set itself or is gone entirely
    fn drop(&mut self) {
        if !self.is_closed_on_server() {
            if let Ok(am_conn_core) = self.am_conn_core.upgrade() {
                let mut request = Request::new(MessageType::CloseResultSet, 0);
                request.push(Part::ResultSetId(self.resultset_id));
                if let Err(e) = am_conn_core.full_send(request, None, None, &mut None) {
                    warn!("CloseResultSet request failed with {e:?}");
                }
            }
        }
    }
}

// Local buffer of already-received rows plus the control state needed to
// issue FETCH_NEXT round trips for the rest.
#[derive(Debug)]
pub(crate) struct RsState {
    next_rows: Vec<Row>,
    row_iter: <Vec<Row> as IntoIterator>::IntoIter,
    o_rs_core: Option<RsCore>,
}

impl RsState {
    fn new(am_conn_core: &AmConnCore, attributes: PartAttributes, resultset_id: u64) -> Self {
        Self {
            next_rows: Vec::<Row>::new(),
            row_iter: Vec::<Row>::new().into_iter(),
            o_rs_core: Some(RsCore::new(am_conn_core, attributes, resultset_id)),
        }
    }

    pub(crate) fn set_attributes(&mut self, attributes: PartAttributes) {
        if let Some(ref mut rs_core) = self.o_rs_core {
            rs_core.set_attributes(attributes);
        }
    }

    // number of rows that are buffered locally
    #[allow(clippy::len_without_is_empty)]
    pub(crate) fn len(&self) -> usize {
        self.next_rows.len() + self.row_iter.len()
    }

    // true as soon as no further FETCH_NEXT will produce rows
    pub(crate) fn is_complete(&self) -> HdbResult<bool> {
        if let Some(ref rs_core) = self.o_rs_core {
            let attributes = &rs_core.attributes;
            if (!attributes.is_last_packet())
                && (attributes.row_not_found() || attributes.resultset_is_closed())
            {
                Err(impl_err!(
                    "ResultSet attributes inconsistent: incomplete, but already closed on server",
                ))
            } else {
                Ok(attributes.is_last_packet())
            }
        } else {
            Ok(true)
        }
    }

    pub(crate) fn next_row(&mut self, a_rsmd: &Arc<ResultSetMetadata>) -> HdbResult<Option<Row>> {
        if let Some(r) = self.row_iter.next() {
            Ok(Some(r))
        } else {
            if self.next_rows.is_empty() {
                if self.is_complete()? {
                    return Ok(None);
                }
                self.fetch_next(a_rsmd)?;
            }
            let mut tmp_vec = Vec::<Row>::new();
            std::mem::swap(&mut tmp_vec, &mut self.next_rows);
            self.row_iter = tmp_vec.into_iter();
            Ok(self.row_iter.next())
        }
    }

    pub(crate) fn fetch_all(&mut self, a_rsmd: &Arc<ResultSetMetadata>) -> HdbResult<()> {
        while !self.is_complete()? {
            self.fetch_next(a_rsmd)?;
        }
        Ok(())
    }

    fn fetch_next(&mut self, a_rsmd: &Arc<ResultSetMetadata>) -> HdbResult<()> {
        trace!("RsState::fetch_next()");
        let (am_conn_core, resultset_id) = {
            let rs_core = self.o_rs_core.as_ref().ok_or(crate::HdbError::Closed)?;
            (rs_core.am_conn_core.upgrade()?, rs_core.resultset_id)
        };
        let fetch_size = am_conn_core.lock()?.configuration().fetch_size();

        debug!("RsState::fetch_next() with fetch_size = {fetch_size}");
        let mut request = Request::new(MessageType::FetchNext, 0);
        request.push(Part::ResultSetId(resultset_id));
        request.push(Part::FetchSize(fetch_size));

        let mut reply = am_conn_core.full_send(request, Some(a_rsmd), None, &mut Some(self))?;
        reply.assert_expected_function_code(FunctionCode::Fetch)?;
        reply.parts.pop_if_kind(PartKind::ResultSet);

        // with the last packet the server closes the result set by itself
        if self
            .o_rs_core
            .as_ref()
            .is_some_and(RsCore::is_closed_on_server)
        {
            self.o_rs_core = None;
        }
        Ok(())
    }

    // Closes the cursor on the server unless it is already closed there.
    pub(crate) fn close(&mut self) -> HdbResult<()> {
        if let Some(mut rs_core) = self.o_rs_core.take() {
            if !rs_core.is_closed_on_server() {
                let mut request = Request::new(MessageType::CloseResultSet, 0);
                request.push(Part::ResultSetId(rs_core.resultset_id));
                // mark closed first so that Drop does not repeat the request
                let am_conn_core = rs_core.am_conn_core.upgrade()?;
                rs_core.set_attributes(PartAttributes::new(0b_0001_0000));
                am_conn_core.full_send(request, None, None, &mut None)?;
            }
        }
        self.next_rows.clear();
        self.row_iter = Vec::<Row>::new().into_iter();
        Ok(())
    }

    // Result sets appear in a reply in three constellations:
    //
    // a) a response to a plain "execute": the metadata come in another part
    //    of the same reply and were pushed to `parts` before us
    //
    // b) a response to an "execute prepared": only data; the metadata were
    //    returned with the "prepare" and are passed in as `o_a_rsmd`
    //
    // c) a response to a FETCH_NEXT: rows are appended to the result set
    //    that issued the fetch (`o_rs`)
    //
    // Note: this runs while the connection mutex is held, so it must not
    // lock the connection; session-level parts (STATEMENT_CONTEXT,
    // TRANSACTION_FLAGS) stay in `parts` and are applied centrally.
    pub(crate) fn parse(
        no_of_rows: usize,
        attributes: PartAttributes,
        parts: &mut Parts,
        am_conn_core: &AmConnCore,
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_rs: &mut Option<&mut RsState>,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<Option<(RsState, Arc<ResultSetMetadata>)>> {
        match o_rs {
            None => {
                // case a) or b); a STATEMENT_CONTEXT part may sit directly
                // before us - lift it over so that it reaches the central
                // part handling
                let o_stmt_ctx = parts.pop_if_kind(PartKind::StatementContext);

                let Some(Part::ResultSetId(rs_id)) = parts.pop_if_kind(PartKind::ResultSetId)
                else {
                    return Err(impl_err!("ResultSetId missing"));
                };

                let a_rsmd = match parts.pop_if_kind(PartKind::ResultSetMetadata) {
                    Some(Part::ResultSetMetadata(rsmd)) => Arc::new(rsmd),
                    None => match o_a_rsmd {
                        Some(a_rsmd) => Arc::clone(a_rsmd),
                        None => return Err(impl_err!("No metadata provided for ResultSet")),
                    },
                    Some(_) => {
                        return Err(impl_err!("Inconsistent metadata part found for ResultSet"));
                    }
                };

                if let Some(stmt_ctx_part) = o_stmt_ctx {
                    parts.push(stmt_ctx_part);
                }

                let mut rs_state = Self::new(am_conn_core, attributes, rs_id);
                rs_state.parse_rows(no_of_rows, &a_rsmd, am_conn_core, rdr)?;
                Ok(Some((rs_state, a_rsmd)))
            }

            Some(fetching_state) => {
                // case c)
                let a_rsmd = match o_a_rsmd {
                    Some(a_rsmd) => Arc::clone(a_rsmd),
                    None => return Err(impl_err!("No metadata provided for fetch")),
                };
                fetching_state.set_attributes(attributes);
                fetching_state.parse_rows(no_of_rows, &a_rsmd, am_conn_core, rdr)?;
                Ok(None)
            }
        }
    }

    pub(crate) fn parse_rows(
        &mut self,
        no_of_rows: usize,
        a_rsmd: &Arc<ResultSetMetadata>,
        am_conn_core: &AmConnCore,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<()> {
        trace!("parse_rows(): {no_of_rows} rows");
        self.next_rows.reserve(no_of_rows);
        for _ in 0..no_of_rows {
            let mut values = Vec::<HdbValue<'static>>::with_capacity(a_rsmd.len());
            for fmd in a_rsmd.iter() {
                values.push(HdbValue::parse(
                    fmd.type_id(),
                    fmd.is_nullable(),
                    am_conn_core,
                    rdr,
                )?);
            }
            self.next_rows.push(Row::new(Arc::clone(a_rsmd), values));
        }
        Ok(())
    }
}

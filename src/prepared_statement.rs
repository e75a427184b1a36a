use crate::conn::WeakAmConnCore;
use crate::internal_returnvalue::InternalReturnValue;
use crate::protocol::parts::{ParameterDescriptors, ParameterRows, ResultSetMetadata};
use crate::protocol::{MessageType, Part, Request};
use crate::{
    hdb_error::{impl_err, usage_err},
    HdbResponse, HdbResult, HdbValue,
};
use std::sync::Arc;

/// A SQL statement that was prepared on the server.
///
/// Executing a prepared statement sends only the statement id and the
/// parameter values; the parameter values are encoded positionally against
/// the parameter metadata the server returned for the PREPARE.
///
/// A `PreparedStatement` does not keep its connection alive; executing a
/// statement whose connection is gone fails with
/// [`HdbError::Closed`](crate::HdbError::Closed).
#[derive(Debug)]
pub struct PreparedStatement {
    am_conn_core: WeakAmConnCore,
    statement_id: u64,
    a_descriptors: Arc<ParameterDescriptors>,
    o_a_rsmd: Option<Arc<ResultSetMetadata>>,
}

impl PreparedStatement {
    pub(crate) fn try_new(
        am_conn_core: WeakAmConnCore,
        int_return_values: Vec<InternalReturnValue>,
    ) -> HdbResult<Self> {
        let mut o_statement_id = None;
        let mut a_descriptors = Arc::new(ParameterDescriptors::default());
        let mut o_a_rsmd = None;
        for irv in int_return_values {
            match irv {
                InternalReturnValue::StatementId(id) => o_statement_id = Some(id),
                InternalReturnValue::ParameterMetadata(descriptors) => {
                    a_descriptors = descriptors;
                }
                InternalReturnValue::ResultSetMetadata(a_rsmd) => o_a_rsmd = Some(a_rsmd),
                irv => {
                    return Err(impl_err!("unexpected return value for prepare: {irv:?}"));
                }
            }
        }
        let statement_id =
            o_statement_id.ok_or_else(|| impl_err!("no statement id received for prepare"))?;
        Ok(Self {
            am_conn_core,
            statement_id,
            a_descriptors,
            o_a_rsmd,
        })
    }

    /// The descriptors of the statement's parameters.
    pub fn parameter_descriptors(&self) -> &ParameterDescriptors {
        &self.a_descriptors
    }

    /// The metadata of the result set this statement produces, if it
    /// produces one.
    pub fn result_set_metadata(&self) -> Option<&ResultSetMetadata> {
        self.o_a_rsmd.as_deref()
    }

    /// Executes the statement with a single row of positional parameter
    /// values. Use an empty `Vec` for statements without parameters.
    pub fn execute(&mut self, parameters: Vec<HdbValue<'_>>) -> HdbResult<HdbResponse> {
        let mut rows = ParameterRows::new();
        if self.a_descriptors.has_in() || !parameters.is_empty() {
            rows.push(parameters, &self.a_descriptors)?;
        }
        self.execute_parameter_rows(rows)
    }

    /// Executes the statement with a batch of rows of positional parameter
    /// values.
    pub fn execute_batch(&mut self, batch: Vec<Vec<HdbValue<'_>>>) -> HdbResult<HdbResponse> {
        let mut rows = ParameterRows::new();
        for parameters in batch {
            rows.push(parameters, &self.a_descriptors)?;
        }
        self.execute_parameter_rows(rows)
    }

    /// Executes the statement with named parameter values; the names are
    /// resolved against the parameter metadata.
    pub fn execute_named(
        &mut self,
        named_parameters: Vec<(&str, HdbValue<'_>)>,
    ) -> HdbResult<HdbResponse> {
        let in_count = self.a_descriptors.iter_in().count();
        if named_parameters.len() != in_count {
            return Err(usage_err!(
                "wrong number of parameters: got {}, statement needs {in_count}",
                named_parameters.len()
            ));
        }
        let mut ordered: Vec<Option<HdbValue<'_>>> = (0..in_count).map(|_| None).collect();
        for (name, value) in named_parameters {
            let position = self
                .a_descriptors
                .position_of_in_parameter(name)
                .ok_or_else(|| usage_err!("no input parameter named {name}"))?;
            if ordered[position].replace(value).is_some() {
                return Err(usage_err!("parameter {name} was provided twice"));
            }
        }
        let parameters = ordered
            .into_iter()
            .map(|o_v| o_v.ok_or_else(|| usage_err!("not every parameter was provided")))
            .collect::<HdbResult<Vec<HdbValue<'_>>>>()?;
        self.execute(parameters)
    }

    fn execute_parameter_rows(&mut self, rows: ParameterRows<'_>) -> HdbResult<HdbResponse> {
        debug!("PreparedStatement::execute_parameter_rows()");
        let am_conn_core = self.am_conn_core.upgrade()?;
        self.assert_lob_budget(&rows, am_conn_core.lock()?.configuration().lob_write_length())?;

        let mut request = Request::new(MessageType::Execute, 0);
        request.push(Part::StatementId(self.statement_id));
        if !rows.is_empty() {
            request.push(Part::Parameters(rows));
        }

        let reply = am_conn_core.full_send(
            request,
            self.o_a_rsmd.as_ref(),
            Some(&self.a_descriptors),
            &mut None,
        )?;
        HdbResponse::try_new(InternalReturnValue::try_from_reply(reply)?)
    }

    // Writing several rows of LOB values in one statement is only possible
    // as long as everything fits into the single-request payload budget.
    fn assert_lob_budget(&self, rows: &ParameterRows<'_>, lob_write_length: usize) -> HdbResult<()> {
        if rows.count() > 1 {
            let lob_bytes = rows.lob_size(&self.a_descriptors)?;
            if lob_bytes > lob_write_length {
                return Err(usage_err!(
                    "LOB values of a multi-row execute exceed the request budget \
                     of {lob_write_length} bytes"
                ));
            }
        }
        Ok(())
    }
}

impl Drop for PreparedStatement {
    // inform the server that the prepared statement is no longer needed
    fn drop(&mut self) {
        trace!("PreparedStatement::drop()");
        if let Ok(am_conn_core) = self.am_conn_core.upgrade() {
            let mut request = Request::new(MessageType::DropStatementId, 0);
            request.push(Part::StatementId(self.statement_id));
            if let Err(e) = am_conn_core.full_send(request, None, None, &mut None) {
                warn!("DropStatementId request failed with {e:?}");
            }
        }
    }
}

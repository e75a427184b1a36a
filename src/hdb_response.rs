use crate::internal_returnvalue::InternalReturnValue;
use crate::protocol::parts::{ExecutionResults, OutputParameters};
use crate::{
    hdb_error::{impl_err, usage_err},
    HdbResult, HdbReturnValue, ResultSet,
};

/// Represents all possible non-error responses to a database command.
///
/// In the simple cases (a query, a DML statement) the response consists of
/// a single return value and the respective `into_` method converts it
/// directly. Procedure calls can produce several return values; those are
/// accessed by iterating.
#[derive(Debug)]
pub struct HdbResponse {
    return_values: Vec<HdbReturnValue>,
}

impl HdbResponse {
    pub(crate) fn try_new(int_return_values: Vec<InternalReturnValue>) -> HdbResult<Self> {
        let mut return_values = Vec::<HdbReturnValue>::with_capacity(int_return_values.len());
        for irv in int_return_values {
            match irv {
                InternalReturnValue::RsState((rs_state, a_rsmd)) => {
                    return_values.push(HdbReturnValue::ResultSet(ResultSet::new(
                        rs_state, a_rsmd,
                    )));
                }
                InternalReturnValue::ExecutionResults(execution_results) => {
                    return_values.push(HdbReturnValue::ExecutionResults(execution_results));
                }
                InternalReturnValue::OutputParameters(output_parameters) => {
                    return_values.push(HdbReturnValue::OutputParameters(output_parameters));
                }
                InternalReturnValue::ParameterMetadata(_)
                | InternalReturnValue::ResultSetMetadata(_)
                | InternalReturnValue::StatementId(_) => {
                    return Err(impl_err!(
                        "metadata-only return value not consumed by the statement layer"
                    ));
                }
            }
        }
        if return_values.is_empty() {
            return_values.push(HdbReturnValue::Success);
        }
        Ok(Self { return_values })
    }

    /// Number of contained return values.
    pub fn count(&self) -> usize {
        self.return_values.len()
    }

    /// Converts into a single [`ResultSet`].
    pub fn into_result_set(self) -> HdbResult<ResultSet> {
        match self.into_single_return_value()? {
            HdbReturnValue::ResultSet(result_set) => Ok(result_set),
            other => Err(usage_err!("The response is a {other}, not a result set")),
        }
    }

    /// Converts into the execution results of a DML statement.
    pub fn into_execution_results(self) -> HdbResult<ExecutionResults> {
        match self.into_single_return_value()? {
            HdbReturnValue::ExecutionResults(execution_results) => Ok(execution_results),
            other => Err(usage_err!(
                "The response is a {other}, not a list of execution results"
            )),
        }
    }

    /// Converts into the affected-rows count of a DML statement.
    pub fn into_affected_rows(self) -> HdbResult<usize> {
        Ok(self.into_execution_results()?.total_rows_affected())
    }

    /// Converts into the output parameters of a procedure call.
    pub fn into_output_parameters(self) -> HdbResult<OutputParameters> {
        let mut o_output_parameters = None;
        for rv in self.return_values {
            if let HdbReturnValue::OutputParameters(op) = rv {
                o_output_parameters = Some(op);
            }
        }
        o_output_parameters
            .ok_or_else(|| usage_err!("The response does not contain output parameters"))
    }

    /// Verifies that the response is a simple success.
    pub fn into_success(self) -> HdbResult<()> {
        match self.into_single_return_value()? {
            HdbReturnValue::Success => Ok(()),
            HdbReturnValue::ExecutionResults(execution_results)
                if execution_results.is_success() =>
            {
                Ok(())
            }
            other => Err(usage_err!("The response is a {other}, not a success")),
        }
    }

    fn into_single_return_value(mut self) -> HdbResult<HdbReturnValue> {
        if self.return_values.len() == 1 {
            Ok(self.return_values.remove(0))
        } else {
            Err(usage_err!(
                "The response contains {} return values, not 1",
                self.return_values.len()
            ))
        }
    }
}

impl IntoIterator for HdbResponse {
    type Item = HdbReturnValue;
    type IntoIter = std::vec::IntoIter<HdbReturnValue>;
    fn into_iter(self) -> Self::IntoIter {
        self.return_values.into_iter()
    }
}

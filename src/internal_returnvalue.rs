use crate::protocol::parts::{
    ExecutionResults, OutputParameters, ParameterDescriptors, ResultSetMetadata, RsState,
};
use crate::protocol::{Part, Reply};
use crate::HdbResult;
use std::sync::Arc;

// What a reply can be dispatched into, before it is packaged for the API.
#[derive(Debug)]
pub(crate) enum InternalReturnValue {
    RsState((RsState, Arc<ResultSetMetadata>)),
    ExecutionResults(ExecutionResults),
    OutputParameters(OutputParameters),
    ParameterMetadata(Arc<ParameterDescriptors>),
    ResultSetMetadata(Arc<ResultSetMetadata>),
    StatementId(u64),
}

impl InternalReturnValue {
    // Digests the parts of an already error-checked reply.
    pub(crate) fn try_from_reply(reply: Reply) -> HdbResult<Vec<InternalReturnValue>> {
        let mut int_return_values = Vec::<InternalReturnValue>::new();
        for part in reply.parts {
            match part {
                Part::RsState(Some(rs_and_rsmd)) => {
                    int_return_values.push(InternalReturnValue::RsState(rs_and_rsmd));
                }
                Part::RsState(None) => {} // continuation of a fetch
                Part::ExecutionResults(execution_results) => {
                    int_return_values
                        .push(InternalReturnValue::ExecutionResults(execution_results));
                }
                Part::OutputParameters(output_parameters) => {
                    int_return_values
                        .push(InternalReturnValue::OutputParameters(output_parameters));
                }
                Part::ParameterMetadata(descriptors) => {
                    int_return_values
                        .push(InternalReturnValue::ParameterMetadata(Arc::new(descriptors)));
                }
                Part::ResultSetMetadata(rsmd) => {
                    int_return_values.push(InternalReturnValue::ResultSetMetadata(Arc::new(rsmd)));
                }
                Part::StatementId(statement_id) => {
                    int_return_values.push(InternalReturnValue::StatementId(statement_id));
                }
                part => warn!(
                    "try_from_reply(): ignoring unexpected part of kind {:?}",
                    part.kind()
                ),
            }
        }
        Ok(int_return_values)
    }
}

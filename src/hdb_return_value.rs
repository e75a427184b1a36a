use crate::protocol::parts::{ExecutionResults, OutputParameters};
use crate::ResultSet;

/// A single database response value.
#[derive(Debug)]
pub enum HdbReturnValue {
    /// A result set of a query.
    ResultSet(ResultSet),
    /// The outcomes of a DML statement.
    ExecutionResults(ExecutionResults),
    /// The OUT and INOUT values of a procedure call.
    OutputParameters(OutputParameters),
    /// Indication that a db call was successful.
    Success,
}

impl std::fmt::Display for HdbReturnValue {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::ResultSet(ref result_set) => write!(fmt, "{result_set:?}"),
            Self::ExecutionResults(ref execution_results) => write!(fmt, "{execution_results}"),
            Self::OutputParameters(ref output_parameters) => write!(fmt, "{output_parameters}"),
            Self::Success => write!(fmt, "Success"),
        }
    }
}

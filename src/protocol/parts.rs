mod authfields;
mod client_context;
mod execution_results;
mod field_metadata;
mod hdb_value;
pub(crate) mod length_indicator;
mod multiline_option_part;
mod option_part;
mod option_value;
mod output_parameters;
mod parameter_descriptor;
mod parameter_rows;
mod read_lob_reply;
mod read_lob_request;
mod resultset_metadata;
pub(crate) mod rs_state;
mod server_error;
mod statement_context;
mod topology;
mod transactionflags;
mod type_id;
mod write_lob_reply;
mod write_lob_request;

pub(crate) use self::{
    authfields::AuthFields,
    client_context::ClientContext,
    option_value::OptionValue,
    parameter_rows::ParameterRows,
    read_lob_reply::ReadLobReply,
    read_lob_request::ReadLobRequest,
    rs_state::RsState,
    statement_context::StatementContext,
    topology::Topology,
    transactionflags::{TaFlagId, TransactionFlags},
    write_lob_reply::WriteLobReply,
    write_lob_request::WriteLobRequest,
};
pub use self::{
    execution_results::{ExecutionResult, ExecutionResults},
    field_metadata::FieldMetadata,
    hdb_value::HdbValue,
    output_parameters::OutputParameters,
    parameter_descriptor::{
        ParameterBinding, ParameterDescriptor, ParameterDescriptors, ParameterDirection,
    },
    resultset_metadata::ResultSetMetadata,
    server_error::{ServerError, Severity},
    type_id::TypeId,
};

use crate::protocol::{Part, PartKind};

// The ordered list of parts of a message.
#[derive(Debug, Default)]
pub(crate) struct Parts<'a>(Vec<Part<'a>>);

impl<'a> Parts<'a> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, part: Part<'a>) {
        self.0.push(part);
    }
    pub fn pop_if_kind(&mut self, kind: PartKind) -> Option<Part<'a>> {
        match self.0.last() {
            Some(part) if part.kind() == kind => self.0.pop(),
            _ => None,
        }
    }

    pub fn remove_first_of_kind(&mut self, kind: PartKind) -> Option<Part<'a>> {
        self.0
            .iter()
            .position(|p| p.kind() == kind)
            .map(|i| self.0.remove(i))
    }

    pub fn ref_inner(&self) -> &Vec<Part<'a>> {
        &self.0
    }
}

impl<'a> IntoIterator for Parts<'a> {
    type Item = Part<'a>;
    type IntoIter = std::vec::IntoIter<Part<'a>>;
    fn into_iter(self) -> std::vec::IntoIter<Part<'a>> {
        self.0.into_iter()
    }
}

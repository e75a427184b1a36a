use crate::{
    conn::AmConnCore,
    hdb_error::impl_err,
    protocol::{
        parts::{
            AuthFields, ClientContext, ExecutionResults, OutputParameters, ParameterDescriptors,
            ParameterRows, Parts, ReadLobReply, ReadLobRequest, ResultSetMetadata, RsState,
            ServerError, StatementContext, Topology, TransactionFlags, WriteLobReply,
            WriteLobRequest,
        },
        util, util_sync, PartAttributes, PartKind,
    },
    HdbResult,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{cmp::max, sync::Arc};

const PART_HEADER_SIZE: usize = 16;

#[derive(Debug)]
pub(crate) enum Part<'a> {
    Auth(AuthFields),
    ClientContext(ClientContext),
    ClientId(String),
    Command(&'a str),
    Error(Vec<ServerError>),
    ExecutionResults(ExecutionResults),
    FetchSize(u32),
    OutputParameters(OutputParameters),
    ParameterMetadata(ParameterDescriptors),
    Parameters(ParameterRows<'a>),
    ReadLobRequest(ReadLobRequest),
    ReadLobReply(ReadLobReply),
    ResultSetId(u64),
    ResultSetMetadata(ResultSetMetadata),
    RsState(Option<(RsState, Arc<ResultSetMetadata>)>),
    StatementContext(StatementContext),
    StatementId(u64),
    TopologyInformation(Topology),
    TransactionFlags(TransactionFlags),
    WriteLobRequest(WriteLobRequest<'a>),
    WriteLobReply(WriteLobReply),
}

impl<'a> Part<'a> {
    pub fn kind(&self) -> PartKind {
        match &self {
            Self::Auth(_) => PartKind::Authentication,
            Self::ClientContext(_) => PartKind::ClientContext,
            Self::ClientId(_) => PartKind::ClientId,
            Self::Command(_) => PartKind::Command,
            Self::Error(_) => PartKind::Error,
            Self::ExecutionResults(_) => PartKind::RowsAffected,
            Self::FetchSize(_) => PartKind::FetchSize,
            Self::OutputParameters(_) => PartKind::OutputParameters,
            Self::ParameterMetadata(_) => PartKind::ParameterMetadata,
            Self::Parameters(_) => PartKind::Parameters,
            Self::ReadLobRequest(_) => PartKind::ReadLobRequest,
            Self::ReadLobReply(_) => PartKind::ReadLobReply,
            Self::ResultSetId(_) => PartKind::ResultSetId,
            Self::ResultSetMetadata(_) => PartKind::ResultSetMetadata,
            Self::RsState(_) => PartKind::ResultSet,
            Self::StatementContext(_) => PartKind::StatementContext,
            Self::StatementId(_) => PartKind::StatementId,
            Self::TopologyInformation(_) => PartKind::TopologyInformation,
            Self::TransactionFlags(_) => PartKind::TransactionFlags,
            Self::WriteLobRequest(_) => PartKind::WriteLobRequest,
            Self::WriteLobReply(_) => PartKind::WriteLobReply,
        }
    }

    // only called on output (emit)
    fn count(&self) -> HdbResult<usize> {
        Ok(match *self {
            Part::ClientId(_)
            | Part::Command(_)
            | Part::FetchSize(_)
            | Part::ReadLobRequest(_)
            | Part::ResultSetId(_)
            | Part::StatementId(_)
            | Part::WriteLobRequest(_) => 1,
            Part::Auth(_) => 1,
            Part::ClientContext(ref opts) => opts.len(),
            Part::Parameters(ref par_rows) => par_rows.count(),
            Part::StatementContext(ref sc) => sc.len(),
            ref a => {
                return Err(impl_err!("count() called on {a:?}"));
            }
        })
    }

    pub fn size(
        &self,
        with_padding: bool,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        Ok(PART_HEADER_SIZE + self.body_size(with_padding, o_a_descriptors, lob_write_length)?)
    }
    fn body_size(
        &self,
        with_padding: bool,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        let mut size = 0_usize;
        match *self {
            Part::Auth(ref af) => size += af.size(),
            Part::ClientContext(ref opts) => size += opts.size(),
            Part::ClientId(ref s) => size += s.len(),
            Part::Command(s) => size += util::cesu8_length(s),
            Part::FetchSize(_) => size += 4,
            Part::Parameters(ref par_rows) => {
                size += o_a_descriptors
                    .ok_or_else(|| impl_err!("Part::body_size(): no parameter descriptors"))
                    .and_then(|descriptors| par_rows.size(descriptors, lob_write_length))?;
            }
            Part::ReadLobRequest(_) => size += ReadLobRequest::size(),
            Part::WriteLobRequest(ref r) => size += r.size(),
            Part::ResultSetId(_) | Part::StatementId(_) => size += 8,
            Part::StatementContext(ref sc) => size += sc.size(),
            ref arg => {
                return Err(impl_err!("size() called on {arg:?}"));
            }
        }
        if with_padding {
            size += padsize(size);
        }
        trace!("Part_buffer_size = {size}");
        Ok(size)
    }

    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_possible_wrap)]
    pub fn emit(
        &self,
        mut remaining_bufsize: u32,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
        lob_tails: &mut Vec<Vec<u8>>,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<u32> {
        debug!("Serializing part of kind {:?}", self.kind());
        // PART HEADER 16 bytes
        w.write_i8(self.kind() as i8)?;
        w.write_u8(0)?; // U1 Attributes not used in requests
        match self.count()? {
            i if i < i16::MAX as usize => {
                w.write_i16::<LittleEndian>(i as i16)?;
                w.write_i32::<LittleEndian>(0)?;
            }
            i if i32::try_from(i).is_ok() => {
                w.write_i16::<LittleEndian>(-1)?;
                w.write_i32::<LittleEndian>(i as i32)?;
            }
            _ => {
                return Err(impl_err!("part count bigger than i32::MAX"));
            }
        }
        let body_size = self.body_size(false, o_a_descriptors, lob_write_length)?;
        w.write_i32::<LittleEndian>(body_size as i32)?;
        w.write_i32::<LittleEndian>(remaining_bufsize as i32)?;

        remaining_bufsize -= PART_HEADER_SIZE as u32;

        match *self {
            Part::Auth(ref af) => af.emit(w)?,
            Part::ClientContext(ref opts) => opts.emit(w)?,
            Part::ClientId(ref s) => w.write_all(s.as_bytes())?,
            Part::Command(s) => w.write_all(&cesu8::to_cesu8(s))?,
            Part::FetchSize(fs) => w.write_u32::<LittleEndian>(fs)?,
            Part::Parameters(ref parameters) => {
                let mut tails = o_a_descriptors
                    .ok_or_else(|| impl_err!("Part::Parameters::emit(): no metadata"))
                    .and_then(|descriptors| parameters.emit(descriptors, lob_write_length, w))?;
                lob_tails.append(&mut tails);
            }
            Part::ReadLobRequest(ref r) => r.emit(w)?,
            Part::ResultSetId(rs_id) => w.write_u64::<LittleEndian>(rs_id)?,
            Part::StatementId(stmt_id) => w.write_u64::<LittleEndian>(stmt_id)?,
            Part::StatementContext(ref sc) => sc.emit(w)?,
            Part::WriteLobRequest(ref r) => r.emit(w)?,
            ref a => {
                return Err(impl_err!("emit() called on {a:?}"));
            }
        }

        let padsize = padsize(body_size);
        for _ in 0..padsize {
            w.write_u8(0)?;
        }

        trace!("remaining_bufsize: {remaining_bufsize}, size: {body_size}, padsize: {padsize}");
        Ok(remaining_bufsize - body_size as u32 - padsize as u32)
    }

    // Parses a single part. An unknown part kind is skipped over and
    // reported as `None`; the caller discards it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn parse(
        already_received_parts: &mut Parts,
        am_conn_core: &AmConnCore,
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        o_rs: &mut Option<&mut RsState>,
        last: bool,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<Option<Part<'static>>> {
        trace!("parse()");
        let (kind_byte, attributes, arg_size, no_of_args) = parse_header(rdr)?;
        let o_kind = match PartKind::from_i8(kind_byte) {
            Ok(kind) => Some(kind),
            Err(_) => None,
        };
        debug!(
            "parse() found part of kind {o_kind:?} with attributes {attributes:?}, \
             arg_size {arg_size} and no_of_args {no_of_args}",
        );

        let Some(kind) = o_kind else {
            // unknown part kinds are skipped, including their padding
            warn!("ignoring part of unknown kind {kind_byte}");
            skip_padded(arg_size, last, rdr)?;
            return Ok(None);
        };

        let arg = Part::parse_body(
            kind,
            attributes,
            no_of_args,
            already_received_parts,
            am_conn_core,
            o_a_rsmd,
            o_a_descriptors,
            o_rs,
            rdr,
        )?;

        let padsize = 7 - (arg_size + 7) % 8;
        match (kind, last) {
            (PartKind::ResultSet | PartKind::ResultSetId | PartKind::ReadLobReply, true)
            | (PartKind::Error, _) => {}
            (_, _) => {
                debug!("parse() skips over {padsize} padding bytes");
                util_sync::skip_bytes(padsize, rdr)?;
            }
        }

        Ok(Some(arg))
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_body(
        kind: PartKind,
        attributes: PartAttributes,
        no_of_args: usize,
        parts: &mut Parts,
        am_conn_core: &AmConnCore,
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        o_rs: &mut Option<&mut RsState>,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<Part<'static>> {
        trace!("parse_body(no_of_args={no_of_args}, kind={kind:?})");

        let arg = match kind {
            PartKind::Authentication => Part::Auth(AuthFields::parse(rdr)?),
            PartKind::Error => Part::Error(ServerError::parse(no_of_args, rdr)?),
            PartKind::RowsAffected => {
                Part::ExecutionResults(ExecutionResults::parse(no_of_args, rdr)?)
            }
            PartKind::OutputParameters => o_a_descriptors
                .ok_or_else(|| impl_err!("Parsing output parameters needs metadata"))
                .and_then(|descriptors| OutputParameters::parse(am_conn_core, descriptors, rdr))
                .map(Part::OutputParameters)?,
            PartKind::ParameterMetadata => {
                Part::ParameterMetadata(ParameterDescriptors::parse(no_of_args, rdr)?)
            }
            PartKind::ReadLobReply => Part::ReadLobReply(ReadLobReply::parse(rdr)?),
            PartKind::WriteLobReply => Part::WriteLobReply(WriteLobReply::parse(no_of_args, rdr)?),
            PartKind::ResultSet => {
                let rs_state_and_a_rsmd = RsState::parse(
                    no_of_args,
                    attributes,
                    parts,
                    am_conn_core,
                    o_a_rsmd,
                    o_rs,
                    rdr,
                )?;
                Part::RsState(rs_state_and_a_rsmd)
            }
            PartKind::ResultSetId => Part::ResultSetId(rdr.read_u64::<LittleEndian>()?),
            PartKind::ResultSetMetadata => {
                Part::ResultSetMetadata(ResultSetMetadata::parse(no_of_args, rdr)?)
            }
            PartKind::StatementContext => {
                Part::StatementContext(StatementContext::parse(no_of_args, rdr)?)
            }
            PartKind::StatementId => Part::StatementId(rdr.read_u64::<LittleEndian>()?),
            PartKind::TopologyInformation => {
                Part::TopologyInformation(Topology::parse(no_of_args, rdr)?)
            }
            PartKind::TransactionFlags => {
                Part::TransactionFlags(TransactionFlags::parse(no_of_args, rdr)?)
            }
            _ => {
                return Err(impl_err!(
                    "No handling implemented for received partkind {kind:?}"
                ));
            }
        };

        Ok(arg)
    }
}

fn skip_padded(arg_size: usize, last: bool, rdr: &mut dyn std::io::Read) -> HdbResult<()> {
    let padsize = if last { 0 } else { 7 - (arg_size + 7) % 8 };
    let mut remaining = arg_size + padsize;
    let mut buf = [0_u8; 1024];
    while remaining > 0 {
        let n = std::cmp::min(remaining, buf.len());
        rdr.read_exact(&mut buf[0..n])?;
        remaining -= n;
    }
    Ok(())
}

#[allow(clippy::cast_sign_loss)]
fn parse_header(rdr: &mut dyn std::io::Read) -> HdbResult<(i8, PartAttributes, usize, usize)> {
    // PART HEADER: 16 bytes
    let kind_byte = rdr.read_i8()?; // I1
    let attributes = PartAttributes::new(rdr.read_u8()?); // U1
    let no_of_argsi16 = rdr.read_i16::<LittleEndian>()?; // I2
    let no_of_argsi32 = rdr.read_i32::<LittleEndian>()?; // I4
    let arg_size = rdr.read_i32::<LittleEndian>()?; // I4
    rdr.read_i32::<LittleEndian>()?; // I4 remaining_packet_size

    let no_of_args = max(i32::from(no_of_argsi16), no_of_argsi32);
    Ok((kind_byte, attributes, arg_size as usize, no_of_args as usize))
}

fn padsize(size: usize) -> usize {
    match size {
        0 => 0,
        _ => 7 - (size - 1) % 8,
    }
}

#[cfg(test)]
mod tests {
    use super::padsize;

    #[test]
    fn padsize_aligns_to_8() {
        assert_eq!(padsize(0), 0);
        for size in 1_usize..50 {
            let padded = size + padsize(size);
            assert_eq!(padded % 8, 0);
        }
    }
}

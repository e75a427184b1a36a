use crate::{
    conn::AmConnCore,
    hdb_error::impl_err,
    protocol::{
        parts::{ParameterDescriptors, Parts, ResultSetMetadata, RsState},
        util_sync, FunctionCode, Part,
    },
    HdbError, HdbResult,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::sync::Arc;

// Since there is obviously no usecase for multiple segments in one reply,
// we model message and segment together.
#[derive(Debug)]
pub(crate) struct Reply {
    session_id: i64,
    pub function_code: FunctionCode,
    pub parts: Parts<'static>,
}
impl Reply {
    fn new(session_id: i64, function_code: FunctionCode) -> Self {
        Self {
            session_id,
            function_code,
            parts: Parts::default(),
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    // Parse a reply from the stream, building a Reply object.
    //
    // * `ResultSetMetadata` need to be injected in case of execute calls of
    //    prepared statements
    // * `RsState` needs to be injected (and is extended) in case of fetch
    //    requests
    pub(crate) fn parse(
        o_a_rsmd: Option<&Arc<ResultSetMetadata>>,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        o_rs: &mut Option<&mut RsState>,
        am_conn_core: &AmConnCore,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<Self> {
        trace!("Reply::parse()");
        let (no_of_parts, mut reply) = parse_message_and_segment_header(rdr)?;

        for i in 0..no_of_parts {
            let o_part = Part::parse(
                &mut (reply.parts),
                am_conn_core,
                o_a_rsmd,
                o_a_descriptors,
                o_rs,
                i == no_of_parts - 1,
                rdr,
            )?;
            if let Some(part) = o_part {
                reply.push(part);
            }
        }

        Ok(reply)
    }

    pub fn assert_expected_function_code(&self, expected: FunctionCode) -> HdbResult<()> {
        if self.function_code == expected {
            Ok(())
        } else {
            Err(impl_err!(
                "Expected function code {expected:?}, got {:?}",
                self.function_code,
            ))
        }
    }

    pub fn push(&mut self, part: Part<'static>) {
        self.parts.push(part);
    }
}

fn parse_message_and_segment_header(rdr: &mut dyn std::io::Read) -> HdbResult<(i16, Reply)> {
    // MESSAGE HEADER: 32 bytes
    let session_id: i64 = rdr.read_i64::<LittleEndian>()?; // I8
    let packet_seq_number: i32 = rdr.read_i32::<LittleEndian>()?; // I4
    let varpart_size: u32 = rdr.read_u32::<LittleEndian>()?; // UI4
    let remaining_bufsize: u32 = rdr.read_u32::<LittleEndian>()?; // UI4
    let no_of_segs = rdr.read_i16::<LittleEndian>()?; // I2
    if no_of_segs == 0 {
        return Err(HdbError::Protocol("empty reply packet"));
    }
    if no_of_segs > 1 {
        return Err(impl_err!("no_of_segs = {no_of_segs} > 1"));
    }

    util_sync::skip_bytes(10, rdr)?; // (I1 + B[9])

    // SEGMENT HEADER: 24 bytes
    rdr.read_i32::<LittleEndian>()?; // I4 seg_size
    rdr.read_i32::<LittleEndian>()?; // I4 seg_offset
    let no_of_parts: i16 = rdr.read_i16::<LittleEndian>()?; // I2
    rdr.read_i16::<LittleEndian>()?; // I2 seg_number
    let seg_kind = Kind::from_i8(rdr.read_i8()?)?; // I1

    trace!(
        "message and segment header: {{ packet_seq_number = {packet_seq_number}, \
         varpart_size = {varpart_size}, remaining_bufsize = {remaining_bufsize}, \
         no_of_parts = {no_of_parts} }}",
    );

    match seg_kind {
        Kind::Request => Err(HdbError::Protocol("Cannot _parse_ a request")),
        Kind::Reply | Kind::Error => {
            util_sync::skip_bytes(1, rdr)?; // I1 reserved2
            let function_code = FunctionCode::from_i16(rdr.read_i16::<LittleEndian>()?)?; // I2
            util_sync::skip_bytes(8, rdr)?; // B[8] reserved3
            debug!(
                "Reply::parse(): got reply of type {function_code:?} and seg_kind {seg_kind:?} \
                 for session_id {session_id}",
            );
            Ok((no_of_parts, Reply::new(session_id, function_code)))
        }
    }
}

// Specifies the layout of the remaining segment header structure
#[derive(Debug)]
enum Kind {
    Request,
    Reply,
    Error,
}
impl Kind {
    fn from_i8(val: i8) -> HdbResult<Self> {
        match val {
            1 => Ok(Self::Request),
            2 => Ok(Self::Reply),
            5 => Ok(Self::Error),
            _ => Err(impl_err!("reply::Kind {val} not implemented")),
        }
    }
}

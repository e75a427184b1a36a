//! Since there is obviously no usecase for multiple segments in one
//! request, we model message and segment together.
//! But we differentiate explicitly between request messages and reply
//! messages.
use crate::{
    protocol::{
        parts::{ParameterDescriptors, Parts, StatementContext},
        MessageType, Part,
    },
    HdbResult,
};
use byteorder::{LittleEndian, WriteBytesExt};
use std::sync::Arc;

pub(crate) const MESSAGE_HEADER_SIZE: u32 = 32;
pub(crate) const SEGMENT_HEADER_SIZE: usize = 24; // same for in and out

// Packets having the same sequence number belong to one request/response
// pair.
#[derive(Debug)]
pub(crate) struct Request<'a> {
    message_type: MessageType,
    command_options: u8,
    parts: Parts<'a>,
}

impl<'a> Request<'a> {
    pub fn new(message_type: MessageType, command_options: u8) -> Request<'a> {
        Request {
            message_type,
            command_options,
            parts: Parts::default(),
        }
    }

    pub fn new_for_disconnect() -> Request<'a> {
        Request::new(MessageType::Disconnect, 0)
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn push(&mut self, part: Part<'a>) {
        self.parts.push(part);
    }

    pub fn add_statement_context(&mut self, ssi_value: i64) {
        let mut stmt_ctx = StatementContext::default();
        stmt_ctx.set_statement_sequence_info(ssi_value);
        trace!("Sending StatementContext with sequence_info = {ssi_value:?}");
        self.push(Part::StatementContext(stmt_ctx));
    }

    // Serializes the request into exactly one packet with exactly one
    // segment. Returns the tails of LOB parameters that exceeded the
    // inline budget.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_possible_wrap)]
    pub fn emit(
        &self,
        session_id: i64,
        seq_number: i32,
        auto_commit: bool,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<Vec<Vec<u8>>> {
        let varpart_size = self.varpart_size(o_a_descriptors, lob_write_length)?;
        let total_size = MESSAGE_HEADER_SIZE + varpart_size;
        trace!("Writing request with total size {total_size}");
        let mut remaining_bufsize = total_size - MESSAGE_HEADER_SIZE;

        debug!(
            "Request::emit() of type {:?} for session_id = {session_id}, seq_number = {seq_number}",
            self.message_type,
        );

        // MESSAGE HEADER
        w.write_i64::<LittleEndian>(session_id)?; // I8
        w.write_i32::<LittleEndian>(seq_number)?; // I4
        w.write_u32::<LittleEndian>(varpart_size)?; // UI4
        w.write_u32::<LittleEndian>(remaining_bufsize)?; // UI4
        w.write_i16::<LittleEndian>(1)?; // I2    Number of segments
        for _ in 0..10 {
            w.write_u8(0)?;
        } // I1 packet options + B[9] reserved

        // SEGMENT HEADER
        let parts_len = self.parts.len() as i16;
        let size = self.seg_size(o_a_descriptors, lob_write_length)? as i32;
        w.write_i32::<LittleEndian>(size)?; // I4  Length including the header
        w.write_i32::<LittleEndian>(0)?; // I4 Offset within the message buffer
        w.write_i16::<LittleEndian>(parts_len)?; // I2 Number of contained parts
        w.write_i16::<LittleEndian>(1)?; // I2 Number of this segment, starting with 1
        w.write_i8(1)?; // I1 Segment kind: always 1 = Request
        w.write_i8(self.message_type as i8)?; // I1 Message type
        w.write_i8(auto_commit.into())?; // I1 auto_commit on/off
        w.write_u8(self.command_options)?; // I1 Bit set for options
        for _ in 0..8 {
            w.write_u8(0)?;
        } // [B;8] Reserved, do not use

        remaining_bufsize -= SEGMENT_HEADER_SIZE as u32;
        trace!("Headers are written");

        // PARTS
        let mut lob_tails = Vec::<Vec<u8>>::new();
        for part in self.parts.ref_inner() {
            remaining_bufsize = part.emit(
                remaining_bufsize,
                o_a_descriptors,
                lob_write_length,
                &mut lob_tails,
                w,
            )?;
        }
        w.flush()?;
        trace!("Parts are written");
        Ok(lob_tails)
    }

    // Length in bytes of the variable part of the message, i.e. total
    // message without the message header
    #[allow(clippy::cast_possible_truncation)]
    fn varpart_size(
        &self,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
    ) -> HdbResult<u32> {
        let mut len = 0_u32;
        len += self.seg_size(o_a_descriptors, lob_write_length)? as u32;
        trace!("varpart_size = {len}");
        Ok(len)
    }

    fn seg_size(
        &self,
        o_a_descriptors: Option<&Arc<ParameterDescriptors>>,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        let mut len = SEGMENT_HEADER_SIZE;
        for part in self.parts.ref_inner() {
            len += part.size(true, o_a_descriptors, lob_write_length)?;
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::{MESSAGE_HEADER_SIZE, SEGMENT_HEADER_SIZE};
    use crate::protocol::{MessageType, Part, Request};

    fn le_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn packet_layout_invariants() {
        let mut request = Request::new(MessageType::ExecuteDirect, 0);
        request.push(Part::Command("select 'abc' from dummy"));
        request.push(Part::FetchSize(32));

        let mut buf = Vec::<u8>::new();
        let lob_tails = request.emit(4711, 17, true, None, 0, &mut buf).unwrap();
        assert!(lob_tails.is_empty());

        // message header
        assert_eq!(
            i64::from_le_bytes(buf[0..8].try_into().unwrap()),
            4711,
            "session id"
        );
        assert_eq!(
            i32::from_le_bytes(buf[8..12].try_into().unwrap()),
            17,
            "sequence number"
        );
        let varpart_length = le_u32(&buf, 12);
        assert_eq!(
            buf.len(),
            MESSAGE_HEADER_SIZE as usize + varpart_length as usize,
            "total size is header plus varpart"
        );
        assert_eq!(
            i16::from_le_bytes(buf[20..22].try_into().unwrap()),
            1,
            "one segment per packet"
        );

        // segment header starts at offset 32
        let seg_length = le_u32(&buf, 32);
        assert_eq!(
            seg_length, varpart_length,
            "varpart length is the sum of the segment lengths"
        );
        assert_eq!(
            i16::from_le_bytes(buf[40..42].try_into().unwrap()),
            2,
            "number of parts"
        );
        assert_eq!(buf[44], 1, "segment kind request");
        assert_eq!(buf[45], MessageType::ExecuteDirect as u8, "message type");
        assert_eq!(buf[46], 1, "auto-commit flag");

        // parts are 8-byte aligned: the command part has a 23-byte body
        let first_part_start = MESSAGE_HEADER_SIZE as usize + SEGMENT_HEADER_SIZE;
        let first_body_size = le_u32(&buf, first_part_start + 8) as usize;
        assert_eq!(first_body_size, 23);
        let padded = first_body_size + (8 - first_body_size % 8) % 8;
        let second_part_start = first_part_start + 16 + padded;
        assert_eq!(buf[second_part_start], 45, "second part kind FETCH_SIZE");
    }
}

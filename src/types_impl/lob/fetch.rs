use crate::{
    conn::AmConnCore,
    hdb_error::impl_err,
    protocol::{
        parts::{ReadLobReply, ReadLobRequest},
        FunctionCode, MessageType, Part, Request,
    },
    HdbResult,
};

// One READ_LOB round trip. `offset` counts from 0 here; the server counts
// LOB offsets 1-based.
pub(crate) fn fetch_a_lob_chunk(
    am_conn_core: &AmConnCore,
    locator_id: u64,
    offset: u64,
    length: u32,
) -> HdbResult<(Vec<u8>, bool)> {
    let mut request = Request::new(MessageType::ReadLob, 0);
    request.push(Part::ReadLobRequest(ReadLobRequest::new(
        locator_id,
        offset + 1,
        length,
    )));

    let reply = am_conn_core.full_send(request, None, None, &mut None)?;
    reply.assert_expected_function_code(FunctionCode::ReadLob)?;

    let mut o_read_lob_reply = None;
    for part in reply.parts {
        match part {
            Part::ReadLobReply(read_lob_reply) => {
                if read_lob_reply.locator_id() != locator_id {
                    return Err(impl_err!("locator ids do not match"));
                }
                o_read_lob_reply = Some(read_lob_reply);
            }
            x => warn!(
                "Unexpected part of kind {:?} received and ignored",
                x.kind()
            ),
        }
    }

    o_read_lob_reply
        .map(ReadLobReply::into_data_and_last)
        .ok_or_else(|| impl_err!("fetching a lob chunk failed"))
}

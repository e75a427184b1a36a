mod fetch;
mod lob_handle;

pub use self::lob_handle::{Lob, LobKind};

use crate::conn::AmConnCore;
use crate::protocol::util_sync;
use crate::{hdb_error::impl_err, HdbResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

// Indicator bits of the in-row LOB header
const LOB_IS_NULL: u8 = 0b_0000_0001;
const LOB_DATA_INCLUDED: u8 = 0b_0000_0010;
const LOB_IS_LAST_DATA: u8 = 0b_0000_0100;

// In-row wire format of a LOB field:
// indicator (U1), total length (I8), locator id (I8), chunk length (I4),
// then the first chunk inline. A set NULL bit replaces everything else.
pub(crate) fn parse_lob(
    kind: LobKind,
    am_conn_core: &AmConnCore,
    rdr: &mut dyn std::io::Read,
) -> HdbResult<Option<Lob>> {
    let indicator = rdr.read_u8()?;
    if indicator & LOB_IS_NULL != 0 {
        return Ok(None);
    }
    let total_length = u64::try_from(rdr.read_i64::<LittleEndian>()?)
        .map_err(|_| impl_err!("negative LOB length"))?;
    let locator_id = rdr.read_u64::<LittleEndian>()?;
    #[allow(clippy::cast_sign_loss)]
    let chunk_length = rdr.read_i32::<LittleEndian>()? as usize;
    let data = if indicator & LOB_DATA_INCLUDED == 0 {
        Vec::new()
    } else {
        util_sync::parse_bytes(chunk_length, rdr)?
    };
    let is_last_data = indicator & LOB_IS_LAST_DATA != 0;
    Ok(Some(Lob::new(
        am_conn_core.downgrade(),
        kind,
        locator_id,
        total_length,
        is_last_data,
        data,
    )))
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn emit_lob_header(
    total_length: usize,
    chunk: &[u8],
    is_last_data: bool,
    w: &mut dyn std::io::Write,
) -> std::io::Result<()> {
    let mut indicator = LOB_DATA_INCLUDED;
    if is_last_data {
        indicator |= LOB_IS_LAST_DATA;
    }
    w.write_u8(indicator)?;
    w.write_i64::<LittleEndian>(total_length as i64)?;
    w.write_u64::<LittleEndian>(0)?; // locator is assigned by the server
    w.write_i32::<LittleEndian>(chunk.len() as i32)?;
    w.write_all(chunk)?;
    Ok(())
}

// header bytes in front of the inline chunk
pub(crate) const LOB_HEADER_SIZE: usize = 1 + 8 + 8 + 4;

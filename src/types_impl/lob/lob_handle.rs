use super::fetch::fetch_a_lob_chunk;
use crate::conn::WeakAmConnCore;
use crate::{hdb_error::usage_err, HdbResult};
use debug_ignore::DebugIgnore;

/// The flavor of a [`Lob`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LobKind {
    /// Binary large object.
    Blob,
    /// ASCII character large object.
    Clob,
    /// Unicode character large object.
    NClob,
}

/// A seekable handle to a large object that lives on the server.
///
/// The first chunk arrives inline with the result-set row; further ranges
/// are pulled on demand with READ_LOB round trips. Already retrieved bytes
/// stay buffered, so seeking back to consumed positions does not cause
/// network I/O.
///
/// A `Lob` holds only a weak reference to its session: it does not keep the
/// session alive, and every operation that would need the network fails
/// with [`HdbError::Closed`](crate::HdbError::Closed) once the session is
/// gone.
#[derive(Clone, Debug)]
pub struct Lob {
    am_conn_core: WeakAmConnCore,
    kind: LobKind,
    locator_id: u64,
    total_length: u64,
    is_data_complete: bool,
    data: DebugIgnore<Vec<u8>>,
    pos: u64,
}

impl Lob {
    pub(crate) fn new(
        am_conn_core: WeakAmConnCore,
        kind: LobKind,
        locator_id: u64,
        total_length: u64,
        is_data_complete: bool,
        data: Vec<u8>,
    ) -> Self {
        Self {
            am_conn_core,
            kind,
            locator_id,
            total_length,
            is_data_complete,
            data: DebugIgnore::from(data),
            pos: 0,
        }
    }

    /// The flavor of the LOB.
    pub fn kind(&self) -> LobKind {
        self.kind
    }

    /// Total length of the LOB in bytes, as reported by the server.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// The current logical read position.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Number of bytes that are buffered locally.
    pub fn buffered_length(&self) -> usize {
        self.data.len()
    }

    /// Reads up to `n` bytes from the current position, pulling exactly the
    /// missing range from the server if the local buffer does not cover it.
    pub fn read(&mut self, n: usize) -> HdbResult<Vec<u8>> {
        let end = std::cmp::min(self.pos + n as u64, self.total_length);
        self.ensure_available(end)?;
        let start = usize::try_from(self.pos).map_err(|_| usage_err!("LOB position overflow"))?;
        let end = std::cmp::min(end as usize, self.data.len());
        let slice = if start < end {
            self.data[start..end].to_vec()
        } else {
            Vec::new()
        };
        self.pos = end as u64;
        Ok(slice)
    }

    /// Reads from the current position to the end of the LOB.
    pub fn read_all(&mut self) -> HdbResult<Vec<u8>> {
        self.load_complete()?;
        let start = std::cmp::min(self.pos as usize, self.data.len());
        self.pos = self.data.len() as u64;
        Ok(self.data[start..].to_vec())
    }

    /// Moves the logical position without network I/O; the next read pulls
    /// missing ranges as needed. Positions beyond the end are clamped.
    pub fn seek(&mut self, seek_from: std::io::SeekFrom) -> HdbResult<u64> {
        use std::io::SeekFrom;
        #[allow(clippy::cast_possible_wrap)]
        let new_pos = match seek_from {
            SeekFrom::Start(p) => i128::from(p),
            SeekFrom::Current(d) => i128::from(self.pos) + i128::from(d),
            SeekFrom::End(d) => i128::from(self.total_length) + i128::from(d),
        };
        if new_pos < 0 {
            return Err(usage_err!("seek before start of LOB"));
        }
        self.pos = std::cmp::min(
            u64::try_from(new_pos).map_err(|_| usage_err!("LOB position overflow"))?,
            self.total_length,
        );
        Ok(self.pos)
    }

    /// True once the complete LOB content is buffered locally.
    pub fn is_complete(&self) -> bool {
        self.is_data_complete
    }

    /// Fetches the remaining content into the local buffer.
    pub fn load_complete(&mut self) -> HdbResult<()> {
        self.ensure_available(self.total_length)
    }

    /// Converts the handle into the complete content.
    pub fn into_bytes(mut self) -> HdbResult<Vec<u8>> {
        self.load_complete()?;
        Ok(self.data.0)
    }

    /// Converts the handle into a String (CLOB/NCLOB content).
    pub fn into_string(self) -> HdbResult<String> {
        if self.kind == LobKind::Blob {
            return Err(usage_err!("a BLOB cannot be converted into a String"));
        }
        crate::protocol::util::string_from_cesu8(self.into_bytes()?)
    }

    // Grows the buffer until it covers [0, end), issuing READ_LOB round
    // trips for exactly the missing ranges.
    fn ensure_available(&mut self, end: u64) -> HdbResult<()> {
        while (self.data.len() as u64) < end && !self.is_data_complete {
            let missing = end - self.data.len() as u64;
            let length = u32::try_from(missing).unwrap_or(u32::MAX);
            let am_conn_core = self.am_conn_core.upgrade()?;
            let (reply_data, reply_is_last_data) = fetch_a_lob_chunk(
                &am_conn_core,
                self.locator_id,
                self.data.len() as u64,
                length,
            )?;
            debug!("ensure_available: got {} bytes", reply_data.len());
            if reply_data.is_empty() && !reply_is_last_data {
                return Err(crate::hdb_error::impl_err!(
                    "server returned an empty non-final LOB chunk"
                ));
            }
            self.data.0.extend_from_slice(&reply_data);
            if reply_is_last_data {
                self.is_data_complete = true;
            }
        }
        Ok(())
    }
}

impl std::io::Read for Lob {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes = Lob::read(self, buf.len()).map_err(std::io::Error::other)?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl std::io::Seek for Lob {
    fn seek(&mut self, seek_from: std::io::SeekFrom) -> std::io::Result<u64> {
        Lob::seek(self, seek_from).map_err(std::io::Error::other)
    }
}

use crate::HdbResult;

// Read n bytes, return as Vec<u8>
pub(crate) fn parse_bytes(len: usize, rdr: &mut dyn std::io::Read) -> HdbResult<Vec<u8>> {
    let mut vec: Vec<u8> = vec![0_u8; len];
    rdr.read_exact(&mut vec)?;
    Ok(vec)
}

pub(crate) fn skip_bytes(n: usize, rdr: &mut dyn std::io::Read) -> HdbResult<()> {
    const MAXBUFLEN: usize = 16;
    if n > MAXBUFLEN {
        Err(crate::HdbError::Protocol("n > MAXBUFLEN (16)"))
    } else {
        let mut buffer = [0_u8; MAXBUFLEN];
        Ok(rdr.read_exact(&mut buffer[0..n])?)
    }
}

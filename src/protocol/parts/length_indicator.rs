use crate::{hdb_error::impl_err, HdbResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub(crate) const MAX_1_BYTE_LENGTH: u8 = 245;
const LENGTH_INDICATOR_2BYTE: u8 = 246;
const LENGTH_INDICATOR_4BYTE: u8 = 247;
pub(crate) const LENGTH_INDICATOR_NULL: u8 = 255;

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn emit(l: usize, w: &mut dyn std::io::Write) -> HdbResult<()> {
    match l {
        l if l <= MAX_1_BYTE_LENGTH as usize => w.write_u8(l as u8)?,
        l if l <= 0xFFFF => {
            w.write_u8(LENGTH_INDICATOR_2BYTE)?;
            w.write_u16::<LittleEndian>(l as u16)?;
        }
        l if l <= 0xFFFF_FFFF => {
            w.write_u8(LENGTH_INDICATOR_4BYTE)?;
            w.write_u32::<LittleEndian>(l as u32)?;
        }
        l => {
            return Err(impl_err!("Value too big: {l}"));
        }
    }
    Ok(())
}

// number of bytes the indicator for a value of the given length occupies
pub(crate) fn size(l: usize) -> usize {
    match l {
        l if l <= MAX_1_BYTE_LENGTH as usize => 1,
        l if l <= 0xFFFF => 3,
        _ => 5,
    }
}

// Parses a length indicator; `None` stands for the NULL sentinel (255).
pub(crate) fn parse(l8: u8, rdr: &mut dyn std::io::Read) -> HdbResult<Option<usize>> {
    match l8 {
        0..=MAX_1_BYTE_LENGTH => Ok(Some(l8 as usize)),
        LENGTH_INDICATOR_2BYTE => Ok(Some(rdr.read_u16::<LittleEndian>()? as usize)),
        LENGTH_INDICATOR_4BYTE => Ok(Some(rdr.read_u32::<LittleEndian>()? as usize)),
        LENGTH_INDICATOR_NULL => Ok(None),
        _ => Err(impl_err!("Unknown length indicator: {l8}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(l: usize) -> usize {
        let mut buf = Vec::<u8>::new();
        emit(l, &mut buf).unwrap();
        assert_eq!(buf.len(), size(l));
        let mut rdr = std::io::Cursor::new(buf);
        let l8 = std::io::Read::bytes(&mut rdr).next().unwrap().unwrap();
        parse(l8, &mut rdr).unwrap().unwrap()
    }

    #[test]
    fn length_indicator_boundaries() {
        for l in [0, 1, 245, 246, 0xFFFF, 0x1_0000, 0xFF_FFFF] {
            assert_eq!(roundtrip(l), l);
        }
    }

    #[test]
    fn null_sentinel() {
        let mut rdr = std::io::Cursor::new(Vec::<u8>::new());
        assert!(parse(LENGTH_INDICATOR_NULL, &mut rdr).unwrap().is_none());
    }
}

use crate::{hdb_error::usage_err, HdbResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

// bit 7 of the hour field is set for every non-NULL time;
// an all-zero 4-byte value is the NULL sentinel
const VALID_FLAG: u8 = 0x80;

/// A database TIME value (millisecond precision).
///
/// The wire format packs hour and minute into one byte each, and
/// `second * 1000 + millisecond` into a little-endian u16.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct HdbTime {
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u16,
}

impl HdbTime {
    /// Creates an `HdbTime`.
    pub fn from_hmsm(hour: u8, minute: u8, second: u8, millisecond: u16) -> HdbResult<Self> {
        if hour > 23 || minute > 59 || second > 59 || millisecond > 999 {
            return Err(usage_err!(
                "Invalid time: {hour:02}:{minute:02}:{second:02}.{millisecond:03}"
            ));
        }
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// The hour (0..=23).
    pub fn hour(&self) -> u8 {
        self.hour
    }
    /// The minute (0..=59).
    pub fn minute(&self) -> u8 {
        self.minute
    }
    /// The second (0..=59).
    pub fn second(&self) -> u8 {
        self.second
    }
    /// The millisecond (0..=999).
    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }

    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_u8(self.hour | VALID_FLAG)?;
        w.write_u8(self.minute)?;
        w.write_u16::<LittleEndian>(u16::from(self.second) * 1000 + self.millisecond)?;
        Ok(())
    }

    // Ok(None) = NULL sentinel (valid-flag not set)
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<Option<Self>> {
        let hour_raw = rdr.read_u8()?;
        let minute = rdr.read_u8()?;
        let millis = rdr.read_u16::<LittleEndian>()?;
        if hour_raw & VALID_FLAG == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            hour: hour_raw & !VALID_FLAG,
            minute,
            second: (millis / 1000) as u8,
            millisecond: millis % 1000,
        }))
    }

    pub(crate) fn emit_null(w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_all(&[0_u8; 4])
    }
}

impl TryFrom<time::Time> for HdbTime {
    type Error = crate::HdbError;
    fn try_from(t: time::Time) -> HdbResult<Self> {
        Self::from_hmsm(t.hour(), t.minute(), t.second(), t.millisecond())
    }
}

impl TryFrom<HdbTime> for time::Time {
    type Error = crate::HdbError;
    fn try_from(t: HdbTime) -> HdbResult<Self> {
        time::Time::from_hms_milli(t.hour, t.minute, t.second, t.millisecond)
            .map_err(|e| usage_err!("{e}"))
    }
}

impl std::fmt::Display for HdbTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

#[cfg(test)]
mod tests {
    use super::HdbTime;

    #[test]
    fn wire_roundtrip() {
        let t = HdbTime::from_hmsm(12, 34, 56, 789).unwrap();
        let mut buf = Vec::<u8>::new();
        t.emit(&mut buf).unwrap();
        // independently computed: hour|0x80, minute, 56*1000+789 LE
        assert_eq!(buf, hex::decode("8c22d5dd").unwrap());
        assert_eq!(
            HdbTime::parse(&mut std::io::Cursor::new(buf)).unwrap(),
            Some(t)
        );
    }

    #[test]
    fn null_sentinel() {
        let mut buf = Vec::<u8>::new();
        HdbTime::emit_null(&mut buf).unwrap();
        assert_eq!(HdbTime::parse(&mut std::io::Cursor::new(buf)).unwrap(), None);
    }

    #[test]
    fn midnight_is_not_null() {
        let t = HdbTime::from_hmsm(0, 0, 0, 0).unwrap();
        let mut buf = Vec::<u8>::new();
        t.emit(&mut buf).unwrap();
        assert_eq!(
            HdbTime::parse(&mut std::io::Cursor::new(buf)).unwrap(),
            Some(t)
        );
    }
}

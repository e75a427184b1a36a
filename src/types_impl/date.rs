use crate::{hdb_error::usage_err, HdbResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

// bit 15 of the year field is set for every non-NULL date;
// an all-zero 4-byte value is the NULL sentinel
const VALID_FLAG: u16 = 0x8000;

/// A database DATE value (day precision).
///
/// The wire format packs year, month, and day into four bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct HdbDate {
    year: u16,
    month: u8, // 1-based
    day: u8,
}

impl HdbDate {
    /// Creates an `HdbDate` without plausibility checks.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> HdbResult<Self> {
        if year > 9999 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(usage_err!("Invalid date: {year:04}-{month:02}-{day:02}"));
        }
        Ok(Self { year, month, day })
    }

    /// The year.
    pub fn year(&self) -> u16 {
        self.year
    }
    /// The month (1-based).
    pub fn month(&self) -> u8 {
        self.month
    }
    /// The day of month (1-based).
    pub fn day(&self) -> u8 {
        self.day
    }

    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_u16::<LittleEndian>(self.year | VALID_FLAG)?;
        w.write_u8(self.month - 1)?; // 0-based on the wire
        w.write_u8(self.day)?;
        Ok(())
    }

    // Ok(None) = NULL sentinel (valid-flag not set)
    pub(crate) fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<Option<Self>> {
        let year_raw = rdr.read_u16::<LittleEndian>()?;
        let month = rdr.read_u8()?;
        let day = rdr.read_u8()?;
        if year_raw & VALID_FLAG == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            year: year_raw & !VALID_FLAG,
            month: month + 1,
            day,
        }))
    }

    pub(crate) fn emit_null(w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_all(&[0_u8; 4])
    }
}

impl TryFrom<time::Date> for HdbDate {
    type Error = crate::HdbError;
    fn try_from(date: time::Date) -> HdbResult<Self> {
        let year = u16::try_from(date.year())
            .map_err(|_| usage_err!("Date {date} is outside the supported range"))?;
        Self::from_ymd(year, u8::from(date.month()), date.day())
    }
}

impl TryFrom<HdbDate> for time::Date {
    type Error = crate::HdbError;
    fn try_from(date: HdbDate) -> HdbResult<Self> {
        time::Date::from_calendar_date(
            i32::from(date.year),
            time::Month::try_from(date.month).map_err(|e| usage_err!("{e}"))?,
            date.day,
        )
        .map_err(|e| usage_err!("{e}"))
    }
}

impl std::fmt::Display for HdbDate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::HdbDate;

    #[test]
    fn wire_roundtrip() {
        let date = HdbDate::from_ymd(2026, 8, 1).unwrap();
        let mut buf = Vec::<u8>::new();
        date.emit(&mut buf).unwrap();
        // independently computed: year|0x8000 LE, month-1, day
        assert_eq!(buf, hex::decode("ea870701").unwrap());
        assert_eq!(
            HdbDate::parse(&mut std::io::Cursor::new(buf)).unwrap(),
            Some(date)
        );
    }

    #[test]
    fn null_sentinel() {
        let mut buf = Vec::<u8>::new();
        HdbDate::emit_null(&mut buf).unwrap();
        assert_eq!(buf, vec![0_u8; 4]);
        assert_eq!(HdbDate::parse(&mut std::io::Cursor::new(buf)).unwrap(), None);
    }

    #[test]
    fn time_crate_conversion() {
        let date = HdbDate::from_ymd(1999, 12, 31).unwrap();
        let td: time::Date = date.try_into().unwrap();
        assert_eq!(HdbDate::try_from(td).unwrap(), date);
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(HdbDate::from_ymd(2026, 13, 1).is_err());
        assert!(HdbDate::from_ymd(2026, 0, 1).is_err());
        assert!(HdbDate::from_ymd(2026, 1, 32).is_err());
    }
}

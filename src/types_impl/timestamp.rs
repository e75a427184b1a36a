use crate::types_impl::{date::HdbDate, time::HdbTime};
use crate::HdbResult;

/// A database TIMESTAMP value: the concatenation of a DATE and a TIME
/// (eight bytes on the wire).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct HdbTimestamp {
    date: HdbDate,
    time: HdbTime,
}

impl HdbTimestamp {
    /// Combines a date and a time.
    pub fn new(date: HdbDate, time: HdbTime) -> Self {
        Self { date, time }
    }

    /// The date half.
    pub fn date(&self) -> HdbDate {
        self.date
    }
    /// The time half.
    pub fn time(&self) -> HdbTime {
        self.time
    }

    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        self.date.emit(w)?;
        self.time.emit(w)
    }

    // Ok(None) = NULL sentinel; the server zeroes both halves for NULL
    pub(crate) fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<Option<Self>> {
        let o_date = HdbDate::parse(rdr)?;
        let o_time = HdbTime::parse(rdr)?;
        match (o_date, o_time) {
            (Some(date), Some(time)) => Ok(Some(Self { date, time })),
            // a timestamp with time 00:00:00.000 arrives with an unset
            // time-valid flag; only a NULL date makes the value NULL
            (Some(date), None) => Ok(Some(Self {
                date,
                time: HdbTime::from_hmsm(0, 0, 0, 0).unwrap(/* OK */),
            })),
            (None, _) => Ok(None),
        }
    }

    pub(crate) fn emit_null(w: &mut dyn std::io::Write) -> std::io::Result<()> {
        HdbDate::emit_null(w)?;
        HdbTime::emit_null(w)
    }
}

impl TryFrom<time::PrimitiveDateTime> for HdbTimestamp {
    type Error = crate::HdbError;
    fn try_from(dt: time::PrimitiveDateTime) -> HdbResult<Self> {
        Ok(Self {
            date: dt.date().try_into()?,
            time: dt.time().try_into()?,
        })
    }
}

impl TryFrom<HdbTimestamp> for time::PrimitiveDateTime {
    type Error = crate::HdbError;
    fn try_from(ts: HdbTimestamp) -> HdbResult<Self> {
        Ok(time::PrimitiveDateTime::new(
            ts.date.try_into()?,
            ts.time.try_into()?,
        ))
    }
}

impl std::fmt::Display for HdbTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::HdbTimestamp;
    use crate::types_impl::{date::HdbDate, time::HdbTime};

    #[test]
    fn wire_roundtrip() {
        let ts = HdbTimestamp::new(
            HdbDate::from_ymd(2026, 8, 1).unwrap(),
            HdbTime::from_hmsm(12, 34, 56, 789).unwrap(),
        );
        let mut buf = Vec::<u8>::new();
        ts.emit(&mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(
            HdbTimestamp::parse(&mut std::io::Cursor::new(buf)).unwrap(),
            Some(ts)
        );
    }

    #[test]
    fn null_sentinel() {
        let mut buf = Vec::<u8>::new();
        HdbTimestamp::emit_null(&mut buf).unwrap();
        assert_eq!(buf, vec![0_u8; 8]);
        assert_eq!(
            HdbTimestamp::parse(&mut std::io::Cursor::new(buf)).unwrap(),
            None
        );
    }
}

use crate::{
    conn::AmConnCore,
    hdb_error::{impl_err, usage_err},
    protocol::{
        parts::{length_indicator, ParameterDescriptor, TypeId},
        util, util_sync,
    },
    types_impl::{
        date::HdbDate, decimal, lob, lob::Lob, lob::LobKind, time::HdbTime,
        timestamp::HdbTimestamp,
    },
    HdbResult,
};
use bigdecimal::BigDecimal;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Enum for all supported database value types.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub enum HdbValue<'a> {
    /// Representation of a database NULL value.
    NULL,
    /// Stores an 8-bit unsigned integer.
    TINYINT(u8),
    /// Stores a 16-bit signed integer.
    SMALLINT(i16),
    /// Stores a 32-bit signed integer.
    INT(i32),
    /// Stores a 64-bit signed integer.
    BIGINT(i64),
    /// Representation for fixed-point decimal values.
    DECIMAL(BigDecimal),
    /// Stores a single-precision 32-bit floating-point number.
    REAL(f32),
    /// Stores a double-precision 64-bit floating-point number.
    DOUBLE(f64),
    /// Stores boolean values, which are TRUE or FALSE.
    BOOLEAN(bool),
    /// The database returns strings of all character column types with this
    /// variant.
    STRING(String),
    /// Can be used for avoiding cloning when sending large Strings to the
    /// database.
    STR(&'a str),
    /// Stores binary data.
    BINARY(Vec<u8>),
    /// DATE with day precision.
    DATE(HdbDate),
    /// TIME with millisecond precision.
    TIME(HdbTime),
    /// TIMESTAMP with millisecond precision.
    TIMESTAMP(HdbTimestamp),
    /// A large object (BLOB, CLOB, NCLOB), transferred by locator and
    /// chunked reads.
    LOB(Lob),
}

impl<'a> HdbValue<'a> {
    /// Returns true if the value is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(*self, HdbValue::NULL)
    }

    pub(crate) fn type_id_for_emit(&self, requested_type_id: TypeId) -> HdbResult<TypeId> {
        if requested_type_id.is_unsupported() {
            return Err(usage_err!(
                "parameters of type {requested_type_id} are not supported"
            ));
        }
        Ok(match *self {
            HdbValue::NULL => requested_type_id,
            HdbValue::TINYINT(_) => TypeId::TINYINT,
            HdbValue::SMALLINT(_) => TypeId::SMALLINT,
            HdbValue::INT(_) => TypeId::INT,
            HdbValue::BIGINT(_) => TypeId::BIGINT,
            HdbValue::DECIMAL(_) => match requested_type_id {
                TypeId::DECIMAL => TypeId::DECIMAL,
                _ => {
                    return Err(usage_err!(
                        "can't send DECIMAL for requested type {requested_type_id}"
                    ));
                }
            },
            HdbValue::REAL(_) => TypeId::REAL,
            HdbValue::DOUBLE(_) => TypeId::DOUBLE,
            HdbValue::BOOLEAN(_) => TypeId::BOOLEAN,
            HdbValue::STRING(_) | HdbValue::STR(_) => match requested_type_id {
                TypeId::CLOB | TypeId::NCLOB | TypeId::TEXT => requested_type_id,
                _ => TypeId::VARCHAR,
            },
            HdbValue::BINARY(_) => match requested_type_id {
                TypeId::BLOB => TypeId::BLOB,
                _ => TypeId::VARBINARY,
            },
            HdbValue::DATE(_) => TypeId::DATE,
            HdbValue::TIME(_) => TypeId::TIME,
            HdbValue::TIMESTAMP(_) => TypeId::TIMESTAMP,
            HdbValue::LOB(_) => {
                return Err(usage_err!(
                    "a LOB handle cannot be sent back to the database; \
                     pass the content as STRING or BINARY"
                ));
            }
        })
    }

    // Emits the value as a parameter field: type code (with the NULL high
    // bit where applicable), then the payload.
    // A LOB-typed value emits at most `lob_write_length` bytes inline; the
    // remainder is appended to `lob_tails`, to be shipped with WRITE_LOB
    // round trips after the EXECUTE.
    pub(crate) fn emit(
        &self,
        descriptor: &ParameterDescriptor,
        lob_write_length: usize,
        lob_tails: &mut Vec<Vec<u8>>,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<()> {
        if self.emit_type_id(descriptor.type_id(), w)? {
            return Ok(());
        }
        match *self {
            HdbValue::NULL => {}
            HdbValue::TINYINT(u) => w.write_u8(u)?,
            HdbValue::SMALLINT(i) => w.write_i16::<LittleEndian>(i)?,
            HdbValue::INT(i) => w.write_i32::<LittleEndian>(i)?,
            HdbValue::BIGINT(i) => w.write_i64::<LittleEndian>(i)?,
            HdbValue::DECIMAL(ref bd) => decimal::emit(bd, w)?,
            HdbValue::REAL(f) => w.write_f32::<LittleEndian>(f)?,
            HdbValue::DOUBLE(f) => w.write_f64::<LittleEndian>(f)?,
            HdbValue::BOOLEAN(b) => emit_bool(b, w)?,
            HdbValue::DATE(ref date) => date.emit(w)?,
            HdbValue::TIME(ref t) => t.emit(w)?,
            HdbValue::TIMESTAMP(ref ts) => ts.emit(w)?,
            HdbValue::STRING(ref s) => {
                self.emit_string_or_lob(s, descriptor, lob_write_length, lob_tails, w)?;
            }
            HdbValue::STR(s) => {
                self.emit_string_or_lob(s, descriptor, lob_write_length, lob_tails, w)?;
            }
            HdbValue::BINARY(ref v) => {
                if descriptor.type_id().is_lob() {
                    emit_lob_chunked(v, lob_write_length, lob_tails, w)?;
                } else {
                    emit_length_and_bytes(v, w)?;
                }
            }
            HdbValue::LOB(_) => {
                return Err(usage_err!("a LOB handle cannot be sent to the database"));
            }
        }
        Ok(())
    }

    fn emit_string_or_lob(
        &self,
        s: &str,
        descriptor: &ParameterDescriptor,
        lob_write_length: usize,
        lob_tails: &mut Vec<Vec<u8>>,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<()> {
        if descriptor.type_id().is_lob() {
            emit_lob_chunked(&cesu8::to_cesu8(s), lob_write_length, lob_tails, w)
        } else {
            emit_length_and_string(s, w)
        }
    }

    // emits the type-id; returns true if the value is a null value
    fn emit_type_id(&self, requested_type_id: TypeId, w: &mut dyn std::io::Write) -> HdbResult<bool> {
        let is_null = self.is_null();
        let type_code = self.type_id_for_emit(requested_type_id)?.type_code(is_null);
        w.write_u8(type_code)?;
        Ok(is_null)
    }

    // is used to calculate the part size (in emit())
    pub(crate) fn size(
        &self,
        type_id: TypeId,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        Ok(1 + match self {
            HdbValue::NULL => 0,
            HdbValue::BOOLEAN(_) | HdbValue::TINYINT(_) => 1,
            HdbValue::SMALLINT(_) => 2,
            HdbValue::INT(_) | HdbValue::REAL(_) | HdbValue::DATE(_) | HdbValue::TIME(_) => 4,
            HdbValue::BIGINT(_) | HdbValue::DOUBLE(_) | HdbValue::TIMESTAMP(_) => 8,
            HdbValue::DECIMAL(_) => 16,
            HdbValue::STRING(s) => {
                string_or_lob_size(util::cesu8_length(s), type_id, lob_write_length)
            }
            HdbValue::STR(s) => {
                string_or_lob_size(util::cesu8_length(s), type_id, lob_write_length)
            }
            HdbValue::BINARY(v) => string_or_lob_size(v.len(), type_id, lob_write_length),
            HdbValue::LOB(_) => {
                return Err(usage_err!("a LOB handle cannot be sent to the database"));
            }
        })
    }

    // Parses a value of a result-set row or of an output-parameter record,
    // positionally driven by the given type and nullability.
    pub(crate) fn parse(
        type_id: TypeId,
        nullable: bool,
        am_conn_core: &AmConnCore,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<HdbValue<'static>> {
        if type_id.is_unsupported() {
            return Err(usage_err!(
                "values of type {type_id} are not supported \
                 (NULL convention not pinned down)"
            ));
        }
        match type_id {
            TypeId::TINYINT => Ok(if parse_null_indicator(nullable, rdr)? {
                HdbValue::NULL
            } else {
                HdbValue::TINYINT(rdr.read_u8()?)
            }),
            TypeId::SMALLINT => Ok(if parse_null_indicator(nullable, rdr)? {
                HdbValue::NULL
            } else {
                HdbValue::SMALLINT(rdr.read_i16::<LittleEndian>()?)
            }),
            TypeId::INT => Ok(if parse_null_indicator(nullable, rdr)? {
                HdbValue::NULL
            } else {
                HdbValue::INT(rdr.read_i32::<LittleEndian>()?)
            }),
            TypeId::BIGINT => Ok(if parse_null_indicator(nullable, rdr)? {
                HdbValue::NULL
            } else {
                HdbValue::BIGINT(rdr.read_i64::<LittleEndian>()?)
            }),
            TypeId::DECIMAL => parse_decimal(nullable, rdr),
            TypeId::REAL => parse_real(nullable, rdr),
            TypeId::DOUBLE => parse_double(nullable, rdr),
            TypeId::BOOLEAN => parse_bool(nullable, rdr),
            TypeId::CHAR | TypeId::VARCHAR | TypeId::NCHAR | TypeId::NVARCHAR => {
                parse_string(nullable, rdr)
            }
            TypeId::BINARY | TypeId::VARBINARY => parse_binary(nullable, rdr),
            TypeId::DATE => Ok(match HdbDate::parse(rdr)? {
                Some(date) => HdbValue::DATE(date),
                None => null_value(nullable)?,
            }),
            TypeId::TIME => Ok(match HdbTime::parse(rdr)? {
                Some(t) => HdbValue::TIME(t),
                None => null_value(nullable)?,
            }),
            TypeId::TIMESTAMP => Ok(match HdbTimestamp::parse(rdr)? {
                Some(ts) => HdbValue::TIMESTAMP(ts),
                None => null_value(nullable)?,
            }),
            TypeId::BLOB => parse_lob_value(LobKind::Blob, nullable, am_conn_core, rdr),
            TypeId::CLOB => parse_lob_value(LobKind::Clob, nullable, am_conn_core, rdr),
            TypeId::NCLOB | TypeId::TEXT => {
                parse_lob_value(LobKind::NClob, nullable, am_conn_core, rdr)
            }
            TypeId::ST_GEOMETRY | TypeId::ST_POINT | TypeId::BINTEXT => {
                unreachable!("rejected above")
            }
        }
    }
}

impl HdbValue<'static> {
    /// Converts into a `String`, if the value is character-like.
    pub fn try_into_string(self) -> HdbResult<String> {
        match self {
            HdbValue::STRING(s) => Ok(s),
            HdbValue::LOB(lob) => lob.into_string(),
            v => Err(usage_err!("The value {v} cannot be converted into a String")),
        }
    }

    /// Converts into an `i64`, if the value is integer-like.
    pub fn try_into_i64(self) -> HdbResult<i64> {
        match self {
            HdbValue::TINYINT(u) => Ok(i64::from(u)),
            HdbValue::SMALLINT(i) => Ok(i64::from(i)),
            HdbValue::INT(i) => Ok(i64::from(i)),
            HdbValue::BIGINT(i) => Ok(i),
            v => Err(usage_err!("The value {v} cannot be converted into an i64")),
        }
    }

    /// Converts into the contained bytes, if the value is binary-like.
    pub fn try_into_bytes(self) -> HdbResult<Vec<u8>> {
        match self {
            HdbValue::BINARY(v) => Ok(v),
            HdbValue::LOB(lob) => lob.into_bytes(),
            v => Err(usage_err!("The value {v} cannot be converted into bytes")),
        }
    }

    /// Converts into a [`Lob`] handle.
    pub fn try_into_lob(self) -> HdbResult<Lob> {
        match self {
            HdbValue::LOB(lob) => Ok(lob),
            v => Err(usage_err!("The value {v} is not a LOB")),
        }
    }
}

fn null_value(nullable: bool) -> HdbResult<HdbValue<'static>> {
    if nullable {
        Ok(HdbValue::NULL)
    } else {
        Err(impl_err!("found NULL value for NOT NULL column"))
    }
}

// Reads the NULL indicator byte of the fixed-size integer types:
// 0 = NULL, 1 = a value follows.
fn parse_null_indicator(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<bool> {
    let is_null = rdr.read_u8()? == 0;
    if is_null && !nullable {
        Err(impl_err!("found NULL value for NOT NULL column"))
    } else {
        Ok(is_null)
    }
}

fn parse_real(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    let raw = rdr.read_u32::<LittleEndian>()?;
    if raw == u32::MAX {
        null_value(nullable)
    } else {
        Ok(HdbValue::REAL(f32::from_bits(raw)))
    }
}

fn parse_double(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    let raw = rdr.read_u64::<LittleEndian>()?;
    if raw == u64::MAX {
        null_value(nullable)
    } else {
        Ok(HdbValue::DOUBLE(f64::from_bits(raw)))
    }
}

fn parse_decimal(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    let mut raw = [0_u8; 16];
    rdr.read_exact(&mut raw)?;
    // NULL sentinel: all mantissa bytes zero, byte 15 = 112
    if raw[15] == 112 && raw[0..=14].iter().all(|el| *el == 0) {
        null_value(nullable)
    } else {
        Ok(HdbValue::DECIMAL(decimal::parse(
            &mut std::io::Cursor::new(raw.to_vec()),
        )?))
    }
}

fn parse_bool(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    // 0x00 = FALSE, 0x01 = NULL, 0x02 = TRUE
    match rdr.read_u8()? {
        0 => Ok(HdbValue::BOOLEAN(false)),
        2 => Ok(HdbValue::BOOLEAN(true)),
        1 => null_value(nullable),
        i => Err(impl_err!("parse_bool: got bad value {i}")),
    }
}

fn parse_string(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    match length_indicator::parse(rdr.read_u8()?, rdr)? {
        None => null_value(nullable),
        Some(len) => Ok(HdbValue::STRING(util::string_from_cesu8(
            util_sync::parse_bytes(len, rdr)?,
        )?)),
    }
}

fn parse_binary(nullable: bool, rdr: &mut dyn std::io::Read) -> HdbResult<HdbValue<'static>> {
    match length_indicator::parse(rdr.read_u8()?, rdr)? {
        None => null_value(nullable),
        Some(len) => Ok(HdbValue::BINARY(util_sync::parse_bytes(len, rdr)?)),
    }
}

fn parse_lob_value(
    kind: LobKind,
    nullable: bool,
    am_conn_core: &AmConnCore,
    rdr: &mut dyn std::io::Read,
) -> HdbResult<HdbValue<'static>> {
    match lob::parse_lob(kind, am_conn_core, rdr)? {
        Some(lob) => Ok(HdbValue::LOB(lob)),
        None => null_value(nullable),
    }
}

fn emit_bool(b: bool, w: &mut dyn std::io::Write) -> HdbResult<()> {
    // 0x00 = FALSE, 0x01 = NULL, 0x02 = TRUE
    w.write_u8(2 * u8::from(b))?;
    Ok(())
}

fn emit_length_and_string(s: &str, w: &mut dyn std::io::Write) -> HdbResult<()> {
    emit_length_and_bytes(&cesu8::to_cesu8(s), w)
}

fn emit_length_and_bytes(v: &[u8], w: &mut dyn std::io::Write) -> HdbResult<()> {
    length_indicator::emit(v.len(), w)?;
    w.write_all(v)?;
    Ok(())
}

// Emits the in-row header of a LOB parameter with at most
// `lob_write_length` bytes inline; a longer value gets its remainder
// pushed onto `lob_tails` and is marked as "more follows".
fn emit_lob_chunked(
    bytes: &[u8],
    lob_write_length: usize,
    lob_tails: &mut Vec<Vec<u8>>,
    w: &mut dyn std::io::Write,
) -> HdbResult<()> {
    let inline_len = std::cmp::min(bytes.len(), lob_write_length);
    let is_last_data = inline_len == bytes.len();
    lob::emit_lob_header(bytes.len(), &bytes[..inline_len], is_last_data, w)?;
    if !is_last_data {
        lob_tails.push(bytes[inline_len..].to_vec());
    }
    Ok(())
}

fn string_or_lob_size(byte_len: usize, type_id: TypeId, lob_write_length: usize) -> usize {
    if type_id.is_lob() {
        lob::LOB_HEADER_SIZE + std::cmp::min(byte_len, lob_write_length)
    } else {
        length_indicator::size(byte_len) + byte_len
    }
}

impl std::fmt::Display for HdbValue<'_> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            HdbValue::NULL => write!(fmt, "<NULL>"),
            HdbValue::TINYINT(value) => write!(fmt, "{value}"),
            HdbValue::SMALLINT(value) => write!(fmt, "{value}"),
            HdbValue::INT(value) => write!(fmt, "{value}"),
            HdbValue::BIGINT(value) => write!(fmt, "{value}"),
            HdbValue::DECIMAL(ref value) => write!(fmt, "{value}"),
            HdbValue::REAL(value) => write!(fmt, "{value}"),
            HdbValue::DOUBLE(value) => write!(fmt, "{value}"),
            HdbValue::BOOLEAN(value) => write!(fmt, "{value}"),
            HdbValue::STRING(ref value) => write!(fmt, "{value}"),
            HdbValue::STR(value) => write!(fmt, "{value}"),
            HdbValue::BINARY(ref vec) => write!(fmt, "<BINARY, len = {}>", vec.len()),
            HdbValue::DATE(ref value) => write!(fmt, "{value}"),
            HdbValue::TIME(ref value) => write!(fmt, "{value}"),
            HdbValue::TIMESTAMP(ref value) => write!(fmt, "{value}"),
            HdbValue::LOB(ref lob) => write!(
                fmt,
                "<{:?}, len = {}>",
                lob.kind(),
                lob.total_length()
            ),
        }
    }
}

impl From<bool> for HdbValue<'static> {
    fn from(b: bool) -> Self {
        HdbValue::BOOLEAN(b)
    }
}
impl From<u8> for HdbValue<'static> {
    fn from(u: u8) -> Self {
        HdbValue::TINYINT(u)
    }
}
impl From<i16> for HdbValue<'static> {
    fn from(i: i16) -> Self {
        HdbValue::SMALLINT(i)
    }
}
impl From<i32> for HdbValue<'static> {
    fn from(i: i32) -> Self {
        HdbValue::INT(i)
    }
}
impl From<i64> for HdbValue<'static> {
    fn from(i: i64) -> Self {
        HdbValue::BIGINT(i)
    }
}
impl From<f32> for HdbValue<'static> {
    fn from(f: f32) -> Self {
        HdbValue::REAL(f)
    }
}
impl From<f64> for HdbValue<'static> {
    fn from(f: f64) -> Self {
        HdbValue::DOUBLE(f)
    }
}
impl From<String> for HdbValue<'static> {
    fn from(s: String) -> Self {
        HdbValue::STRING(s)
    }
}
impl<'a> From<&'a str> for HdbValue<'a> {
    fn from(s: &'a str) -> Self {
        HdbValue::STR(s)
    }
}
impl From<Vec<u8>> for HdbValue<'static> {
    fn from(v: Vec<u8>) -> Self {
        HdbValue::BINARY(v)
    }
}
impl<'a, T: Into<HdbValue<'a>>> From<Option<T>> for HdbValue<'a> {
    fn from(o: Option<T>) -> Self {
        match o {
            Some(v) => v.into(),
            None => HdbValue::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parts::ParameterDescriptors;
    use std::str::FromStr;

    fn cursor(bytes: &[u8]) -> std::io::Cursor<Vec<u8>> {
        std::io::Cursor::new(bytes.to_vec())
    }

    #[test]
    fn parse_decimal_null_sentinel() {
        // NULL DECIMAL: all mantissa bytes zero, byte 15 = 112
        let mut raw = [0_u8; 16];
        raw[15] = 112;
        let value = parse_decimal(true, &mut cursor(&raw)).unwrap();
        assert!(value.is_null());
        // the same bytes for a NOT NULL column are an error
        assert!(parse_decimal(false, &mut cursor(&raw)).is_err());
    }

    #[test]
    fn parse_decimal_value() {
        let bd = BigDecimal::from_str("-123.45").unwrap();
        let mut raw = Vec::<u8>::new();
        decimal::emit(&bd, &mut raw).unwrap();
        match parse_decimal(true, &mut cursor(&raw)).unwrap() {
            HdbValue::DECIMAL(parsed) => assert_eq!(parsed, bd),
            value => panic!("unexpected value {value}"),
        }
    }

    #[test]
    fn parse_string_null_and_value() {
        let mut bytes = vec![5_u8];
        bytes.extend(b"abcde");
        match parse_string(true, &mut cursor(&bytes)).unwrap() {
            HdbValue::STRING(s) => assert_eq!(s, "abcde"),
            value => panic!("unexpected value {value}"),
        }
        // the length indicator 255 is the NULL sentinel
        assert!(parse_string(true, &mut cursor(&[255])).unwrap().is_null());
        assert!(parse_string(false, &mut cursor(&[255])).is_err());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(matches!(
            parse_bool(true, &mut cursor(&[0])).unwrap(),
            HdbValue::BOOLEAN(false)
        ));
        assert!(matches!(
            parse_bool(true, &mut cursor(&[2])).unwrap(),
            HdbValue::BOOLEAN(true)
        ));
        assert!(parse_bool(true, &mut cursor(&[1])).unwrap().is_null());
        assert!(parse_bool(false, &mut cursor(&[1])).is_err());
        assert!(parse_bool(true, &mut cursor(&[9])).is_err());
    }

    #[test]
    fn parse_float_null_sentinels() {
        assert!(parse_real(true, &mut cursor(&u32::MAX.to_le_bytes()))
            .unwrap()
            .is_null());
        assert!(parse_double(true, &mut cursor(&u64::MAX.to_le_bytes()))
            .unwrap()
            .is_null());
        match parse_double(true, &mut cursor(&2.5_f64.to_le_bytes())).unwrap() {
            HdbValue::DOUBLE(d) => assert_eq!(d, 2.5),
            value => panic!("unexpected value {value}"),
        }
    }

    // one 16-byte descriptor record of an IN parameter, as the server
    // would send it with a prepare reply
    fn in_descriptors(type_code: u8) -> ParameterDescriptors {
        let mut bytes = vec![0b10_u8, type_code, 1, 0];
        bytes.extend(u32::MAX.to_le_bytes());
        bytes.extend(10_i16.to_le_bytes());
        bytes.extend(0_i16.to_le_bytes());
        bytes.extend(0_u32.to_le_bytes());
        ParameterDescriptors::parse(1, &mut cursor(&bytes)).unwrap()
    }

    #[test]
    fn emit_prefixes_the_type_code() {
        let descriptors = in_descriptors(3); // INT
        let mut buf = Vec::<u8>::new();
        let mut lob_tails = Vec::<Vec<u8>>::new();
        HdbValue::INT(42)
            .emit(&descriptors[0], 0, &mut lob_tails, &mut buf)
            .unwrap();
        assert_eq!(buf, [3, 42, 0, 0, 0]);

        // NULL is signalled by the high bit of the type code, no payload
        buf.clear();
        HdbValue::NULL
            .emit(&descriptors[0], 0, &mut lob_tails, &mut buf)
            .unwrap();
        assert_eq!(buf, [131]);
        assert!(lob_tails.is_empty());
    }

    #[test]
    fn emit_splits_long_lob_values() {
        let descriptors = in_descriptors(25); // BLOB
        let payload = vec![7_u8; 100];
        let mut buf = Vec::<u8>::new();
        let mut lob_tails = Vec::<Vec<u8>>::new();
        HdbValue::BINARY(payload.clone())
            .emit(&descriptors[0], 64, &mut lob_tails, &mut buf)
            .unwrap();
        // type code, then the in-row header with 64 bytes inline
        assert_eq!(buf.len(), 1 + lob::LOB_HEADER_SIZE + 64);
        assert_eq!(buf[0], 25);
        assert_eq!(lob_tails, [payload[64..].to_vec()]);
        assert_eq!(
            buf.len(),
            HdbValue::BINARY(payload).size(TypeId::BLOB, 64).unwrap()
        );
    }
}

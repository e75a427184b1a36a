use crate::{hdb_error::impl_err, HdbResult};
use bigdecimal::BigDecimal;
use num::ToPrimitive;
use num_bigint::{BigInt, Sign};

// The 16-byte packed DECIMAL format:
// bit 127: sign, bits 113..126: base-10 exponent with bias 6176,
// bits 0..112: unsigned mantissa, all little-endian.
const EXPONENT_BIAS: i64 = 6176;
const MANTISSA_BITS: u32 = 113;
const MANTISSA_MASK: u128 = (1_u128 << MANTISSA_BITS) - 1;

pub(crate) fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<BigDecimal> {
    let mut raw = [0_u8; 16];
    rdr.read_exact(&mut raw)?;
    let raw = u128::from_le_bytes(raw);

    let is_negative = (raw >> 127) != 0;
    #[allow(clippy::cast_possible_wrap)]
    let exponent = ((raw >> MANTISSA_BITS) & 0x3FFF) as i64 - EXPONENT_BIAS;
    let mantissa = raw & MANTISSA_MASK;

    let mut bigint = BigInt::from(mantissa);
    if is_negative {
        bigint = -bigint;
    }
    // BigDecimal carries a scale (digits right of the point), i.e. -exponent
    Ok(BigDecimal::new(bigint, -exponent))
}

pub(crate) fn emit(bd: &BigDecimal, w: &mut dyn std::io::Write) -> HdbResult<()> {
    let (bigint, scale) = bd.as_bigint_and_exponent();
    let (sign, mantissa) = bigint.into_parts();
    let mantissa = mantissa
        .to_u128()
        .filter(|m| m & !MANTISSA_MASK == 0)
        .ok_or_else(|| impl_err!("DECIMAL mantissa of {bd} exceeds 113 bits"))?;

    let exponent = -scale;
    let biased = exponent + EXPONENT_BIAS;
    if !(0..=0x3FFF).contains(&biased) {
        return Err(impl_err!("DECIMAL exponent of {bd} out of range"));
    }

    #[allow(clippy::cast_sign_loss)]
    let mut raw = mantissa | ((biased as u128) << MANTISSA_BITS);
    if sign == Sign::Minus {
        raw |= 1_u128 << 127;
    }
    w.write_all(&raw.to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{emit, parse};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn roundtrip(s: &str) {
        let bd = BigDecimal::from_str(s).unwrap();
        let mut buf = Vec::<u8>::new();
        emit(&bd, &mut buf).unwrap();
        assert_eq!(buf.len(), 16);
        let back = parse(&mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(back, bd);
    }

    #[test]
    fn roundtrip_values() {
        for s in [
            "0",
            "1",
            "-1",
            "123.45",
            "-123.45",
            "0.00000001",
            "99999999999999999999999999999999", // 32 digits, still < 2^113
            "-3.141592653589793238462643",
        ] {
            roundtrip(s);
        }
    }

    #[test]
    fn wire_format_is_stable() {
        // independently computed reference bytes
        let bd = BigDecimal::from_str("-123.45").unwrap();
        let mut buf = Vec::<u8>::new();
        emit(&bd, &mut buf).unwrap();
        assert_eq!(
            buf,
            hex::decode("39300000000000000000000000003cb0").unwrap()
        );

        let bd = BigDecimal::from_str("1").unwrap();
        let mut buf = Vec::<u8>::new();
        emit(&bd, &mut buf).unwrap();
        assert_eq!(
            buf,
            hex::decode("01000000000000000000000000004030").unwrap()
        );
    }

    #[test]
    fn mantissa_overflow_is_rejected() {
        // 40 nines does not fit into 113 bits
        let bd = BigDecimal::from_str(&"9".repeat(40)).unwrap();
        let mut buf = Vec::<u8>::new();
        assert!(emit(&bd, &mut buf).is_err());
    }
}

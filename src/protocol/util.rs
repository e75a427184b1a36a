use crate::{HdbError, HdbResult};

// --- CESU8 Stuff --- //

// Consumes the cesu8 bytes, returns a String with minimal allocation
pub(crate) fn string_from_cesu8(bytes: Vec<u8>) -> HdbResult<String> {
    String::from_utf8(bytes).or_else(|e| {
        Ok(cesu8::from_cesu8(e.as_bytes())
            .map_err(|_| HdbError::Cesu8)?
            .to_string())
    })
}

// cesu-8 is identical to utf-8, except for high code points
// which consume 4 bytes in utf-8 and 6 in cesu-8;
// the first byte of such a code point in utf8 has the bit pattern 11110xxx
// (240 - 247)
pub(crate) fn cesu8_length(s: &str) -> usize {
    let mut len = s.len();
    for b in s.as_bytes() {
        if *b >= 240_u8 {
            // 240 = b11110000
            len += 2;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    #[test]
    fn cesu8_length_matches_encoder() {
        for s in ["", "abc", "grüße", "今日は", "a💩b"] {
            assert_eq!(super::cesu8_length(s), cesu8::to_cesu8(s).len());
        }
    }

    #[test]
    fn string_from_cesu8_handles_surrogates() {
        let s = "price: 💰";
        let enc = cesu8::to_cesu8(s).to_vec();
        assert_eq!(super::string_from_cesu8(enc).unwrap(), s);
    }
}

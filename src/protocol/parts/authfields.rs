use crate::{
    hdb_error::impl_err,
    protocol::{parts::length_indicator, util_sync},
    HdbResult,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

// The AUTHENTICATION part: a count-prefixed list of byte-string fields.
#[derive(Debug, Default)]
pub(crate) struct AuthFields(Vec<AuthField>);
impl AuthFields {
    pub fn with_capacity(count: usize) -> Self {
        Self(Vec::<AuthField>::with_capacity(count))
    }

    pub(crate) fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        let field_count = rdr.read_u16::<LittleEndian>()? as usize; // I2
        let mut auth_fields: Self = Self(Vec::<AuthField>::with_capacity(field_count));
        for _ in 0..field_count {
            auth_fields.0.push(AuthField::parse(rdr)?);
        }
        Ok(auth_fields)
    }

    pub(crate) fn pop(&mut self) -> Option<Vec<u8>> {
        self.0.pop().map(AuthField::data)
    }

    pub(crate) fn size(&self) -> usize {
        let mut size = 2;
        for af in &self.0 {
            size += af.size();
        }
        size
    }

    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> HdbResult<()> {
        w.write_i16::<LittleEndian>(self.0.len() as i16)?;
        for field in &self.0 {
            field.emit(w)?;
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, vec: Vec<u8>) {
        self.0.push(AuthField::new(vec));
    }
    pub(crate) fn push_string(&mut self, s: &str) {
        self.0.push(AuthField::new(s.as_bytes().to_vec()));
    }
}

#[derive(Debug)]
struct AuthField(Vec<u8>);
impl AuthField {
    fn new(vec: Vec<u8>) -> Self {
        Self(vec)
    }

    fn data(self) -> Vec<u8> {
        self.0
    }

    fn emit(&self, w: &mut dyn std::io::Write) -> HdbResult<()> {
        length_indicator::emit(self.0.len(), w)?;
        w.write_all(&self.0)?; // B (varying) value
        Ok(())
    }

    fn size(&self) -> usize {
        length_indicator::size(self.0.len()) + self.0.len()
    }

    fn parse(rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        let len = length_indicator::parse(rdr.read_u8()?, rdr)?
            .ok_or_else(|| impl_err!("AuthField must not be NULL"))?;
        Ok(Self(util_sync::parse_bytes(len, rdr)?))
    }
}

#[cfg(test)]
mod tests {
    use super::AuthFields;

    #[test]
    fn roundtrip() {
        let mut fields = AuthFields::with_capacity(3);
        fields.push_string("FELIX");
        fields.push(b"SCRAMSHA256".to_vec());
        fields.push(vec![7_u8; 64]);

        let mut buf = Vec::<u8>::new();
        fields.emit(&mut buf).unwrap();
        assert_eq!(buf.len(), fields.size());

        let mut parsed = AuthFields::parse(&mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(parsed.pop().unwrap(), vec![7_u8; 64]);
        assert_eq!(parsed.pop().unwrap(), b"SCRAMSHA256".to_vec());
        assert_eq!(parsed.pop().unwrap(), b"FELIX".to_vec());
        assert!(parsed.pop().is_none());
    }
}

use crate::{
    hdb_error::impl_err,
    protocol::{util, util_sync},
    HdbResult, TypeId,
};
use byteorder::{LittleEndian, ReadBytesExt};

/// Describes a set of IN, INOUT, and OUT parameters. Can be empty.
#[derive(Debug, Default)]
pub struct ParameterDescriptors(Vec<ParameterDescriptor>);
impl ParameterDescriptors {
    /// Produces an iterator that returns the IN and INOUT parameters.
    pub fn iter_in(&self) -> impl std::iter::Iterator<Item = &ParameterDescriptor> {
        self.0.iter().filter(|ms| {
            (ms.direction == ParameterDirection::IN) | (ms.direction == ParameterDirection::INOUT)
        })
    }
    /// Produces an iterator that returns the INOUT and OUT parameters.
    pub fn iter_out(&self) -> impl std::iter::Iterator<Item = &ParameterDescriptor> {
        self.0.iter().filter(|ms| {
            (ms.direction == ParameterDirection::OUT) | (ms.direction == ParameterDirection::INOUT)
        })
    }

    /// Returns true if at least one IN or INOUT parameter is contained.
    pub fn has_in(&self) -> bool {
        self.iter_in().next().is_some()
    }

    /// Returns true if at least one OUT or INOUT parameter is contained.
    pub fn has_out(&self) -> bool {
        self.iter_out().next().is_some()
    }

    /// Returns the number of contained descriptors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true exactly if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves a parameter name to its position among the IN parameters.
    pub fn position_of_in_parameter(&self, name: &str) -> Option<usize> {
        self.iter_in().position(|d| d.name() == Some(name))
    }

    pub(crate) fn parse(count: usize, rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        let mut vec_pd = Vec::<ParameterDescriptor>::new();
        let mut name_offsets = Vec::<u32>::new();
        for _ in 0..count {
            // 16 byte each
            let option = rdr.read_u8()?;
            let value_type = rdr.read_u8()?;
            let mode = ParameterDescriptor::direction_from_u8(rdr.read_u8()?)?;
            rdr.read_u8()?;
            name_offsets.push(rdr.read_u32::<LittleEndian>()?);
            let length = rdr.read_i16::<LittleEndian>()?;
            let fraction = rdr.read_i16::<LittleEndian>()?;
            rdr.read_u32::<LittleEndian>()?;
            vec_pd.push(ParameterDescriptor::try_new(
                option, value_type, mode, length, fraction,
            )?);
        }
        // read the parameter names
        for (descriptor, name_offset) in vec_pd.iter_mut().zip(name_offsets.iter()) {
            if name_offset != &u32::MAX {
                let length = rdr.read_u8()?;
                let name = util::string_from_cesu8(util_sync::parse_bytes(length as usize, rdr)?)?;
                descriptor.set_name(name);
            }
        }
        Ok(Self(vec_pd))
    }
}

impl std::ops::Index<usize> for ParameterDescriptors {
    type Output = ParameterDescriptor;
    fn index(&self, index: usize) -> &Self::Output {
        self.0.index(index)
    }
}

/// Metadata for a parameter.
#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    name: Option<String>,
    type_id: TypeId,
    binding: ParameterBinding,
    scale: i16,
    precision: i16,
    direction: ParameterDirection,
}
impl ParameterDescriptor {
    fn try_new(
        parameter_option: u8,
        type_code: u8,
        direction: ParameterDirection,
        precision: i16,
        scale: i16,
    ) -> HdbResult<Self> {
        let type_id = TypeId::try_new(type_code)?;
        let binding = evaluate_option(parameter_option);
        Ok(Self {
            binding,
            type_id,
            direction,
            precision,
            scale,
            name: None,
        })
    }

    /// Describes whether a parameter can be NULL or not, or if it has a
    /// default value.
    pub fn binding(&self) -> ParameterBinding {
        self.binding
    }

    /// Returns true if the column can contain NULL values.
    pub fn is_nullable(&self) -> bool {
        matches!(self.binding, ParameterBinding::Optional)
    }

    /// Returns the type id of the parameter.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Scale (for decimals).
    pub fn scale(&self) -> i16 {
        self.scale
    }
    /// Precision (length).
    pub fn precision(&self) -> i16 {
        self.precision
    }
    /// Describes whether a parameter is used for input, output, or both.
    pub fn direction(&self) -> ParameterDirection {
        self.direction.clone()
    }

    /// Returns the name of the parameter.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    fn direction_from_u8(v: u8) -> HdbResult<ParameterDirection> {
        // it's done with three bits where always exactly one is 1;
        // the other bits are not used
        match v {
            1 => Ok(ParameterDirection::IN),
            2 => Ok(ParameterDirection::INOUT),
            4 => Ok(ParameterDirection::OUT),
            _ => Err(impl_err!("invalid value for ParameterDirection: {v}")),
        }
    }
}

fn evaluate_option(parameter_option: u8) -> ParameterBinding {
    // documented are only: bit 0: mandatory; 1: optional, 2: has_default
    if parameter_option & 0b_0000_0001_u8 > 0 {
        ParameterBinding::Mandatory
    } else if parameter_option & 0b_0000_0010_u8 > 0 {
        ParameterBinding::Optional
    } else {
        ParameterBinding::HasDefault
    }
}

impl std::fmt::Display for ParameterDescriptor {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(fmt, "{name} ")?;
        }
        write!(
            fmt,
            "{:?} {:?} {}({},{})",
            self.direction, self.binding, self.type_id, self.precision, self.scale
        )?;
        Ok(())
    }
}

/// Describes whether a parameter can be NULL, or must have a value, or has
/// a default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterBinding {
    /// Parameter is nullable (can be set to NULL).
    Optional,
    /// Parameter is not nullable (must not be set to NULL).
    Mandatory,
    /// Parameter has a defined DEFAULT value and can be omitted.
    HasDefault,
}

/// Describes whether a parameter is used for input, output, or both.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParameterDirection {
    /// Input parameter.
    IN,
    /// Input and output parameter.
    INOUT,
    /// Output parameter.
    OUT,
}

#[cfg(test)]
mod tests {
    use super::ParameterDescriptors;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Write;

    // builds one 16-byte descriptor record
    fn record(option: u8, type_code: u8, mode: u8, name_offset: u32) -> Vec<u8> {
        let mut buf = Vec::<u8>::new();
        buf.write_u8(option).unwrap();
        buf.write_u8(type_code).unwrap();
        buf.write_u8(mode).unwrap();
        buf.write_u8(0).unwrap();
        buf.write_u32::<LittleEndian>(name_offset).unwrap();
        buf.write_i16::<LittleEndian>(10).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(0).unwrap();
        buf
    }

    #[test]
    fn parse_in_and_out() {
        let mut bytes = Vec::<u8>::new();
        bytes.extend(record(0b10, 3, 1, 0)); // optional INT IN, named
        bytes.extend(record(0b01, 11, 4, u32::MAX)); // mandatory NVARCHAR OUT
        bytes.write_u8(1).unwrap();
        bytes.write_all(b"A").unwrap();

        let descriptors = ParameterDescriptors::parse(2, &mut std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert!(descriptors.has_in());
        assert!(descriptors.has_out());
        assert_eq!(descriptors[0].name(), Some("A"));
        assert!(descriptors[0].is_nullable());
        assert_eq!(descriptors.position_of_in_parameter("A"), Some(0));
        assert_eq!(descriptors.position_of_in_parameter("B"), None);
        assert_eq!(descriptors[1].name(), None);
    }
}

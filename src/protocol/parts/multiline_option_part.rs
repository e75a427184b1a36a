use crate::protocol::parts::option_part::{OptionId, OptionPart};
use crate::HdbResult;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt::Debug;
use std::hash::Hash;

// Some parts (e.g. TOPOLOGY_INFORMATION) are lists of option-lists: the
// part's argument count gives the number of lines, each line is prefixed
// with its own i16 field count.
#[derive(Clone, Debug)]
pub(crate) struct MultilineOptionPart<T: OptionId<T> + Debug + Eq + PartialEq + Hash>(
    Vec<OptionPart<T>>,
);

impl<T: OptionId<T> + Debug + Eq + PartialEq + Hash> Default for MultilineOptionPart<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: OptionId<T> + Debug + Eq + PartialEq + Hash> MultilineOptionPart<T> {
    #[allow(clippy::cast_sign_loss)]
    pub(crate) fn parse(no_of_lines: usize, rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        let mut lines = Vec::<OptionPart<T>>::with_capacity(no_of_lines);
        for _ in 0..no_of_lines {
            let field_count = rdr.read_i16::<LittleEndian>()? as usize; // I2
            lines.push(OptionPart::<T>::parse(field_count, rdr)?);
        }
        Ok(Self(lines))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn lines(&self) -> &[OptionPart<T>] {
        &self.0
    }
}

use crate::protocol::parts::parameter_descriptor::ParameterDescriptors;
use crate::{hdb_error::usage_err, HdbResult, HdbValue};

// Implementation of the PARAMETERS part.
//
// Contains rows of input parameters.
// The argument count of the part defines how many rows are included.
#[derive(Debug)]
pub(crate) struct ParameterRows<'a>(Vec<ParameterRow<'a>>);
impl<'a> ParameterRows<'a> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> ParameterRows<'a> {
        ParameterRows(Vec::<ParameterRow>::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(
        &mut self,
        hdb_parameters: Vec<HdbValue<'a>>,
        descriptors: &ParameterDescriptors,
    ) -> HdbResult<()> {
        self.0.push(ParameterRow::new(hdb_parameters, descriptors)?);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    // Emits all rows; returns the tails of LOB values that exceeded the
    // inline budget, in parameter order.
    pub(crate) fn emit(
        &self,
        descriptors: &ParameterDescriptors,
        lob_write_length: usize,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<Vec<Vec<u8>>> {
        let mut lob_tails = Vec::<Vec<u8>>::new();
        for row in &self.0 {
            row.emit(descriptors, lob_write_length, &mut lob_tails, w)?;
        }
        Ok(lob_tails)
    }

    pub(crate) fn size(
        &self,
        descriptors: &ParameterDescriptors,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        let mut size = 0;
        for row in &self.0 {
            size += row.size(descriptors, lob_write_length)?;
        }
        Ok(size)
    }

    // Total number of bytes of the values that go into LOB columns.
    pub(crate) fn lob_size(&self, descriptors: &ParameterDescriptors) -> HdbResult<usize> {
        let mut size = 0;
        for row in &self.0 {
            let mut in_descriptors = descriptors.iter_in();
            for value in &row.0 {
                let descriptor = in_descriptors
                    .next()
                    .ok_or_else(|| usage_err!("lob_size(): not enough metadata"))?;
                if descriptor.type_id().is_lob() {
                    size += value.size(descriptor.type_id(), usize::MAX)?;
                }
            }
        }
        Ok(size)
    }
}

// A single row of parameters.
#[derive(Default, Debug)]
struct ParameterRow<'a>(Vec<HdbValue<'a>>);

impl<'a> ParameterRow<'a> {
    // Constructor, fails if the provided values are not compatible with the
    // IN descriptors.
    fn new(
        hdb_parameters: Vec<HdbValue<'a>>,
        descriptors: &ParameterDescriptors,
    ) -> HdbResult<ParameterRow<'a>> {
        let in_count = descriptors.iter_in().count();
        if in_count != hdb_parameters.len() {
            return Err(usage_err!(
                "wrong number of parameters: got {}, statement needs {in_count}",
                hdb_parameters.len()
            ));
        }
        let mut in_descriptors = descriptors.iter_in();
        for hdb_value in &hdb_parameters {
            let descriptor = in_descriptors.next().unwrap(/* counted above */);
            if !hdb_value.is_null() {
                descriptor
                    .type_id()
                    .matches_value_type(hdb_value.type_id_for_emit(descriptor.type_id())?)?;
            }
        }
        Ok(ParameterRow(hdb_parameters))
    }

    fn size(
        &self,
        descriptors: &ParameterDescriptors,
        lob_write_length: usize,
    ) -> HdbResult<usize> {
        let mut size = 0;
        let mut in_descriptors = descriptors.iter_in();
        for value in &(self.0) {
            let descriptor = in_descriptors
                .next()
                .ok_or_else(|| usage_err!("ParameterRow::size(): not enough metadata"))?;
            size += value.size(descriptor.type_id(), lob_write_length)?;
        }
        Ok(size)
    }

    fn emit(
        &self,
        descriptors: &ParameterDescriptors,
        lob_write_length: usize,
        lob_tails: &mut Vec<Vec<u8>>,
        w: &mut dyn std::io::Write,
    ) -> HdbResult<()> {
        let mut in_descriptors = descriptors.iter_in();
        for value in &(self.0) {
            let descriptor = in_descriptors
                .next()
                .ok_or_else(|| usage_err!("ParameterRow::emit(): not enough metadata"))?;
            value.emit(descriptor, lob_write_length, lob_tails, w)?;
        }
        Ok(())
    }
}

use crate::{
    conn::AmConnCore, hdb_error::usage_err, protocol::parts::ParameterDescriptors, HdbResult,
    HdbValue,
};
use std::sync::Arc;

/// The OUT and INOUT values of a procedure call, a single record decoded
/// positionally against the statement's OUT descriptors.
#[derive(Debug)]
pub struct OutputParameters {
    descriptors: Arc<ParameterDescriptors>,
    values: Vec<HdbValue<'static>>,
}

impl OutputParameters {
    pub(crate) fn parse(
        am_conn_core: &AmConnCore,
        descriptors: &Arc<ParameterDescriptors>,
        rdr: &mut dyn std::io::Read,
    ) -> HdbResult<Self> {
        trace!("OutputParameters::parse()");
        let mut values = Vec::<HdbValue<'static>>::new();
        for descriptor in descriptors.iter_out() {
            values.push(HdbValue::parse(
                descriptor.type_id(),
                descriptor.is_nullable(),
                am_conn_core,
                rdr,
            )?);
        }
        Ok(Self {
            descriptors: Arc::clone(descriptors),
            values,
        })
    }

    /// Number of contained values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no value is contained.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a reference to the value at position `i`.
    pub fn get(&self, i: usize) -> Option<&HdbValue<'static>> {
        self.values.get(i)
    }

    /// Returns the value of the parameter with the given name.
    pub fn field(&self, name: &str) -> HdbResult<&HdbValue<'static>> {
        let index = self
            .descriptors
            .iter_out()
            .position(|d| d.name() == Some(name))
            .ok_or_else(|| usage_err!("no output parameter named {name}"))?;
        Ok(&self.values[index])
    }

    /// The descriptors of the contained parameters.
    pub fn descriptors(&self) -> impl Iterator<Item = &crate::ParameterDescriptor> {
        self.descriptors.iter_out()
    }

    /// Converts into the contained values.
    pub fn into_values(self) -> Vec<HdbValue<'static>> {
        self.values
    }
}

impl std::fmt::Display for OutputParameters {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        for value in &self.values {
            if !first {
                write!(fmt, ", ")?;
            }
            first = false;
            write!(fmt, "{value}")?;
        }
        Ok(())
    }
}

use crate::protocol::parts::ResultSetMetadata;
use crate::{hdb_error::usage_err, HdbResult, HdbValue};
use std::sync::Arc;

/// A single line of a [`ResultSet`](crate::ResultSet), consisting of the
/// contained [`HdbValue`]s and a reference to the metadata.
#[derive(Clone, Debug)]
pub struct Row {
    metadata: Arc<ResultSetMetadata>,
    values: Vec<HdbValue<'static>>,
}

impl Row {
    pub(crate) fn new(metadata: Arc<ResultSetMetadata>, values: Vec<HdbValue<'static>>) -> Self {
        Self { metadata, values }
    }

    /// Returns the metadata of the result set this row belongs to.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }

    /// Length of the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row contains no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a reference to the value at position `i`.
    pub fn get(&self, i: usize) -> Option<&HdbValue<'static>> {
        self.values.get(i)
    }

    /// Removes and returns the next value; front to back.
    pub fn next_value(&mut self) -> Option<HdbValue<'static>> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.remove(0))
        }
    }

    /// Returns the value with the given column (display) name.
    pub fn field(&self, name: &str) -> HdbResult<&HdbValue<'static>> {
        let index = self
            .metadata
            .iter()
            .position(|fmd| fmd.displayname() == name || fmd.columnname() == name)
            .ok_or_else(|| usage_err!("no column named {name}"))?;
        Ok(&self.values[index])
    }

    /// Converts the row into its values.
    pub fn into_values(self) -> Vec<HdbValue<'static>> {
        self.values
    }
}

impl std::ops::Index<usize> for Row {
    type Output = HdbValue<'static>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl IntoIterator for Row {
    type Item = HdbValue<'static>;
    type IntoIter = std::vec::IntoIter<HdbValue<'static>>;
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl std::fmt::Display for Row {
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

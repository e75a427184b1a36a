use crate::protocol::parts::ServerError;
use crate::{hdb_error::impl_err, HdbResult};
use byteorder::{LittleEndian, ReadBytesExt};

const SUCCESS_NO_INFO: i32 = -2;
const EXECUTION_FAILED: i32 = -3;

/// The outcome of a single data manipulation statement.
#[derive(Clone, Debug)]
pub enum ExecutionResult {
    /// Number of rows that were affected.
    RowsAffected(usize),
    /// The statement was successful, the number of affected rows is
    /// not known.
    SuccessNoInfo,
    /// The execution failed; the server error is attached where one was
    /// reported alongside.
    Failure(Option<ServerError>),
}

/// The ROW_COUNT part of a reply: one [`ExecutionResult`] per executed row.
#[derive(Clone, Debug, Default)]
pub struct ExecutionResults(Vec<ExecutionResult>);

impl ExecutionResults {
    pub(crate) fn parse(count: usize, rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        let mut vec = Vec::<ExecutionResult>::with_capacity(count);
        for _ in 0..count {
            match rdr.read_i32::<LittleEndian>()? {
                SUCCESS_NO_INFO => vec.push(ExecutionResult::SuccessNoInfo),
                EXECUTION_FAILED => vec.push(ExecutionResult::Failure(None)),
                i => {
                    let n = usize::try_from(i)
                        .map_err(|_| impl_err!("invalid row count {i} received"))?;
                    vec.push(ExecutionResult::RowsAffected(n));
                }
            }
        }
        Ok(Self(vec))
    }

    /// Sums up the affected-rows counts.
    pub fn total_rows_affected(&self) -> usize {
        self.0
            .iter()
            .map(|er| match er {
                ExecutionResult::RowsAffected(n) => *n,
                _ => 0,
            })
            .sum()
    }

    /// True if no single execution failed.
    pub fn is_success(&self) -> bool {
        !self
            .0
            .iter()
            .any(|er| matches!(er, ExecutionResult::Failure(_)))
    }

    /// The individual outcomes.
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionResult> {
        self.0.iter()
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no outcome is contained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ExecutionResults {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for er in &self.0 {
            match er {
                ExecutionResult::RowsAffected(n) => writeln!(f, "Rows affected: {n}")?,
                ExecutionResult::SuccessNoInfo => writeln!(f, "Success")?,
                ExecutionResult::Failure(Some(e)) => writeln!(f, "Failure: {e}")?,
                ExecutionResult::Failure(None) => writeln!(f, "Failure")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionResults;
    use byteorder::{LittleEndian, WriteBytesExt};

    #[test]
    fn parse_mixed_outcomes() {
        let mut buf = Vec::<u8>::new();
        buf.write_i32::<LittleEndian>(1).unwrap();
        buf.write_i32::<LittleEndian>(-2).unwrap();
        buf.write_i32::<LittleEndian>(-3).unwrap();
        let results = ExecutionResults::parse(3, &mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.total_rows_affected(), 1);
        assert!(!results.is_success());
    }
}

use crate::protocol::parts::{ResultSetMetadata, RsState};
use crate::{HdbResult, Row};
use std::sync::Arc;

/// The result of a query: a forward cursor over the rows.
///
/// The first batch of rows arrives with the reply to the query execution;
/// further batches are fetched transparently with FETCH_NEXT round trips
/// of [`fetch_size`](crate::Connection::set_fetch_size) rows each.
///
/// A `ResultSet` does not keep its connection alive; fetching from a
/// result set whose connection is gone fails with
/// [`HdbError::Closed`](crate::HdbError::Closed).
#[derive(Debug)]
pub struct ResultSet {
    rs_state: RsState,
    a_rsmd: Arc<ResultSetMetadata>,
    closed: bool,
}

impl ResultSet {
    pub(crate) fn new(rs_state: RsState, a_rsmd: Arc<ResultSetMetadata>) -> Self {
        Self {
            rs_state,
            a_rsmd,
            closed: false,
        }
    }

    /// The metadata of the result columns.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.a_rsmd
    }

    /// Returns the next row, fetching from the server when the local
    /// buffer is drained; `None` when the result set is exhausted.
    pub fn fetch_one(&mut self) -> HdbResult<Option<Row>> {
        if self.closed {
            return Err(crate::HdbError::Closed);
        }
        self.rs_state.next_row(&self.a_rsmd)
    }

    /// Returns up to `k` rows.
    pub fn fetch_many(&mut self, k: usize) -> HdbResult<Vec<Row>> {
        let mut rows = Vec::<Row>::with_capacity(k);
        while rows.len() < k {
            match self.fetch_one()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Returns all remaining rows.
    pub fn fetch_all(&mut self) -> HdbResult<Vec<Row>> {
        if self.closed {
            return Err(crate::HdbError::Closed);
        }
        self.rs_state.fetch_all(&self.a_rsmd)?;
        let mut rows = Vec::<Row>::with_capacity(self.rs_state.len());
        while let Some(row) = self.rs_state.next_row(&self.a_rsmd)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Number of rows that are buffered locally.
    pub fn buffered_row_count(&self) -> usize {
        self.rs_state.len()
    }

    /// True as soon as all rows are either consumed or buffered locally.
    pub fn is_complete(&self) -> HdbResult<bool> {
        self.rs_state.is_complete()
    }

    /// Closes the cursor on the server, unless the server closed it
    /// already. Subsequent fetches return
    /// [`HdbError::Closed`](crate::HdbError::Closed).
    pub fn close(&mut self) -> HdbResult<()> {
        if !self.closed {
            self.closed = true;
            self.rs_state.close()?;
        }
        Ok(())
    }

    /// Converts the result set into exactly one row; fails if it contains
    /// more or less than one.
    pub fn into_single_row(mut self) -> HdbResult<Row> {
        let o_row = self.fetch_one()?;
        match (o_row, self.fetch_one()?) {
            (Some(row), None) => Ok(row),
            (Some(_), Some(_)) => Err(crate::hdb_error::usage_err!(
                "result set has more than one row"
            )),
            (None, _) => Err(crate::hdb_error::usage_err!("result set is empty")),
        }
    }
}

impl Iterator for ResultSet {
    type Item = HdbResult<Row>;
    fn next(&mut self) -> Option<HdbResult<Row>> {
        match self.fetch_one() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

use std::time::Duration;

/// The tunable behavior of a connection.
///
/// All values can also be changed on a live
/// [`Connection`](crate::Connection).
#[derive(Clone, Debug)]
pub struct ConnectionConfiguration {
    auto_commit: bool,
    read_timeout: Option<Duration>,
    fetch_size: u32,
    lob_read_length: u32,
    lob_write_length: usize,
    trace: bool,
}

impl Default for ConnectionConfiguration {
    fn default() -> Self {
        Self {
            auto_commit: true,
            read_timeout: Some(Duration::from_secs(30)),
            fetch_size: crate::DEFAULT_FETCH_SIZE,
            lob_read_length: crate::DEFAULT_LOB_READ_LENGTH,
            lob_write_length: crate::DEFAULT_LOB_WRITE_LENGTH,
            trace: std::env::var("HDB_TRACE").is_ok_and(|v| v == "1"),
        }
    }
}

impl ConnectionConfiguration {
    /// Switches auto-commit on or off (default: on).
    #[must_use]
    pub fn with_auto_commit(mut self, ac: bool) -> Self {
        self.auto_commit = ac;
        self
    }

    /// Sets the socket read/write timeout (default: 30 s; `None` blocks
    /// indefinitely).
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Sets the number of rows requested per FETCH round trip (default: 32).
    #[must_use]
    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    /// Sets the number of LOB bytes requested per READ_LOB round trip
    /// (default: 1024).
    #[must_use]
    pub fn with_lob_read_length(mut self, lob_read_length: u32) -> Self {
        self.lob_read_length = lob_read_length;
        self
    }

    /// Switches wire tracing (hex dumps of every packet, at log level
    /// `trace`) on or off. The environment variable `HDB_TRACE=1` switches
    /// it on process-wide.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Whether statements are committed automatically.
    pub fn is_auto_commit(&self) -> bool {
        self.auto_commit
    }
    pub(crate) fn set_auto_commit(&mut self, ac: bool) {
        self.auto_commit = ac;
    }

    /// The socket read/write timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// The number of rows requested per FETCH round trip.
    pub fn fetch_size(&self) -> u32 {
        self.fetch_size
    }
    pub(crate) fn set_fetch_size(&mut self, fetch_size: u32) {
        self.fetch_size = fetch_size;
    }

    /// The number of LOB bytes requested per READ_LOB round trip.
    pub fn lob_read_length(&self) -> u32 {
        self.lob_read_length
    }
    pub(crate) fn set_lob_read_length(&mut self, lob_read_length: u32) {
        self.lob_read_length = lob_read_length;
    }

    /// The ceiling for LOB bytes shipped within a single request.
    pub fn lob_write_length(&self) -> usize {
        self.lob_write_length
    }

    /// Whether wire tracing is on.
    pub fn is_trace(&self) -> bool {
        self.trace
    }
    pub(crate) fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }
}

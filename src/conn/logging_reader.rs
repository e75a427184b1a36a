use std::io::Read;

// Collects everything that is read from the wire and dumps it as hex when
// dropped. Only used when wire tracing is switched on.
pub(crate) struct LoggingReader<'a> {
    buf: Vec<u8>,
    inner: &'a mut dyn Read,
}
impl<'a> LoggingReader<'a> {
    pub(crate) fn new(r: &'a mut dyn Read) -> LoggingReader<'a> {
        LoggingReader {
            buf: Vec::new(),
            inner: r,
        }
    }
}
impl Read for LoggingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => {
                self.buf.extend_from_slice(&buf[0..n]);
                Ok(n)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for LoggingReader<'_> {
    fn drop(&mut self) {
        trace!(
            "FROM THE WIRE: {} bytes |{}|",
            self.buf.len(),
            hex::encode(&self.buf)
        );
    }
}

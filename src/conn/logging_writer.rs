use std::io::Write;

// Collects everything that is written to the wire and dumps it as hex when
// dropped. Only used when wire tracing is switched on.
pub(crate) struct LoggingWriter<'a> {
    buf: Vec<u8>,
    inner: &'a mut dyn Write,
}
impl<'a> LoggingWriter<'a> {
    pub(crate) fn new(w: &'a mut dyn Write) -> LoggingWriter<'a> {
        LoggingWriter {
            buf: Vec::new(),
            inner: w,
        }
    }
}
impl Write for LoggingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.inner.write(buf) {
            Ok(n) => {
                self.buf.extend_from_slice(&buf[0..n]);
                Ok(n)
            }
            Err(e) => Err(e),
        }
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl Drop for LoggingWriter<'_> {
    fn drop(&mut self) {
        trace!(
            "TO THE WIRE: {} bytes |{}|",
            self.buf.len(),
            hex::encode(&self.buf)
        );
    }
}

use crate::conn::{ConnectParams, ConnectionConfiguration};
use std::net::TcpStream;

// A blocking, bidirectional byte channel to one HANA instance.
#[derive(Debug)]
pub(crate) struct TcpClient {
    params: ConnectParams,
    reader: TcpStream,
    writer: TcpStream,
}

impl TcpClient {
    // Returns an initialized plain tcp connection
    pub fn try_new(
        params: ConnectParams,
        configuration: &ConnectionConfiguration,
    ) -> std::io::Result<Self> {
        let tcpstream = TcpStream::connect(params.addr())?;
        tcpstream.set_read_timeout(configuration.read_timeout())?;
        tcpstream.set_write_timeout(configuration.read_timeout())?;
        Ok(Self {
            params,
            writer: tcpstream.try_clone()?,
            reader: tcpstream,
        })
    }

    pub fn connect_params(&self) -> &ConnectParams {
        &self.params
    }

    pub fn writer(&mut self) -> &mut TcpStream {
        &mut self.writer
    }

    pub fn reader(&mut self) -> &mut TcpStream {
        &mut self.reader
    }

    pub fn set_read_timeout(&mut self, timeout: Option<std::time::Duration>) -> std::io::Result<()> {
        self.reader.set_read_timeout(timeout)?;
        self.writer.set_write_timeout(timeout)
    }

    pub fn close(&mut self) {
        self.reader.shutdown(std::net::Shutdown::Both).ok();
    }
}

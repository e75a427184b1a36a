use crate::conn::tcp_client::TcpClient;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

// Before the first SCNP packet, client and server exchange a version
// handshake: 14 bytes with the product and protocol versions and the
// byte order, answered with 8 bytes that are not evaluated.
pub(crate) fn send_and_receive(tcp_client: &mut TcpClient) -> std::io::Result<()> {
    trace!("send_and_receive(): send");
    let request = initial_request();
    tcp_client.writer().write_all(&request)?;
    tcp_client.writer().flush()?;

    trace!("send_and_receive(): receive");
    let mut ignored = [0_u8; 8];
    std::io::Read::read_exact(tcp_client.reader(), &mut ignored).map_err(|e| {
        trace!("Skipping over empty initial response failed with {e:?}");
        e
    })?;
    debug!("Successfully initialized");
    Ok(())
}

fn initial_request() -> [u8; 14] {
    const FILLER: i32 = -1;
    const MAJOR_PRODUCT_VERSION: i8 = 4;
    const MINOR_PRODUCT_VERSION: i16 = 20;
    const MAJOR_PROTOCOL_VERSION: i8 = 4;
    const MINOR_PROTOCOL_VERSION: i16 = 1;
    const RESERVED: i8 = 0;
    const NUMBER_OF_OPTIONS: i8 = 1;
    const OPTION_ID_SWAPKIND: i8 = 1;
    const LITTLE_ENDIAN: i8 = 1;

    let mut c = std::io::Cursor::new([0_u8; 14]);
    Write::write_all(&mut c, &FILLER.to_be_bytes()).unwrap();
    WriteBytesExt::write_i8(&mut c, MAJOR_PRODUCT_VERSION).unwrap();
    WriteBytesExt::write_i16::<BigEndian>(&mut c, MINOR_PRODUCT_VERSION).unwrap();
    WriteBytesExt::write_i8(&mut c, MAJOR_PROTOCOL_VERSION).unwrap();
    WriteBytesExt::write_i16::<BigEndian>(&mut c, MINOR_PROTOCOL_VERSION).unwrap();
    WriteBytesExt::write_i8(&mut c, RESERVED).unwrap();
    WriteBytesExt::write_i8(&mut c, NUMBER_OF_OPTIONS).unwrap();
    WriteBytesExt::write_i8(&mut c, OPTION_ID_SWAPKIND).unwrap();
    WriteBytesExt::write_i8(&mut c, LITTLE_ENDIAN).unwrap();
    c.into_inner()
}

#[cfg(test)]
mod tests {
    #[test]
    fn initial_request_has_the_documented_layout() {
        let req = super::initial_request();
        assert_eq!(req.len(), 14);
        assert_eq!(&req[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(req[4], 4); // major product version
        assert_eq!(&req[5..7], &[0, 20]); // minor product version, big-endian
        assert_eq!(req[7], 4); // major protocol version
        assert_eq!(&req[8..10], &[0, 1]); // minor protocol version
        assert_eq!(req[13], 1); // little-endian swapkind
    }
}

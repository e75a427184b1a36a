//! Drives a complete session against a scripted in-process server:
//! version handshake, SCRAM-SHA256 authentication, a query with a
//! multi-batch result set, CLOB streaming, and disconnect.
//!
//! The server side speaks the wire format byte by byte, so these tests
//! also pin down the framing layout.

use hdbclient::{ConnectParams, Connection, HdbResult, HdbValue};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

const SESSION_ID: i64 = 7777;

// ---------------------------------------------------------------------
// scripted server
// ---------------------------------------------------------------------

struct PartSpec {
    kind: u8,
    attrs: u8,
    argcount: i32,
    body: Vec<u8>,
    // the final RESULT_SET / READ_LOB_REPLY part of a reply comes unpadded
    pad: bool,
}

impl PartSpec {
    fn new(kind: u8, argcount: i32, body: Vec<u8>) -> Self {
        Self {
            kind,
            attrs: 0,
            argcount,
            body,
            pad: true,
        }
    }
    fn with_attrs(mut self, attrs: u8) -> Self {
        self.attrs = attrs;
        self
    }
    fn unpadded(mut self) -> Self {
        self.pad = false;
        self
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::<u8>::new();
        bytes.push(self.kind);
        bytes.push(self.attrs);
        bytes.extend((self.argcount.min(i16::MAX as i32) as i16).to_le_bytes());
        bytes.extend(0_i32.to_le_bytes()); // big argcount
        bytes.extend((self.body.len() as i32).to_le_bytes());
        bytes.extend(0x0001_0000_i32.to_le_bytes()); // remaining buffer size
        bytes.extend(&self.body);
        if self.pad {
            let padsize = (8 - self.body.len() % 8) % 8;
            bytes.extend(std::iter::repeat(0_u8).take(padsize));
        }
        bytes
    }
}

fn reply_packet(session_id: i64, function_code: i16, parts: &[PartSpec]) -> Vec<u8> {
    let parts_bytes: Vec<Vec<u8>> = parts.iter().map(PartSpec::to_bytes).collect();
    let seg_len = 24 + parts_bytes.iter().map(Vec::len).sum::<usize>();

    let mut bytes = Vec::<u8>::new();
    // message header, 32 bytes
    bytes.extend(session_id.to_le_bytes());
    bytes.extend(1_i32.to_le_bytes()); // packet seq number (diagnostic only)
    bytes.extend((seg_len as u32).to_le_bytes()); // varpart length
    bytes.extend(0x0002_0000_u32.to_le_bytes()); // varpart size
    bytes.extend(1_i16.to_le_bytes()); // number of segments
    bytes.extend([0_u8; 10]);
    // segment header, 24 bytes
    bytes.extend((seg_len as i32).to_le_bytes());
    bytes.extend(0_i32.to_le_bytes()); // offset
    bytes.extend((parts.len() as i16).to_le_bytes());
    bytes.extend(1_i16.to_le_bytes()); // segment number
    bytes.push(2); // segment kind: reply
    bytes.push(0); // reserved
    bytes.extend(function_code.to_le_bytes());
    bytes.extend([0_u8; 8]);
    for part_bytes in parts_bytes {
        bytes.extend(part_bytes);
    }
    bytes
}

// Answers the version handshake and then each request with the next
// scripted reply. Records the sequence number of every request.
fn spawn_scripted_server(
    replies: Vec<Vec<u8>>,
) -> (u16, Arc<Mutex<Vec<i32>>>, std::thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let seq_numbers = Arc::new(Mutex::new(Vec::<i32>::new()));
    let seq_numbers_clone = Arc::clone(&seq_numbers);

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // version handshake: 14 bytes in, 8 bytes out
        let mut handshake = [0_u8; 14];
        stream.read_exact(&mut handshake).unwrap();
        stream.write_all(&[0_u8; 8]).unwrap();

        for reply in replies {
            // consume one request: 32-byte header, then the var part
            let mut header = [0_u8; 32];
            stream.read_exact(&mut header).unwrap();
            let seq = i32::from_le_bytes(header[8..12].try_into().unwrap());
            seq_numbers_clone.lock().unwrap().push(seq);
            let varpart_len = u32::from_le_bytes(header[12..16].try_into().unwrap());
            let mut varpart = vec![0_u8; varpart_len as usize];
            stream.read_exact(&mut varpart).unwrap();

            stream.write_all(&reply).unwrap();
        }
    });
    (port, seq_numbers, handle)
}

// ---------------------------------------------------------------------
// reply body builders
// ---------------------------------------------------------------------

fn auth_field(bytes: &[u8]) -> Vec<u8> {
    assert!(bytes.len() <= 245);
    let mut v = vec![bytes.len() as u8];
    v.extend(bytes);
    v
}

fn auth_fields(fields: &[&[u8]]) -> Vec<u8> {
    let mut body = (fields.len() as u16).to_le_bytes().to_vec();
    for field in fields {
        body.extend(auth_field(field));
    }
    body
}

// one 24-byte metadata record without names
fn column_metadata(type_code: u8, nullable: bool) -> Vec<u8> {
    let mut body = Vec::<u8>::new();
    body.push(if nullable { 0b10 } else { 0b01 }); // column options
    body.push(type_code);
    body.extend(0_i16.to_le_bytes()); // scale
    body.extend(0_i16.to_le_bytes()); // precision
    body.extend(0_i16.to_le_bytes());
    for _ in 0..4 {
        body.extend(u32::MAX.to_le_bytes()); // no names
    }
    body
}

fn short_string_row(value: &str) -> Vec<u8> {
    let mut body = vec![value.len() as u8];
    body.extend(value.as_bytes());
    body
}

fn ta_flags_committed() -> Vec<u8> {
    vec![1_u8, 28, 1] // id = committed, type = BOOLEAN, value = true
}

fn lob_row(total_length: i64, locator_id: u64, chunk: &[u8]) -> Vec<u8> {
    let mut body = vec![0b10_u8]; // data included, not last
    body.extend(total_length.to_le_bytes());
    body.extend(locator_id.to_le_bytes());
    body.extend((chunk.len() as i32).to_le_bytes());
    body.extend(chunk);
    body
}

fn read_lob_reply_body(locator_id: u64, is_last: bool, data: &[u8]) -> Vec<u8> {
    let mut body = locator_id.to_le_bytes().to_vec();
    body.push(if is_last { 0b110 } else { 0b010 });
    body.extend((data.len() as i32).to_le_bytes());
    body.extend([0_u8; 3]);
    body.extend(data);
    body
}

// challenge = (salt, server nonce), wrapped as an auth-field list
fn server_challenge() -> Vec<u8> {
    auth_fields(&[&[0xAA_u8; 16], &[0xBB_u8; 48]])
}

// ---------------------------------------------------------------------
// the script
// ---------------------------------------------------------------------

const ATTR_LAST_AND_CLOSED: u8 = 0b_0001_0001;
const KIND_ERROR: u8 = 6;
const KIND_RESULTSET: u8 = 5;
const KIND_RESULTSET_ID: u8 = 13;
const KIND_RESULTSET_METADATA: u8 = 48;
const KIND_AUTHENTICATION: u8 = 33;
const KIND_READ_LOB_REPLY: u8 = 18;
const KIND_TRANSACTION_FLAGS: u8 = 64;

fn connect(port: u16) -> HdbResult<Connection> {
    static INIT_LOGGER: std::sync::Once = std::sync::Once::new();
    INIT_LOGGER.call_once(|| {
        flexi_logger::Logger::try_with_env_or_str("info")
            .unwrap()
            .start()
            .ok();
    });
    Connection::new(ConnectParams::new("127.0.0.1", port, "FELIX", "secret"))
}

fn authentication_replies() -> Vec<Vec<u8>> {
    vec![
        // AUTHENTICATE: the server selects SCRAMSHA256 and sends its challenge
        reply_packet(
            0,
            0, // Nil
            &[PartSpec::new(
                KIND_AUTHENTICATION,
                1,
                auth_fields(&[b"SCRAMSHA256", &server_challenge()]),
            )],
        ),
        // CONNECT: the session id comes in the packet header
        reply_packet(
            SESSION_ID,
            14, // Connect
            &[PartSpec::new(
                KIND_AUTHENTICATION,
                1,
                auth_fields(&[b"SCRAMSHA256", &[0xCC_u8; 32]]),
            )],
        ),
    ]
}

fn disconnect_reply() -> Vec<u8> {
    reply_packet(SESSION_ID, 18, &[]) // Disconnect
}

#[test]
fn connect_query_fetch_and_disconnect() {
    let mut replies = authentication_replies();

    // the query: TRANSACTION_FLAGS (committed), metadata, id, first batch
    replies.push(reply_packet(
        SESSION_ID,
        5, // Select
        &[
            PartSpec::new(KIND_TRANSACTION_FLAGS, 1, ta_flags_committed()),
            PartSpec::new(KIND_RESULTSET_METADATA, 1, column_metadata(11, true)),
            PartSpec::new(KIND_RESULTSET_ID, 1, 42_u64.to_le_bytes().to_vec()),
            PartSpec::new(
                KIND_RESULTSET,
                3,
                [
                    short_string_row("r1"),
                    short_string_row("r2"),
                    short_string_row("r3"),
                ]
                .concat(),
            )
            .unpadded(),
        ],
    ));
    // the second batch closes the result set
    replies.push(reply_packet(
        SESSION_ID,
        10, // Fetch
        &[PartSpec::new(
            KIND_RESULTSET,
            2,
            [short_string_row("r4"), short_string_row("r5")].concat(),
        )
        .with_attrs(ATTR_LAST_AND_CLOSED)
        .unpadded()],
    ));
    replies.push(disconnect_reply());

    let (port, seq_numbers, handle) = spawn_scripted_server(replies);
    let connection = connect(port).unwrap();
    assert_eq!(connection.id().unwrap(), SESSION_ID);

    let result_set = connection.query("SELECT A FROM T").unwrap();
    assert_eq!(result_set.metadata().len(), 1);

    let mut values = Vec::<String>::new();
    for row in result_set {
        values.push(row.unwrap().next_value().unwrap().try_into_string().unwrap());
    }
    assert_eq!(values, ["r1", "r2", "r3", "r4", "r5"]);

    // the transaction flags of the reply are reflected on the session
    assert!(connection.is_committed().unwrap());

    connection.close().unwrap();
    assert!(connection.is_closed().unwrap());

    handle.join().unwrap();
    // packet sequence numbers strictly increase by 1 per request
    assert_eq!(*seq_numbers.lock().unwrap(), [1, 2, 3, 4, 5]);
}

#[test]
fn clob_is_streamed_in_chunks() {
    let payload: Vec<u8> = (0..2000_u32).map(|i| b'a' + (i % 26) as u8).collect();
    let locator_id = 4242_u64;

    let mut replies = authentication_replies();
    replies.push(reply_packet(
        SESSION_ID,
        5, // Select
        &[
            PartSpec::new(KIND_RESULTSET_METADATA, 1, column_metadata(26, true)),
            PartSpec::new(KIND_RESULTSET_ID, 1, 43_u64.to_le_bytes().to_vec()),
            PartSpec::new(KIND_RESULTSET, 1, lob_row(2000, locator_id, &payload[..1024]))
                .with_attrs(ATTR_LAST_AND_CLOSED)
                .unpadded(),
        ],
    ));
    replies.push(reply_packet(
        SESSION_ID,
        16, // ReadLob
        &[
            PartSpec::new(
                KIND_READ_LOB_REPLY,
                1,
                read_lob_reply_body(locator_id, false, &payload[1024..1500]),
            )
            .unpadded(),
        ],
    ));
    replies.push(reply_packet(
        SESSION_ID,
        16, // ReadLob
        &[
            PartSpec::new(
                KIND_READ_LOB_REPLY,
                1,
                read_lob_reply_body(locator_id, true, &payload[1500..]),
            )
            .unpadded(),
        ],
    ));
    replies.push(disconnect_reply());

    let (port, _seq_numbers, handle) = spawn_scripted_server(replies);
    let connection = connect(port).unwrap();

    let result_set = connection.query("SELECT C FROM T").unwrap();
    let row = result_set.into_single_row().unwrap();
    let mut lob = row.into_values().remove(0).try_into_lob().unwrap();

    assert_eq!(lob.total_length(), 2000);
    assert_eq!(lob.buffered_length(), 1024);

    // the first read pulls exactly the missing range (476 bytes)
    let first = lob.read(1500).unwrap();
    assert_eq!(first, &payload[..1500]);
    assert_eq!(lob.buffered_length(), 1500);
    assert_eq!(lob.tell(), 1500);

    // seeking backwards causes no network I/O
    lob.seek(std::io::SeekFrom::Start(100)).unwrap();
    assert_eq!(lob.read(100).unwrap(), &payload[100..200]);

    // the final read drains the rest and sees the last-data flag
    lob.seek(std::io::SeekFrom::Start(1500)).unwrap();
    let rest = lob.read_all().unwrap();
    assert_eq!(rest, &payload[1500..]);
    assert!(lob.is_complete());

    connection.close().unwrap();
    handle.join().unwrap();
}

#[test]
fn server_errors_are_raised_and_warnings_are_collected() {
    fn error_record(code: i32, severity: i8, text: &str) -> Vec<u8> {
        let mut body = code.to_le_bytes().to_vec();
        body.extend(7_i32.to_le_bytes()); // position
        body.extend((text.len() as i32).to_le_bytes());
        body.push(severity as u8);
        body.extend(b"HY000");
        body.extend(text.as_bytes());
        let padsize = (8 - body.len() % 8) % 8;
        body.extend(std::iter::repeat(0_u8).take(padsize));
        body
    }

    let mut replies = authentication_replies();
    // a failing statement
    replies.push(reply_packet(
        SESSION_ID,
        1, // Ddl
        &[PartSpec::new(
            KIND_ERROR,
            1,
            error_record(259, 1, "invalid table name"),
        )],
    ));
    // a successful one with a warning attached
    replies.push(reply_packet(
        SESSION_ID,
        1, // Ddl
        &[PartSpec::new(
            KIND_ERROR,
            1,
            error_record(1347, 0, "not recommended"),
        )],
    ));
    replies.push(disconnect_reply());

    let (port, _seq, handle) = spawn_scripted_server(replies);
    let connection = connect(port).unwrap();

    let err = connection.exec("DROP TABLE NO_SUCH_TABLE").unwrap_err();
    let server_error = err.server_error().expect("expected a server error");
    assert_eq!(server_error.code(), 259);
    assert_eq!(server_error.text(), "invalid table name");

    // the session remains usable after a db error
    connection.exec("CREATE TABLE T(N VARCHAR(10))").unwrap();
    let warnings = connection.pop_warnings().unwrap().expect("expected warnings");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code(), 1347);

    connection.close().unwrap();
    handle.join().unwrap();
}

#[test]
fn prepared_statement_roundtrip() {
    fn parameter_metadata_record(type_code: u8, direction: u8) -> Vec<u8> {
        let mut body = vec![0b10_u8, type_code, direction, 0];
        body.extend(u32::MAX.to_le_bytes()); // no name
        body.extend(10_i16.to_le_bytes()); // length
        body.extend(0_i16.to_le_bytes()); // fraction
        body.extend(0_u32.to_le_bytes());
        body
    }

    const KIND_STATEMENT_ID: u8 = 10;
    const KIND_PARAMETER_METADATA: u8 = 47;
    const KIND_ROWS_AFFECTED: u8 = 12;

    let mut replies = authentication_replies();
    // PREPARE: statement id plus parameter metadata (one IN parameter)
    replies.push(reply_packet(
        SESSION_ID,
        2, // Insert
        &[
            PartSpec::new(KIND_STATEMENT_ID, 1, 99_u64.to_le_bytes().to_vec()),
            PartSpec::new(KIND_PARAMETER_METADATA, 1, parameter_metadata_record(11, 1)),
        ],
    ));
    // EXECUTE: one row inserted
    replies.push(reply_packet(
        SESSION_ID,
        2, // Insert
        &[PartSpec::new(
            KIND_ROWS_AFFECTED,
            1,
            1_i32.to_le_bytes().to_vec(),
        )],
    ));
    // DROP_STATEMENT_ID (sent when the PreparedStatement is dropped)
    replies.push(reply_packet(SESSION_ID, 0, &[]));
    replies.push(disconnect_reply());

    let (port, _seq, handle) = spawn_scripted_server(replies);
    let connection = connect(port).unwrap();

    {
        let mut prepared = connection.prepare("INSERT INTO T VALUES(?)").unwrap();
        assert_eq!(prepared.parameter_descriptors().len(), 1);
        let affected = prepared
            .execute(vec![HdbValue::from("hello")])
            .unwrap()
            .into_affected_rows()
            .unwrap();
        assert_eq!(affected, 1);
    } // drop sends DROP_STATEMENT_ID

    connection.close().unwrap();
    handle.join().unwrap();
}

//! Tests for the TcpTransport implementation against an in-process emulator stand-in

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use fantom_apdu_core::{Transport, TransportError};
use fantom_apdu_transport_tcp::{TcpConfig, TcpError, TcpTransport};

/// Read one length-prefixed request the way the emulator does
fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).ok()?;
    let mut request = vec![0u8; u32::from_be_bytes(prefix) as usize];
    stream.read_exact(&mut request).ok()?;
    Some(request)
}

/// Write one response: payload length, payload, status word
fn write_response(stream: &mut TcpStream, payload: &[u8], sw: [u8; 2]) {
    stream
        .write_all(&(payload.len() as u32).to_be_bytes())
        .unwrap();
    stream.write_all(payload).unwrap();
    stream.write_all(&sw).unwrap();
}

/// Spawn a fake emulator answering each request with `handler`
fn spawn_emulator<F>(handler: F) -> (u16, thread::JoinHandle<Vec<Vec<u8>>>)
where
    F: Fn(&[u8]) -> (Vec<u8>, [u8; 2]) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut seen = Vec::new();
        while let Some(request) = read_request(&mut stream) {
            let (payload, sw) = handler(&request);
            write_response(&mut stream, &payload, sw);
            seen.push(request);
        }
        seen
    });

    (port, handle)
}

fn config(port: u16) -> TcpConfig {
    TcpConfig::default()
        .with_port(port)
        .with_read_timeout(Some(Duration::from_secs(5)))
}

#[test]
fn test_exchange_frames_request_and_response() {
    let (port, handle) = spawn_emulator(|request| {
        assert_eq!(request, &[0xE0, 0x01, 0x00, 0x00, 0x00]);
        (vec![0x01, 0x02, 0x03, 0x00], [0x90, 0x00])
    });

    let mut transport = TcpTransport::connect(config(port)).unwrap();
    assert!(transport.is_connected());

    let response = transport.exchange(&[0xE0, 0x01, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(hex::encode(&response), "010203009000");

    drop(transport);
    let seen = handle.join().unwrap();
    assert_eq!(seen.len(), 1);
}

#[test]
fn test_multiple_exchanges_share_connection() {
    let (port, handle) = spawn_emulator(|request| match request[1] {
        0x01 => (vec![0x01, 0x00, 0x00], [0x90, 0x00]),
        _ => (Vec::new(), [0x6E, 0x03]),
    });

    let mut transport = TcpTransport::connect(config(port)).unwrap();

    let first = transport.exchange(&[0xE0, 0x01, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(first.as_ref(), &[0x01, 0x00, 0x00, 0x90, 0x00]);

    let second = transport.exchange(&[0xE0, 0x7F, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(second.as_ref(), &[0x6E, 0x03]);

    drop(transport);
    assert_eq!(handle.join().unwrap().len(), 2);
}

#[test]
fn test_closed_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Swallow the request and hang up without answering
        let _ = read_request(&mut stream);
    });

    let mut transport =
        TcpTransport::connect(config(port).with_auto_reconnect(false)).unwrap();
    let result = transport.exchange(&[0xE0, 0x01, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(TransportError::Disconnected)));
    assert!(!transport.is_connected());

    // Without auto reconnect the transport stays down
    let result = transport.exchange(&[0xE0, 0x01, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(TransportError::Disconnected)));

    handle.join().unwrap();
}

#[test]
fn test_connect_refused() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = TcpTransport::connect(config(port));
    assert!(matches!(result, Err(TcpError::Connect { .. })));
}

#[test]
fn test_oversized_frame_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = read_request(&mut stream);
        stream.write_all(&u32::MAX.to_be_bytes()).unwrap();
    });

    let mut transport = TcpTransport::connect(config(port)).unwrap();
    let result = transport.exchange(&[0xE0, 0x01, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(TransportError::Transmission(_))));
    assert!(!transport.is_connected());

    handle.join().unwrap();
}

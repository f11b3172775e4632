//! Tests de integración contra el servidor real
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, en un thread
//! aparte, y habla HTTP crudo por TcpStream.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use catalog_server::catalog::{SeedData, Store};
use catalog_server::config::Config;
use catalog_server::server::Server;

/// Arranca un servidor sembrado y devuelve su dirección
fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let store = Store::from_seeds(SeedData::embedded().expect("embedded seeds")).expect("seeded store");
        let mut server = Server::new(Config::default(), store);
        server.serve(listener).expect("serve");
    });

    addr
}

/// Helper: envía un request HTTP y retorna la response completa
fn send_request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    content_type: Option<&str>,
    body: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    let mut request = format!("{} {} HTTP/1.1\r\nHost: {}\r\n", method, path, addr);
    if let Some(content_type) = content_type {
        request.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    request.push_str(&format!("Content-Length: {}\r\n\r\n{}", body.len(), body));

    stream.write_all(request.as_bytes())?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;

    Ok(response)
}

fn get(addr: SocketAddr, path: &str) -> String {
    send_request(addr, "GET", path, None, "").expect("Failed to send request")
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

#[test]
fn test_radiohead_scenario() {
    let addr = start_server();

    let created = send_request(
        addr,
        "POST",
        "/artists",
        Some("application/json"),
        r#"{"name":"Radiohead"}"#,
    )
    .expect("Failed to send request");
    assert!(created.starts_with("HTTP/1.1 201 Created"), "got: {}", created);
    assert!(created.contains("Content-Type: application/json"));
    assert_eq!(extract_body(&created), r#"{"artistId":2,"name":"Radiohead"}"#);

    let fetched = get(addr, "/artists/2");
    assert!(fetched.contains("200 OK"));
    assert_eq!(extract_body(&fetched), r#"{"artistId":2,"name":"Radiohead"}"#);

    let deleted = send_request(addr, "DELETE", "/artists/2", None, "").expect("Failed to send request");
    assert!(deleted.contains("200 OK"));
    assert_eq!(extract_body(&deleted), r#"{"message":"Successfully deleted"}"#);

    let missing = get(addr, "/artists/2");
    assert!(missing.contains("404 Not Found"));
}

#[test]
fn test_form_encoded_song() {
    let addr = start_server();

    let created = send_request(
        addr,
        "POST",
        "/albums/1",
        Some("application/x-www-form-urlencoded"),
        "name=Hump+de+Bump&lyrics=&trackNumber=8",
    )
    .expect("Failed to send request");
    assert!(created.contains("201 Created"), "got: {}", created);

    let body = extract_body(&get(addr, "/songs/2")).to_string();
    assert!(body.contains(r#""name":"Hump de Bump""#));
    assert!(body.contains(r#""trackNumber":8"#));
}

#[test]
fn test_not_found() {
    let addr = start_server();

    let response = get(addr, "/nonexistent");

    assert!(response.contains("404"), "Expected 404 for non-existent route");
    assert_eq!(extract_body(&response), "Endpoint not found");
}

#[test]
fn test_malformed_json_does_not_crash() {
    let addr = start_server();

    let response = send_request(addr, "POST", "/artists", Some("application/json"), "{oops")
        .expect("Failed to send request");
    assert!(response.contains("400 Bad Request"));

    // El servidor sigue atendiendo
    let response = get(addr, "/artists");
    assert!(response.contains("200 OK"));
}

#[test]
fn test_multiple_requests_sequentially() {
    let addr = start_server();

    for i in 0..5 {
        let body = format!(r#"{{"name":"Artist {}"}}"#, i);
        let response = send_request(addr, "POST", "/artists", Some("application/json"), &body)
            .expect("Failed to send request");
        assert!(response.contains("201 Created"), "Request {} failed", i);
        assert!(extract_body(&response).contains(&format!(r#""artistId":{}"#, i + 2)));
    }
}

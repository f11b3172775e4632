//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Loop de un solo thread: acepta una conexión, lee el request completo,
//! lo despacha contra el store y escribe la respuesta antes de aceptar la
//! siguiente. Como los handlers corren hasta terminar, no hay mutaciones
//! concurrentes del store y no hace falta ningún lock.

use crate::catalog::Store;
use crate::config::Config;
use crate::http::request::head_len;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const READ_CHUNK: usize = 8192;

/// Máximo de bytes que se descartan tras rechazar un request
const DRAIN_LIMIT: usize = 16 * 1024 * 1024;

/// Espera máxima por cada lectura mientras se descarta
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Resultado de leer un request del socket
#[derive(Debug, PartialEq, Eq)]
enum Incoming {
    /// El peer cerró sin mandar nada
    Closed,
    /// Cabecera y body completos (o lo que llegó antes del cierre)
    Complete(Vec<u8>),
    /// La cabecera superó el límite sin terminar
    HeadTooLarge,
    /// `Content-Length` supera el límite; `pending` bytes siguen en camino
    BodyTooLarge { pending: usize },
}

/// Servidor HTTP del catálogo. Es dueño del store y del router.
pub struct Server {
    config: Config,
    router: Router,
    store: Store,
}

impl Server {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            config,
            router: Router::catalog(),
            store,
        }
    }

    /// Hace bind en la dirección configurada y atiende conexiones para siempre
    pub fn run(&mut self) -> io::Result<()> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        info!("Server is listening on {}", address);

        self.serve(listener)
    }

    /// Atiende conexiones de un listener ya creado, una a la vez
    pub fn serve(&mut self, listener: TcpListener) -> io::Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        error!("connection error: {}", e);
                    }
                }
                Err(e) => {
                    error!("failed to accept connection: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Lee un request, lo despacha y escribe la respuesta
    pub fn handle_connection(&mut self, mut stream: TcpStream) -> io::Result<()> {
        let start = Instant::now();

        let incoming = read_request(
            &mut stream,
            self.config.max_header_bytes,
            self.config.max_body_bytes,
        )?;

        let buffer = match incoming {
            Incoming::Closed => return Ok(()),
            Incoming::Complete(buffer) => buffer,
            Incoming::HeadTooLarge => {
                warn!(limit = self.config.max_header_bytes, "request head too large");
                return respond_and_drain(&mut stream, &reject("request head too large"), DRAIN_LIMIT);
            }
            Incoming::BodyTooLarge { pending } => {
                warn!(limit = self.config.max_body_bytes, pending, "request body too large");
                return respond_and_drain(&mut stream, &reject("request body too large"), pending);
            }
        };

        let response = match Request::parse(&buffer) {
            Ok(request) => {
                let response = self.dispatch(&request);
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                let method = request.method().as_str();
                if response.status().is_success() {
                    info!("{} {} -> {} ({:.2}ms)", method, request.path(), response.status(), elapsed_ms);
                } else {
                    warn!("{} {} -> {} ({:.2}ms)", method, request.path(), response.status(), elapsed_ms);
                }
                response
            }
            Err(e) => {
                warn!("parse error: {}", e);
                reject(&format!("Invalid request: {}", e))
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        Ok(())
    }

    /// Despacha un request ya parseado
    pub fn dispatch(&mut self, request: &Request) -> Response {
        if request.content_length().unwrap_or(0) > self.config.max_body_bytes {
            return reject("request body too large");
        }
        self.router.route(&mut self.store, request)
    }
}

/// 400 generado por el servidor antes de llegar al router
fn reject(message: &str) -> Response {
    Response::message(StatusCode::BadRequest, message).with_common_headers()
}

/// Escribe la respuesta, cierra la escritura y descarta lo que el peer aún
/// tenga en vuelo. Cerrar con bytes sin leer provoca un RST que puede borrar
/// la respuesta del lado del cliente.
fn respond_and_drain(stream: &mut TcpStream, response: &Response, pending: usize) -> io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    stream.set_read_timeout(Some(DRAIN_TIMEOUT))?;
    discard(stream, pending.min(DRAIN_LIMIT));

    Ok(())
}

/// Lee y descarta hasta `limit` bytes. Corta en EOF, timeout o error.
fn discard(stream: &mut TcpStream, limit: usize) -> usize {
    let mut chunk = [0u8; READ_CHUNK];
    let mut discarded = 0;

    while discarded < limit {
        let want = (limit - discarded).min(READ_CHUNK);
        match stream.read(&mut chunk[..want]) {
            Ok(0) | Err(_) => break,
            Ok(n) => discarded += n,
        }
    }

    discarded
}

/// Lee cabecera y body completos.
///
/// La cabecera se acota a `max_head` bytes. Un `Content-Length` mayor que
/// `max_body` se rechaza sin leer el body. Si el peer cierra antes, se
/// devuelve lo leído.
fn read_request<R: Read>(stream: &mut R, max_head: usize, max_body: usize) -> io::Result<Incoming> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match head_len(&buffer) {
            Some(head) if head > max_head => return Ok(Incoming::HeadTooLarge),
            Some(head) => {
                let declared = declared_content_length(&buffer[..head]);
                if declared > max_body {
                    let received = buffer.len() - head;
                    return Ok(Incoming::BodyTooLarge {
                        pending: declared.saturating_sub(received),
                    });
                }
                if buffer.len() >= head + declared {
                    break;
                }
            }
            None if buffer.len() > max_head => return Ok(Incoming::HeadTooLarge),
            None => {}
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    if buffer.is_empty() {
        Ok(Incoming::Closed)
    } else {
        Ok(Incoming::Complete(buffer))
    }
}

/// `Content-Length` de una cabecera cruda; 0 si falta o es inválido
fn declared_content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::thread;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Atiende una sola conexión con un store vacío y devuelve la respuesta cruda
    fn roundtrip(raw: &[u8], shutdown_write: bool) -> String {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        if shutdown_write {
            client.shutdown(Shutdown::Write).unwrap();
        }

        let (stream, _) = listener.accept().unwrap();
        let mut server = Server::new(Config::default(), Store::new());
        server.handle_connection(stream).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Como `roundtrip`, pero el cliente escribe desde otro thread para que
    /// bodies grandes no bloqueen al servidor
    fn roundtrip_threaded(config: Config, raw: Vec<u8>, shutdown_write: bool) -> io::Result<String> {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let client = thread::spawn(move || -> io::Result<String> {
            let mut stream = TcpStream::connect(addr)?;
            stream.set_read_timeout(Some(Duration::from_secs(10)))?;
            stream.write_all(&raw)?;
            if shutdown_write {
                stream.shutdown(Shutdown::Write)?;
            }
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        });

        let (stream, _) = listener.accept().unwrap();
        let mut server = Server::new(config, Store::new());
        server.handle_connection(stream).unwrap();

        client.join().unwrap()
    }

    #[test]
    fn test_declared_content_length() {
        assert_eq!(declared_content_length(b"POST / HTTP/1.1\r\ncontent-length: 12\r\n\r\n"), 12);
        assert_eq!(declared_content_length(b"GET / HTTP/1.1\r\n\r\n"), 0);
    }

    #[test]
    fn test_read_request_stops_at_content_length() {
        let mut input = Cursor::new(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nokEXTRA".to_vec());

        match read_request(&mut input, 8192, 1024).unwrap() {
            Incoming::Complete(buffer) => {
                assert_eq!(Request::parse(&buffer).unwrap().body(), b"ok");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_read_request_head_limit() {
        // Nunca llega la línea vacía
        let mut input = Cursor::new(vec![b'a'; 64 * 1024]);

        assert_eq!(read_request(&mut input, 1024, 1024).unwrap(), Incoming::HeadTooLarge);
    }

    #[test]
    fn test_read_request_body_limit() {
        let mut input = Cursor::new(b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n0123456789".to_vec());

        assert_eq!(
            read_request(&mut input, 8192, 50).unwrap(),
            Incoming::BodyTooLarge { pending: 90 }
        );
    }

    #[test]
    fn test_read_request_empty() {
        let mut input = Cursor::new(Vec::new());

        assert_eq!(read_request(&mut input, 8192, 1024).unwrap(), Incoming::Closed);
    }

    #[test]
    fn test_handle_connection_create_artist() {
        let body = r#"{"name":"Radiohead"}"#;
        let raw = format!(
            "POST /artists HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        // Sin cerrar la escritura: el servidor debe cortar por Content-Length
        let text = roundtrip(raw.as_bytes(), false);

        assert!(text.starts_with("HTTP/1.1 201 Created"));
        assert!(text.ends_with(r#"{"artistId":2,"name":"Radiohead"}"#));
    }

    #[test]
    fn test_handle_connection_unknown_route() {
        let text = roundtrip(b"GET /nope HTTP/1.1\r\n\r\n", false);

        assert!(text.contains("404 Not Found"));
        assert!(text.ends_with("Endpoint not found"));
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let text = roundtrip(b"\x00\x01\x02\x03garbage", true);

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid request"));
        assert!(text.contains("Server: Catalog-HTTP/1.1"));
        assert!(text.contains("Connection: close"));
    }

    #[test]
    fn test_oversized_body_gets_complete_response() {
        let mut config = Config::default();
        config.max_body_bytes = 64 * 1024;

        let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(1024 * 1024));
        let mut raw = format!(
            "POST /artists HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        raw.extend_from_slice(body.as_bytes());

        // Un RST aquí haría fallar read_to_end en el cliente
        let text = roundtrip_threaded(config, raw, false).expect("clean close");

        assert!(text.starts_with("HTTP/1.1 400 Bad Request"));
        assert!(text.contains("Server: Catalog-HTTP/1.1"));
        assert!(text.contains("Connection: close"));
        assert!(text.ends_with(r#"{"message":"request body too large"}"#));
    }

    #[test]
    fn test_unterminated_head_is_rejected() {
        let mut config = Config::default();
        config.max_header_bytes = 256;

        let mut raw = b"GET /artists HTTP/1.1\r\nX-Filler: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(32 * 1024));

        let text = roundtrip_threaded(config, raw, true).expect("clean close");

        assert!(text.starts_with("HTTP/1.1 400 Bad Request"));
        assert!(text.contains("Connection: close"));
        assert!(text.ends_with(r#"{"message":"request head too large"}"#));
    }

    #[test]
    fn test_dispatch_body_too_large_has_common_headers() {
        let mut config = Config::default();
        config.max_body_bytes = 4;
        let mut server = Server::new(config, Store::new());

        let request = Request::parse(
            b"POST /artists HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 20\r\n\r\n{\"name\":\"Radiohead\"}",
        )
        .unwrap();
        let response = server.dispatch(&request);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.header("Server"), Some("Catalog-HTTP/1.1"));
        assert_eq!(response.header("Connection"), Some("close"));

        // No se creó nada
        let lookup = Request::parse(b"GET /artists/2 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(server.dispatch(&lookup).status(), StatusCode::NotFound);
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut server = Server::new(Config::default(), Store::new());
            // No llega nada: el read retorna 0 y la función debe terminar Ok(())
            server.handle_connection(stream).unwrap();
        });

        drop(TcpStream::connect(addr).unwrap());

        t.join().unwrap();
    }
}

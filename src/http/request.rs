//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP escrito a mano para el catálogo.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /artists HTTP/1.1\r\n
//! Host: localhost:5000\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 20\r\n
//! \r\n
//! {"name":"Radiohead"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Bytes crudos, acotados por `Content-Length`

use std::collections::HashMap;

use super::body::{self, BodyError, Fields};

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es soportado
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición sin query string (ej: "/artists/2")
    path: String,

    /// Headers HTTP tal como llegaron
    headers: HashMap<String, String>,

    /// Body crudo del request
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Posición donde termina la cabecera (incluyendo el `\r\n\r\n`), si ya llegó completa
pub fn head_len(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// El body es todo lo que sigue a la línea vacía, recortado a
    /// `Content-Length` cuando el header está presente.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use catalog_server::http::Request;
    ///
    /// let raw = b"GET /artists/1?verbose=1 HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/artists/1");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let (head, rest) = match head_len(buffer) {
            Some(len) => (&buffer[..len], &buffer[len..]),
            None => (buffer, &[][..]),
        };

        let head_str = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;

        if head_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head_str.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;

        // 1. Request line
        let (method, path) = Self::parse_request_line(request_line)?;

        // 2. Headers hasta la línea vacía
        let headers = Self::parse_headers(lines)?;

        // 3. Body
        let mut request = Request {
            method,
            path,
            headers,
            body: Vec::new(),
        };
        let body_len = request.content_length().unwrap_or(rest.len()).min(rest.len());
        request.body = rest[..body_len].to_vec();

        Ok(request)
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path?query HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        // El query string no participa del enrutamiento
        let path = match parts[1].split_once('?') {
            Some((path, _query)) => path.to_string(),
            None => parts[1].to_string(),
        };

        let version = parts[2];
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((method, path))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene un header específico (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Valor de `Content-Length`, si es un número válido
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|value| value.parse().ok())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Interpreta el body según `Content-Type` como un mapa de campos sin tipo
    pub fn fields(&self) -> Result<Fields, BodyError> {
        body::parse(self.header("Content-Type"), &self.body)
    }
}

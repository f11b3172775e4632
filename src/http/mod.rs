//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que necesita el catálogo, sin
//! librerías de alto nivel:
//!
//! - Parsing de requests (request line, headers, body por `Content-Length`)
//! - Parsing de bodies JSON y form-urlencoded
//! - Construcción de responses
//! - Status codes
//!
//! Cada conexión transporta un único request; la respuesta siempre lleva
//! `Connection: close`.
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 201 Created\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 33\r\n
//! \r\n
//! {"artistId":2,"name":"Radiohead"}
//! ```

pub mod body;      // Bodies JSON / form-urlencoded
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use body::{BodyError, Fields};
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;

//! # Parsing de Bodies
//! src/http/body.rs
//!
//! Convierte el body crudo en un mapa de campos sin tipo según `Content-Type`:
//!
//! - `application/json`: el body debe ser un objeto JSON
//! - `application/x-www-form-urlencoded`: `k=v&k2=v2`, con `+` y `%XX` decodificados
//! - Cualquier otro tipo (o body vacío): mapa vacío
//!
//! La conversión a tipos concretos ocurre después, en `catalog::commands`.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errores al interpretar el body de un request
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("JSON body must be an object")]
    NotAnObject,

    #[error("invalid form encoding: {0}")]
    InvalidEncoding(String),
}

/// Mapa plano de campos recibidos en el body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Obtiene un campo crudo
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Interpreta `body` según el `Content-Type` recibido
pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Fields, BodyError> {
    if body.is_empty() {
        return Ok(Fields::default());
    }

    // Ignorar parámetros como "; charset=utf-8"
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("application/json") => parse_json(body),
        Some("application/x-www-form-urlencoded") => parse_form(body),
        _ => Ok(Fields::default()),
    }
}

fn parse_json(body: &[u8]) -> Result<Fields, BodyError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(Fields(map)),
        _ => Err(BodyError::NotAnObject),
    }
}

fn parse_form(body: &[u8]) -> Result<Fields, BodyError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| BodyError::InvalidEncoding("body is not valid UTF-8".to_string()))?;

    let mut map = Map::new();

    for pair in text.split('&') {
        if pair.is_empty() {
            continue;
        }

        // Un par sin '=' queda con valor vacío
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(url_decode(key)?, Value::String(url_decode(value)?));
    }

    Ok(Fields(map))
}

/// Decodifica un componente form-urlencoded (`+` → espacio, `%XX` → byte)
pub fn url_decode(s: &str) -> Result<String, BodyError> {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| BodyError::InvalidEncoding(format!("bad escape in '{}'", s)))?;
                decoded.push(hex);
                i += 3;
            }
            b => {
                decoded.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(decoded)
        .map_err(|_| BodyError::InvalidEncoding(format!("escape in '{}' is not UTF-8", s)))
}

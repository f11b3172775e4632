//! # Errores de la API
//! src/error.rs
//!
//! Errores esperables de un request. Ninguno termina el proceso: todos se
//! convierten en una respuesta con body JSON `{"message": "..."}`.

use thiserror::Error;

use crate::catalog::EntityKind;
use crate::http::{BodyError, Response, StatusCode};

#[derive(Debug, Error)]
pub enum ApiError {
    /// La entidad pedida no existe en su colección
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: u64 },

    /// Campo requerido ausente, tipo incorrecto o id de path inválido
    #[error("{0}")]
    BadRequest(String),

    /// Body que no se pudo interpretar
    #[error(transparent)]
    Body(#[from] BodyError),

    /// El contador de ids de este tipo llegó al máximo representable
    #[error("no {entity} ids left to issue")]
    IdsExhausted { entity: EntityKind },
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        ApiError::NotFound { entity, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NotFound,
            ApiError::BadRequest(_) | ApiError::Body(_) => StatusCode::BadRequest,
            ApiError::IdsExhausted { .. } => StatusCode::InternalServerError,
        }
    }

    pub fn into_response(self) -> Response {
        Response::message(self.status(), &self.to_string())
    }
}

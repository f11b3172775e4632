//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, path) a handlers del catálogo.
//!
//! ```text
//! Request → Router → Handler(&mut Store) → Response
//! ```
//!
//! Las rutas se registran en orden y gana el primer patrón que coincide.
//! Un segmento `:nombre` captura cualquier valor no vacío. Si nada coincide
//! se responde 404 en texto plano.

pub mod handlers;

use tracing::{debug, error, warn};

use crate::catalog::Store;
use crate::error::{ApiError, Result};
use crate::http::{Method, Request, Response, StatusCode};

/// Un handler recibe el store, los parámetros del path y el request
pub type Handler = fn(&mut Store, &Params, &Request) -> Result<Response>;

/// Parámetros capturados del path (`/artists/:id` → `id`)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Valor crudo de un parámetro
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parámetro convertido a número; 400 si no es un entero válido
    pub fn parse<T: std::str::FromStr>(&self, name: &str, what: &str) -> Result<T> {
        let raw = self.get(name).unwrap_or_default();
        raw.parse()
            .map_err(|_| ApiError::BadRequest(format!("invalid {}: {}", what, raw)))
    }
}

/// Una ruta registrada: método, patrón partido en segmentos y handler
struct Route {
    method: Method,
    pattern: String,
    segments: Vec<String>,
    handler: Handler,
}

impl Route {
    /// Compara segmento a segmento; devuelve los parámetros si coincide
    fn matches(&self, method: Method, path: &str) -> Option<Params> {
        if self.method != method {
            return None;
        }

        let parts = split_path(path);
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment.strip_prefix(':') {
                Some(name) if !part.is_empty() => params.push((name.to_string(), part.to_string())),
                Some(_) => return None,
                None if segment == part => {}
                None => return None,
            }
        }

        Some(Params(params))
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Router con tabla de rutas ordenada
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con la tabla completa del catálogo, en orden de prioridad
    pub fn catalog() -> Self {
        use self::handlers::*;

        let mut router = Self::new();

        router.register(Method::GET, "/artists", list_artists);
        router.register(Method::GET, "/artists/:id", get_artist);
        router.register(Method::POST, "/artists", create_artist);
        router.register(Method::PUT, "/artists/:id", update_artist);
        router.register(Method::DELETE, "/artists/:id", delete_artist);
        router.register(Method::GET, "/artists/:id/albums", list_artist_albums);
        router.register(Method::GET, "/artists/:id/songs", list_artist_songs);

        router.register(Method::GET, "/albums/:id", get_album);
        router.register(Method::POST, "/artists/:id/albums", create_album);
        router.register(Method::PUT, "/albums/:id", update_album);
        router.register(Method::DELETE, "/albums/:id", delete_album);
        router.register(Method::GET, "/albums/:id/songs", list_album_songs);

        router.register(Method::GET, "/trackNumbers/:n/songs", list_track_number_songs);
        router.register(Method::GET, "/songs/:id", get_song);
        router.register(Method::POST, "/albums/:id", create_song);
        router.register(Method::PUT, "/songs/:id", update_song);
        router.register(Method::DELETE, "/songs/:id", delete_song);

        router
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use catalog_server::router::{Params, Router};
    /// use catalog_server::http::{Method, Request, Response, StatusCode};
    /// use catalog_server::catalog::Store;
    /// use catalog_server::error::Result;
    ///
    /// fn hello(_store: &mut Store, _params: &Params, _req: &Request) -> Result<Response> {
    ///     Ok(Response::message(StatusCode::Ok, "hello"))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello", hello);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            segments: split_path(pattern).into_iter().map(String::from).collect(),
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si no encuentra una ruta, retorna 404 en texto plano.
    pub fn route(&self, store: &mut Store, request: &Request) -> Response {
        let method = request.method();
        let path = request.path();

        let matched = self
            .routes
            .iter()
            .find_map(|route| route.matches(method, path).map(|params| (route, params)));

        let response = match matched {
            Some((route, params)) => {
                debug!(pattern = %route.pattern, ?params, "route matched");
                (route.handler)(store, &params, request).unwrap_or_else(|e| {
                    if e.status().is_client_error() {
                        warn!("{} {} -> {}", method.as_str(), path, e);
                    } else {
                        error!("{} {} -> {}", method.as_str(), path, e);
                    }
                    e.into_response()
                })
            }
            None => Response::text(StatusCode::NotFound, "Endpoint not found"),
        };

        response.with_common_headers()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

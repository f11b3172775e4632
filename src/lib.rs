//! # Catalog Server
//! src/lib.rs
//!
//! Servidor HTTP CRUD para un catálogo musical jerárquico
//! (artistas → álbumes → canciones) con estado en memoria sembrado desde
//! archivos JSON.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, bodies JSON/form y construcción de responses
//! - `catalog`: Modelo, store, consultas derivadas, seeds y comandos tipados
//! - `router`: Tabla de rutas ordenada y handlers
//! - `server`: Loop TCP de un solo thread
//! - `config`: CLI y variables de entorno
//! - `error`: Errores de la API y su mapeo a status codes
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use catalog_server::catalog::{SeedData, Store};
//! use catalog_server::config::Config;
//! use catalog_server::server::Server;
//!
//! let store = Store::from_seeds(SeedData::embedded().unwrap()).unwrap();
//! let mut server = Server::new(Config::default(), store);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod server;

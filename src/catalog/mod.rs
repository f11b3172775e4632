//! # Catálogo Musical
//! src/catalog/mod.rs
//!
//! Dominio del servidor: artistas → álbumes → canciones.
//!
//! - `model`: entidades y vistas serializables
//! - `store`: estado en memoria y contadores de ids
//! - `queries`: colecciones derivadas (álbumes de un artista, canciones de un álbum...)
//! - `seed`: carga de datos iniciales
//! - `commands`: validación de bodies hacia structs tipados

pub mod commands;
pub mod model;
pub mod queries;
pub mod seed;
pub mod store;

pub use model::{Album, AlbumDetail, AlbumSummary, Artist, EntityKind, Song};
pub use seed::{SeedData, SeedError};
pub use store::Store;

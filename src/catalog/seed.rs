//! # Seeds
//! src/catalog/seed.rs
//!
//! Datos iniciales del catálogo. Cada documento es un objeto JSON que mapea
//! el id (como string) a la entidad:
//!
//! ```json
//! { "1": { "artistId": 1, "name": "Red Hot Chili Peppers" } }
//! ```
//!
//! Se cargan una sola vez al arrancar, desde un directorio o desde los
//! fixtures embebidos en el binario.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use super::model::{Album, Artist, EntityKind, Song};

const ARTISTS_FILE: &str = "artists.json";
const ALBUMS_FILE: &str = "albums.json";
const SONGS_FILE: &str = "songs.json";

const EMBEDDED_ARTISTS: &str = include_str!("../../seeds/artists.json");
const EMBEDDED_ALBUMS: &str = include_str!("../../seeds/albums.json");
const EMBEDDED_SONGS: &str = include_str!("../../seeds/songs.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed document {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed document {name}: key '{key}' does not match entity id {id}")]
    KeyMismatch { name: String, key: String, id: u64 },

    #[error("seeded {kind} id {id} leaves no room for new ids")]
    IdSpaceExhausted { kind: EntityKind, id: u64 },
}

/// Las tres colecciones sembradas, indexadas por id
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub artists: BTreeMap<u64, Artist>,
    pub albums: BTreeMap<u64, Album>,
    pub songs: BTreeMap<u64, Song>,
}

impl SeedData {
    /// Fixtures compilados en el binario (`seeds/*.json`)
    pub fn embedded() -> Result<Self, SeedError> {
        Self::from_documents(EMBEDDED_ARTISTS, EMBEDDED_ALBUMS, EMBEDDED_SONGS)
    }

    /// Lee `artists.json`, `albums.json` y `songs.json` desde `dir`
    pub fn from_dir(dir: &Path) -> Result<Self, SeedError> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| SeedError::Io { path, source })
        };

        let seeds = Self::from_documents(&read(ARTISTS_FILE)?, &read(ALBUMS_FILE)?, &read(SONGS_FILE)?)?;
        info!(
            dir = %dir.display(),
            artists = seeds.artists.len(),
            albums = seeds.albums.len(),
            songs = seeds.songs.len(),
            "seed data loaded"
        );
        Ok(seeds)
    }

    pub fn from_documents(artists: &str, albums: &str, songs: &str) -> Result<Self, SeedError> {
        Ok(Self {
            artists: parse_document(ARTISTS_FILE, artists, |a: &Artist| a.artist_id)?,
            albums: parse_document(ALBUMS_FILE, albums, |a: &Album| a.album_id)?,
            songs: parse_document(SONGS_FILE, songs, |s: &Song| s.song_id)?,
        })
    }
}

/// Parsea un documento `{ "<id>": entity }` verificando que la clave sea el id
fn parse_document<T, F>(name: &str, text: &str, id_of: F) -> Result<BTreeMap<u64, T>, SeedError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> u64,
{
    let raw: BTreeMap<String, T> = serde_json::from_str(text).map_err(|source| SeedError::Json {
        name: name.to_string(),
        source,
    })?;

    raw.into_iter()
        .map(|(key, entity)| {
            let id = id_of(&entity);
            if key.parse::<u64>().ok() != Some(id) {
                return Err(SeedError::KeyMismatch {
                    name: name.to_string(),
                    key,
                    id,
                });
            }
            Ok((id, entity))
        })
        .collect()
}

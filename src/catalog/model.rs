//! # Modelo del Catálogo
//! src/catalog/model.rs
//!
//! Entidades del catálogo y las vistas que se devuelven por HTTP.
//! Los nombres de campo en JSON van en camelCase, igual que los seeds.

use serde::{Deserialize, Serialize};

pub type ArtistId = u64;
pub type AlbumId = u64;
pub type SongId = u64;

/// Tipo de entidad, para contadores de ids y mensajes de error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Album,
    Song,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Song => "song",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub artist_id: ArtistId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Un álbum referencia a su artista solo por id; la referencia no se valida
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub album_id: AlbumId,
    pub name: String,
    pub artist_id: ArtistId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub song_id: SongId,
    pub name: String,
    #[serde(default)]
    pub lyrics: String,
    pub track_number: u32,
    pub album_id: AlbumId,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Álbum con su artista y canciones embebidos (`GET /albums/:id`, `PUT /albums/:id`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub name: String,
    pub album_id: AlbumId,
    pub artist_id: ArtistId,
    pub artist: Option<Artist>,
    pub songs: Vec<Song>,
}

/// Respuesta de creación de álbum: sin canciones ni artista embebidos
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub name: String,
    pub album_id: AlbumId,
    pub artist_id: ArtistId,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        Self {
            name: album.name.clone(),
            album_id: album.album_id,
            artist_id: album.artist_id,
        }
    }
}

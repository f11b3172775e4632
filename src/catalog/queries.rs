//! # Consultas Derivadas
//! src/catalog/queries.rs
//!
//! Funciones puras sobre el store: recorren una colección y filtran por la
//! referencia pedida. Sin índices; las colecciones son pequeñas.

use std::collections::BTreeMap;

use super::model::{Album, AlbumId, ArtistId, Song};
use super::store::Store;

/// Álbumes cuyo `artistId` coincide, indexados por id de álbum
pub fn albums_by_artist(store: &Store, artist_id: ArtistId) -> BTreeMap<AlbumId, Album> {
    store
        .albums()
        .iter()
        .filter(|(_, album)| album.artist_id == artist_id)
        .map(|(id, album)| (*id, album.clone()))
        .collect()
}

/// Canciones del álbum, ordenadas por id
pub fn songs_by_album(store: &Store, album_id: AlbumId) -> Vec<Song> {
    store
        .songs()
        .values()
        .filter(|song| song.album_id == album_id)
        .cloned()
        .collect()
}

/// Canciones de todos los álbumes del artista, álbum por álbum
pub fn songs_by_artist(store: &Store, artist_id: ArtistId) -> Vec<Song> {
    albums_by_artist(store, artist_id)
        .keys()
        .flat_map(|album_id| songs_by_album(store, *album_id))
        .collect()
}

/// Canciones con ese número de pista exacto
pub fn songs_by_track_number(store: &Store, track_number: u32) -> Vec<Song> {
    store
        .songs()
        .values()
        .filter(|song| song.track_number == track_number)
        .cloned()
        .collect()
}

//! # Store del Catálogo
//! src/catalog/store.rs
//!
//! Dueño de todo el estado: tres colecciones indexadas por id y un contador
//! monótono por tipo de entidad. El borrado remueve la clave; los ids nunca
//! se reutilizan durante la vida del proceso.
//!
//! No es un singleton: el servidor construye uno y lo pasa por referencia a
//! los handlers, y los tests crean tantos como necesiten.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use super::commands::{CreateAlbum, CreateSong, UpdateAlbum, UpdateSong};
use super::model::{Album, AlbumId, Artist, ArtistId, EntityKind, Song, SongId};
use super::seed::{SeedData, SeedError};
use crate::error::ApiError;

/// Primer id que se emite; el 1 queda reservado para los seeds
const FIRST_ISSUED_ID: u64 = 2;

/// Timestamp RFC 3339 con precisión de nanosegundos
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[derive(Debug, Clone)]
pub struct Store {
    artists: BTreeMap<ArtistId, Artist>,
    albums: BTreeMap<AlbumId, Album>,
    songs: BTreeMap<SongId, Song>,
    next_artist_id: u64,
    next_album_id: u64,
    next_song_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Store vacío; los contadores arrancan en 2
    pub fn new() -> Self {
        Self {
            artists: BTreeMap::new(),
            albums: BTreeMap::new(),
            songs: BTreeMap::new(),
            next_artist_id: FIRST_ISSUED_ID,
            next_album_id: FIRST_ISSUED_ID,
            next_song_id: FIRST_ISSUED_ID,
        }
    }

    /// Construye el store a partir de los seeds.
    ///
    /// Cada contador arranca después del mayor id sembrado, nunca antes de 2.
    /// Falla si algún tipo ya usa el último id representable.
    pub fn from_seeds(seeds: SeedData) -> Result<Self, SeedError> {
        fn next_after<V>(kind: EntityKind, map: &BTreeMap<u64, V>) -> Result<u64, SeedError> {
            match map.keys().next_back() {
                None => Ok(FIRST_ISSUED_ID),
                Some(max) => max
                    .checked_add(1)
                    .map(|next| next.max(FIRST_ISSUED_ID))
                    .ok_or(SeedError::IdSpaceExhausted { kind, id: *max }),
            }
        }

        Ok(Self {
            next_artist_id: next_after(EntityKind::Artist, &seeds.artists)?,
            next_album_id: next_after(EntityKind::Album, &seeds.albums)?,
            next_song_id: next_after(EntityKind::Song, &seeds.songs)?,
            artists: seeds.artists,
            albums: seeds.albums,
            songs: seeds.songs,
        })
    }

    /// Emite un id nuevo para `kind` e incrementa su contador
    ///
    /// Cuando el contador ya no puede avanzar no se emite nada: el último id
    /// representable nunca se entrega para no repetirlo en la siguiente llamada.
    pub fn next_id(&mut self, kind: EntityKind) -> Result<u64, ApiError> {
        let counter = match kind {
            EntityKind::Artist => &mut self.next_artist_id,
            EntityKind::Album => &mut self.next_album_id,
            EntityKind::Song => &mut self.next_song_id,
        };
        let id = *counter;
        *counter = id.checked_add(1).ok_or(ApiError::IdsExhausted { entity: kind })?;
        Ok(id)
    }

    // === Colecciones completas ===

    pub fn artists(&self) -> &BTreeMap<ArtistId, Artist> {
        &self.artists
    }

    pub fn albums(&self) -> &BTreeMap<AlbumId, Album> {
        &self.albums
    }

    pub fn songs(&self) -> &BTreeMap<SongId, Song> {
        &self.songs
    }

    // === Artistas ===

    pub fn artist(&self, id: ArtistId) -> Result<&Artist, ApiError> {
        self.artists
            .get(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Artist, id))
    }

    pub fn create_artist(&mut self, name: String) -> Result<Artist, ApiError> {
        let artist = Artist {
            artist_id: self.next_id(EntityKind::Artist)?,
            name,
            updated_at: None,
        };
        debug!(artist_id = artist.artist_id, "artist created");
        self.artists.insert(artist.artist_id, artist.clone());
        Ok(artist)
    }

    pub fn update_artist(&mut self, id: ArtistId, name: String) -> Result<Artist, ApiError> {
        let artist = self
            .artists
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Artist, id))?;
        artist.name = name;
        artist.updated_at = Some(timestamp());
        Ok(artist.clone())
    }

    pub fn delete_artist(&mut self, id: ArtistId) -> Result<Artist, ApiError> {
        let artist = self
            .artists
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Artist, id))?;
        debug!(artist_id = id, "artist deleted");
        Ok(artist)
    }

    // === Álbumes ===

    pub fn album(&self, id: AlbumId) -> Result<&Album, ApiError> {
        self.albums
            .get(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Album, id))
    }

    /// Crea el álbum y cada canción anidada con ids nuevos
    pub fn create_album(&mut self, artist_id: ArtistId, command: CreateAlbum) -> Result<Album, ApiError> {
        let album = Album {
            album_id: self.next_id(EntityKind::Album)?,
            name: command.name,
            artist_id,
        };

        for song in command.songs {
            self.insert_song(album.album_id, song)?;
        }

        debug!(album_id = album.album_id, artist_id, "album created");
        self.albums.insert(album.album_id, album.clone());
        Ok(album)
    }

    pub fn update_album(&mut self, id: AlbumId, command: UpdateAlbum) -> Result<Album, ApiError> {
        let album = self
            .albums
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Album, id))?;
        album.name = command.name;
        if let Some(artist_id) = command.artist_id {
            album.artist_id = artist_id;
        }
        Ok(album.clone())
    }

    /// Borra solo el álbum; sus canciones quedan en el store
    pub fn delete_album(&mut self, id: AlbumId) -> Result<Album, ApiError> {
        let album = self
            .albums
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Album, id))?;
        debug!(album_id = id, "album deleted");
        Ok(album)
    }

    // === Canciones ===

    pub fn song(&self, id: SongId) -> Result<&Song, ApiError> {
        self.songs
            .get(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Song, id))
    }

    pub fn create_song(&mut self, album_id: AlbumId, command: CreateSong) -> Result<Song, ApiError> {
        self.insert_song(album_id, command)
    }

    fn insert_song(&mut self, album_id: AlbumId, command: CreateSong) -> Result<Song, ApiError> {
        let now = timestamp();
        let song = Song {
            song_id: self.next_id(EntityKind::Song)?,
            name: command.name,
            lyrics: command.lyrics,
            track_number: command.track_number,
            album_id,
            created_at: now.clone(),
            updated_at: now,
        };
        debug!(song_id = song.song_id, album_id, "song created");
        self.songs.insert(song.song_id, song.clone());
        Ok(song)
    }

    pub fn update_song(&mut self, id: SongId, command: UpdateSong) -> Result<Song, ApiError> {
        let song = self
            .songs
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Song, id))?;
        if let Some(name) = command.name {
            song.name = name;
        }
        if let Some(lyrics) = command.lyrics {
            song.lyrics = lyrics;
        }
        if let Some(track_number) = command.track_number {
            song.track_number = track_number;
        }
        song.updated_at = timestamp();
        Ok(song.clone())
    }

    pub fn delete_song(&mut self, id: SongId) -> Result<Song, ApiError> {
        let song = self
            .songs
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Song, id))?;
        debug!(song_id = id, "song deleted");
        Ok(song)
    }
}

//! # Handlers del Catálogo
//! src/router/handlers.rs
//!
//! Un handler por ruta. Cada uno:
//! 1. Convierte los parámetros del path a ids
//! 2. Convierte el body a un comando tipado (si lo usa)
//! 3. Opera sobre el store
//! 4. Serializa la respuesta JSON
//!
//! Cualquier error se propaga con `?` y el router lo convierte en 4xx.

use serde_json::json;
use tracing::debug;

use super::Params;
use crate::catalog::commands::{
    CreateAlbum, CreateArtist, CreateSong, UpdateAlbum, UpdateArtist, UpdateSong,
};
use crate::catalog::model::{AlbumDetail, AlbumId, AlbumSummary, ArtistId, SongId};
use crate::catalog::{queries, Store};
use crate::error::Result;
use crate::http::{Fields, Request, Response, StatusCode};

const DELETED_MESSAGE: &str = "Successfully deleted";

fn artist_id(params: &Params) -> Result<ArtistId> {
    params.parse("id", "artist id")
}

fn album_id(params: &Params) -> Result<AlbumId> {
    params.parse("id", "album id")
}

fn song_id(params: &Params) -> Result<SongId> {
    params.parse("id", "song id")
}

fn fields(request: &Request) -> Result<Fields> {
    let fields = request.fields()?;
    debug!(?fields, "request body");
    Ok(fields)
}

fn deleted() -> Response {
    Response::json(StatusCode::Ok, &json!({ "message": DELETED_MESSAGE }))
}

/// Álbum con su artista (o `null`) y sus canciones
fn album_detail(store: &Store, id: AlbumId) -> Result<AlbumDetail> {
    let album = store.album(id)?;
    Ok(AlbumDetail {
        name: album.name.clone(),
        album_id: album.album_id,
        artist_id: album.artist_id,
        artist: store.artist(album.artist_id).ok().cloned(),
        songs: queries::songs_by_album(store, id),
    })
}

// === Artistas ===

/// GET /artists
pub fn list_artists(store: &mut Store, _params: &Params, _req: &Request) -> Result<Response> {
    Ok(Response::json(StatusCode::Ok, store.artists()))
}

/// GET /artists/:id
pub fn get_artist(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let artist = store.artist(artist_id(params)?)?;
    Ok(Response::json(StatusCode::Ok, artist))
}

/// POST /artists
pub fn create_artist(store: &mut Store, _params: &Params, req: &Request) -> Result<Response> {
    let command = CreateArtist::try_from(&fields(req)?)?;
    let artist = store.create_artist(command.name)?;
    Ok(Response::json(StatusCode::Created, &artist))
}

/// PUT /artists/:id
pub fn update_artist(store: &mut Store, params: &Params, req: &Request) -> Result<Response> {
    let id = artist_id(params)?;
    let command = UpdateArtist::try_from(&fields(req)?)?;
    let artist = store.update_artist(id, command.name)?;
    Ok(Response::json(StatusCode::Ok, &artist))
}

/// DELETE /artists/:id
pub fn delete_artist(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    store.delete_artist(artist_id(params)?)?;
    Ok(deleted())
}

/// GET /artists/:id/albums
pub fn list_artist_albums(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let albums = queries::albums_by_artist(store, artist_id(params)?);
    Ok(Response::json(StatusCode::Ok, &albums))
}

/// GET /artists/:id/songs
pub fn list_artist_songs(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let songs = queries::songs_by_artist(store, artist_id(params)?);
    Ok(Response::json(StatusCode::Ok, &songs))
}

// === Álbumes ===

/// GET /albums/:id
pub fn get_album(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let detail = album_detail(store, album_id(params)?)?;
    Ok(Response::json(StatusCode::Ok, &detail))
}

/// POST /artists/:id/albums
///
/// Las canciones anidadas se crean con ids nuevos; la respuesta no las incluye.
pub fn create_album(store: &mut Store, params: &Params, req: &Request) -> Result<Response> {
    let artist = artist_id(params)?;
    let command = CreateAlbum::try_from(&fields(req)?)?;
    let album = store.create_album(artist, command)?;
    Ok(Response::json(StatusCode::Created, &AlbumSummary::from(&album)))
}

/// PUT /albums/:id
pub fn update_album(store: &mut Store, params: &Params, req: &Request) -> Result<Response> {
    let id = album_id(params)?;
    let command = UpdateAlbum::try_from(&fields(req)?)?;
    store.update_album(id, command)?;
    Ok(Response::json(StatusCode::Ok, &album_detail(store, id)?))
}

/// DELETE /albums/:id
pub fn delete_album(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    store.delete_album(album_id(params)?)?;
    Ok(deleted())
}

/// GET /albums/:id/songs
pub fn list_album_songs(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let songs = queries::songs_by_album(store, album_id(params)?);
    Ok(Response::json(StatusCode::Ok, &songs))
}

// === Canciones ===

/// GET /trackNumbers/:n/songs
pub fn list_track_number_songs(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let track_number: u32 = params.parse("n", "track number")?;
    let songs = queries::songs_by_track_number(store, track_number);
    Ok(Response::json(StatusCode::Ok, &songs))
}

/// GET /songs/:id
pub fn get_song(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    let song = store.song(song_id(params)?)?;
    Ok(Response::json(StatusCode::Ok, song))
}

/// POST /albums/:id
pub fn create_song(store: &mut Store, params: &Params, req: &Request) -> Result<Response> {
    let album = album_id(params)?;
    let command = CreateSong::try_from(&fields(req)?)?;
    let song = store.create_song(album, command)?;
    Ok(Response::json(StatusCode::Created, &song))
}

/// PUT /songs/:id
pub fn update_song(store: &mut Store, params: &Params, req: &Request) -> Result<Response> {
    let id = song_id(params)?;
    let command = UpdateSong::try_from(&fields(req)?)?;
    let song = store.update_song(id, command)?;
    Ok(Response::json(StatusCode::Ok, &song))
}

/// DELETE /songs/:id
pub fn delete_song(store: &mut Store, params: &Params, _req: &Request) -> Result<Response> {
    store.delete_song(song_id(params)?)?;
    Ok(deleted())
}

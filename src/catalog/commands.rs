//! # Comandos Tipados
//! src/catalog/commands.rs
//!
//! El body llega como un mapa de campos sin tipo (`Fields`). Aquí se valida
//! la presencia de cada campo y se convierte a un struct por operación antes
//! de tocar el store.
//!
//! Los campos numéricos aceptan números JSON o strings numéricos, porque los
//! bodies form-urlencoded solo transportan strings.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::Fields;

use super::model::ArtistId;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSong {
    pub name: String,
    pub lyrics: String,
    pub track_number: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSong {
    pub name: Option<String>,
    pub lyrics: Option<String>,
    pub track_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAlbum {
    pub name: String,
    pub songs: Vec<CreateSong>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAlbum {
    pub name: String,
    pub artist_id: Option<ArtistId>,
}

impl TryFrom<&Fields> for CreateArtist {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_string(fields, "name")?,
        })
    }
}

impl TryFrom<&Fields> for UpdateArtist {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_string(fields, "name")?,
        })
    }
}

impl TryFrom<&Fields> for CreateSong {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_string(fields, "name")?,
            lyrics: optional_string(fields, "lyrics")?.unwrap_or_default(),
            track_number: optional_number(fields, "trackNumber")?
                .ok_or_else(|| missing("trackNumber"))?,
        })
    }
}

impl TryFrom<&Fields> for UpdateSong {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_string(fields, "name")?,
            lyrics: optional_string(fields, "lyrics")?,
            track_number: optional_number(fields, "trackNumber")?,
        })
    }
}

impl TryFrom<&Fields> for CreateAlbum {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        let songs = match fields.get("songs") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => CreateSong::try_from(&Fields::from(map.clone()))
                        .map_err(|e| ApiError::BadRequest(format!("songs[{}]: {}", index, e))),
                    _ => Err(ApiError::BadRequest(format!("songs[{}] must be an object", index))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ApiError::BadRequest("field 'songs' must be an array".to_string())),
        };

        Ok(Self {
            name: require_string(fields, "name")?,
            songs,
        })
    }
}

impl TryFrom<&Fields> for UpdateAlbum {
    type Error = ApiError;

    fn try_from(fields: &Fields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_string(fields, "name")?,
            artist_id: optional_number(fields, "artistId")?,
        })
    }
}

fn missing(name: &str) -> ApiError {
    ApiError::BadRequest(format!("missing required field '{}'", name))
}

fn require_string(fields: &Fields, name: &str) -> Result<String, ApiError> {
    optional_string(fields, name)?.ok_or_else(|| missing(name))
}

fn optional_string(fields: &Fields, name: &str) -> Result<Option<String>, ApiError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::BadRequest(format!("field '{}' must be a string", name))),
    }
}

/// Entero no negativo, como número JSON o como string numérico
fn optional_number<T>(fields: &Fields, name: &str) -> Result<Option<T>, ApiError>
where
    T: TryFrom<u64> + std::str::FromStr,
{
    let invalid = || ApiError::BadRequest(format!("field '{}' must be a non-negative integer", name));

    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<T>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => Fields::from(map),
            _ => panic!("test fields must be an object"),
        }
    }

    #[test]
    fn test_create_artist_requires_name() {
        assert_eq!(
            CreateArtist::try_from(&fields(json!({"name": "Radiohead"}))).unwrap().name,
            "Radiohead"
        );
        assert!(matches!(
            CreateArtist::try_from(&Fields::default()),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_name_must_be_string() {
        let result = CreateArtist::try_from(&fields(json!({"name": 5})));

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_create_song_from_form_strings() {
        let command = CreateSong::try_from(&fields(json!({
            "name": "Reckoner",
            "trackNumber": "7"
        })))
        .unwrap();

        assert_eq!(command.track_number, 7);
        assert_eq!(command.lyrics, "");
    }

    #[test]
    fn test_create_song_requires_track_number() {
        let result = CreateSong::try_from(&fields(json!({"name": "Reckoner"})));

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_negative_track_number_rejected() {
        let result = CreateSong::try_from(&fields(json!({"name": "x", "trackNumber": -1})));

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_update_song_all_optional() {
        let command = UpdateSong::try_from(&fields(json!({"lyrics": "Y"}))).unwrap();

        assert_eq!(
            command,
            UpdateSong { name: None, lyrics: Some("Y".to_string()), track_number: None }
        );
    }

    #[test]
    fn test_create_album_with_nested_songs() {
        let command = CreateAlbum::try_from(&fields(json!({
            "name": "OK Computer",
            "songs": [
                {"name": "Airbag", "lyrics": "...", "trackNumber": 1},
                {"name": "Paranoid Android", "trackNumber": 2}
            ]
        })))
        .unwrap();

        assert_eq!(command.songs.len(), 2);
        assert_eq!(command.songs[1].name, "Paranoid Android");
    }

    #[test]
    fn test_create_album_without_songs() {
        let command = CreateAlbum::try_from(&fields(json!({"name": "Amnesiac"}))).unwrap();

        assert!(command.songs.is_empty());
    }

    #[test]
    fn test_create_album_bad_nested_song() {
        let result = CreateAlbum::try_from(&fields(json!({
            "name": "OK Computer",
            "songs": [{"trackNumber": 1}]
        })));

        match result {
            Err(ApiError::BadRequest(message)) => assert!(message.starts_with("songs[0]")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_update_album_artist_id_optional() {
        let command = UpdateAlbum::try_from(&fields(json!({"name": "B", "artistId": "3"}))).unwrap();
        assert_eq!(command.artist_id, Some(3));

        let command = UpdateAlbum::try_from(&fields(json!({"name": "B"}))).unwrap();
        assert_eq!(command.artist_id, None);
    }
}

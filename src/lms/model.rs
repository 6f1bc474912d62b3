//! Typed result shapes decoded from the generic `result` mapping.
//!
//! The server is loose about types: ids, years and indexes show up as
//! numbers or strings depending on the command and server version, and
//! optional tags are simply absent. All of that tolerance lives in the
//! `lenient` field decoders below, so callers get plain values (missing text
//! is an empty string, missing numbers are `None` or zero).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

use super::error::ConnectivityError;

/// Decode a result mapping into one of the shapes below.
pub fn decode<T: DeserializeOwned>(result: Map<String, Value>) -> Result<T, ConnectivityError> {
    Ok(serde_json::from_value(Value::Object(result))?)
}

/// Text form of a scalar result value ("" for null).
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Integer form of a scalar result value, `None` when not numeric.
pub fn value_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

/// Parse a sort key, -1 for anything missing or non-numeric.
pub fn safe_int(text: &str) -> i64 {
    text.trim().parse().unwrap_or(-1)
}

mod lenient {
    use super::*;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_text(&Value::deserialize(d)?))
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(value_int(&Value::deserialize(d)?))
    }

    pub fn seconds<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match &v {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        })
    }
}

/* -------------------------------------------------------------------------- */
/* Item kinds                                                                 */
/* -------------------------------------------------------------------------- */

/// Library item kinds accepted by search / enqueue / info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Artists,
    Albums,
    Tracks,
}

impl ItemKind {
    pub const fn variants() -> &'static [ItemKind] {
        &[ItemKind::Artists, ItemKind::Albums, ItemKind::Tracks]
    }

    /// Case-insensitive parse of the plural sub-type token.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artists" => Some(ItemKind::Artists),
            "albums" => Some(ItemKind::Albums),
            "tracks" => Some(ItemKind::Tracks),
            _ => None,
        }
    }

    /// Query command (and CLI token) for this kind.
    pub fn command(&self) -> &'static str {
        match self {
            ItemKind::Artists => "artists",
            ItemKind::Albums => "albums",
            ItemKind::Tracks => "tracks",
        }
    }

    /// Singular entity name used in `*_id` keys and playlistcontrol.
    pub fn entity(&self) -> &'static str {
        match self {
            ItemKind::Artists => "artist",
            ItemKind::Albums => "album",
            ItemKind::Tracks => "track",
        }
    }

    /// Filter / lookup key, e.g. `album_id`.
    pub fn id_key(&self) -> String {
        format!("{}_id", self.entity())
    }

    /// Result key holding the record list. Tracks come back as `titles_loop`.
    pub fn loop_key(&self) -> &'static str {
        match self {
            ItemKind::Artists => "artists_loop",
            ItemKind::Albums => "albums_loop",
            ItemKind::Tracks => "titles_loop",
        }
    }

    /// Tag set requested with search listings.
    pub fn search_tags(&self) -> Option<&'static str> {
        match self {
            ItemKind::Artists => None,
            ItemKind::Albums => Some("tags:a,y,l"),
            ItemKind::Tracks => Some("tags:a,l"),
        }
    }

    /// `artists|albums|tracks`, for error messages.
    pub fn choices() -> String {
        Self::variants()
            .iter()
            .map(|k| k.command())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/* -------------------------------------------------------------------------- */
/* Records                                                                    */
/* -------------------------------------------------------------------------- */

/// An artist, album or track row. Which fields are filled depends on the
/// tag set that was requested.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub artist: String,
    #[serde(deserialize_with = "lenient::text")]
    pub album: String,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub year: String,
    #[serde(deserialize_with = "lenient::text")]
    pub tracknum: String,
    #[serde(deserialize_with = "lenient::text")]
    pub genre: String,
    #[serde(deserialize_with = "lenient::seconds")]
    pub duration: f64,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub encoding: String,
    #[serde(deserialize_with = "lenient::text")]
    pub bitrate: String,
    #[serde(deserialize_with = "lenient::int")]
    pub filesize: Option<i64>,
}

/// Full detail of a single track (playlist item or track lookup).
pub type TrackDetail = Record;

impl Record {
    /// Sort key for album listings; missing year sorts first.
    pub fn year_key(&self) -> i64 {
        safe_int(&self.year)
    }

    /// Sort key for track listings; missing or non-numeric sorts first.
    pub fn tracknum_key(&self) -> i64 {
        safe_int(&self.tracknum)
    }
}

/// Result of a windowed `artists|albums|tracks` query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub kind: ItemKind,
    pub total: i64,
    pub records: Vec<Record>,
}

impl SearchResult {
    pub fn decode(kind: ItemKind, mut result: Map<String, Value>) -> Result<Self, ConnectivityError> {
        let total = result.get("count").and_then(value_int).unwrap_or(0);
        let records = match result.remove(kind.loop_key()) {
            Some(rows) => serde_json::from_value(rows)?,
            None => Vec::new(),
        };
        Ok(Self {
            kind,
            total,
            records,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0 || self.records.is_empty()
    }
}

/* -------------------------------------------------------------------------- */
/* Player status                                                              */
/* -------------------------------------------------------------------------- */

/// Generic `status` snapshot of a player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerStatus {
    #[serde(deserialize_with = "lenient::int")]
    pub power: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub mode: String,
    #[serde(deserialize_with = "lenient::seconds")]
    pub time: f64,
    #[serde(deserialize_with = "lenient::seconds")]
    pub duration: f64,
    #[serde(rename = "playlist_cur_index", deserialize_with = "lenient::int")]
    pub current_index: Option<i64>,
    #[serde(rename = "playlist_tracks", deserialize_with = "lenient::int")]
    pub track_count: Option<i64>,
}

impl PlayerStatus {
    pub fn is_powered(&self) -> bool {
        self.power == Some(1)
    }
}

/// One row of the current playlist.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaylistEntry {
    #[serde(rename = "playlist index", deserialize_with = "lenient::int")]
    pub index: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub artist: String,
}

/// Windowed `status` listing of the current playlist.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaylistStatus {
    #[serde(rename = "playlist_cur_index", deserialize_with = "lenient::int")]
    pub current_index: Option<i64>,
    #[serde(rename = "playlist_loop")]
    pub entries: Vec<PlaylistEntry>,
}

/// Windowed `status` with a full tag set: detail records for the window.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaylistDetail {
    #[serde(rename = "playlist_loop")]
    pub entries: Vec<TrackDetail>,
}

/* -------------------------------------------------------------------------- */
/* Players                                                                    */
/* -------------------------------------------------------------------------- */

/// A player as listed by the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "playerid", deserialize_with = "lenient::text")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerList {
    #[serde(rename = "players_loop")]
    pub players: Vec<PlayerEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn record_tolerates_missing_and_mixed_types() {
        let rec: Record = serde_json::from_value(json!({
            "id": 4711, "title": "Song", "year": 1999, "duration": "201.4",
            "type": "flc", "bitrate": "900kb/s VBR", "filesize": "10485760"
        }))
        .unwrap();
        assert_eq!(rec.id, "4711");
        assert_eq!(rec.year, "1999");
        assert_eq!(rec.artist, "");
        assert_eq!(rec.encoding, "flc");
        assert_eq!(rec.filesize, Some(10_485_760));
        assert!((rec.duration - 201.4).abs() < 1e-9);
    }

    #[test]
    fn sort_keys_default_to_minus_one() {
        let rec = Record {
            tracknum: "x".into(),
            ..Default::default()
        };
        assert_eq!(rec.tracknum_key(), -1);
        assert_eq!(rec.year_key(), -1);
        let rec = Record {
            tracknum: "7".into(),
            year: "1973".into(),
            ..Default::default()
        };
        assert_eq!(rec.tracknum_key(), 7);
        assert_eq!(rec.year_key(), 1973);
    }

    #[test]
    fn search_result_uses_titles_loop_for_tracks() {
        let res = SearchResult::decode(
            ItemKind::Tracks,
            map(json!({"count": 1, "titles_loop": [{"id": 3, "title": "T"}]})),
        )
        .unwrap();
        assert_eq!(res.total, 1);
        assert_eq!(res.records[0].title, "T");
        assert!(!res.is_empty());

        let res = SearchResult::decode(ItemKind::Albums, map(json!({"count": 0}))).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn player_status_accepts_string_index() {
        let st: PlayerStatus = decode(map(json!({
            "power": 1, "mode": "play", "time": 65.7, "duration": 200,
            "playlist_cur_index": "4", "playlist_tracks": 10
        })))
        .unwrap();
        assert!(st.is_powered());
        assert_eq!(st.current_index, Some(4));
        assert_eq!(st.track_count, Some(10));
        assert_eq!(st.time as i64, 65);
    }

    #[test]
    fn playlist_status_defaults_when_empty() {
        let pl: PlaylistStatus = decode(map(json!({"mode": "stop"}))).unwrap();
        assert_eq!(pl.current_index, None);
        assert!(pl.entries.is_empty());
    }

    #[test]
    fn item_kind_keys() {
        assert_eq!(ItemKind::from_str_ci(" Albums "), Some(ItemKind::Albums));
        assert_eq!(ItemKind::from_str_ci("album"), None);
        assert_eq!(ItemKind::Tracks.id_key(), "track_id");
        assert_eq!(ItemKind::Artists.search_tags(), None);
        assert_eq!(ItemKind::choices(), "artists|albums|tracks");
    }
}

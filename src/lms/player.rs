//! Command protocol: typed player operations on top of the transport.
//!
//! Every operation goes through `Player::call`, the single recovery point:
//!   - unresolved device  -> logged, nothing sent, `None`
//!   - connectivity error -> logged with the command line, `None`
//! so one failing command never takes the process down.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::device::{self, Device};
use super::index::IndexMode;
use super::model::{
    self, ItemKind, PlayerStatus, PlaylistDetail, PlaylistEntry, PlaylistStatus, Record,
    SearchResult, TrackDetail, value_text,
};
use super::transport::{CommandRequest, Transport, tokenize};
use crate::{log_debug, log_error};

/// Window used when listing the whole current playlist.
pub const PLAYLIST_WINDOW: u32 = 99_999;

/// Window used for per-artist / per-album listings.
pub const INFO_WINDOW: u32 = 9_999;

/// Tag set for full track detail.
pub const DETAIL_TAGS: &str = "tags:a,d,f,g,i,l,o,q,r,t,y";

pub const DEFAULT_VOLUME_STEP: u32 = 10;

/// How `playlistcontrol` merges new items into the current playlist.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnqueueMethod {
    /// Replace the playlist and start playing
    Load,
    /// Insert after the current item
    Insert,
    /// Append to the end
    #[default]
    Add,
}

impl EnqueueMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnqueueMethod::Load => "load",
            EnqueueMethod::Insert => "insert",
            EnqueueMethod::Add => "add",
        }
    }
}

/// What a search listing is restricted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Everything
    All,
    /// Free text, sent as `search:TERM`
    Term(String),
    /// Exact related-entity id, sent as `key:value` (e.g. `album_id:123`)
    Filter { key: String, value: String },
}

impl SearchQuery {
    fn token(&self) -> Option<String> {
        match self {
            SearchQuery::All => None,
            SearchQuery::Term(t) if t.is_empty() => None,
            SearchQuery::Term(t) => Some(format!("search:{t}")),
            SearchQuery::Filter { key, value } => Some(format!("{key}:{value}")),
        }
    }
}

/// A resolved (or not) player plus the means to talk to it.
#[derive(Debug, Clone)]
pub struct Player {
    device: Device,
    transport: Transport,
    indexing: IndexMode,
}

impl Player {
    pub fn new(device: Device, transport: Transport, indexing: IndexMode) -> Self {
        Self {
            device,
            transport,
            indexing,
        }
    }

    /// Resolve `name` on the server behind `transport`.
    pub fn connect(name: &str, transport: Transport, indexing: IndexMode) -> Self {
        let device = device::resolve(name, &transport);
        Self::new(device, transport, indexing)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn name(&self) -> &str {
        &self.device.name
    }

    pub fn indexing(&self) -> IndexMode {
        self.indexing
    }

    /* ---- Recovery boundary ---- */

    /// Send `arguments` to this player. `None` on any failure (already logged).
    pub fn call(&self, arguments: Vec<String>) -> Option<Map<String, Value>> {
        let Some(id) = self.device.identifier() else {
            log_error!(
                "LMS player '{}' not resolved; skipping \"{}\"",
                self.device.name,
                arguments.join(" ")
            );
            return None;
        };
        let request = CommandRequest::new(id, arguments);
        match self.transport.send(&request) {
            Ok(result) => Some(result),
            Err(e) => {
                log_error!("LMS player request \"{}\" failed: {e}", request.command_line());
                None
            }
        }
    }

    fn call_line(&self, line: &str) -> Option<Map<String, Value>> {
        self.call(tokenize(line))
    }

    /// Call and decode into a typed shape; decode failures are reported like
    /// connectivity failures.
    fn query<T: DeserializeOwned>(&self, arguments: Vec<String>) -> Option<T> {
        let line = arguments.join(" ");
        let result = self.call(arguments)?;
        match model::decode(result) {
            Ok(v) => Some(v),
            Err(e) => {
                log_error!("LMS player request \"{line}\" failed: {e}");
                None
            }
        }
    }

    fn scalar(&self, line: &str, key: &str) -> Option<String> {
        self.call_line(line)
            .map(|r| r.get(key).map(value_text).unwrap_or_default())
    }

    /* ---- Power / transport control ---- */

    pub fn power_on(&self) {
        self.call_line("power 1");
    }

    pub fn power_off(&self) {
        self.call_line("power 0");
    }

    /// Playback state: `play`, `pause` or `stop`.
    pub fn state(&self) -> Option<String> {
        self.scalar("mode ?", "_mode")
    }

    pub fn play(&self) {
        self.call_line("play");
    }

    pub fn stop(&self) {
        self.call_line("stop");
    }

    /// Pause; does nothing if already paused.
    pub fn pause(&self) {
        self.call_line("pause 1");
    }

    pub fn unpause(&self) {
        self.call_line("pause 0");
    }

    pub fn toggle_pause(&self) {
        self.call_line("pause");
    }

    pub fn next(&self) {
        self.call_line("playlist index +1");
    }

    pub fn prev(&self) {
        self.call_line("playlist index -1");
    }

    /* ---- Volume ---- */

    pub fn volume_up(&self, step: u32) {
        self.call_line(&format!("mixer volume +{step}"));
    }

    pub fn volume_down(&self, step: u32) {
        self.call_line(&format!("mixer volume -{step}"));
    }

    pub fn volume(&self) -> Option<String> {
        self.scalar("mixer volume ?", "_volume")
    }

    /// Set an absolute volume, clamped to 0..=100. Returns the value sent.
    pub fn set_volume(&self, volume: i64) -> i64 {
        let volume = volume.clamp(0, 100);
        self.call_line(&format!("mixer volume {volume}"));
        volume
    }

    /* ---- Current track ---- */

    pub fn track_artist(&self) -> Option<String> {
        self.scalar("artist ?", "_artist")
    }

    pub fn track_album(&self) -> Option<String> {
        self.scalar("album ?", "_album")
    }

    pub fn track_title(&self) -> Option<String> {
        self.scalar("title ?", "_title")
    }

    /* ---- Current playlist ---- */

    /// Generic player status (power, mode, position, current index).
    pub fn status(&self) -> Option<PlayerStatus> {
        self.query(tokenize("status"))
    }

    /// The whole current playlist, indexes as the server reports them.
    pub fn playlist(&self) -> Option<PlaylistStatus> {
        self.query(tokenize(&format!("status 0 {PLAYLIST_WINDOW} tags:a")))
    }

    /// Title/artist of the entry at a server-side position.
    pub fn playlist_entry(&self, wire_index: i64) -> Option<PlaylistEntry> {
        self.query::<PlaylistStatus>(tokenize(&format!("status {wire_index} 1 tags:a")))?
            .entries
            .into_iter()
            .next()
    }

    /// Jump to a user-facing playlist position.
    pub fn set_current(&self, index: i64) {
        let wire = self.indexing.to_wire(index);
        self.call_line(&format!("playlist index {wire}"));
    }

    /// Full detail of the item at a user-facing playlist position.
    pub fn playlist_item(&self, index: i64) -> Option<TrackDetail> {
        let wire = self.indexing.to_wire(index);
        self.query::<PlaylistDetail>(tokenize(&format!("status {wire} 1 {DETAIL_TAGS}")))?
            .entries
            .into_iter()
            .next()
    }

    /* ---- Library ---- */

    /// Windowed search (`start 0`, at most `max` rows).
    pub fn search(&self, kind: ItemKind, query: &SearchQuery, max: u32) -> Option<SearchResult> {
        let mut args = vec![kind.command().to_string(), "0".into(), max.to_string()];
        args.extend(kind.search_tags().map(str::to_string));
        args.extend(query.token());
        self.windowed(kind, args)
    }

    fn windowed(&self, kind: ItemKind, arguments: Vec<String>) -> Option<SearchResult> {
        let line = arguments.join(" ");
        let result = self.call(arguments)?;
        match SearchResult::decode(kind, result) {
            Ok(v) => Some(v),
            Err(e) => {
                log_error!("LMS player request \"{line}\" failed: {e}");
                None
            }
        }
    }

    /// Add items to the current playlist. An empty id list sends nothing.
    pub fn enqueue(&self, kind: ItemKind, ids: &[String], method: EnqueueMethod) {
        if ids.is_empty() {
            log_debug!("enqueue {kind}: no ids, nothing to do");
            return;
        }
        self.call(vec![
            "playlistcontrol".into(),
            format!("cmd:{}", method.as_str()),
            format!("{}:{}", kind.id_key(), ids.join(",")),
        ]);
    }

    /// First record matching an id.
    pub fn lookup(&self, kind: ItemKind, id: &str) -> Option<Record> {
        let tags = match kind {
            ItemKind::Artists => None,
            ItemKind::Albums => Some("tags:a,l,y"),
            ItemKind::Tracks => Some(DETAIL_TAGS),
        };
        let mut args = vec![kind.command().to_string(), "0".into(), "1".into()];
        args.extend(tags.map(str::to_string));
        args.push(format!("{}:{id}", kind.id_key()));
        self.windowed(kind, args)?.records.into_iter().next()
    }

    /// Artist name for an artist id ("" when unknown).
    pub fn artist_name(&self, artist_id: &str) -> String {
        self.lookup(ItemKind::Artists, artist_id)
            .map(|r| r.artist)
            .unwrap_or_default()
    }

    /// Albums of an artist, oldest first (no year sorts first).
    pub fn artist_albums(&self, artist_id: &str) -> Vec<Record> {
        let args = tokenize(&format!(
            "albums 0 {INFO_WINDOW} tags:a,l,y artist_id:{artist_id}"
        ));
        let mut albums = self
            .windowed(ItemKind::Albums, args)
            .map(|r| r.records)
            .unwrap_or_default();
        albums.sort_by_key(Record::year_key);
        albums
    }

    /// Tracks of an album in track-number order (unnumbered first).
    pub fn album_tracks(&self, album_id: &str) -> Vec<Record> {
        let args = tokenize(&format!(
            "tracks 0 {INFO_WINDOW} tags:a,l,t,g,y,d album_id:{album_id}"
        ));
        let mut tracks = self
            .windowed(ItemKind::Tracks, args)
            .map(|r| r.records)
            .unwrap_or_default();
        tracks.sort_by_key(Record::tracknum_key);
        tracks
    }

    pub fn track_info(&self, track_id: &str) -> Option<TrackDetail> {
        self.lookup(ItemKind::Tracks, track_id)
    }
}

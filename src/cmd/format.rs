/*!
format.rs

Plain-text renderers for command output. Everything here returns strings;
callers decide where they go. Output is meant for scripts: no color, no
boxes, fixed column layouts.

Public API Summary:
  - ID_WIDTH / trim_id(raw)          leading id column of listing lines
  - format_duration(secs)            m:ss
  - position(time, duration)         [m:ss/m:ss]
  - playlist_line(entry, current, indexing)
  - search_line(kind, record)
  - album_line(album, artist)
  - album_header(first_track) / album_track_line(track)
  - track_detail(record)             multi-line detail block
*/

use crate::lms::{IndexMode, ItemKind, PlaylistEntry, Record, TrackDetail};

/// Width of the id column that leads every search listing line.
pub const ID_WIDTH: usize = 8;

/// Keep only the id column of a copied listing line.
pub fn trim_id(raw: &str) -> String {
    raw.chars().take(ID_WIDTH).collect::<String>().trim().to_string()
}

/// `m:ss` (minutes are not wrapped into hours).
pub fn format_duration(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// `[elapsed/total]`.
pub fn position(time: f64, duration: f64) -> String {
    format!("[{}/{}]", format_duration(time), format_duration(duration))
}

/// One row of the current playlist; `*` marks the playing entry.
pub fn playlist_line(entry: &PlaylistEntry, current: Option<i64>, indexing: IndexMode) -> String {
    let tag = if entry.index.is_some() && entry.index == current {
        '*'
    } else {
        ' '
    };
    let shown = entry
        .index
        .map(|i| indexing.to_natural(i).to_string())
        .unwrap_or_default();
    format!("{shown:>6} {tag} {} - {}", entry.title, entry.artist)
}

/// One search hit, id column first.
pub fn search_line(kind: ItemKind, rec: &Record) -> String {
    let id = &rec.id;
    match kind {
        ItemKind::Artists => format!("{id:<ID_WIDTH$}  {}", rec.artist),
        ItemKind::Albums => format!(
            "{id:<ID_WIDTH$}  {} ({})  -  {}",
            rec.album, rec.year, rec.artist
        ),
        ItemKind::Tracks => format!(
            "{id:<ID_WIDTH$}  {}  -  {}  -  {}",
            rec.title, rec.album, rec.artist
        ),
    }
}

/// Album row of an artist listing; album artist shown only when different.
pub fn album_line(album: &Record, artist: &str) -> String {
    let by = if album.artist == artist {
        String::new()
    } else {
        format!(" - {}", album.artist)
    };
    format!("{} ({}){by}", album.album, album.year)
}

/// Two header lines of an album listing, taken from its first track.
pub fn album_header(first: &Record) -> [String; 2] {
    [
        format!("{} ({})", first.album, first.year),
        first.artist.clone(),
    ]
}

pub fn album_track_line(track: &Record) -> String {
    format!(
        "  {:>2}. {}  ({})",
        track.tracknum,
        track.title,
        format_duration(track.duration)
    )
}

fn labelled(label: &str, value: impl AsRef<str>) -> String {
    format!("{label:<9} {}", value.as_ref())
}

/// Detail block for one track.
pub fn track_detail(track: &TrackDetail) -> Vec<String> {
    let filesize = track
        .filesize
        .map(|b| format!("{:.1} Mb", b as f64 / (1024.0 * 1024.0)))
        .unwrap_or_default();
    vec![
        labelled("Title:", &track.title),
        labelled("Artist:", &track.artist),
        labelled("Album:", &track.album),
        labelled("Track:", &track.tracknum),
        labelled("Year:", &track.year),
        labelled("Genre:", &track.genre),
        labelled("Duration:", format_duration(track.duration)),
        labelled("Encoding:", format!("{} {}", track.encoding, track.bitrate).trim()),
        labelled("Filesize:", filesize),
    ]
}

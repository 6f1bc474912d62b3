/*!
`dispatch.rs`

Maps a verb token plus positional arguments onto one player operation.

Flow:
  1. `Verb::resolve` (exact simple, unique simple prefix, exact compound)
  2. table lookup: verb -> handler
  3. the handler validates its own arguments (arity, integers, sub-type
     vocabulary, filter syntax) and raises `ArgumentError` before any
     network call is made
  4. results are rendered to the session's output

Network failures never surface here: the player logs them and hands back
nothing, so a handler simply prints nothing.
*/

use anyhow::Result;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use super::format::{self, trim_id};
use super::verb::Verb;
use crate::lms::player::DEFAULT_VOLUME_STEP;
use crate::lms::{EnqueueMethod, ItemKind, Player, SearchQuery};

/// Default row limit for search listings.
pub const DEFAULT_SEARCH_MAX: u32 = 9999;

/* -------------------------------------------------------------------------- */
/* Errors                                                                     */
/* -------------------------------------------------------------------------- */

/// Invalid user input to a command. Raised before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("invalid command '{0}'")]
    InvalidCommand(String),

    #[error("no {what} type specified [{}]", ItemKind::choices())]
    MissingType { what: &'static str },

    #[error("{token} is not a valid {what} type [{}]", ItemKind::choices())]
    InvalidType { what: &'static str, token: String },

    #[error("{verb} needs a playlist index")]
    MissingIndex { verb: &'static str },

    #[error("'{value}' is not a valid {what}")]
    NotAnInteger { what: &'static str, value: String },

    #[error("volume step must not be negative: {0}")]
    NegativeStep(i64),

    #[error("not a valid filter expression: '{0}' (expected key:value)")]
    MalformedFilter(String),

    #[error("{0} is not a valid filter type [artist_id,album_id,track_id]")]
    UnknownFilterKey(String),

    #[error("no item id specified for info {0}")]
    MissingId(ItemKind),
}

/* -------------------------------------------------------------------------- */
/* Session                                                                    */
/* -------------------------------------------------------------------------- */

/// Options that shape how commands interpret their arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Ids are taken from the first ID_WIDTH columns of the argument
    pub trim_id: bool,
    /// Search term is a `key:value` filter, not free text
    pub filter_term: bool,
    pub search_max: u32,
    pub enqueue_method: EnqueueMethod,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            trim_id: false,
            filter_term: false,
            search_max: DEFAULT_SEARCH_MAX,
            enqueue_method: EnqueueMethod::Add,
        }
    }
}

/// Everything a handler touches.
pub struct Session<'a> {
    pub player: &'a Player,
    pub options: &'a DispatchOptions,
    pub out: &'a mut dyn Write,
    /// Source of ids for `enqueue <type> -`
    pub input: &'a mut dyn BufRead,
}

type Handler = fn(&mut Session<'_>, &[String]) -> Result<()>;

/// Verb -> handler. Built at compile time.
fn handler(verb: Verb) -> Handler {
    match verb {
        Verb::Play => |s, _| {
            s.player.play();
            Ok(())
        },
        Verb::Pause => |s, _| {
            s.player.toggle_pause();
            Ok(())
        },
        Verb::Stop => |s, _| {
            s.player.stop();
            Ok(())
        },
        Verb::Next => |s, _| {
            s.player.next();
            Ok(())
        },
        Verb::Prev => |s, _| {
            s.player.prev();
            Ok(())
        },
        Verb::PowerOn => |s, _| {
            s.player.power_on();
            Ok(())
        },
        Verb::PowerOff => |s, _| {
            s.player.power_off();
            Ok(())
        },
        Verb::VolumeUp => run_volume_up,
        Verb::VolumeDown => run_volume_down,
        Verb::Volume => run_volume,
        Verb::Playing => run_playing,
        Verb::SetCurrent => run_set_current,
        Verb::PlayingListInfo => run_playing_list_info,
        Verb::Search => run_search,
        Verb::Enqueue => run_enqueue,
        Verb::Info => run_info,
    }
}

/// Run `command` with `args` against the session's player.
pub fn dispatch_command(session: &mut Session<'_>, command: &str, args: &[String]) -> Result<()> {
    let Some(verb) = Verb::resolve(command) else {
        return Err(ArgumentError::InvalidCommand(command.to_ascii_lowercase()).into());
    };
    crate::log_debug!("dispatch {verb} {args:?}");
    handler(verb)(session, args)
}

/* -------------------------------------------------------------------------- */
/* Argument helpers                                                           */
/* -------------------------------------------------------------------------- */

fn parse_int(what: &'static str, raw: &str) -> Result<i64, ArgumentError> {
    raw.trim().parse().map_err(|_| ArgumentError::NotAnInteger {
        what,
        value: raw.to_string(),
    })
}

fn required_index(verb: &'static str, args: &[String]) -> Result<i64, ArgumentError> {
    let raw = args.first().ok_or(ArgumentError::MissingIndex { verb })?;
    parse_int("playlist index", raw)
}

fn item_kind(what: &'static str, args: &[String]) -> Result<ItemKind, ArgumentError> {
    let token = args.first().ok_or(ArgumentError::MissingType { what })?;
    ItemKind::from_str_ci(token).ok_or_else(|| ArgumentError::InvalidType {
        what,
        token: token.to_ascii_lowercase(),
    })
}

fn clean_id(raw: &str, trim: bool) -> String {
    if trim {
        trim_id(raw)
    } else {
        raw.trim().to_string()
    }
}

/// Turn a search term into a query according to the filter option.
pub fn build_query(term: Option<&str>, options: &DispatchOptions) -> Result<SearchQuery, ArgumentError> {
    match term {
        None | Some("") => Ok(SearchQuery::All),
        Some(t) if !options.filter_term => Ok(SearchQuery::Term(t.to_string())),
        Some(t) => parse_filter(t, options.trim_id),
    }
}

/// Parse `key:value`, aliasing `artists|albums|tracks` to their id keys.
pub fn parse_filter(expr: &str, trim: bool) -> Result<SearchQuery, ArgumentError> {
    let (key, value) = expr
        .split_once(':')
        .ok_or_else(|| ArgumentError::MalformedFilter(expr.to_string()))?;
    let key = key.trim().to_lowercase();
    let key = ItemKind::from_str_ci(&key)
        .map(|k| k.id_key())
        .unwrap_or(key);
    if !ItemKind::variants().iter().any(|k| k.id_key() == key) {
        return Err(ArgumentError::UnknownFilterKey(key));
    }
    Ok(SearchQuery::Filter {
        key,
        value: clean_id(value, trim),
    })
}

/// Ids for enqueue: the arguments, or one id per stdin line when the only
/// argument is `-`. Blank entries are dropped.
pub fn collect_ids(items: &[String], input: &mut dyn BufRead, trim: bool) -> io::Result<Vec<String>> {
    let raw = match items {
        [only] if only == "-" => input.lines().collect::<io::Result<Vec<_>>>()?,
        _ => items.to_vec(),
    };
    Ok(raw
        .iter()
        .map(|s| clean_id(s, trim))
        .filter(|s| !s.is_empty())
        .collect())
}

/* -------------------------------------------------------------------------- */
/* Handlers                                                                   */
/* -------------------------------------------------------------------------- */

fn optional_step(args: &[String]) -> Result<u32, ArgumentError> {
    let Some(raw) = args.first() else {
        return Ok(DEFAULT_VOLUME_STEP);
    };
    let step = parse_int("volume step", raw)?;
    u32::try_from(step).map_err(|_| ArgumentError::NegativeStep(step))
}

fn run_volume_up(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let step = optional_step(args)?;
    s.player.volume_up(step);
    Ok(())
}

fn run_volume_down(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let step = optional_step(args)?;
    s.player.volume_down(step);
    Ok(())
}

fn run_volume(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    match args.first() {
        Some(raw) => {
            let volume = parse_int("volume", raw)?;
            s.player.set_volume(volume);
        }
        None => {
            if let Some(v) = s.player.volume() {
                writeln!(s.out, "Volume: {v}")?;
            }
        }
    }
    Ok(())
}

fn run_playing(s: &mut Session<'_>, _args: &[String]) -> Result<()> {
    let Some(playlist) = s.player.playlist() else {
        return Ok(());
    };
    let indexing = s.player.indexing();
    for entry in &playlist.entries {
        writeln!(
            s.out,
            "{}",
            format::playlist_line(entry, playlist.current_index, indexing)
        )?;
    }
    Ok(())
}

fn run_set_current(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let index = required_index("setcurrent", args)?;
    s.player.set_current(index);
    Ok(())
}

fn run_playing_list_info(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let index = required_index("playinglistinfo", args)?;
    if let Some(item) = s.player.playlist_item(index) {
        for line in format::track_detail(&item) {
            writeln!(s.out, "{line}")?;
        }
    }
    Ok(())
}

fn run_search(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let kind = item_kind("search", args)?;
    let query = build_query(args.get(1).map(String::as_str), s.options)?;
    let Some(result) = s.player.search(kind, &query, s.options.search_max) else {
        return Ok(());
    };
    if result.is_empty() {
        return Ok(());
    }
    for rec in &result.records {
        writeln!(s.out, "{}", format::search_line(kind, rec))?;
    }
    Ok(())
}

fn run_enqueue(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let kind = item_kind("enqueue item", args)?;
    let ids = collect_ids(&args[1..], s.input, s.options.trim_id)?;
    s.player.enqueue(kind, &ids, s.options.enqueue_method);
    Ok(())
}

fn run_info(s: &mut Session<'_>, args: &[String]) -> Result<()> {
    let kind = item_kind("info", args)?;
    let id = args
        .get(1)
        .map(|raw| clean_id(raw, s.options.trim_id))
        .filter(|id| !id.is_empty())
        .ok_or(ArgumentError::MissingId(kind))?;

    match kind {
        ItemKind::Artists => {
            let artist = s.player.artist_name(&id);
            for album in s.player.artist_albums(&id) {
                writeln!(s.out, "{}", format::album_line(&album, &artist))?;
            }
        }
        ItemKind::Albums => {
            let tracks = s.player.album_tracks(&id);
            let Some(first) = tracks.first() else {
                return Ok(());
            };
            for line in format::album_header(first) {
                writeln!(s.out, "{line}")?;
            }
            for track in &tracks {
                writeln!(s.out, "{}", format::album_track_line(track))?;
            }
        }
        ItemKind::Tracks => {
            if let Some(track) = s.player.track_info(&id) {
                for line in format::track_detail(&track) {
                    writeln!(s.out, "{line}")?;
                }
            }
        }
    }
    Ok(())
}

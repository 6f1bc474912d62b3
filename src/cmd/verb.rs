/*!
Verb table for the command dispatcher.

Two groups:
  simple   play pause stop next prev poweron poweroff vup vdown volume
           (exact match, then unique-prefix match)
  compound playing setcurrent playinglistinfo search enqueue info
           (exact match only)

Helpers:
  - Verb::resolve()  token -> Verb
  - Verb::name()
  - Verb::is_simple()
*/

use std::fmt;

/// Every verb the dispatcher knows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Verb {
    Play,
    /// Toggle; the bare `pause` verb never means pause-on
    Pause,
    Stop,
    Next,
    Prev,
    PowerOn,
    PowerOff,
    VolumeUp,
    VolumeDown,
    Volume,
    Playing,
    SetCurrent,
    PlayingListInfo,
    Search,
    Enqueue,
    Info,
}

/// One row of the verb table.
#[derive(Debug)]
pub struct VerbEntry {
    pub name: &'static str,
    pub verb: Verb,
    pub simple: bool,
}

const fn simple(name: &'static str, verb: Verb) -> VerbEntry {
    VerbEntry {
        name,
        verb,
        simple: true,
    }
}

const fn compound(name: &'static str, verb: Verb) -> VerbEntry {
    VerbEntry {
        name,
        verb,
        simple: false,
    }
}

/// The verb table. Order is the order shown in help.
pub static VERBS: &[VerbEntry] = &[
    simple("play", Verb::Play),
    simple("pause", Verb::Pause),
    simple("stop", Verb::Stop),
    simple("next", Verb::Next),
    simple("prev", Verb::Prev),
    simple("poweron", Verb::PowerOn),
    simple("poweroff", Verb::PowerOff),
    simple("vup", Verb::VolumeUp),
    simple("vdown", Verb::VolumeDown),
    simple("volume", Verb::Volume),
    compound("playing", Verb::Playing),
    compound("setcurrent", Verb::SetCurrent),
    compound("playinglistinfo", Verb::PlayingListInfo),
    compound("search", Verb::Search),
    compound("enqueue", Verb::Enqueue),
    compound("info", Verb::Info),
];

/// Command summary appended to `--help`.
pub const COMMANDS_HELP: &str = "\
COMMAND:
  play
  pause                 (toggle)
  stop
  next
  prev
  poweron
  poweroff
  vup [n]
  vdown [n]
  volume [n]
  playing
  setcurrent <n>
  playinglistinfo <n>
  search [artists|albums|tracks] TERM
  enqueue [artists|albums|tracks] ITEMS   (ITEMS '-' reads ids from stdin)
  info [artists|albums|tracks] ITEM

  Simple commands may be abbreviated to any unique prefix (e.g. 'pl' for play).
  ITEM for enqueue and info is the database id, as printed by search.";

impl Verb {
    /// Map a user token onto a verb.
    ///
    /// 1. exact simple verb
    /// 2. unique prefix of a simple verb (ambiguous prefixes match nothing)
    /// 3. exact compound verb
    pub fn resolve(token: &str) -> Option<Verb> {
        let token = token.trim().to_ascii_lowercase();
        let simples = || VERBS.iter().filter(|e| e.simple);

        if let Some(e) = simples().find(|e| e.name == token) {
            return Some(e.verb);
        }

        let mut prefixed = simples().filter(|e| e.name.starts_with(&token));
        if let (Some(e), None) = (prefixed.next(), prefixed.next()) {
            return Some(e.verb);
        }

        VERBS
            .iter()
            .find(|e| !e.simple && e.name == token)
            .map(|e| e.verb)
    }

    pub fn name(&self) -> &'static str {
        VERBS
            .iter()
            .find(|e| e.verb == *self)
            .map(|e| e.name)
            .unwrap_or("?")
    }

    pub fn is_simple(&self) -> bool {
        VERBS.iter().any(|e| e.verb == *self && e.simple)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/* --------------------------------- Tests ---------------------------------- */

//! Media server protocol layer.
//!
//! transport -> one JSON-RPC POST, `result` mapping or ConnectivityError
//! device    -> player name to server id
//! model     -> typed result shapes (lenient decoding lives here)
//! index     -> natural / raw playlist positions
//! player    -> the typed command set, with the per-command recovery boundary

pub mod device;
pub mod error;
pub mod index;
pub mod model;
pub mod player;
pub mod transport;

pub use device::{Device, resolve};
pub use error::ConnectivityError;
pub use index::IndexMode;
pub use model::{ItemKind, PlayerStatus, PlaylistEntry, PlaylistStatus, Record, SearchResult, TrackDetail};
pub use player::{EnqueueMethod, Player, SearchQuery};
pub use transport::{CommandRequest, DEFAULT_PORT, Endpoint, Transport};

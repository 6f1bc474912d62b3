//! Player lookup by display name.
//!
//! resolve(name) -> Device, with `identifier` set only when the server lists
//! a player of that name. Failures are reported, never fatal.

use std::fmt;

use super::error::ConnectivityError;
use super::model::{self, PlayerList, value_int};
use super::transport::{CommandRequest, Endpoint, SERVER_TARGET, Transport};
use crate::{log_debug, log_error};

/// A named playback device on a media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub endpoint: Endpoint,
    identifier: Option<String>,
}

impl Device {
    /// A device that has not been (or could not be) found.
    pub fn unresolved(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
            identifier: None,
        }
    }

    pub fn resolved(name: impl Into<String>, endpoint: Endpoint, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint,
            identifier: Some(identifier.into()),
        }
    }

    /// Server-side player id (usually a MAC address).
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.identifier.is_some()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "{} ({id})", self.name),
            None => write!(f, "{} (not found)", self.name),
        }
    }
}

/// Look up `name` among the players known to the server.
pub fn resolve(name: &str, transport: &Transport) -> Device {
    let endpoint = transport.endpoint().clone();
    match find_player(name, transport) {
        Ok(Some(id)) => {
            log_debug!("player '{name}' resolved to {id}");
            Device::resolved(name, endpoint, id)
        }
        Ok(None) => {
            log_error!("LMS player not found: {name}");
            Device::unresolved(name, endpoint)
        }
        Err(e) => {
            log_error!("LMS error locating player '{name}': {e}");
            Device::unresolved(name, endpoint)
        }
    }
}

fn find_player(name: &str, transport: &Transport) -> Result<Option<String>, ConnectivityError> {
    let count = transport
        .send(&CommandRequest::from_line(SERVER_TARGET, "player count ?"))?
        .get("_count")
        .and_then(value_int)
        .unwrap_or(0);
    if count <= 0 {
        return Ok(None);
    }

    let list: PlayerList = model::decode(
        transport.send(&CommandRequest::from_line(SERVER_TARGET, &format!("players 0 {count}")))?,
    )?;

    let wanted = name.to_lowercase();
    Ok(list
        .players
        .into_iter()
        .find(|p| p.name.to_lowercase() == wanted)
        .map(|p| p.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{expect_rpc, transport_for};
    use serde_json::json;

    fn serve_players(server: &mut mockito::Server) -> Vec<mockito::Mock> {
        vec![
            expect_rpc(server, "-", &["player", "count", "?"], json!({"_count": 2})),
            expect_rpc(
                server,
                "-",
                &["players", "0", "2"],
                json!({"count": 2, "players_loop": [
                    {"name": "Kitchen", "playerid": "aa:bb"},
                    {"name": "Study", "playerid": "cc:dd"}
                ]}),
            ),
        ]
    }

    #[test]
    fn resolves_case_insensitively() {
        let mut server = mockito::Server::new();
        let _mocks = serve_players(&mut server);
        let transport = transport_for(&server);

        for name in ["kitchen", "KITCHEN", "Kitchen"] {
            let dev = resolve(name, &transport);
            assert!(dev.is_resolved());
            assert_eq!(dev.identifier(), Some("aa:bb"));
            assert_eq!(dev.name, name);
        }
    }

    #[test]
    fn unknown_name_is_unresolved() {
        let mut server = mockito::Server::new();
        let _mocks = serve_players(&mut server);
        let dev = resolve("bogus", &transport_for(&server));
        assert!(!dev.is_resolved());
        assert_eq!(dev.identifier(), None);
        assert_eq!(dev.to_string(), "bogus (not found)");
    }

    #[test]
    fn server_failure_is_unresolved() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/jsonrpc.js").with_status(503).create();
        let dev = resolve("Kitchen", &transport_for(&server));
        assert!(!dev.is_resolved());
    }

    #[test]
    fn zero_players_skips_listing() {
        let mut server = mockito::Server::new();
        let count_mock = server
            .mock("POST", "/jsonrpc.js")
            .with_body(r#"{"result":{"_count":"0"}}"#)
            .expect(1)
            .create();
        let dev = resolve("Kitchen", &transport_for(&server));
        assert!(!dev.is_resolved());
        count_mock.assert();
    }
}

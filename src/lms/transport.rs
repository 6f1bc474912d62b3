//! JSON-RPC transport: one blocking POST per request, no retries.
//!
//! Envelope sent for every call:
//!   {"method":"slim.request","params":[<player id or "-">, [<tokens>...]]}
//! Only the `result` member of the reply is kept.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{BufReader, Read};
use std::time::Duration;
use url::Url;

use super::error::ConnectivityError;
use crate::{log_debug, log_trace};

/// The one RPC method this client speaks.
pub const RPC_METHOD: &str = "slim.request";

/// Path of the JSON-RPC endpoint on the server.
pub const RPC_PATH: &str = "/jsonrpc.js";

/// Target identifier for server-wide (non player) commands.
pub const SERVER_TARGET: &str = "-";

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Network address of a media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Full URL of the JSON-RPC endpoint.
    pub fn url(&self) -> Result<Url, ConnectivityError> {
        let host = self.host.trim();
        // bare IPv6 literals need brackets inside a URL
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        Url::parse(&format!("http://{host}:{}{RPC_PATH}", self.port)).map_err(|e| {
            ConnectivityError::Connect(format!("invalid server address '{}': {e}", self.host))
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A single command addressed to a player (or the server).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub target: String,
    pub arguments: Vec<String>,
}

impl CommandRequest {
    /// Build from an already tokenized argument list (sent as-is).
    pub fn new(target: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            target: target.into(),
            arguments,
        }
    }

    /// Build from a command line, split on whitespace.
    pub fn from_line(target: impl Into<String>, line: &str) -> Self {
        Self::new(target, tokenize(line))
    }

    /// Space-joined form, used in diagnostics.
    pub fn command_line(&self) -> String {
        self.arguments.join(" ")
    }
}

/// Split a command line into wire tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[derive(Serialize)]
struct Envelope<'a> {
    method: &'static str,
    params: (&'a str, &'a [String]),
}

#[derive(Deserialize)]
struct Reply {
    result: Option<Value>,
}

/// Blocking JSON-RPC client bound to one server endpoint.
///
/// Each call builds its own short-lived agent: acquire, send, parse, release.
#[derive(Debug, Clone)]
pub struct Transport {
    endpoint: Endpoint,
    timeout: Duration,
}

impl Transport {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one request and return the `result` mapping of the reply.
    pub fn send(&self, request: &CommandRequest) -> Result<Map<String, Value>, ConnectivityError> {
        let url = self.endpoint.url()?;
        let body = serde_json::to_string(&Envelope {
            method: RPC_METHOD,
            params: (request.target.as_str(), request.arguments.as_slice()),
        })?;
        log_debug!("POST {url} {body}");

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .post(url.as_str())
            .set("Content-Type", "application/json")
            .send_string(&body)?;
        // read uncapped: a full playlist window can run past 10 MB
        let result = decode_reply(BufReader::new(response.into_reader()))?;
        log_trace!("reply: {} result keys", result.len());
        Ok(result)
    }
}

/// Pull the `result` object out of a reply body.
fn decode_reply(body: impl Read) -> Result<Map<String, Value>, ConnectivityError> {
    let reply: Reply = serde_json::from_reader(body)?;
    match reply.result {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ConnectivityError::Decode(format!(
            "result is not an object: {other}"
        ))),
        None => Err(ConnectivityError::Decode("reply has no result".into())),
    }
}

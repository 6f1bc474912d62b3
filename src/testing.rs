//! Test helpers: a mock media server speaking the JSON-RPC envelope.

use mockito::{Matcher, Mock, Server};
use serde_json::{Value, json};

use crate::lms::{Endpoint, Transport};

/// Endpoint of a running mock server.
pub fn endpoint_for(server: &Server) -> Endpoint {
    let addr = server.socket_address();
    Endpoint::new(addr.ip().to_string(), addr.port())
}

pub fn transport_for(server: &Server) -> Transport {
    Transport::new(endpoint_for(server))
}

/// Expect exactly this command (target + tokens) and answer with `result`.
pub fn expect_rpc(server: &mut Server, target: &str, args: &[&str], result: Value) -> Mock {
    server
        .mock("POST", "/jsonrpc.js")
        .match_body(Matcher::Json(json!({
            "method": "slim.request",
            "params": [target, args]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "result": result }).to_string())
        .create()
}

//! End-to-end runs of the `lmsctl` binary: exit codes and output streams.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};
use std::process::{Command, Output};

/// Loopback port with nothing listening.
const CLOSED_PORT: &str = "9";

fn lmsctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lmsctl"))
        .args(args)
        .env_remove("LMS_HOST")
        .env_remove("LMS_PLAYER")
        .env_remove("LMS_PORT")
        .output()
        .expect("failed to run lmsctl")
}

fn offline(extra: &[&str]) -> Output {
    let mut args = vec!["-a", "127.0.0.1", "-p", CLOSED_PORT, "-n", "Kitchen", "--timeout", "2"];
    args.extend_from_slice(extra);
    lmsctl(&args)
}

fn rpc(server: &mut ServerGuard, target: &str, args: &[&str], result: Value) -> Mock {
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

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn bad_sub_type_is_a_usage_error() {
    let out = offline(&["search", "songs"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(text(&out.stderr).contains("songs is not a valid search type"));
    assert!(out.stdout.is_empty());
}

#[test]
fn unknown_verb_is_a_usage_error() {
    let out = offline(&["po"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(text(&out.stderr).contains("invalid command 'po'"));
}

#[test]
fn unreachable_server_does_not_change_exit_code() {
    let out = offline(&["-s", "play"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(text(&out.stderr).contains("LMS error locating player 'Kitchen'"));
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_host_is_a_usage_error() {
    let out = lmsctl(&["-n", "Kitchen", "play"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(text(&out.stderr).contains("--host"));
}

#[test]
fn play_then_status_line_on_stdout() {
    let mut server = mockito::Server::new();
    let port = server.socket_address().port().to_string();
    let _count = rpc(&mut server, "-", &["player", "count", "?"], json!({"_count": 1}));
    let _players = rpc(
        &mut server,
        "-",
        &["players", "0", "1"],
        json!({"players_loop": [{"name": "Kitchen", "playerid": "aa:bb"}]}),
    );
    let play = rpc(&mut server, "aa:bb", &["play"], json!({}));
    let _status = rpc(
        &mut server,
        "aa:bb",
        &["status"],
        json!({"power": 1, "mode": "play", "time": 65, "duration": 200,
               "playlist_cur_index": 4, "playlist_tracks": 10}),
    );
    let _entry = rpc(
        &mut server,
        "aa:bb",
        &["status", "4", "1", "tags:a"],
        json!({"playlist_loop": [{"playlist index": 4, "title": "Time", "artist": "Pink Floyd"}]}),
    );

    let out = lmsctl(&["-a", "127.0.0.1", "-p", &port, "-n", "kitchen", "-s", "play"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", text(&out.stderr));
    assert_eq!(
        text(&out.stdout),
        "kitchen [play] 5/10.Time - Pink Floyd [1:05/3:20]\n"
    );
    play.assert();
}

//! One-line player status:
//!   `<name> [<mode|off>] <n>/<total>.<title> - <artist> [m:ss/m:ss]`
//! (`/<total>` only when the server reports a track count)

use crate::cmd::format::position;
use crate::lms::Player;

/// Compose the status line. `None` when the player cannot be queried
/// (already reported).
pub fn render_status(player: &Player) -> Option<String> {
    let status = player.status()?;

    let state = if status.is_powered() {
        status.mode.as_str()
    } else {
        "off"
    };
    let mut line = format!("{} [{state}]", player.name());

    if let Some(current) = status.current_index {
        let shown = player.indexing().to_natural(current);
        match status.track_count {
            Some(total) => line.push_str(&format!(" {shown}/{total}")),
            None => line.push_str(&format!(" {shown}")),
        }
        // second query only for the current entry, by its server position
        if let Some(entry) = player.playlist_entry(current)
            && !entry.title.is_empty()
        {
            line.push_str(&format!(".{} - {}", entry.title, entry.artist));
        }
    }

    line.push(' ');
    line.push_str(&position(status.time, status.duration));
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lms::{Device, IndexMode};
    use crate::testing::{endpoint_for, expect_rpc, transport_for};
    use serde_json::json;

    fn player_for(server: &mockito::Server, indexing: IndexMode) -> Player {
        let device = Device::resolved("Kitchen", endpoint_for(server), "aa:bb");
        Player::new(device, transport_for(server), indexing)
    }

    fn playing_status() -> serde_json::Value {
        json!({
            "power": 1, "mode": "play", "time": 65.4, "duration": 200,
            "playlist_cur_index": "4", "playlist_tracks": 10
        })
    }

    #[test]
    fn renders_current_track_with_natural_index() {
        let mut server = mockito::Server::new();
        let _s = expect_rpc(&mut server, "aa:bb", &["status"], playing_status());
        let _e = expect_rpc(
            &mut server,
            "aa:bb",
            &["status", "4", "1", "tags:a"],
            json!({"playlist_loop": [{"playlist index": 4, "title": "Time", "artist": "Pink Floyd"}]}),
        );
        let line = render_status(&player_for(&server, IndexMode::Natural)).unwrap();
        assert_eq!(line, "Kitchen [play] 5/10.Time - Pink Floyd [1:05/3:20]");
    }

    #[test]
    fn raw_index_and_missing_title() {
        let mut server = mockito::Server::new();
        let _s = expect_rpc(&mut server, "aa:bb", &["status"], playing_status());
        let _e = expect_rpc(&mut server, "aa:bb", &["status", "4", "1", "tags:a"], json!({}));
        let line = render_status(&player_for(&server, IndexMode::Raw)).unwrap();
        assert_eq!(line, "Kitchen [play] 4/10 [1:05/3:20]");
    }

    #[test]
    fn missing_track_count_shows_index_only() {
        let mut server = mockito::Server::new();
        let _s = expect_rpc(
            &mut server,
            "aa:bb",
            &["status"],
            json!({"power": 1, "mode": "pause", "time": 5, "duration": 60, "playlist_cur_index": 0}),
        );
        let _e = expect_rpc(
            &mut server,
            "aa:bb",
            &["status", "0", "1", "tags:a"],
            json!({"playlist_loop": [{"playlist index": 0, "title": "Intro", "artist": "X"}]}),
        );
        let line = render_status(&player_for(&server, IndexMode::Natural)).unwrap();
        assert_eq!(line, "Kitchen [pause] 1.Intro - X [0:05/1:00]");
    }

    #[test]
    fn powered_off_and_empty_playlist() {
        let mut server = mockito::Server::new();
        let _s = expect_rpc(
            &mut server,
            "aa:bb",
            &["status"],
            json!({"power": 0, "mode": "play", "time": 0}),
        );
        let line = render_status(&player_for(&server, IndexMode::Natural)).unwrap();
        assert_eq!(line, "Kitchen [off] [0:00/0:00]");
    }

    #[test]
    fn unresolved_player_renders_nothing() {
        let server = mockito::Server::new();
        let device = Device::unresolved("Nowhere", endpoint_for(&server));
        let player = Player::new(device, transport_for(&server), IndexMode::Natural);
        assert_eq!(render_status(&player), None);
    }
}

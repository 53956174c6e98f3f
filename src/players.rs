use crate::{
    backend::{self, METADATA_SEPARATOR},
    runner::{CommandRunner, Tool},
};
use log::{debug, info};
use std::fmt;

const LABEL_METADATA_LIMIT: usize = 60;
const NO_PLAYERS_MARKER: &str = "No players found";

/// Opaque player id as reported by the media tool, e.g. `spotify` or
/// `firefox.instance_1_42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerHandle(String);

impl PlayerHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First dot-separated segment, capitalised: `firefox.instance_1` -> `Firefox`.
    pub fn app_name(&self) -> String {
        let app = self.0.split('.').next().unwrap_or_default();
        let mut chars = app.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for PlayerHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlayerHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    #[default]
    Unknown,
}

impl PlaybackState {
    pub fn parse(status: &str) -> Self {
        match status.trim() {
            "Playing" => PlaybackState::Playing,
            "Paused" => PlaybackState::Paused,
            "Stopped" => PlaybackState::Stopped,
            _ => PlaybackState::Unknown,
        }
    }

    pub fn display_text(self) -> &'static str {
        match self {
            PlaybackState::Playing => "▶ Playing",
            PlaybackState::Paused => "⏸ Paused",
            PlaybackState::Stopped => "■ Stopped",
            PlaybackState::Unknown => "■ Stopped (?)",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub artist: String,
    pub title: String,
}

impl TrackInfo {
    pub fn parse(output: &str) -> Option<Self> {
        let line = output.lines().next()?;
        let (artist, title) = line.split_once(METADATA_SEPARATOR).unwrap_or(("", line));
        let track = TrackInfo {
            artist: artist.trim().to_string(),
            title: title.trim().to_string(),
        };
        if track.artist.is_empty() && track.title.is_empty() {
            None
        } else {
            Some(track)
        }
    }

    /// `artist - title`, dropping whichever half is missing.
    pub fn summary(&self) -> String {
        match (self.artist.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} - {}", self.artist, self.title),
            (true, _) => self.title.clone(),
            (false, true) => self.artist.clone(),
        }
    }
}

/// A handle paired with the text the display shows for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerEntry {
    pub handle: PlayerHandle,
    pub label: String,
}

pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(limit).collect();
        short.push_str("...");
        short
    }
}

pub fn friendly_label(handle: &PlayerHandle, track: Option<&TrackInfo>) -> String {
    let app = handle.app_name();
    match track {
        Some(track) => format!(
            "{app} → {}",
            truncate_with_ellipsis(&track.summary(), LABEL_METADATA_LIMIT)
        ),
        None => app,
    }
}

pub fn parse_player_list(output: &str) -> Vec<PlayerHandle> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(NO_PLAYERS_MARKER))
        .map(PlayerHandle::from)
        .collect()
}

/// Tracks the players seen by the most recent query and which one is
/// selected. The selection is always one of `players()` or `None`.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<PlayerHandle>,
    selected: Option<PlayerHandle>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
    }

    pub fn selected(&self) -> Option<&PlayerHandle> {
        self.selected.as_ref()
    }

    /// Queries the media tool and replaces the known player list. Failures
    /// and empty output yield an empty list.
    pub fn list_players(
        &mut self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
    ) -> Vec<PlayerHandle> {
        let players = match media.output(runner, &backend::list_players_args()) {
            Ok(stdout) => parse_player_list(&stdout),
            Err(err) => {
                debug!("player list unavailable: {err}");
                Vec::new()
            }
        };
        self.players = players.clone();
        self.reconcile();
        players
    }

    /// Selects `handle` if the last query reported it. Returns whether the
    /// selection changed.
    pub fn select(&mut self, handle: &PlayerHandle) -> bool {
        if !self.players.contains(handle) {
            debug!("ignoring selection of unknown player {handle}");
            return false;
        }
        if self.selected.as_ref() == Some(handle) {
            return false;
        }
        info!("selected player {handle}");
        self.selected = Some(handle.clone());
        true
    }

    /// Drops a selection that vanished from the list, then falls back to the
    /// first reported player.
    fn reconcile(&mut self) {
        if let Some(current) = &self.selected {
            if !self.players.contains(current) {
                info!("player {current} went away");
                self.selected = None;
            }
        }
        if self.selected.is_none() {
            if let Some(first) = self.players.first() {
                info!("selected player {first}");
                self.selected = Some(first.clone());
            }
        }
    }

    pub fn state(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: &PlayerHandle,
    ) -> PlaybackState {
        match media.output(runner, &backend::status_args(handle)) {
            Ok(stdout) => PlaybackState::parse(&stdout),
            Err(err) => {
                debug!("status of {handle} unavailable: {err}");
                PlaybackState::Unknown
            }
        }
    }

    pub fn track(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: &PlayerHandle,
    ) -> Option<TrackInfo> {
        match media.output(runner, &backend::metadata_args(handle)) {
            Ok(stdout) => TrackInfo::parse(&stdout),
            Err(err) => {
                debug!("metadata of {handle} unavailable: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::scripted::ScriptedRunner;
    use std::time::Duration;

    fn media() -> Tool {
        Tool::new("playerctl", Duration::from_secs(30))
    }

    #[test]
    fn empty_output_lists_no_players() {
        let runner = ScriptedRunner::new();
        runner.reply("playerctl -l", "");
        let mut registry = PlayerRegistry::new();
        assert!(registry.list_players(&runner, &mut media()).is_empty());
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn failed_query_lists_no_players() {
        let runner = ScriptedRunner::new();
        runner.exit("playerctl -l", 1);
        let mut registry = PlayerRegistry::new();
        assert!(registry.list_players(&runner, &mut media()).is_empty());
    }

    #[test]
    fn list_keeps_backend_order_and_skips_noise() {
        let parsed = parse_player_list("spotify\n\n  firefox.instance_1_7  \nNo players found\n");
        assert_eq!(
            parsed,
            vec![
                PlayerHandle::from("spotify"),
                PlayerHandle::from("firefox.instance_1_7")
            ]
        );
    }

    #[test]
    fn first_player_is_selected_by_default() {
        let runner = ScriptedRunner::new();
        runner.reply("playerctl -l", "vlc\nspotify\n");
        let mut registry = PlayerRegistry::new();
        registry.list_players(&runner, &mut media());
        assert_eq!(registry.selected(), Some(&PlayerHandle::from("vlc")));
    }

    #[test]
    fn selecting_unknown_player_is_ignored() {
        let runner = ScriptedRunner::new();
        runner.reply("playerctl -l", "spotify\nfirefox\n");
        let mut registry = PlayerRegistry::new();
        registry.list_players(&runner, &mut media());

        assert!(!registry.select(&PlayerHandle::from("mpv")));
        assert_eq!(registry.selected(), Some(&PlayerHandle::from("spotify")));

        assert!(registry.select(&PlayerHandle::from("firefox")));
        assert_eq!(registry.selected(), Some(&PlayerHandle::from("firefox")));
    }

    #[test]
    fn vanished_selection_is_never_kept() {
        let runner = ScriptedRunner::new();
        let mut tool = media();
        let mut registry = PlayerRegistry::new();

        runner.reply("playerctl -l", "spotify\nfirefox\n");
        registry.list_players(&runner, &mut tool);
        assert_eq!(registry.selected(), Some(&PlayerHandle::from("spotify")));

        runner.reply("playerctl -l", "firefox\n");
        registry.list_players(&runner, &mut tool);
        assert_eq!(registry.selected(), Some(&PlayerHandle::from("firefox")));

        runner.reply("playerctl -l", "");
        registry.list_players(&runner, &mut tool);
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn unrecognised_status_is_unknown() {
        let runner = ScriptedRunner::new();
        let handle = PlayerHandle::from("spotify");
        let registry = PlayerRegistry::new();
        let mut tool = media();

        runner.reply("playerctl -p spotify status", "Playing\n");
        assert_eq!(
            registry.state(&runner, &mut tool, &handle),
            PlaybackState::Playing
        );

        runner.reply("playerctl -p spotify status", "Buffering\n");
        assert_eq!(
            registry.state(&runner, &mut tool, &handle),
            PlaybackState::Unknown
        );

        runner.exit("playerctl -p spotify status", 1);
        assert_eq!(
            registry.state(&runner, &mut tool, &handle),
            PlaybackState::Unknown
        );
    }

    #[test]
    fn labels_combine_app_and_track() {
        let handle = PlayerHandle::from("spotify");
        let track = TrackInfo::parse("Daft Punk\tOne More Time\n").unwrap();
        assert_eq!(
            friendly_label(&handle, Some(&track)),
            "Spotify → Daft Punk - One More Time"
        );
        assert_eq!(
            friendly_label(&PlayerHandle::from("firefox.instance_1_2"), None),
            "Firefox"
        );

        let long = TrackInfo {
            artist: String::new(),
            title: "x".repeat(80),
        };
        let label = friendly_label(&handle, Some(&long));
        assert!(label.ends_with("..."));
        assert_eq!(label, format!("Spotify → {}...", "x".repeat(60)));
    }

    #[test]
    fn blank_metadata_is_no_track() {
        assert_eq!(TrackInfo::parse("\t\n"), None);
        assert_eq!(TrackInfo::parse(""), None);
    }
}

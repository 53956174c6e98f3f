//! Argument vectors for the media tool (`playerctl`) and the mixer tool
//! (`pactl`). Everything here is a pure function of its inputs.

use crate::players::PlayerHandle;

pub const DEFAULT_SEEK_SECONDS: u32 = 10;

/// Separator between artist and title in the metadata query.
pub const METADATA_SEPARATOR: char = '\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    Play,
    Pause,
    PlayPause,
    Next,
    Previous,
    SeekForward(u32),
    SeekBackward(u32),
}

impl TransportAction {
    pub fn label(self) -> &'static str {
        match self {
            TransportAction::Play => "Play",
            TransportAction::Pause => "Pause",
            TransportAction::PlayPause => "Play/Pause",
            TransportAction::Next => "Next",
            TransportAction::Previous => "Previous",
            TransportAction::SeekForward(_) => "Seek forward",
            TransportAction::SeekBackward(_) => "Seek backward",
        }
    }
}

fn targeted(handle: &PlayerHandle, rest: &[&str]) -> Vec<String> {
    let mut args = vec!["-p".to_string(), handle.as_str().to_string()];
    args.extend(rest.iter().map(|s| s.to_string()));
    args
}

pub fn list_players_args() -> Vec<String> {
    vec!["-l".to_string()]
}

pub fn status_args(handle: &PlayerHandle) -> Vec<String> {
    targeted(handle, &["status"])
}

pub fn metadata_args(handle: &PlayerHandle) -> Vec<String> {
    let format = format!("{{{{xesam:artist}}}}{METADATA_SEPARATOR}{{{{xesam:title}}}}");
    targeted(handle, &["metadata", "--format", &format])
}

pub fn transport_args(action: TransportAction, handle: &PlayerHandle) -> Vec<String> {
    match action {
        TransportAction::Play => targeted(handle, &["play"]),
        TransportAction::Pause => targeted(handle, &["pause"]),
        TransportAction::PlayPause => targeted(handle, &["play-pause"]),
        TransportAction::Next => targeted(handle, &["next"]),
        TransportAction::Previous => targeted(handle, &["previous"]),
        TransportAction::SeekForward(seconds) => {
            targeted(handle, &["position", &format!("{seconds}+")])
        }
        TransportAction::SeekBackward(seconds) => {
            targeted(handle, &["position", &format!("{seconds}-")])
        }
    }
}

pub fn get_volume_args(sink: &str) -> Vec<String> {
    vec!["get-sink-volume".to_string(), sink.to_string()]
}

pub fn get_mute_args(sink: &str) -> Vec<String> {
    vec!["get-sink-mute".to_string(), sink.to_string()]
}

pub fn set_volume_args(sink: &str, percent: u8) -> Vec<String> {
    vec![
        "set-sink-volume".to_string(),
        sink.to_string(),
        format!("{percent}%"),
    ]
}

pub fn toggle_mute_args(sink: &str) -> Vec<String> {
    vec![
        "set-sink-mute".to_string(),
        sink.to_string(),
        "toggle".to_string(),
    ]
}

use crate::{
    backend::TransportAction,
    config::Config,
    controller::{Controller, Intent, PanelSnapshot},
    players::truncate_with_ellipsis,
    runner::SystemRunner,
    theme::Palette,
};
use eframe::egui::{self, Margin, RichText};
use std::time::{Duration, Instant};

const TITLE_LIMIT: usize = 50;
const MIN_REPAINT_INTERVAL: Duration = Duration::from_millis(50);
const BUTTON_HEIGHT: f32 = 32.0;

pub struct PanelApp {
    controller: Controller<SystemRunner>,
    palette: Palette,
    style_applied: bool,
}

impl PanelApp {
    pub fn new(config: &Config) -> Self {
        let runner = SystemRunner::new(config.backend.command_timeout());
        Self {
            controller: Controller::new(runner, config, Instant::now()),
            palette: Palette::for_theme(config.ui.dark_theme),
            style_applied: false,
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_applied {
            self.palette.apply_style(ctx);
            self.style_applied = true;
        }

        if ctx.input(|input| input.viewport().close_requested()) {
            self.controller.shutdown();
        }

        self.controller.poll(Instant::now(), Instant::now);

        let mut intents = Vec::new();
        let snapshot = self.controller.snapshot();
        let palette = self.palette;
        let seek_seconds = self.controller.seek_seconds();
        let volume_step = i32::from(self.controller.volume_step());

        let panel_frame = egui::Frame::central_panel(&ctx.style()).inner_margin(Margin::same(20));
        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                render_panel(
                    ui,
                    &palette,
                    snapshot,
                    seek_seconds,
                    volume_step,
                    &mut intents,
                );
            });

        for intent in intents {
            self.controller.handle(intent);
        }

        if let Some(wait) = self.controller.next_refresh_in(Instant::now()) {
            ctx.request_repaint_after(wait.max(MIN_REPAINT_INTERVAL));
        }
    }
}

impl Drop for PanelApp {
    fn drop(&mut self) {
        self.controller.shutdown();
    }
}

fn render_panel(
    ui: &mut egui::Ui,
    palette: &Palette,
    snapshot: &PanelSnapshot,
    seek_seconds: u32,
    volume_step: i32,
    intents: &mut Vec<Intent>,
) {
    ui.label(palette.text("🎶 Active player:", 14.0).strong());

    egui::ComboBox::from_id_salt("player_picker")
        .width(ui.available_width())
        .selected_text(picker_text(snapshot))
        .show_ui(ui, |ui| {
            for entry in &snapshot.players {
                let is_selected = snapshot.selected.as_ref() == Some(&entry.handle);
                if ui
                    .selectable_label(is_selected, entry.label.as_str())
                    .clicked()
                {
                    intents.push(Intent::Select(entry.handle.clone()));
                }
            }
        });

    ui.add_space(8.0);

    egui::Frame::group(ui.style())
        .fill(palette.panel)
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                let (title, status) = now_playing_lines(snapshot);
                ui.label(palette.text(title, 14.0).strong());
                ui.label(palette.secondary(status, 12.0));
                ui.label(
                    RichText::new(format!("🔊 {}", snapshot.volume))
                        .color(palette.muted_text)
                        .size(12.0),
                );
            });
        });

    ui.add_space(8.0);

    for (label, enabled, intent) in control_buttons(snapshot, seek_seconds, volume_step) {
        let button = egui::Button::new(palette.text(label, 13.0))
            .min_size(egui::vec2(ui.available_width(), BUTTON_HEIGHT));
        if ui.add_enabled(enabled, button).clicked() {
            intents.push(intent);
        }
    }

    if let Some(status) = &snapshot.status {
        ui.colored_label(palette.error_text, status.as_str());
    }

    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(
                "Works with Spotify, Firefox, Chrome, etc.\nGlobal media and system volume control.",
            )
            .color(palette.muted_text)
            .size(11.0),
        );
    });
}

fn picker_text(snapshot: &PanelSnapshot) -> String {
    if !snapshot.media_available {
        return "Media control unavailable".to_string();
    }
    match snapshot.selected_entry() {
        Some(entry) => entry.label.clone(),
        None if snapshot.players.is_empty() => "No active players".to_string(),
        None => "Select a player".to_string(),
    }
}

/// Title line and `artist status` line for the info box.
fn now_playing_lines(snapshot: &PanelSnapshot) -> (String, String) {
    if snapshot.selected.is_none() {
        return (
            "No player selected".to_string(),
            "Select a player above".to_string(),
        );
    }

    let title = snapshot
        .track
        .as_ref()
        .map(|track| track.title.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or("Title unavailable");
    let artist = snapshot
        .track
        .as_ref()
        .map(|track| track.artist.as_str())
        .unwrap_or_default();
    let status = format!("{artist} {}", snapshot.playback.display_text());

    (
        truncate_with_ellipsis(title, TITLE_LIMIT),
        status.trim().to_string(),
    )
}

fn control_buttons(
    snapshot: &PanelSnapshot,
    seek_seconds: u32,
    volume_step: i32,
) -> Vec<(String, bool, Intent)> {
    let media = snapshot.media_available && snapshot.selected.is_some();
    let mixer = snapshot.mixer_available;
    vec![
        (
            "⏯  Play / Pause".to_string(),
            media,
            Intent::Transport(TransportAction::PlayPause),
        ),
        (
            format!("⏪  Back {seek_seconds}s"),
            media,
            Intent::Transport(TransportAction::SeekBackward(seek_seconds)),
        ),
        (
            format!("⏩  Forward {seek_seconds}s"),
            media,
            Intent::Transport(TransportAction::SeekForward(seek_seconds)),
        ),
        (
            "🔉  Volume -".to_string(),
            mixer,
            Intent::AdjustVolume(-volume_step),
        ),
        (
            "🔊  Volume +".to_string(),
            mixer,
            Intent::AdjustVolume(volume_step),
        ),
        (
            if snapshot.volume.is_muted() {
                "🔈  Unmute".to_string()
            } else {
                "🔇  Mute".to_string()
            },
            mixer,
            Intent::ToggleMute,
        ),
        (
            "⏮  Previous".to_string(),
            media,
            Intent::Transport(TransportAction::Previous),
        ),
        (
            "⏭  Next".to_string(),
            media,
            Intent::Transport(TransportAction::Next),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        players::{PlaybackState, PlayerEntry, PlayerHandle, TrackInfo},
        volume::VolumeLevel,
    };

    fn snapshot_with_player() -> PanelSnapshot {
        let handle = PlayerHandle::from("spotify");
        PanelSnapshot {
            players: vec![PlayerEntry {
                handle: handle.clone(),
                label: "Spotify".to_string(),
            }],
            selected: Some(handle),
            playback: PlaybackState::Paused,
            track: Some(TrackInfo {
                artist: "Air".to_string(),
                title: "La Femme d'Argent".to_string(),
            }),
            volume: VolumeLevel::Known {
                percent: 40,
                muted: false,
            },
            media_available: true,
            mixer_available: true,
            status: None,
        }
    }

    #[test]
    fn info_lines_show_title_artist_and_state() {
        let (title, status) = now_playing_lines(&snapshot_with_player());
        assert_eq!(title, "La Femme d'Argent");
        assert_eq!(status, "Air ⏸ Paused");
    }

    #[test]
    fn info_lines_without_selection() {
        let snapshot = PanelSnapshot {
            media_available: true,
            mixer_available: true,
            ..PanelSnapshot::default()
        };
        assert_eq!(now_playing_lines(&snapshot).0, "No player selected");
        assert_eq!(picker_text(&snapshot), "No active players");
    }

    #[test]
    fn transport_buttons_disabled_without_player() {
        let snapshot = PanelSnapshot {
            mixer_available: true,
            media_available: true,
            ..PanelSnapshot::default()
        };
        for (_, enabled, intent) in control_buttons(&snapshot, 10, 5) {
            let is_transport = matches!(intent, Intent::Transport(_));
            assert_eq!(enabled, !is_transport);
        }
    }

    #[test]
    fn missing_mixer_disables_volume_buttons() {
        let mut snapshot = snapshot_with_player();
        snapshot.mixer_available = false;
        let buttons = control_buttons(&snapshot, 10, 5);
        let volume_enabled = buttons
            .iter()
            .filter(|(_, _, intent)| {
                matches!(intent, Intent::AdjustVolume(_) | Intent::ToggleMute)
            })
            .any(|(_, enabled, _)| *enabled);
        assert!(!volume_enabled);
        assert!(buttons
            .iter()
            .any(|(_, _, intent)| *intent == Intent::AdjustVolume(-5)));
    }
}

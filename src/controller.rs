use crate::{
    backend::TransportAction,
    config::Config,
    error::ControlError,
    players::{friendly_label, PlaybackState, PlayerEntry, PlayerHandle, PlayerRegistry, TrackInfo},
    runner::{CommandRunner, Tool},
    scheduler::RefreshScheduler,
    transport::TransportController,
    volume::{VolumeController, VolumeLevel},
};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// What the display shows after every tick or user action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSnapshot {
    pub players: Vec<PlayerEntry>,
    pub selected: Option<PlayerHandle>,
    pub playback: PlaybackState,
    pub track: Option<TrackInfo>,
    pub volume: VolumeLevel,
    pub media_available: bool,
    pub mixer_available: bool,
    pub status: Option<String>,
}

impl PanelSnapshot {
    pub fn selected_entry(&self) -> Option<&PlayerEntry> {
        let selected = self.selected.as_ref()?;
        self.players.iter().find(|entry| &entry.handle == selected)
    }
}

/// User requests coming back from the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Select(PlayerHandle),
    Transport(TransportAction),
    SetVolume(i32),
    AdjustVolume(i32),
    ToggleMute,
}

impl Intent {
    fn label(&self) -> &'static str {
        match self {
            Intent::Select(_) => "Select",
            Intent::Transport(action) => action.label(),
            Intent::SetVolume(_) | Intent::AdjustVolume(_) => "Volume",
            Intent::ToggleMute => "Mute",
        }
    }
}

/// Owns every piece of mutable state. All calls happen on the UI thread.
pub struct Controller<R> {
    runner: R,
    media: Tool,
    mixer: Tool,
    registry: PlayerRegistry,
    transport: TransportController,
    volume: VolumeController,
    scheduler: RefreshScheduler,
    volume_step: u8,
    snapshot: PanelSnapshot,
}

impl<R: CommandRunner> Controller<R> {
    pub fn new(runner: R, config: &Config, now: Instant) -> Self {
        let backend = &config.backend;
        Self {
            runner,
            media: Tool::new(backend.media_tool.clone(), backend.unavailable_cooldown()),
            mixer: Tool::new(backend.mixer_tool.clone(), backend.unavailable_cooldown()),
            registry: PlayerRegistry::new(),
            transport: TransportController::new(config.controls.seek_seconds),
            volume: VolumeController::new(backend.sink.clone()),
            scheduler: RefreshScheduler::new(
                config.refresh.interval(),
                now + config.refresh.initial_delay(),
            ),
            volume_step: config.controls.volume_step,
            snapshot: PanelSnapshot {
                media_available: true,
                mixer_available: true,
                ..PanelSnapshot::default()
            },
        }
    }

    pub fn snapshot(&self) -> &PanelSnapshot {
        &self.snapshot
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn volume_step(&self) -> u8 {
        self.volume_step
    }

    pub fn seek_seconds(&self) -> u32 {
        self.transport.seek_seconds()
    }

    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_stopped()
    }

    pub fn next_refresh_in(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    /// Runs a refresh tick if one is due at `now`. `clock` is read once the
    /// tick is done to place the next one. Returns whether it ran.
    pub fn poll(&mut self, now: Instant, clock: impl FnOnce() -> Instant) -> bool {
        if !self.scheduler.try_begin(now) {
            return false;
        }
        self.refresh();
        self.scheduler.finish(clock());
        true
    }

    /// Re-lists players, reconciles the selection and reads playback state
    /// and volume.
    pub fn refresh(&mut self) {
        if self.scheduler.is_stopped() {
            return;
        }

        let handles = self.registry.list_players(&self.runner, &mut self.media);
        let selected = self.registry.selected().cloned();

        let mut players = Vec::with_capacity(handles.len());
        let mut selected_track = None;
        for handle in &handles {
            let track = self.registry.track(&self.runner, &mut self.media, handle);
            players.push(PlayerEntry {
                handle: handle.clone(),
                label: friendly_label(handle, track.as_ref()),
            });
            if selected.as_ref() == Some(handle) {
                selected_track = track;
            }
        }

        let playback = match &selected {
            Some(handle) => self.registry.state(&self.runner, &mut self.media, handle),
            None => PlaybackState::Unknown,
        };
        let volume = self.volume.get_volume(&self.runner, &mut self.mixer);

        debug!(
            "refreshed: {} player(s), selected {:?}, {:?}, volume {volume}",
            players.len(),
            selected.as_ref().map(PlayerHandle::as_str),
            playback
        );

        self.snapshot = PanelSnapshot {
            players,
            selected,
            playback,
            track: selected_track,
            volume,
            media_available: self.media.is_available(),
            mixer_available: self.mixer.is_available(),
            status: self.snapshot.status.take(),
        };
    }

    /// Re-reads state and metadata of the selected player only.
    fn refresh_selection(&mut self) {
        let selected = self.registry.selected().cloned();
        let (playback, track) = match &selected {
            Some(handle) => (
                self.registry.state(&self.runner, &mut self.media, handle),
                self.registry.track(&self.runner, &mut self.media, handle),
            ),
            None => (PlaybackState::Unknown, None),
        };

        if let Some(handle) = &selected {
            if let Some(entry) = self
                .snapshot
                .players
                .iter_mut()
                .find(|entry| &entry.handle == handle)
            {
                entry.label = friendly_label(handle, track.as_ref());
            }
        }

        self.snapshot.selected = selected;
        self.snapshot.playback = playback;
        self.snapshot.track = track;
        self.snapshot.media_available = self.media.is_available();
    }

    pub fn handle(&mut self, intent: Intent) {
        if self.scheduler.is_stopped() {
            debug!("ignoring {intent:?} after shutdown");
            return;
        }

        let label = intent.label();
        let result = match intent {
            Intent::Select(handle) => {
                if self.registry.select(&handle) {
                    self.refresh_selection();
                }
                Ok(())
            }
            Intent::Transport(action) => {
                let result = self.transport.dispatch(
                    &self.runner,
                    &mut self.media,
                    self.registry.selected(),
                    action,
                );
                if result.is_ok() {
                    self.refresh_selection();
                }
                result
            }
            Intent::SetVolume(level) => self
                .volume
                .set_volume(&self.runner, &mut self.mixer, level)
                .map(|_| ()),
            Intent::AdjustVolume(delta) => self
                .volume
                .adjust_volume(&self.runner, &mut self.mixer, delta)
                .map(|_| ()),
            Intent::ToggleMute => self.volume.toggle_mute(&self.runner, &mut self.mixer),
        };

        self.snapshot.volume = self.volume.last();
        self.snapshot.media_available = self.media.is_available();
        self.snapshot.mixer_available = self.mixer.is_available();
        self.snapshot.status = match result {
            Ok(()) => None,
            Err(ControlError::NoPlayerSelected) => Some("Select a player first".to_string()),
            Err(err) => {
                warn!("{label} failed: {err}");
                Some(format!("{label} failed: {err}"))
            }
        };
    }

    /// Stops the refresh timer for good. Call before tearing down the
    /// display.
    pub fn shutdown(&mut self) {
        if !self.scheduler.is_stopped() {
            info!("shutting down refresh");
            self.scheduler.shutdown();
        }
    }
}

use crate::{
    backend::{self, TransportAction},
    error::ControlError,
    players::PlayerHandle,
    runner::{CommandRunner, Tool},
};
use log::debug;

/// One-shot transport commands for a player.
#[derive(Debug, Clone)]
pub struct TransportController {
    seek_seconds: u32,
}

impl Default for TransportController {
    fn default() -> Self {
        Self::new(backend::DEFAULT_SEEK_SECONDS)
    }
}

impl TransportController {
    pub fn new(seek_seconds: u32) -> Self {
        Self {
            seek_seconds: seek_seconds.max(1),
        }
    }

    pub fn seek_seconds(&self) -> u32 {
        self.seek_seconds
    }

    /// Sends `action` to `handle`. Without a handle nothing is run.
    pub fn dispatch(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
        action: TransportAction,
    ) -> Result<(), ControlError> {
        let Some(handle) = handle else {
            debug!("{} skipped: no player selected", action.label());
            return Err(ControlError::NoPlayerSelected);
        };
        media.output(runner, &backend::transport_args(action, handle))?;
        Ok(())
    }

    pub fn play(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
    ) -> Result<(), ControlError> {
        self.dispatch(runner, media, handle, TransportAction::Play)
    }

    pub fn pause(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
    ) -> Result<(), ControlError> {
        self.dispatch(runner, media, handle, TransportAction::Pause)
    }

    pub fn play_pause(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
    ) -> Result<(), ControlError> {
        self.dispatch(runner, media, handle, TransportAction::PlayPause)
    }

    pub fn next(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
    ) -> Result<(), ControlError> {
        self.dispatch(runner, media, handle, TransportAction::Next)
    }

    pub fn previous(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
    ) -> Result<(), ControlError> {
        self.dispatch(runner, media, handle, TransportAction::Previous)
    }

    /// Seeks forward by `seconds`, or the configured offset when `None`.
    pub fn seek_forward(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
        seconds: Option<u32>,
    ) -> Result<(), ControlError> {
        let seconds = seconds.unwrap_or(self.seek_seconds);
        self.dispatch(runner, media, handle, TransportAction::SeekForward(seconds))
    }

    pub fn seek_backward(
        &self,
        runner: &dyn CommandRunner,
        media: &mut Tool,
        handle: Option<&PlayerHandle>,
        seconds: Option<u32>,
    ) -> Result<(), ControlError> {
        let seconds = seconds.unwrap_or(self.seek_seconds);
        self.dispatch(runner, media, handle, TransportAction::SeekBackward(seconds))
    }
}

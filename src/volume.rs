use crate::{
    backend,
    error::ControlError,
    runner::{CommandRunner, Tool},
};
use log::{debug, warn};
use std::fmt;

pub const MAX_VOLUME: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VolumeLevel {
    Known {
        percent: u8,
        muted: bool,
    },
    #[default]
    Unknown,
}

impl VolumeLevel {
    pub fn percent(self) -> Option<u8> {
        match self {
            VolumeLevel::Known { percent, .. } => Some(percent),
            VolumeLevel::Unknown => None,
        }
    }

    pub fn is_muted(self) -> bool {
        matches!(self, VolumeLevel::Known { muted: true, .. })
    }
}

impl fmt::Display for VolumeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeLevel::Known {
                percent,
                muted: false,
            } => write!(f, "{percent}%"),
            VolumeLevel::Known {
                percent,
                muted: true,
            } => write!(f, "{percent}% (muted)"),
            VolumeLevel::Unknown => f.write_str("--%"),
        }
    }
}

pub fn clamp_percent(level: i32) -> u8 {
    level.clamp(0, i32::from(MAX_VOLUME)) as u8
}

/// Reads the percentage from `pactl get-sink-volume` output, e.g.
/// `Volume: front-left: 42597 /  65% / -11.23 dB, ...`.
pub fn parse_volume(output: &str) -> Result<u8, ControlError> {
    let line = output
        .lines()
        .find(|line| line.contains("Volume:"))
        .ok_or_else(|| ControlError::ParseFailed(output.trim().to_string()))?;
    let field = line
        .split('/')
        .nth(1)
        .ok_or_else(|| ControlError::ParseFailed(line.trim().to_string()))?;
    let digits = field.trim().trim_end_matches('%');
    digits
        .parse::<i32>()
        .map(clamp_percent)
        .map_err(|_| ControlError::ParseFailed(field.trim().to_string()))
}

/// Reads `Mute: yes|no`.
pub fn parse_mute(output: &str) -> Result<bool, ControlError> {
    let value = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Mute:"))
        .map(str::trim)
        .ok_or_else(|| ControlError::ParseFailed(output.trim().to_string()))?;
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(ControlError::ParseFailed(other.to_string())),
    }
}

/// Reads and writes the output volume of one sink, remembering the last
/// value it saw or set.
#[derive(Debug, Clone)]
pub struct VolumeController {
    sink: String,
    last: VolumeLevel,
}

impl VolumeController {
    pub fn new(sink: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            last: VolumeLevel::Unknown,
        }
    }

    pub fn last(&self) -> VolumeLevel {
        self.last
    }

    /// Current level, or `VolumeLevel::Unknown` when the mixer cannot be
    /// read. A mute state that cannot be read counts as unmuted.
    pub fn get_volume(&mut self, runner: &dyn CommandRunner, mixer: &mut Tool) -> VolumeLevel {
        match self.read_level(runner, mixer) {
            Ok(_) => self.last,
            Err(err @ ControlError::ParseFailed(_)) => {
                warn!("could not read volume: {err}");
                VolumeLevel::Unknown
            }
            Err(err) => {
                debug!("volume unavailable: {err}");
                VolumeLevel::Unknown
            }
        }
    }

    /// Reads level and mute into `last`, returning the percent.
    fn read_level(
        &mut self,
        runner: &dyn CommandRunner,
        mixer: &mut Tool,
    ) -> Result<u8, ControlError> {
        let percent = mixer
            .output(runner, &backend::get_volume_args(&self.sink))
            .and_then(|stdout| parse_volume(&stdout));
        let percent = match percent {
            Ok(percent) => percent,
            Err(err) => {
                self.last = VolumeLevel::Unknown;
                return Err(err);
            }
        };
        let muted = match mixer
            .output(runner, &backend::get_mute_args(&self.sink))
            .and_then(|stdout| parse_mute(&stdout))
        {
            Ok(muted) => muted,
            Err(err) => {
                debug!("mute state unavailable: {err}");
                false
            }
        };
        self.last = VolumeLevel::Known { percent, muted };
        Ok(percent)
    }

    /// Sets an absolute level, clamped to 0..=100. Returns the value sent.
    pub fn set_volume(
        &mut self,
        runner: &dyn CommandRunner,
        mixer: &mut Tool,
        level: i32,
    ) -> Result<u8, ControlError> {
        let percent = clamp_percent(level);
        mixer.output(runner, &backend::set_volume_args(&self.sink, percent))?;
        self.last = VolumeLevel::Known {
            percent,
            muted: self.last.is_muted(),
        };
        Ok(percent)
    }

    /// Reads the current level and sets `current + delta` as an absolute
    /// value.
    pub fn adjust_volume(
        &mut self,
        runner: &dyn CommandRunner,
        mixer: &mut Tool,
        delta: i32,
    ) -> Result<u8, ControlError> {
        let current = self.read_level(runner, mixer)?;
        self.set_volume(runner, mixer, i32::from(current).saturating_add(delta))
    }

    pub fn toggle_mute(
        &mut self,
        runner: &dyn CommandRunner,
        mixer: &mut Tool,
    ) -> Result<(), ControlError> {
        mixer.output(runner, &backend::toggle_mute_args(&self.sink))?;
        if let VolumeLevel::Known { percent, muted } = self.last {
            self.last = VolumeLevel::Known {
                percent,
                muted: !muted,
            };
        }
        Ok(())
    }
}

use crate::cli::Args;
use anyhow::Context;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub ui: UiConfig,
    pub backend: BackendConfig,
    pub refresh: RefreshConfig,
    pub controls: ControlsConfig,
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config file found in
    /// the usual places. No file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for path in Self::candidates() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn parse(data: &str) -> anyhow::Result<Self> {
        let doc: ConfigDocument = toml::from_str(data)?;
        Ok(doc.into())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("config.toml"));
            candidates.push(current_dir.join("config").join("mediacontrol.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("config.toml"));
            }
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("mediacontrol").join("config.toml"));
        }

        candidates
    }

    /// Command-line flags win over the file. `--dark` and `--debug` can only
    /// switch a setting on.
    pub fn apply_args(mut self, args: &Args) -> Self {
        self.ui.dark_theme |= args.dark;
        self.ui.debug |= args.debug;
        if let Some(secs) = args.interval {
            self.refresh.interval_secs = secs.max(MIN_INTERVAL_SECS);
        }
        self
    }
}

const MIN_INTERVAL_SECS: u64 = 1;
const MIN_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiConfig {
    pub dark_theme: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub media_tool: String,
    pub mixer_tool: String,
    pub sink: String,
    pub command_timeout_ms: u64,
    pub unavailable_cooldown_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            media_tool: "playerctl".to_string(),
            mixer_tool: "pactl".to_string(),
            sink: "@DEFAULT_SINK@".to_string(),
            command_timeout_ms: 2000,
            unavailable_cooldown_secs: 30,
        }
    }
}

impl BackendConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms.max(MIN_TIMEOUT_MS))
    }

    pub fn unavailable_cooldown(&self) -> Duration {
        Duration::from_secs(self.unavailable_cooldown_secs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub initial_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            initial_delay_ms: 500,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(MIN_INTERVAL_SECS))
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlsConfig {
    pub seek_seconds: u32,
    pub volume_step: u8,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            seek_seconds: 10,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    ui: UiSection,
    #[serde(default)]
    backend: BackendSection,
    #[serde(default)]
    refresh: RefreshSection,
    #[serde(default)]
    controls: ControlsSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let backend_defaults = BackendConfig::default();
        let refresh_defaults = RefreshConfig::default();
        let controls_defaults = ControlsConfig::default();

        let ui = UiConfig {
            dark_theme: value.ui.dark_theme.unwrap_or(false),
            debug: value.ui.debug.unwrap_or(false),
        };

        let backend = BackendConfig {
            media_tool: non_empty(value.backend.media_tool)
                .unwrap_or(backend_defaults.media_tool),
            mixer_tool: non_empty(value.backend.mixer_tool)
                .unwrap_or(backend_defaults.mixer_tool),
            sink: non_empty(value.backend.sink).unwrap_or(backend_defaults.sink),
            command_timeout_ms: value
                .backend
                .command_timeout_ms
                .unwrap_or(backend_defaults.command_timeout_ms)
                .max(MIN_TIMEOUT_MS),
            unavailable_cooldown_secs: value
                .backend
                .unavailable_cooldown_secs
                .unwrap_or(backend_defaults.unavailable_cooldown_secs),
        };

        let refresh = RefreshConfig {
            interval_secs: value
                .refresh
                .interval_secs
                .unwrap_or(refresh_defaults.interval_secs)
                .max(MIN_INTERVAL_SECS),
            initial_delay_ms: value
                .refresh
                .initial_delay_ms
                .unwrap_or(refresh_defaults.initial_delay_ms),
        };

        let controls = ControlsConfig {
            seek_seconds: value
                .controls
                .seek_seconds
                .unwrap_or(controls_defaults.seek_seconds)
                .max(1),
            volume_step: value
                .controls
                .volume_step
                .unwrap_or(controls_defaults.volume_step)
                .clamp(1, 100),
        };

        Config {
            ui,
            backend,
            refresh,
            controls,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct UiSection {
    dark_theme: Option<bool>,
    debug: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendSection {
    media_tool: Option<String>,
    mixer_tool: Option<String>,
    sink: Option<String>,
    command_timeout_ms: Option<u64>,
    unavailable_cooldown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RefreshSection {
    interval_secs: Option<u64>,
    initial_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ControlsSection {
    seek_seconds: Option<u32>,
    volume_step: Option<u8>,
}

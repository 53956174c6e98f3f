use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "mediacontrol",
    about = "Global media and volume control for Linux (playerctl + pactl).",
    version
)]
pub struct Args {
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Use the dark theme")]
    pub dark: bool,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "Log every command that is run")]
    pub debug: bool,

    #[arg(short, long, value_name = "PATH", help = "Read settings from this TOML file")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "SECS", help = "Seconds between refreshes")]
    pub interval: Option<u64>,
}

//! Desktop media and volume control panel for Linux, driving `playerctl`
//! and `pactl`.

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod players;
pub mod runner;
pub mod scheduler;
pub mod theme;
pub mod transport;
pub mod volume;

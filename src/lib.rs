pub mod audio;
pub mod boot;
pub mod cli;
pub mod config;
pub mod router;
pub mod telemetry;
pub mod tui;

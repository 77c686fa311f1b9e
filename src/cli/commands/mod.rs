pub mod config;
pub mod routes;
pub mod snapshot;
pub mod tui;

pub use config::config_command;
pub use routes::routes_command;
pub use snapshot::snapshot_command;
pub use tui::tui_command;

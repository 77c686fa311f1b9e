//! Terminal console: screens, surface board, key mapping and the shell that
//! ties them to the router.

pub mod keys;
pub mod screens;
pub mod shell;
pub mod surfaces;
pub mod theme;

pub use screens::{Screen, ScreenFeed};
pub use shell::{Console, LaunchOptions};
pub use surfaces::SurfaceBoard;
pub use theme::{Theme, ThemeVariant};

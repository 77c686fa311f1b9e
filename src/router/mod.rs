//! Screen router: registry, location synchronization, transition lock and
//! lifecycle sequencing for the console's screens.

pub mod boot;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod hotkey;
pub mod location;
pub mod registry;
pub mod surface;

pub use boot::{BootGate, NoBoot};
pub use descriptor::{HookFuture, RouteDescriptor, RouteHook};
pub use engine::{NavigationState, Router, RouterBuilder, DEFAULT_ROUTE, DEFAULT_TRANSITION};
pub use error::{Navigation, NavigationError, NavigationResult, RouteChange};
pub use hotkey::HotkeyDispatcher;
pub use location::{
    listen, HistoryLocation, LocationEvent, LocationEventKind, LocationEvents, LocationSlot,
    LocationSync,
};
pub use registry::ScreenRegistry;
pub use surface::{SurfaceHost, SurfacePhase};

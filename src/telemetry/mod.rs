//! Synthetic ship data consumed by the screens

pub mod generator;
pub mod status;

pub use generator::{DataSource, SyntheticTelemetry};
pub use status::{
    AlertLevel, CrewMember, CrewStatus, EngineeringStatus, LifeSupport, NavigationStatus,
    PowerStatus, SystemStatus, Thruster,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One pull from the data source: everything the screens display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub timestamp: DateTime<Utc>,
    pub stardate: f64,
    pub alert: AlertLevel,
    /// Percent
    pub hull_integrity: f64,
    pub power: PowerStatus,
    pub life_support: LifeSupport,
    pub navigation: NavigationStatus,
    pub engineering: EngineeringStatus,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Yellow,
    Red,
}

impl AlertLevel {
    /// Worst condition across all subsystems
    pub fn assess(status: &SystemStatus) -> Self {
        let ls = &status.life_support;
        let eng = &status.engineering;

        if status.hull_integrity < 60.0
            || ls.oxygen < 19.5
            || ls.pressure_kpa < 95.0
            || eng.core_temperature_k > 1600.0
        {
            return AlertLevel::Red;
        }

        if ls.co2_ppm > 900.0
            || status.power.reserve < 30.0
            || eng.fuel < 20.0
            || eng.core_temperature_k > 1520.0
            || eng.coolant_flow < 60.0
        {
            return AlertLevel::Yellow;
        }

        AlertLevel::Green
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Green => "CONDITION GREEN",
            AlertLevel::Yellow => "CONDITION YELLOW",
            AlertLevel::Red => "CONDITION RED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerStatus {
    /// Percent of rated output
    pub reactor_output: f64,
    /// Battery reserve, percent
    pub reserve: f64,
    pub draw_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeSupport {
    /// O2 fraction of cabin air, percent
    pub oxygen: f64,
    pub co2_ppm: f64,
    pub pressure_kpa: f64,
    pub temperature_c: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    pub scrubber_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationStatus {
    pub velocity_kms: f64,
    pub heading_deg: f64,
    pub pitch_deg: f64,
    pub destination: String,
    pub distance_au: f64,
    pub eta_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeringStatus {
    pub core_temperature_k: f64,
    /// Percent of nominal coolant flow
    pub coolant_flow: f64,
    /// Percent
    pub fuel: f64,
    pub thrusters: Vec<Thruster>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thruster {
    pub name: String,
    /// Percent
    pub output: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewMember {
    pub name: String,
    pub role: String,
    pub station: String,
    pub status: CrewStatus,
    pub heart_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrewStatus {
    OnDuty,
    OffDuty,
    Resting,
    Medical,
}

impl CrewStatus {
    pub fn label(self) -> &'static str {
        match self {
            CrewStatus::OnDuty => "On duty",
            CrewStatus::OffDuty => "Off duty",
            CrewStatus::Resting => "Resting",
            CrewStatus::Medical => "Medical bay",
        }
    }
}

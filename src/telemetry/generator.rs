//! Synthetic, time-varying ship telemetry.
//!
//! Every reading is a slow sine drift around a nominal value plus a little
//! seeded noise. The same seed and elapsed time always give the same snapshot.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use super::status::{
    AlertLevel, CrewMember, CrewStatus, EngineeringStatus, LifeSupport, NavigationStatus,
    PowerStatus, SystemStatus, Thruster,
};

/// Kilometres per astronomical unit
const KM_PER_AU: f64 = 1.496e8;
const START_DISTANCE_AU: f64 = 4.8;
const NOISE_STEPS_PER_SECOND: f64 = 10.0;

const ROSTER: &[(&str, &str, &str)] = &[
    ("A. Okafor", "Captain", "Bridge"),
    ("L. Marchetti", "First Officer", "Bridge"),
    ("R. Tanaka", "Navigator", "Helm"),
    ("S. Lindqvist", "Chief Engineer", "Engineering"),
    ("M. Haddad", "Medical Officer", "Medical bay"),
    ("J. Novak", "Systems Technician", "Life support"),
];

const DUTY_CYCLE: &[CrewStatus] = &[
    CrewStatus::OnDuty,
    CrewStatus::OnDuty,
    CrewStatus::OffDuty,
    CrewStatus::Resting,
    CrewStatus::OnDuty,
    CrewStatus::Medical,
];

/// Pull source for system snapshots
pub trait DataSource: Send + Sync {
    fn snapshot(&self) -> SystemStatus;
}

pub struct SyntheticTelemetry {
    epoch: Instant,
    seed: u64,
}

impl SyntheticTelemetry {
    /// Random seed when none is given
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            epoch: Instant::now(),
            seed: seed.unwrap_or_else(rand::random),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot_at(&self, elapsed: Duration) -> SystemStatus {
        let t = elapsed.as_secs_f64();
        let mut rng = StdRng::seed_from_u64(
            self.seed ^ ((t * NOISE_STEPS_PER_SECOND) as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        );
        let mut noise = move |scale: f64| rng.gen_range(-1.0_f64..=1.0) * scale;

        let velocity_kms = 34.2 + 1.8 * wave(t, 40.0, 0.0) + noise(0.2);
        let distance_au = (START_DISTANCE_AU - t * velocity_kms / KM_PER_AU).max(0.0);

        let thrusters = ["Port fore", "Starboard fore", "Port aft", "Starboard aft"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let output = percent(70.0 + 15.0 * wave(t, 25.0 + 5.0 * i as f64, i as f64) + noise(2.0));
                Thruster {
                    name: name.to_string(),
                    output,
                    temperature_c: 340.0 + output * 2.0 + noise(3.0),
                }
            })
            .collect();

        let shift = (t / 60.0) as usize;
        let crew = ROSTER
            .iter()
            .enumerate()
            .map(|(i, (name, role, station))| CrewMember {
                name: name.to_string(),
                role: role.to_string(),
                station: station.to_string(),
                status: DUTY_CYCLE[(shift + i) % DUTY_CYCLE.len()],
                heart_rate: (64.0 + 8.0 * wave(t, 20.0 + i as f64, i as f64) + noise(3.0)).round() as u32,
            })
            .collect();

        let mut status = SystemStatus {
            timestamp: Utc::now(),
            stardate: 78_412.6 + t / 86.4,
            alert: AlertLevel::Green,
            hull_integrity: percent(97.0 + 2.0 * wave(t, 300.0, 0.0) + noise(0.5)),
            power: PowerStatus {
                reactor_output: percent(82.0 + 10.0 * wave(t, 45.0, 0.0) + noise(2.0)),
                reserve: percent(64.0 + 6.0 * wave(t, 120.0, 1.0) + noise(1.0)),
                draw_mw: 410.0 + 35.0 * wave(t, 30.0, 0.5) + noise(5.0),
            },
            life_support: LifeSupport {
                oxygen: 20.9 + 0.4 * wave(t, 90.0, 0.0) + noise(0.05),
                co2_ppm: 620.0 + 80.0 * wave(t, 75.0, 2.0) + noise(10.0),
                pressure_kpa: 101.3 + 0.6 * wave(t, 200.0, 0.0) + noise(0.1),
                temperature_c: 21.5 + 1.2 * wave(t, 150.0, 0.3) + noise(0.1),
                humidity: percent(45.0 + 5.0 * wave(t, 110.0, 1.7) + noise(1.0)),
                scrubber_efficiency: percent(93.0 + 4.0 * wave(t, 60.0, 2.5) + noise(1.0)),
            },
            navigation: NavigationStatus {
                velocity_kms,
                heading_deg: (t * 0.5 + 2.0 * wave(t, 55.0, 0.0)).rem_euclid(360.0),
                pitch_deg: 3.0 * wave(t, 70.0, 0.8),
                destination: "Kepler Station".to_string(),
                distance_au,
                eta_hours: distance_au * KM_PER_AU / velocity_kms / 3600.0,
            },
            engineering: EngineeringStatus {
                core_temperature_k: 1450.0 + 80.0 * wave(t, 50.0, 0.0) + noise(6.0),
                coolant_flow: percent(78.0 + 8.0 * wave(t, 35.0, 1.1) + noise(2.0)),
                fuel: percent(72.0 - t / 120.0).max(5.0),
                thrusters,
            },
            crew,
        };
        status.alert = AlertLevel::assess(&status);
        status
    }
}

impl DataSource for SyntheticTelemetry {
    fn snapshot(&self) -> SystemStatus {
        self.snapshot_at(self.epoch.elapsed())
    }
}

fn wave(t: f64, period_secs: f64, phase: f64) -> f64 {
    (t * TAU / period_secs + phase).sin()
}

fn percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

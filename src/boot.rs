//! Scripted boot sequence shown before the first screen.
//!
//! Lines are revealed one per `line_interval`; once all are visible and the
//! hold time has passed the sequence completes on its own. Any key skips it.

use async_trait::async_trait;
use log::info;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::config::BootSettings;
use crate::router::BootGate;

const BOOT_LOG: &[&str] = &[
    "SHIP STATUS CONSOLE v4.2 // COLD START",
    "Checking primary bus ........................ OK",
    "Reactor containment field ................... NOMINAL",
    "Atmospheric processors ...................... ONLINE",
    "Inertial navigation platform ................ ALIGNED",
    "Thruster controllers (4/4) .................. READY",
    "Crew biometric uplink ....................... SYNCED",
    "Telemetry stream ............................ LIVE",
    "All systems green. Handing over to bridge.",
];

struct Progress {
    started: Instant,
    revealed: usize,
}

pub struct BootSequence {
    lines: Vec<String>,
    line_interval: Duration,
    hold: Duration,
    progress: Mutex<Progress>,
    done: watch::Sender<bool>,
}

impl BootSequence {
    pub fn new(lines: Vec<String>, line_interval: Duration, hold: Duration) -> Self {
        let (done, _) = watch::channel(lines.is_empty());
        Self {
            lines,
            line_interval,
            hold,
            progress: Mutex::new(Progress {
                started: Instant::now(),
                revealed: 0,
            }),
            done,
        }
    }

    /// The stock boot log, or an already-completed sequence when boot is disabled
    pub fn from_settings(settings: &BootSettings) -> Self {
        if !settings.enabled {
            return Self::new(Vec::new(), Duration::ZERO, Duration::ZERO);
        }
        Self::new(
            BOOT_LOG.iter().map(|line| line.to_string()).collect(),
            Duration::from_millis(settings.line_interval_ms),
            Duration::from_millis(settings.hold_ms),
        )
    }

    pub fn tick(&self) {
        self.tick_at(Instant::now());
    }

    /// Reveal lines due by `now`, completing the sequence after the hold time
    pub fn tick_at(&self, now: Instant) {
        if self.is_complete() {
            return;
        }

        let finished = {
            let mut progress = self.lock();
            let elapsed = now.saturating_duration_since(progress.started);
            let due = if self.line_interval.is_zero() {
                self.lines.len()
            } else {
                (elapsed.as_millis() / self.line_interval.as_millis()) as usize + 1
            };
            progress.revealed = due.min(self.lines.len());

            let reveal_time = self.line_interval * self.lines.len() as u32;
            progress.revealed == self.lines.len() && elapsed >= reveal_time + self.hold
        };

        if finished {
            self.finish();
        }
    }

    /// Complete the sequence now. Returns false if it had already completed.
    pub fn finish(&self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.lock().revealed = self.lines.len();
        self.done.send_replace(true);
        info!("Boot sequence complete");
        true
    }

    pub fn is_complete(&self) -> bool {
        *self.done.borrow()
    }

    pub fn visible_lines(&self) -> Vec<String> {
        let revealed = self.lock().revealed;
        self.lines[..revealed].to_vec()
    }

    /// Fraction of lines revealed, 0.0 ..= 1.0
    pub fn progress(&self) -> f64 {
        if self.lines.is_empty() {
            return 1.0;
        }
        self.lock().revealed as f64 / self.lines.len() as f64
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BootGate for BootSequence {
    fn is_displayed(&self) -> bool {
        !self.is_complete()
    }

    async fn completed(&self) {
        let mut done = self.done.subscribe();
        // The sender lives as long as `self`, so this only ends on completion
        let _ = done.wait_for(|finished| *finished).await;
    }
}

//! Console audio cues.
//!
//! Audio is a pure side-effect sink: nothing reads back from it, and a muted
//! sink is always a valid choice.

use log::trace;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Boot sequence finished
    Boot,

    /// Screen changed
    Transition,

    /// Hotkey accepted
    Keypress,

    /// Something was recovered (unknown route, failed hook)
    Alert,
}

pub trait AudioSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl AudioSink for Silence {
    fn play(&self, cue: Cue) {
        trace!("Muted cue {:?}", cue);
    }
}

/// Rings the terminal bell for the cues worth hearing
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Number of BEL characters a cue produces
    fn pulses(cue: Cue) -> usize {
        match cue {
            Cue::Keypress => 0,
            Cue::Transition | Cue::Boot => 1,
            Cue::Alert => 2,
        }
    }
}

impl AudioSink for TerminalBell {
    fn play(&self, cue: Cue) {
        let pulses = Self::pulses(cue);
        if !self.enabled || pulses == 0 {
            return;
        }
        trace!("Bell cue {:?}", cue);
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all("\x07".repeat(pulses).as_bytes());
        let _ = stdout.flush();
    }
}

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::router::{SurfaceHost, SurfacePhase};

/// Phase of every screen surface the console can draw.
///
/// Written by the router, read by the render loop each frame.
#[derive(Default)]
pub struct SurfaceBoard {
    phases: Mutex<HashMap<String, SurfacePhase>>,
}

impl SurfaceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a surface. It starts hidden.
    pub fn register(&self, surface_id: impl Into<String>) {
        self.lock().entry(surface_id.into()).or_default();
    }

    pub fn phase(&self, surface_id: &str) -> SurfacePhase {
        self.lock().get(surface_id).copied().unwrap_or_default()
    }

    /// Surfaces currently drawn, with their phases
    pub fn visible(&self) -> Vec<(String, SurfacePhase)> {
        let mut visible: Vec<_> = self
            .lock()
            .iter()
            .filter(|(_, phase)| phase.is_visible())
            .map(|(id, phase)| (id.clone(), *phase))
            .collect();
        visible.sort_by(|a, b| a.0.cmp(&b.0));
        visible
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SurfacePhase>> {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SurfaceHost for SurfaceBoard {
    fn contains(&self, surface_id: &str) -> bool {
        self.lock().contains_key(surface_id)
    }

    fn set_phase(&self, surface_id: &str, phase: SurfacePhase) {
        if let Some(current) = self.lock().get_mut(surface_id) {
            *current = phase;
        }
    }
}

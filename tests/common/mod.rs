//! Shared fixtures for the router integration tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ship_status::router::{LocationSlot, RouteDescriptor, Router, RouterBuilder, SurfaceHost, SurfacePhase};

/// Surface host that remembers every phase change, in order
#[derive(Default)]
pub struct RecordingSurfaces {
    known: Mutex<HashSet<String>>,
    log: Mutex<Vec<(String, SurfacePhase)>>,
}

impl RecordingSurfaces {
    pub fn with(ids: &[&str]) -> Arc<Self> {
        let surfaces = Self::default();
        surfaces
            .known
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| format!("{}-surface", id)));
        Arc::new(surfaces)
    }

    pub fn log(&self) -> Vec<(String, SurfacePhase)> {
        self.log.lock().unwrap().clone()
    }

    /// Last phase written for a surface
    pub fn phase(&self, surface_id: &str) -> SurfacePhase {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| id == surface_id)
            .map(|(_, phase)| *phase)
            .unwrap_or_default()
    }

    /// Surfaces whose last phase is not hidden
    pub fn visible(&self) -> Vec<String> {
        let known: Vec<String> = self.known.lock().unwrap().iter().cloned().collect();
        let mut visible: Vec<String> = known
            .into_iter()
            .filter(|id| self.phase(id).is_visible())
            .collect();
        visible.sort();
        visible
    }
}

impl SurfaceHost for RecordingSurfaces {
    fn contains(&self, surface_id: &str) -> bool {
        self.known.lock().unwrap().contains(surface_id)
    }

    fn set_phase(&self, surface_id: &str, phase: SurfacePhase) {
        self.log.lock().unwrap().push((surface_id.to_string(), phase));
    }
}

/// Location slot that counts reads and writes
#[derive(Default)]
pub struct CountingSlot {
    token: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl CountingSlot {
    pub fn new(initial: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(initial.map(str::to_string)),
            writes: AtomicUsize::new(0),
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

impl LocationSlot for CountingSlot {
    fn read(&self) -> Option<String> {
        self.token()
    }

    fn write(&self, token: &str) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = Some(token.to_string());
    }
}

/// Ordered record of lifecycle hook calls ("enter:crew", "exit:dashboard")
#[derive(Clone, Default)]
pub struct HookJournal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl HookJournal {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Descriptor whose enter and exit hooks write to this journal
    pub fn route(&self, id: &str) -> RouteDescriptor {
        let enter = self.clone();
        let exit = self.clone();
        let enter_label = format!("enter:{}", id);
        let exit_label = format!("exit:{}", id);
        RouteDescriptor::new(id, id.to_uppercase())
            .on_enter(move || {
                let journal = enter.clone();
                let label = enter_label.clone();
                async move {
                    journal.entries.lock().unwrap().push(label);
                    anyhow::Ok(())
                }
            })
            .on_exit(move || {
                let journal = exit.clone();
                let label = exit_label.clone();
                async move {
                    journal.entries.lock().unwrap().push(label);
                    anyhow::Ok(())
                }
            })
    }

    /// Like `route`, but entering takes `delay` so a second navigation can race it
    pub fn slow_route(&self, id: &str, delay: Duration) -> RouteDescriptor {
        let journal = self.clone();
        let label = format!("enter:{}", id);
        RouteDescriptor::new(id, id.to_uppercase()).on_enter(move || {
            let journal = journal.clone();
            let label = label.clone();
            async move {
                tokio::time::sleep(delay).await;
                journal.entries.lock().unwrap().push(label);
                anyhow::Ok(())
            }
        })
    }
}

/// The five console routes, journaled, with F1..F5 hotkeys and no animation delay
pub const ROUTES: &[&str] = &["dashboard", "life-support", "navigation", "engineering", "crew"];

pub fn console_builder(
    surfaces: Arc<RecordingSurfaces>,
    slot: Arc<CountingSlot>,
    journal: &HookJournal,
) -> RouterBuilder {
    let mut builder = Router::builder(surfaces)
        .location(slot)
        .transition(Duration::ZERO);
    for (i, id) in ROUTES.iter().enumerate() {
        builder = builder.route(journal.route(id).hotkey(format!("F{}", i + 1)));
    }
    builder
}

pub struct Harness {
    pub router: Arc<Router>,
    pub surfaces: Arc<RecordingSurfaces>,
    pub slot: Arc<CountingSlot>,
    pub journal: HookJournal,
}

pub fn harness(initial: Option<&str>) -> Harness {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let slot = CountingSlot::new(initial);
    let journal = HookJournal::default();
    let router = console_builder(surfaces.clone(), slot.clone(), &journal).build();
    Harness {
        router,
        surfaces,
        slot,
        journal,
    }
}

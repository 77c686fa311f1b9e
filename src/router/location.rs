//! Location token synchronization.
//!
//! The location slot is the single piece of external state the router mirrors:
//! an address bar holding one route id. An absent or empty token stands for the
//! default route. Deciding *whether* to write belongs to the engine; this module
//! only converts and stores.

use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::engine::Router;
use super::error::{Navigation, NavigationError};

/// External storage for the location token
pub trait LocationSlot: Send + Sync {
    fn read(&self) -> Option<String>;

    fn write(&self, token: &str);
}

/// Converts between location tokens and route ids
pub struct LocationSync {
    slot: Arc<dyn LocationSlot>,
    default_route: String,
}

impl LocationSync {
    pub fn new(slot: Arc<dyn LocationSlot>, default_route: impl Into<String>) -> Self {
        Self {
            slot,
            default_route: default_route.into(),
        }
    }

    /// Normalized token currently in the slot
    pub fn token(&self) -> Option<String> {
        self.slot.read().as_deref().and_then(normalize_token)
    }

    /// Route id for a raw token; absent and empty tokens map to the default route
    pub fn resolve(&self, token: Option<&str>) -> String {
        token
            .and_then(normalize_token)
            .unwrap_or_else(|| self.default_route.clone())
    }

    /// Route id for whatever the slot currently holds
    pub fn current_route(&self) -> String {
        self.resolve(self.slot.read().as_deref())
    }

    /// Literal comparison: an empty slot is not in sync with the default route
    pub fn is_synced(&self, route_id: &str) -> bool {
        self.token().as_deref() == Some(route_id)
    }

    pub fn write(&self, route_id: &str) {
        debug!("Location token -> {}", route_id);
        self.slot.write(route_id);
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }
}

fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    let token = token.strip_prefix('#').unwrap_or(token).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationEventKind {
    /// Written by the router
    Written,

    /// Typed into the address bar
    Edited,

    Back,
    Forward,
}

/// Emitted whenever the slot's token changes, whoever changed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationEvent {
    pub token: Option<String>,
    pub kind: LocationEventKind,
}

/// Receiving end of a slot's change notifications
pub struct LocationEvents {
    rx: mpsc::UnboundedReceiver<LocationEvent>,
}

impl LocationEvents {
    pub async fn recv(&mut self) -> Option<LocationEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<LocationEvent> {
        self.rx.try_recv().ok()
    }
}

struct History {
    entries: Vec<Option<String>>,
    cursor: usize,
}

/// In-memory address bar with a back/forward stack.
///
/// Like a browser fragment, every change fires an event, including the
/// router's own writes. The router's idempotence check is what keeps those
/// echoes from looping.
pub struct HistoryLocation {
    history: Mutex<History>,
    events: mpsc::UnboundedSender<LocationEvent>,
}

impl HistoryLocation {
    pub fn new(initial: Option<String>) -> (Self, LocationEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = initial.as_deref().and_then(normalize_token);
        let location = Self {
            history: Mutex::new(History {
                entries: vec![initial],
                cursor: 0,
            }),
            events: tx,
        };
        (location, LocationEvents { rx })
    }

    /// User edited the address bar
    pub fn edit(&self, token: &str) {
        self.push(normalize_token(token), LocationEventKind::Edited);
    }

    pub fn back(&self) -> bool {
        self.step(-1)
    }

    pub fn forward(&self) -> bool {
        self.step(1)
    }

    pub fn can_go_back(&self) -> bool {
        self.lock().cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let history = self.lock();
        history.cursor + 1 < history.entries.len()
    }

    /// Snapshot of the history stack and the current position in it
    pub fn entries(&self) -> (Vec<Option<String>>, usize) {
        let history = self.lock();
        (history.entries.clone(), history.cursor)
    }

    fn push(&self, token: Option<String>, kind: LocationEventKind) {
        {
            let mut history = self.lock();
            let keep = history.cursor + 1;
            history.entries.truncate(keep);
            history.entries.push(token.clone());
            history.cursor = history.entries.len() - 1;
        }
        self.emit(LocationEvent { token, kind });
    }

    fn step(&self, delta: isize) -> bool {
        let (token, kind) = {
            let mut history = self.lock();
            let Some(target) = history.cursor.checked_add_signed(delta) else {
                return false;
            };
            if target >= history.entries.len() {
                return false;
            }
            history.cursor = target;
            let kind = if delta < 0 {
                LocationEventKind::Back
            } else {
                LocationEventKind::Forward
            };
            (history.entries[target].clone(), kind)
        };
        self.emit(LocationEvent { token, kind });
        true
    }

    fn emit(&self, event: LocationEvent) {
        // Nobody listening is fine, the slot still holds the token
        let _ = self.events.send(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationSlot for HistoryLocation {
    fn read(&self) -> Option<String> {
        let history = self.lock();
        history.entries[history.cursor].clone()
    }

    fn write(&self, token: &str) {
        self.push(normalize_token(token), LocationEventKind::Written);
    }
}

/// Spawn the single listener that turns location changes into navigations.
///
/// Every event becomes an animated navigation to the resolved route. Busy
/// rejections are expected (the router's own writes arrive mid-transition)
/// and are dropped. Events the slot has already moved past are skipped so a
/// late echo cannot pull the router back to an older route.
pub fn listen(router: Arc<Router>, mut events: LocationEvents) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if event.token != router.location_token() {
                debug!("Skipping stale location event {:?}", event);
                continue;
            }
            match router.handle_location_change(event.token.as_deref()).await {
                Ok(Navigation::Changed(change)) => {
                    debug!("Location {:?} moved to '{}'", event.kind, change.current);
                }
                Ok(Navigation::Unchanged(_)) | Err(NavigationError::Busy) => {}
                Err(e) => {
                    warn!("Location change to {:?} failed: {}", event.token, e);
                }
            }
        }
        debug!("Location listener stopped");
    })
}

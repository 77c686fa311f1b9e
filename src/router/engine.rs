use futures::FutureExt;
use log::{debug, error, info, warn};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;
use tokio::sync::broadcast;

use super::boot::{BootGate, NoBoot};
use super::descriptor::{RouteDescriptor, RouteHook};
use super::error::{Navigation, NavigationError, NavigationResult, RouteChange};
use super::hotkey::HotkeyDispatcher;
use super::location::{HistoryLocation, LocationSlot, LocationSync};
use super::registry::ScreenRegistry;
use super::surface::{SurfaceHost, SurfacePhase};
use crate::audio::{AudioSink, Cue, Silence};

pub const DEFAULT_ROUTE: &str = "dashboard";
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

const CHANGE_BUFFER: usize = 32;

/// The router's single mutable record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_route: Option<String>,
    pub transitioning: bool,
}

/// Navigation state plus the descriptor whose surface is currently shown.
/// The descriptor is kept as committed, so re-registering the live route
/// cannot change which surface the next navigation hides.
#[derive(Default)]
struct RouterState {
    nav: NavigationState,
    active: Option<Arc<RouteDescriptor>>,
}

/// Clears the transition flag when dropped, whether the navigation finished,
/// failed, panicked or was cancelled.
struct TransitionGuard<'a> {
    state: &'a Mutex<RouterState>,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .nav
            .transitioning = false;
    }
}

enum Begin {
    Settled(Navigation),
    Transition {
        previous: Option<Arc<RouteDescriptor>>,
        next: Arc<RouteDescriptor>,
    },
}

/// Navigation engine: maps the location token to exactly one active screen.
///
/// Shared as `Arc<Router>` between the shell, the location listener and any
/// screen that wants to navigate. All state changes go through `navigate`.
pub struct Router {
    registry: RwLock<ScreenRegistry>,
    state: Mutex<RouterState>,
    location: LocationSync,
    surfaces: Arc<dyn SurfaceHost>,
    boot: Arc<dyn BootGate>,
    audio: Arc<dyn AudioSink>,
    changes: broadcast::Sender<RouteChange>,
    transition: Duration,
    started: AtomicBool,
}

impl Router {
    pub fn builder(surfaces: Arc<dyn SurfaceHost>) -> RouterBuilder {
        RouterBuilder::new(surfaces)
    }

    /// Add or replace a route. Last write wins.
    pub fn register_route(&self, descriptor: RouteDescriptor) -> Option<Arc<RouteDescriptor>> {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(descriptor)
    }

    pub fn current_route(&self) -> Option<String> {
        self.lock_state().nav.current_route.clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock_state().nav.transitioning
    }

    pub fn state(&self) -> NavigationState {
        self.lock_state().nav.clone()
    }

    pub fn default_route(&self) -> &str {
        self.location.default_route()
    }

    pub fn location_token(&self) -> Option<String> {
        self.location.token()
    }

    pub fn route_ids(&self) -> Vec<String> {
        self.read_registry().ids().map(str::to_string).collect()
    }

    pub fn descriptor(&self, id: &str) -> Option<Arc<RouteDescriptor>> {
        self.read_registry().get(id)
    }

    /// Receive a `RouteChange` for every completed navigation
    pub fn subscribe(&self) -> broadcast::Receiver<RouteChange> {
        self.changes.subscribe()
    }

    /// Route bound to `key`, first registration wins
    pub fn hotkey_target(&self, key: &str) -> Option<String> {
        let registry = self.read_registry();
        HotkeyDispatcher::new(&registry)
            .resolve(key)
            .map(|route| route.id.clone())
    }

    /// (key, route id) pairs in registration order
    pub fn hotkey_bindings(&self) -> Vec<(String, String)> {
        let registry = self.read_registry();
        HotkeyDispatcher::new(&registry)
            .bindings()
            .into_iter()
            .map(|(key, id)| (key.to_string(), id.to_string()))
            .collect()
    }

    /// Navigate to the route bound to `key`. Returns whether the key was handled.
    pub async fn handle_hotkey(&self, key: &str) -> bool {
        let Some(target) = self.hotkey_target(key) else {
            return false;
        };

        self.audio.play(Cue::Keypress);
        match self.navigate(&target, true).await {
            Ok(_) | Err(NavigationError::Busy) => {}
            Err(e) => warn!("Hotkey {} -> '{}' failed: {}", key, target, e),
        }
        true
    }

    /// React to an externally changed location token
    pub async fn handle_location_change(&self, token: Option<&str>) -> NavigationResult {
        let target = self.location.resolve(token);
        self.navigate(&target, true).await
    }

    /// Initial navigation. Held back until the boot gate completes, if it is showing.
    pub async fn start(&self) -> NavigationResult {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Router start requested twice");
            return Err(NavigationError::AlreadyStarted);
        }

        if self.boot.is_displayed() {
            info!("Boot sequence on screen, holding initial navigation");
            self.boot.completed().await;
            let default = self.location.default_route().to_string();
            info!("Boot complete, opening '{}'", default);
            return self.navigate(&default, false).await;
        }

        let initial = self.location.current_route();
        info!("Opening initial route '{}'", initial);
        self.navigate(&initial, false).await
    }

    /// Make `target` the visible route.
    ///
    /// Rejected with `Busy` while another navigation runs. Unknown targets fall
    /// back to the default route; navigating to the current route is a no-op.
    pub async fn navigate(&self, target: &str, animate: bool) -> NavigationResult {
        let (previous, next) = match self.begin(target)? {
            Begin::Settled(navigation) => return Ok(navigation),
            Begin::Transition { previous, next } => (previous, next),
        };

        let _guard = TransitionGuard { state: &self.state };
        self.transition(previous, next, animate).await
    }

    /// Busy check, target resolution, idempotence check and lock acquisition,
    /// all before the first suspension point.
    fn begin(&self, target: &str) -> Result<Begin, NavigationError> {
        let mut fell_back = false;
        let begun = self.begin_locked(target, &mut fell_back);
        // Locks are released by now; the bell writes to the terminal
        if fell_back {
            self.audio.play(Cue::Alert);
        }
        begun
    }

    fn begin_locked(&self, target: &str, fell_back: &mut bool) -> Result<Begin, NavigationError> {
        let mut state = self.lock_state();
        if state.nav.transitioning {
            return Err(NavigationError::Busy);
        }

        let registry = self.read_registry();
        let next = match registry.get(target) {
            Some(route) => route,
            None => {
                let default = self.location.default_route();
                warn!("Unknown route '{}', falling back to '{}'", target, default);
                *fell_back = true;
                registry.get(default).ok_or_else(|| {
                    error!("Default route '{}' is not registered", default);
                    NavigationError::UnknownRoute(target.to_string())
                })?
            }
        };

        if state.nav.current_route.as_deref() == Some(next.id.as_str()) {
            debug!("Already on '{}'", next.id);
            if *fell_back && !self.location.is_synced(&next.id) {
                self.location.write(&next.id);
            }
            return Ok(Begin::Settled(Navigation::Unchanged(next.id.clone())));
        }

        let previous = state.active.clone();
        state.nav.transitioning = true;
        Ok(Begin::Transition { previous, next })
    }

    async fn transition(
        &self,
        previous: Option<Arc<RouteDescriptor>>,
        next: Arc<RouteDescriptor>,
        animate: bool,
    ) -> NavigationResult {
        let previous_id = previous.as_ref().map(|route| route.id.clone());
        info!(
            "Navigating {} -> {}",
            previous_id.as_deref().unwrap_or("<none>"),
            next.id
        );

        // Nothing has run yet, so a missing surface leaves the current route untouched
        if !self.surfaces.contains(&next.surface_id) {
            error!(
                "Route '{}' has no surface '{}', navigation aborted",
                next.id, next.surface_id
            );
            return Err(NavigationError::MissingSurface {
                route: next.id.clone(),
                surface: next.surface_id.clone(),
            });
        }

        if let Some(route) = &previous {
            if let Some(hook) = &route.on_exit {
                self.run_hook(hook, &route.id, "exit").await;
            }
        }

        self.swap_surfaces(previous.as_deref(), &next, animate).await;

        {
            let mut state = self.lock_state();
            state.nav.current_route = Some(next.id.clone());
            state.active = Some(next.clone());
        }

        // Writing an identical token would echo back through the location
        // listener as a fresh navigation request.
        if !self.location.is_synced(&next.id) {
            self.location.write(&next.id);
        }

        if let Some(hook) = &next.on_enter {
            self.run_hook(hook, &next.id, "enter").await;
        }

        let change = RouteChange {
            current: next.id.clone(),
            previous: previous_id,
        };
        // No subscribers is not an error
        let _ = self.changes.send(change.clone());
        self.audio.play(Cue::Transition);

        Ok(Navigation::Changed(change))
    }

    async fn swap_surfaces(
        &self,
        previous: Option<&RouteDescriptor>,
        next: &RouteDescriptor,
        animate: bool,
    ) {
        let half = if animate {
            self.transition / 2
        } else {
            Duration::ZERO
        };

        if let Some(route) = previous {
            if !half.is_zero() {
                self.surfaces.set_phase(&route.surface_id, SurfacePhase::FadingOut);
                tokio::time::sleep(half).await;
            }
            self.surfaces.set_phase(&route.surface_id, SurfacePhase::Hidden);
        }

        if !half.is_zero() {
            self.surfaces.set_phase(&next.surface_id, SurfacePhase::FadingIn);
            tokio::time::sleep(half).await;
        }
        self.surfaces.set_phase(&next.surface_id, SurfacePhase::Active);
    }

    /// Hooks never block navigation: errors and panics are logged and swallowed
    async fn run_hook(&self, hook: &RouteHook, route: &str, stage: &str) {
        match AssertUnwindSafe(async { hook().await }).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("{} hook of '{}' failed: {:#}", stage, route, e);
                self.audio.play(Cue::Alert);
            }
            Err(_) => {
                error!("{} hook of '{}' panicked", stage, route);
                self.audio.play(Cue::Alert);
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, ScreenRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wires a router to its collaborators
pub struct RouterBuilder {
    surfaces: Arc<dyn SurfaceHost>,
    location: Option<Arc<dyn LocationSlot>>,
    boot: Arc<dyn BootGate>,
    audio: Arc<dyn AudioSink>,
    default_route: String,
    transition: Duration,
    routes: Vec<RouteDescriptor>,
}

impl RouterBuilder {
    pub fn new(surfaces: Arc<dyn SurfaceHost>) -> Self {
        Self {
            surfaces,
            location: None,
            boot: Arc::new(NoBoot),
            audio: Arc::new(Silence),
            default_route: DEFAULT_ROUTE.to_string(),
            transition: DEFAULT_TRANSITION,
            routes: Vec::new(),
        }
    }

    pub fn location(mut self, slot: Arc<dyn LocationSlot>) -> Self {
        self.location = Some(slot);
        self
    }

    pub fn boot_gate(mut self, gate: Arc<dyn BootGate>) -> Self {
        self.boot = gate;
        self
    }

    pub fn audio(mut self, sink: Arc<dyn AudioSink>) -> Self {
        self.audio = sink;
        self
    }

    pub fn default_route(mut self, id: impl Into<String>) -> Self {
        self.default_route = id.into();
        self
    }

    /// Total duration of an animated swap, split evenly between fade-out and fade-in
    pub fn transition(mut self, duration: Duration) -> Self {
        self.transition = duration;
        self
    }

    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    pub fn build(self) -> Arc<Router> {
        let slot = match self.location {
            Some(slot) => slot,
            None => {
                // No listener: nothing can change the token from outside
                let (history, _events) = HistoryLocation::new(None);
                Arc::new(history)
            }
        };

        let mut registry = ScreenRegistry::new();
        for route in self.routes {
            registry.register(route);
        }
        if !registry.is_empty() && !registry.contains(&self.default_route) {
            warn!("Default route '{}' is not registered", self.default_route);
        }

        let (changes, _) = broadcast::channel(CHANGE_BUFFER);

        Arc::new(Router {
            registry: RwLock::new(registry),
            state: Mutex::new(RouterState::default()),
            location: LocationSync::new(slot, self.default_route),
            surfaces: self.surfaces,
            boot: self.boot,
            audio: self.audio,
            changes,
            transition: self.transition,
            started: AtomicBool::new(false),
        })
    }
}

use anyhow::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a lifecycle hook
pub type HookFuture = BoxFuture<'static, Result<()>>;

/// Zero-argument lifecycle callback, invoked only by the router
pub type RouteHook = Arc<dyn Fn() -> HookFuture + Send + Sync>;

/// Static description of a navigable screen.
///
/// Built once by the shell during startup and never mutated after registration.
#[derive(Clone)]
pub struct RouteDescriptor {
    /// Unique key, also the location token for this route
    pub id: String,

    /// Surface this route owns exclusively
    pub surface_id: String,

    /// Human readable label for the header
    pub title: String,

    /// Optional single-key trigger (e.g. "F4")
    pub hotkey: Option<String>,

    pub on_enter: Option<RouteHook>,
    pub on_exit: Option<RouteHook>,
}

impl RouteDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            surface_id: format!("{}-surface", id),
            id,
            title: title.into(),
            hotkey: None,
            on_enter: None,
            on_exit: None,
        }
    }

    pub fn surface(mut self, surface_id: impl Into<String>) -> Self {
        self.surface_id = surface_id.into();
        self
    }

    pub fn hotkey(mut self, key: impl Into<String>) -> Self {
        self.hotkey = Some(key.into());
        self
    }

    pub fn on_enter<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_enter = Some(boxed_hook(hook));
        self
    }

    pub fn on_exit<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_exit = Some(boxed_hook(hook));
        self
    }

    pub fn matches_hotkey(&self, key: &str) -> bool {
        self.hotkey.as_deref() == Some(key)
    }
}

fn boxed_hook<F, Fut>(hook: F) -> RouteHook
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move || -> HookFuture { Box::pin(hook()) })
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("id", &self.id)
            .field("surface_id", &self.surface_id)
            .field("title", &self.title)
            .field("hotkey", &self.hotkey)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

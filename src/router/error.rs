use thiserror::Error;

/// A route change that completed, delivered to subscribers and returned from `navigate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub current: String,
    pub previous: Option<String>,
}

/// Outcome of a navigation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The visible screen changed
    Changed(RouteChange),

    /// Target was already current, nothing ran
    Unchanged(String),
}

impl Navigation {
    /// The route that is current after this navigation
    pub fn route(&self) -> &str {
        match self {
            Navigation::Changed(change) => &change.current,
            Navigation::Unchanged(id) => id,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Navigation::Changed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Another navigation holds the transition lock
    #[error("a navigation is already in progress")]
    Busy,

    #[error("route '{0}' is not registered and the default route is unavailable")]
    UnknownRoute(String),

    #[error("route '{route}' has no surface named '{surface}'")]
    MissingSurface { route: String, surface: String },

    #[error("router has already been started")]
    AlreadyStarted,
}

pub type NavigationResult = Result<Navigation, NavigationError>;

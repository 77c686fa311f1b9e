/// Visibility of a route's surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfacePhase {
    #[default]
    Hidden,

    /// First half of an animated swap, outgoing surface
    FadingOut,

    /// Second half of an animated swap, incoming surface
    FadingIn,

    Active,
}

impl SurfacePhase {
    /// Whether the surface should be drawn at all
    pub fn is_visible(self) -> bool {
        !matches!(self, SurfacePhase::Hidden)
    }

    pub fn is_fading(self) -> bool {
        matches!(self, SurfacePhase::FadingOut | SurfacePhase::FadingIn)
    }
}

/// The display regions the router swaps between.
///
/// The router is the only writer of surface phases.
pub trait SurfaceHost: Send + Sync {
    fn contains(&self, surface_id: &str) -> bool;

    fn set_phase(&self, surface_id: &str, phase: SurfacePhase);
}

use async_trait::async_trait;

/// The boot screen as seen by the router.
///
/// While `is_displayed` is true the router performs no automatic navigation;
/// `completed` resolves once boot has finished and is awaited exactly once.
#[async_trait]
pub trait BootGate: Send + Sync {
    fn is_displayed(&self) -> bool;

    async fn completed(&self);
}

/// Gate for hosts without a boot sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoot;

#[async_trait]
impl BootGate for NoBoot {
    fn is_displayed(&self) -> bool {
        false
    }

    async fn completed(&self) {}
}

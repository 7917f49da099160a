//! Automation/notification sink contract.

use async_trait::async_trait;

use crate::events::AutomationEvent;
use crate::result::AppResult;

/// Trait for dispatching automation events.
///
/// Cancellation is observed at the calling worker's suspend points; a
/// sink implementation should make `notify` a single short operation.
#[async_trait]
pub trait AutomationSink: Send + Sync + std::fmt::Debug {
    /// Dispatch one automation event.
    async fn notify(&self, event: &AutomationEvent) -> AppResult<()>;
}

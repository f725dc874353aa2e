//! # Notification Channel Trait
//!
//! Outbound progress events. The orchestrator publishes one event per status
//! transition so clients can follow a submission through the pipeline; the
//! default [`NullChannel`] drops them.

use async_trait::async_trait;

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Publishes `event` (a status name) for `submission_id`. Best-effort;
    /// implementations must not fail the pipeline.
    async fn publish(&self, submission_id: &str, event: &str);
}

/// No-op channel used when no collaborator is interested in progress.
pub struct NullChannel;

#[async_trait]
impl NotificationChannel for NullChannel {
    async fn publish(&self, _submission_id: &str, _event: &str) {}
}

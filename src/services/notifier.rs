//! Notification dispatch collaborator.
//!
//! Best-effort by contract: callers log failures and never let them roll back
//! a booking write that already succeeded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event kinds emitted by the scheduling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingCreated,
    BookingStatusChanged,
    BookingRescheduled,
    GroupSessionScheduled,
    SessionReminder,
}

/// Abstract notification dispatcher (email/push delivery is external).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: Uuid,
        event: NotificationEvent,
        payload: serde_json::Value,
    ) -> anyhow::Result<()>;
}

/// Default dispatcher: structured log lines only. Stands in for the real
/// delivery pipeline in development and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(
        &self,
        recipient: Uuid,
        event: NotificationEvent,
        payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        tracing::info!(%recipient, ?event, %payload, "notification dispatched");
        Ok(())
    }
}

/// Dispatch a notification, swallowing and logging any failure.
pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    recipient: Uuid,
    event: NotificationEvent,
    payload: serde_json::Value,
) {
    if let Err(e) = notifier.notify(recipient, event, payload).await {
        tracing::warn!(%recipient, ?event, error = %e, "notification dispatch failed");
    }
}

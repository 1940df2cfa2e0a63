//! Confirmed bulk delete of the selected rows
//!
//! Every delete goes through a blocking confirmation, runs at most once at a
//! time and reports its result through a notifier. Errors from the delete
//! operation become a [`BulkDeleteOutcome::Failure`]; they are never
//! propagated to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use backoffice_core::DeleteOperation;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkDeletePhase {
    #[default]
    Idle,
    ConfirmPending,
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    /// Nothing was selected
    Skipped,
    /// Another delete is already running
    Busy,
    /// The user declined the confirmation
    Cancelled,
    Success { count: usize },
    Failure { error: String },
}

/// Contents of the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub count: usize,
    pub title: String,
    pub message: String,
    pub detail: String,
}

impl ConfirmRequest {
    pub fn for_count(count: usize) -> Self {
        let noun = if count == 1 { "item" } else { "items" };
        Self {
            count,
            title: "Delete Selected Items".to_string(),
            message: format!("Are you sure you want to delete {} {}?", count, noun),
            detail: "This action cannot be undone.".to_string(),
        }
    }
}

/// Asks the user to confirm a destructive action
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Shows toast-style notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!("{}", notification.message),
            NotificationLevel::Error => tracing::error!("{}", notification.message),
        }
    }
}

pub struct BulkDeleteCoordinator {
    confirmer: Arc<dyn Confirmer>,
    notifier: Arc<dyn Notifier>,
    phase: Mutex<BulkDeletePhase>,
}

impl BulkDeleteCoordinator {
    pub fn new(confirmer: Arc<dyn Confirmer>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            confirmer,
            notifier,
            phase: Mutex::new(BulkDeletePhase::Idle),
        }
    }

    pub fn phase(&self) -> BulkDeletePhase {
        *self.phase.lock()
    }

    /// Whether the bulk delete button is enabled for `selected` rows
    pub fn can_trigger(&self, selected: usize) -> bool {
        selected > 0 && self.phase() == BulkDeletePhase::Idle
    }

    /// Confirm, then delete `ids`. `on_success` runs only after the delete
    /// operation succeeded and is where the caller clears its selection.
    #[tracing::instrument(skip_all, fields(count = ids.len()))]
    pub async fn execute<F>(
        &self,
        ids: Vec<String>,
        operation: &dyn DeleteOperation,
        on_success: F,
    ) -> BulkDeleteOutcome
    where
        F: FnOnce(&[String]) + Send,
    {
        if ids.is_empty() {
            return BulkDeleteOutcome::Skipped;
        }

        let _guard = match PhaseGuard::enter(&self.phase) {
            Some(guard) => guard,
            None => {
                tracing::debug!("bulk delete already running");
                return BulkDeleteOutcome::Busy;
            }
        };

        let count = ids.len();
        let noun = if count == 1 { "item" } else { "items" };
        let request = ConfirmRequest::for_count(count);
        if !self.confirmer.confirm(&request).await {
            tracing::debug!("bulk delete cancelled");
            return BulkDeleteOutcome::Cancelled;
        }

        *self.phase.lock() = BulkDeletePhase::InFlight;
        match operation.delete(&ids).await {
            Ok(()) => {
                on_success(&ids);
                self.notifier
                    .notify(Notification::success(format!("Deleted {} {}", count, noun)));
                BulkDeleteOutcome::Success { count }
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(error = %error, "bulk delete failed");
                self.notifier.notify(Notification::error(format!(
                    "Failed to delete {} {}: {}",
                    count, noun, error
                )));
                BulkDeleteOutcome::Failure { error }
            }
        }
    }
}

/// Claims the coordinator for one run and returns it to `Idle` on drop, also
/// when the future is dropped mid-way.
struct PhaseGuard<'a> {
    phase: &'a Mutex<BulkDeletePhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Mutex<BulkDeletePhase>) -> Option<Self> {
        let mut current = phase.lock();
        if *current != BulkDeletePhase::Idle {
            return None;
        }
        *current = BulkDeletePhase::ConfirmPending;
        Some(Self { phase })
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = BulkDeletePhase::Idle;
    }
}

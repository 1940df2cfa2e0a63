//! Common test utilities and mocks

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use backoffice_core::{
    BackofficeError, DeleteOperation, Entity, Record, Result, SearchDelegate,
};
use backoffice_table::{ConfirmRequest, Confirmer, Notification, Notifier};
use tokio::sync::oneshot;

/// `count` service orders `e1..=e{count}`
pub fn service_orders(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            Record::new(format!("e{}", i))
                .with_field("client", format!("Client {}", i))
                .with_field("status", if i % 3 == 0 { "done" } else { "open" })
                .with_field("amount", (i * 100) as i64)
        })
        .collect()
}

/// Let spawned tasks run and paused timers elapse
pub async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Mock server search over a fixed dataset.
///
/// Matches `client` case-insensitively. Individual queries can be held back
/// until the test releases them, to force out-of-order responses.
pub struct MockSearch {
    pub data: Vec<Record>,
    pub should_fail: bool,
    /// Log of all queries received, for assertion in tests
    pub query_log: Arc<parking_lot::Mutex<Vec<String>>>,
    gates: parking_lot::Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl MockSearch {
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            data,
            should_fail: false,
            query_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            gates: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Block responses for `query` until the returned sender fires
    pub fn hold(&self, query: impl Into<String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(query.into(), rx);
        tx
    }

    pub fn query_log(&self) -> Vec<String> {
        self.query_log.lock().clone()
    }
}

#[async_trait]
impl SearchDelegate<Record> for MockSearch {
    async fn search(&self, query: &str) -> Result<Vec<Record>> {
        self.query_log.lock().push(query.to_string());

        let gate = self.gates.lock().remove(query);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.should_fail {
            return Err(BackofficeError::Search("search backend unavailable".into()));
        }

        let needle = query.to_lowercase();
        Ok(self
            .data
            .iter()
            .filter(|r| {
                r.field("client")
                    .and_then(|v| v.search_text())
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

/// Mock delete operation recording every batch it receives
#[derive(Default)]
pub struct MockDelete {
    pub should_fail: bool,
    pub calls: Arc<parking_lot::Mutex<Vec<Vec<String>>>>,
}

impl MockDelete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DeleteOperation for MockDelete {
    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.calls.lock().push(ids.to_vec());
        if self.should_fail {
            return Err(BackofficeError::Delete("constraint violation".into()));
        }
        Ok(())
    }
}

/// Confirmer answering with a fixed choice, optionally after a delay
pub struct MockConfirmer {
    pub answer: bool,
    pub delay: Option<Duration>,
    pub requests: Arc<parking_lot::Mutex<Vec<ConfirmRequest>>>,
}

impl MockConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            delay: None,
            requests: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::accepting()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ConfirmRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Confirmer for MockConfirmer {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer
    }
}

/// Notifier collecting notifications for assertion
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: parking_lot::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

//! Async adapter around [`TableState`]
//!
//! The controller owns the state behind a mutex, runs the debounce timer and
//! the server search calls on the Tokio runtime, and forwards every reducer
//! event to an unbounded channel for the host to consume. The lock is never
//! held across an `.await`.

use std::sync::{Arc, Weak};

use backoffice_core::{DeleteOperation, Entity, SearchDelegate};
use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};

use crate::{BulkDeleteCoordinator, BulkDeleteOutcome, TableAction, TableEvent, TableState, TableView};

pub struct TableController<E: Entity> {
    inner: Arc<Inner<E>>,
}

impl<E: Entity> Clone for TableController<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<E: Entity> {
    state: Mutex<TableState<E>>,
    search: Option<Arc<dyn SearchDelegate<E>>>,
    /// Pending debounce timer; replacing it aborts the previous one
    debounce_task: Mutex<Option<JoinHandle<()>>>,
    events: mpsc::UnboundedSender<TableEvent>,
}

impl<E: Entity> TableController<E> {
    /// Wrap `state`. Passing a search delegate switches non-empty queries to
    /// server search. Returns the receiving end of the event stream.
    pub fn new(
        mut state: TableState<E>,
        search: Option<Arc<dyn SearchDelegate<E>>>,
    ) -> (Self, mpsc::UnboundedReceiver<TableEvent>) {
        state.set_server_search(search.is_some());
        let (events, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            state: Mutex::new(state),
            search,
            debounce_task: Mutex::new(None),
            events,
        });
        (Self { inner }, receiver)
    }

    /// Feed an action through the reducer.
    ///
    /// The debounce timer and server searches run on the current Tokio
    /// runtime. Outside a runtime the search text applies immediately, without
    /// a debounce window, and server searches fail like a delegate error would,
    /// keeping the previous rows.
    pub fn dispatch(&self, action: TableAction<E>) {
        self.inner.dispatch(action);
    }

    /// Run `f` against the current state
    pub fn read<R>(&self, f: impl FnOnce(&TableState<E>) -> R) -> R {
        f(&self.inner.state.lock())
    }

    pub fn view(&self) -> TableView<E> {
        self.read(|state| state.view())
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.read(|state| state.selection().selected_ids())
    }

    /// Bulk delete the current selection; the selection is cleared only when
    /// the delete succeeded.
    pub async fn delete_selected(
        &self,
        coordinator: &BulkDeleteCoordinator,
        operation: &dyn DeleteOperation,
    ) -> BulkDeleteOutcome {
        let ids = self.selected_ids();
        coordinator
            .execute(ids, operation, |_| self.dispatch(TableAction::ClearSelection))
            .await
    }
}

impl<E: Entity> Inner<E> {
    fn dispatch(self: &Arc<Self>, action: TableAction<E>) {
        let events = self.state.lock().reduce(action);
        for event in events {
            // A closed receiver only means nobody is listening
            let _ = self.events.send(event.clone());
            match event {
                TableEvent::SearchScheduled { query } => self.schedule_search(query),
                TableEvent::SearchRequested { seq, query } => self.run_search(seq, query),
                _ => {}
            }
        }
    }

    fn schedule_search(self: &Arc<Self>, query: String) {
        let mut slot = self.debounce_task.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let Ok(handle) = Handle::try_current() else {
            drop(slot);
            tracing::debug!("no Tokio runtime, applying search text without debounce");
            self.dispatch(TableAction::DebounceElapsed(query));
            return;
        };

        let delay = self.state.lock().config().search_debounce;
        let weak: Weak<Self> = Arc::downgrade(self);
        *slot = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(TableAction::DebounceElapsed(query));
            }
        }));
    }

    fn run_search(self: &Arc<Self>, seq: u64, query: String) {
        let Some(delegate) = self.search.clone() else {
            return;
        };
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(seq, "no Tokio runtime, server search not started");
            self.dispatch(TableAction::ServerSearchCompleted {
                seq,
                result: Err("no Tokio runtime".to_string()),
            });
            return;
        };

        let weak = Arc::downgrade(self);
        handle.spawn(async move {
            let result = delegate.search(&query).await.map_err(|e| e.to_string());
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(TableAction::ServerSearchCompleted { seq, result });
            }
        });
    }
}

impl<E: Entity> Drop for Inner<E> {
    fn drop(&mut self) {
        if let Some(task) = self.debounce_task.get_mut().take() {
            task.abort();
        }
    }
}

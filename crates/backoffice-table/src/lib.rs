//! Backoffice Table - List screen orchestration
//!
//! This crate holds everything a back-office list screen does between the data
//! layer and the renderer: search, categorical filtering, sorting, pagination,
//! selection, optimistic row styling and bulk delete.
//!
//! # Architecture
//!
//! ```text
//! Host (renderer, data-fetching layer)
//!     ↓ actions            ↑ events
//! TableController  ← debounce timer, server search tasks
//!     ↓
//! TableState::reduce  ← filter → sort → paginate, selection
//!     ↓
//! backoffice-core (Entity, SearchDelegate, DeleteOperation)
//! ```
//!
//! # Modules
//!
//! - [`EntityFilter`] - Free-text search and categorical filter
//! - [`sort_rows`] / [`PaginationState`] - Stable single-column sort and paging
//! - [`RowSelection`] - Selection keyed by entity id
//! - [`resolve_row_presentation`] - Row style for optimistic entities
//! - [`BulkDeleteCoordinator`] - Confirmed, single-flight bulk delete
//! - [`TableState`] - Reducer owning the whole table state
//! - [`TableController`] - Tokio adapter around the reducer

mod bulk_delete;
mod controller;
mod filter;
mod overlay;
mod pagination;
mod selection;
mod sort;
mod state;

pub use bulk_delete::{
    BulkDeleteCoordinator, BulkDeleteOutcome, BulkDeletePhase, ConfirmRequest, Confirmer,
    Notification, NotificationLevel, Notifier, TracingNotifier,
};
pub use controller::TableController;
pub use filter::{ALL_FILTER_VALUE, CategoryFilter, EntityFilter, FilterOption, FilterPredicate};
pub use overlay::{RowPresentation, RowStyle, resolve_row_presentation};
pub use pagination::{PageNavigation, PaginationMode, PaginationState};
pub use selection::{HeaderCheckState, RowSelection};
pub use sort::{ColumnSort, SortDirection, SortSpec, column_sort, sort_rows, toggle_sort};
pub use state::{
    DEFAULT_SEARCH_DEBOUNCE, TableAction, TableConfig, TableEvent, TableEvents, TableState,
    TableView, ViewRow,
};

//! Table state and its reducer
//!
//! [`TableState`] owns everything a list screen tracks: the collection, the
//! search text and its debounced copy, the categorical filter, the sort,
//! pagination, selection and the latest server search results. Every change
//! goes through [`TableState::reduce`], which mutates the state and returns
//! the events the caller has to act on. The reducer never blocks, sleeps or
//! spawns; timers and server calls belong to
//! [`TableController`](crate::TableController).

use std::{collections::HashMap, time::Duration};

use backoffice_core::Entity;
use smallvec::SmallVec;

use crate::{
    CategoryFilter, ColumnSort, EntityFilter, HeaderCheckState, PageNavigation, PaginationMode,
    PaginationState, RowPresentation, RowSelection, SortSpec, column_sort,
    resolve_row_presentation, sort_rows, toggle_sort,
};

/// Default delay between the last keystroke and the search it triggers
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Static configuration of one table
pub struct TableConfig<E> {
    pub filter: EntityFilter<E>,
    /// A server search delegate is configured; non-empty queries bypass
    /// local text matching
    pub server_search: bool,
    /// Who slices pages. Under [`PaginationMode::Delegated`] the caller owns
    /// pagination and syncs it back; this is the only place the mode is set.
    pub pagination: PaginationMode,
    /// The categorical filter is owned by the caller, who syncs it back
    pub remote_filter: bool,
    pub search_debounce: Duration,
}

impl<E> Clone for TableConfig<E> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            server_search: self.server_search,
            pagination: self.pagination,
            remote_filter: self.remote_filter,
            search_debounce: self.search_debounce,
        }
    }
}

impl<E> Default for TableConfig<E> {
    fn default() -> Self {
        Self {
            filter: EntityFilter::default(),
            server_search: false,
            pagination: PaginationMode::Local,
            remote_filter: false,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl<E: Entity> TableConfig<E> {
    pub fn new(filter: EntityFilter<E>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn with_remote_pagination(mut self, remote: bool) -> Self {
        self.pagination = if remote {
            PaginationMode::Delegated
        } else {
            PaginationMode::Local
        };
        self
    }

    pub fn remote_pagination(&self) -> bool {
        self.pagination == PaginationMode::Delegated
    }

    pub fn with_remote_filter(mut self, remote: bool) -> Self {
        self.remote_filter = remote;
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }
}

/// Input to the reducer
#[derive(Debug, Clone)]
pub enum TableAction<E> {
    /// Replace the collection (initial load, refetch, optimistic write)
    SetRows(Vec<E>),
    /// A keystroke in the search box
    SetSearchText(String),
    /// The debounce timer for this text fired
    DebounceElapsed(String),
    ServerSearchCompleted {
        seq: u64,
        result: Result<Vec<E>, String>,
    },
    /// The user picked a filter option
    SetFilter(CategoryFilter),
    /// The caller reports the filter it owns
    SyncFilter(CategoryFilter),
    ToggleSort(String),
    ClearSort,
    NavigatePage(PageNavigation),
    SetPageSize(usize),
    CyclePageSize { larger: bool },
    /// The caller reports the pagination it owns. `total_rows` is ignored
    /// unless pagination is delegated.
    SyncPagination {
        page_index: usize,
        page_size: usize,
        total_rows: Option<usize>,
    },
    /// Toggle the checkbox of a row on the current page
    ToggleRow(usize),
    /// Toggle every row of the filtered view
    ToggleAll,
    ClearSelection,
    /// A click on a row of the current page
    ClickRow(usize),
    NewItem,
}

/// Output of the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// Start (or restart) the debounce timer for `query`
    SearchScheduled { query: String },
    /// Call the server search delegate; tag the response with `seq`
    SearchRequested { seq: u64, query: String },
    NewItem,
    EditItem(String),
    PageChanged(usize),
    PageSizeChanged(usize),
    FilterChanged(CategoryFilter),
}

pub type TableEvents = SmallVec<[TableEvent; 2]>;

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow<E> {
    pub entity: E,
    pub presentation: RowPresentation,
    pub selected: bool,
}

/// Snapshot of what the table renders
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<E> {
    pub rows: Vec<ViewRow<E>>,
    /// Rows matching search and filter, across all pages
    pub match_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub status_text: String,
    pub is_searching: bool,
    pub header_check: HeaderCheckState,
    pub selected_count: usize,
    pub sort: Option<SortSpec>,
    pub pagination_mode: PaginationMode,
}

impl<E: Entity> TableView<E> {
    pub fn ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.entity.id().to_string()).collect()
    }

    /// Sort indicator for a column header
    pub fn column_sort(&self, column: &str) -> ColumnSort {
        column_sort(self.sort.as_ref(), column)
    }
}

pub struct TableState<E> {
    config: TableConfig<E>,
    rows: Vec<E>,
    search_text: String,
    debounced_search: String,
    filter: CategoryFilter,
    sort: Option<SortSpec>,
    pagination: PaginationState,
    selection: RowSelection,
    server_results: Option<Vec<E>>,
    search_seq: u64,
    search_loading: bool,
}

impl<E: Entity> TableState<E> {
    pub fn new(config: TableConfig<E>) -> Self {
        Self {
            config,
            rows: Vec::new(),
            search_text: String::new(),
            debounced_search: String::new(),
            filter: CategoryFilter::All,
            sort: None,
            pagination: PaginationState::default(),
            selection: RowSelection::new(),
            server_results: None,
            search_seq: 0,
            search_loading: false,
        }
    }

    pub fn with_rows(mut self, rows: Vec<E>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = pagination;
        if !self.config.remote_pagination() {
            self.pagination.total_rows = None;
        }
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn config(&self) -> &TableConfig<E> {
        &self.config
    }

    pub(crate) fn set_server_search(&mut self, enabled: bool) {
        self.config.server_search = enabled;
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn debounced_search(&self) -> &str {
        &self.debounced_search
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn search_seq(&self) -> u64 {
        self.search_seq
    }

    pub fn is_searching(&self) -> bool {
        self.search_loading
    }

    fn server_query_active(&self) -> bool {
        self.config.server_search && !self.debounced_search.trim().is_empty()
    }

    /// Search and filter applied, sorted, not paginated
    pub fn filtered_rows(&self) -> Vec<&E> {
        let (base, query) = if self.server_query_active() {
            // Until the first response arrives the previous collection stays
            let base = self.server_results.as_deref().unwrap_or(&self.rows);
            (base, None)
        } else {
            (self.rows.as_slice(), Some(self.debounced_search.as_str()))
        };

        let mut rows = self.config.filter.apply(base, query, &self.filter);
        sort_rows(&mut rows, self.sort.as_ref());
        rows
    }

    /// Rows of the current page. With delegated pagination the collection
    /// already is the page.
    pub fn page_rows(&self) -> Vec<&E> {
        let mut rows = self.filtered_rows();
        if !self.config.remote_pagination() {
            let range = self.pagination.page_range(rows.len());
            rows.truncate(range.end);
            rows.drain(..range.start);
        }
        rows
    }

    fn match_total(&self, filtered: usize) -> usize {
        match self.config.pagination {
            PaginationMode::Delegated => self.pagination.effective_total(filtered),
            PaginationMode::Local => filtered,
        }
    }

    pub fn view(&self) -> TableView<E> {
        let filtered = self.filtered_rows();
        let total = self.match_total(filtered.len());
        let page = self.page_rows();

        let rows = page
            .iter()
            .map(|entity| ViewRow {
                entity: (*entity).clone(),
                presentation: resolve_row_presentation(*entity),
                selected: self.selection.is_selected(entity.id()),
            })
            .collect::<Vec<_>>();

        TableView {
            match_count: total,
            page_index: self.pagination.page_index,
            page_size: self.pagination.page_size,
            total_pages: self.pagination.total_pages(total),
            can_go_prev: self.pagination.can_go_prev(),
            can_go_next: self.pagination.can_go_next(total),
            status_text: self.pagination.status_text(rows.len(), total),
            is_searching: self.search_loading,
            header_check: self.selection.header_state(&filtered),
            selected_count: self.selection.len(),
            sort: self.sort.clone(),
            pagination_mode: self.config.pagination,
            rows,
        }
    }

    /// Apply `action` and return the events it produced
    pub fn reduce(&mut self, action: TableAction<E>) -> TableEvents {
        let mut events = TableEvents::new();
        match action {
            TableAction::SetRows(rows) => {
                tracing::debug!(count = rows.len(), "rows replaced");
                self.rows = rows;
                self.refresh_server_results();
                self.retain_selection();
            }
            TableAction::SetSearchText(text) => {
                if text == self.search_text {
                    return events;
                }
                self.search_text = text.clone();
                self.reset_page(&mut events);
                self.selection.clear();
                events.push(TableEvent::SearchScheduled { query: text });
            }
            TableAction::DebounceElapsed(text) => {
                if text != self.search_text || text == self.debounced_search {
                    return events;
                }
                self.debounced_search = text;
                self.search_seq += 1;
                if self.server_query_active() {
                    self.search_loading = true;
                    tracing::debug!(seq = self.search_seq, query = %self.debounced_search, "server search requested");
                    events.push(TableEvent::SearchRequested {
                        seq: self.search_seq,
                        query: self.debounced_search.clone(),
                    });
                } else {
                    self.server_results = None;
                    self.search_loading = false;
                }
            }
            TableAction::ServerSearchCompleted { seq, result } => {
                if seq != self.search_seq {
                    tracing::debug!(seq, latest = self.search_seq, "stale search response dropped");
                    return events;
                }
                self.search_loading = false;
                match result {
                    Ok(results) => {
                        tracing::debug!(seq, count = results.len(), "server search completed");
                        self.server_results = Some(results);
                        self.retain_selection();
                    }
                    Err(error) => {
                        tracing::warn!(seq, error = %error, "server search failed, keeping previous results");
                    }
                }
            }
            TableAction::SetFilter(filter) => {
                if filter == self.filter {
                    return events;
                }
                if !self.config.remote_filter {
                    self.apply_filter(filter.clone(), &mut events);
                }
                events.push(TableEvent::FilterChanged(filter));
            }
            TableAction::SyncFilter(filter) => {
                if filter != self.filter {
                    self.apply_filter(filter, &mut events);
                }
            }
            TableAction::ToggleSort(column) => {
                self.sort = toggle_sort(self.sort.as_ref(), &column);
                tracing::debug!(column = %column, sort = ?self.sort, "sort toggled");
            }
            TableAction::ClearSort => {
                self.sort = None;
            }
            TableAction::NavigatePage(nav) => {
                let total = self.match_total(self.filtered_rows().len());
                let target = match self.config.pagination {
                    PaginationMode::Local => self.pagination.navigate(nav, total),
                    PaginationMode::Delegated => self.pagination.target_page(nav, total),
                };
                if let Some(target) = target {
                    events.push(TableEvent::PageChanged(target));
                }
            }
            TableAction::SetPageSize(size) => self.change_page_size(size, &mut events),
            TableAction::CyclePageSize { larger } => {
                if let Some(size) = self.pagination.adjacent_page_size(larger) {
                    self.change_page_size(size, &mut events);
                }
            }
            TableAction::SyncPagination {
                page_index,
                page_size,
                total_rows,
            } => {
                if page_size == 0 {
                    tracing::warn!("ignoring synced page size of 0");
                } else {
                    self.pagination.page_size = page_size;
                }
                self.pagination.page_index = page_index;
                match self.config.pagination {
                    PaginationMode::Delegated => self.pagination.total_rows = total_rows,
                    PaginationMode::Local => {
                        if let Some(total) = total_rows {
                            tracing::warn!(total, "ignoring synced total under local pagination");
                        }
                    }
                }
            }
            TableAction::ToggleRow(index) => {
                let mut selection = std::mem::take(&mut self.selection);
                if selection.toggle_row(index, &self.page_rows()).is_none() {
                    tracing::debug!(index, "toggle for a row outside the page ignored");
                }
                self.selection = selection;
            }
            TableAction::ToggleAll => {
                let mut selection = std::mem::take(&mut self.selection);
                selection.toggle_all(&self.filtered_rows());
                self.selection = selection;
            }
            TableAction::ClearSelection => self.selection.clear(),
            TableAction::ClickRow(index) => {
                let page = self.page_rows();
                let Some(entity) = page.get(index) else {
                    return events;
                };
                if resolve_row_presentation(*entity).clickable {
                    events.push(TableEvent::EditItem(entity.id().to_string()));
                } else {
                    tracing::debug!(id = entity.id(), "click on a pending row ignored");
                }
            }
            TableAction::NewItem => events.push(TableEvent::NewItem),
        }
        events
    }

    fn reset_page(&mut self, events: &mut TableEvents) {
        if self.pagination.page_index == 0 {
            return;
        }
        if self.config.remote_pagination() {
            events.push(TableEvent::PageChanged(0));
        } else {
            self.pagination.page_index = 0;
        }
    }

    fn apply_filter(&mut self, filter: CategoryFilter, events: &mut TableEvents) {
        tracing::debug!(filter = filter.as_value(), "filter changed");
        self.filter = filter;
        self.reset_page(events);
        self.selection.clear();
    }

    fn change_page_size(&mut self, size: usize, events: &mut TableEvents) {
        if size == 0 {
            tracing::warn!("ignoring page size of 0");
            return;
        }
        if size == self.pagination.page_size {
            return;
        }
        if !self.config.remote_pagination() {
            self.pagination.set_page_size(size);
        }
        events.push(TableEvent::PageSizeChanged(size));
    }

    fn retain_selection(&mut self) {
        let server = self.server_results.as_deref().unwrap_or(&[]);
        let ids = self.rows.iter().chain(server).map(|e| e.id());
        self.selection.retain_existing(ids);
    }

    /// Swap the displayed server results for their fresh copies in `rows`.
    /// Results whose id left the collection are dropped.
    fn refresh_server_results(&mut self) {
        let Some(results) = self.server_results.take() else {
            return;
        };
        let fresh: HashMap<&str, &E> = self.rows.iter().map(|e| (e.id(), e)).collect();
        let refreshed: Vec<E> = results
            .iter()
            .filter_map(|stale| fresh.get(stale.id()).map(|e| (*e).clone()))
            .collect();
        if refreshed.len() != results.len() {
            tracing::debug!(
                dropped = results.len() - refreshed.len(),
                "server results no longer in the collection"
            );
        }
        self.server_results = Some(refreshed);
    }
}

//! Text search and categorical filtering over an in-memory collection
//!
//! A row is kept when it matches the free-text query AND the categorical
//! filter. With no search keys configured the text step is a no-op: every
//! row matches every query.

use std::sync::Arc;

use backoffice_core::Entity;
use serde::{Deserialize, Serialize};

/// Sentinel value of the "show everything" filter option
pub const ALL_FILTER_VALUE: &str = "all";

/// One selectable category in a filter dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The "all" option, shown first in every dropdown
    pub fn all(label: impl Into<String>) -> Self {
        Self::new(ALL_FILTER_VALUE, label)
    }
}

/// The currently applied categorical filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Value(String),
}

impl CategoryFilter {
    /// Build from a dropdown value, mapping the sentinel to [`CategoryFilter::All`]
    pub fn from_value(value: &str) -> Self {
        if value == ALL_FILTER_VALUE {
            Self::All
        } else {
            Self::Value(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Self::All => ALL_FILTER_VALUE,
            Self::Value(v) => v,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&FilterOption> for CategoryFilter {
    fn from(option: &FilterOption) -> Self {
        Self::from_value(&option.value)
    }
}

/// Caller-supplied category test: `(entity, filter value) -> keep`
pub type FilterPredicate<E> = Arc<dyn Fn(&E, &str) -> bool + Send + Sync>;

/// Search and filter configuration for one table
pub struct EntityFilter<E> {
    search_keys: Vec<String>,
    filter_key: Option<String>,
    predicate: Option<FilterPredicate<E>>,
}

impl<E> Clone for EntityFilter<E> {
    fn clone(&self) -> Self {
        Self {
            search_keys: self.search_keys.clone(),
            filter_key: self.filter_key.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<E> Default for EntityFilter<E> {
    fn default() -> Self {
        Self {
            search_keys: Vec::new(),
            filter_key: None,
            predicate: None,
        }
    }
}

impl<E: Entity> EntityFilter<E> {
    /// Create a filter searching the given fields
    pub fn new<S: Into<String>>(search_keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            search_keys: search_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Compare the filter value for equality against this field
    pub fn with_filter_key(mut self, key: impl Into<String>) -> Self {
        self.filter_key = Some(key.into());
        self
    }

    /// Evaluate the filter value through a custom predicate.
    /// Takes precedence over [`EntityFilter::with_filter_key`].
    pub fn with_predicate(mut self, predicate: impl Fn(&E, &str) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Case-insensitive substring match over the search keys.
    ///
    /// `query_lower` must already be lowercased.
    pub fn matches_search(&self, entity: &E, query_lower: &str) -> bool {
        if query_lower.is_empty() || self.search_keys.is_empty() {
            return true;
        }
        self.search_keys.iter().any(|key| {
            entity
                .field(key)
                .and_then(|value| value.search_text())
                .is_some_and(|text| text.to_lowercase().contains(query_lower))
        })
    }

    pub fn matches_category(&self, entity: &E, filter: &CategoryFilter) -> bool {
        let CategoryFilter::Value(value) = filter else {
            return true;
        };

        if let Some(predicate) = &self.predicate {
            return predicate(entity, value);
        }

        match &self.filter_key {
            Some(key) => entity
                .field(key)
                .is_some_and(|field| field.to_string() == *value),
            None => true,
        }
    }

    /// Apply both steps. A `None` query skips text matching entirely; that is
    /// how server-search results bypass the local text step.
    pub fn apply<'a>(
        &self,
        entities: &'a [E],
        query: Option<&str>,
        filter: &CategoryFilter,
    ) -> Vec<&'a E> {
        let query_lower = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
        entities
            .iter()
            .filter(|entity| self.matches_search(entity, &query_lower))
            .filter(|entity| self.matches_category(entity, filter))
            .collect()
    }
}

//! Async collaborators supplied by the data-fetching layer

use async_trait::async_trait;

use crate::{Entity, Result};

/// Server-side search. When configured, its results replace local text
/// matching for any non-empty query.
#[async_trait]
pub trait SearchDelegate<E: Entity>: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<E>>;
}

/// Deletes a batch of entities by identifier.
#[async_trait]
pub trait DeleteOperation: Send + Sync {
    async fn delete(&self, ids: &[String]) -> Result<()>;
}

//! Persistence abstraction for recipe records.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use std::fmt;

use crate::error::StoreError;
use crate::recipe::{NewRecipe, Recipe, RecipeChanges, RecipeId};

/// CRUD over the recipe collection. No validation happens here.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    /// All records when `owner` is `None`, otherwise only records owned by exactly `owner`.
    /// Order is unspecified.
    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<Recipe>, StoreError>;

    /// Persist a new record and return its freshly assigned id.
    async fn insert(&self, recipe: NewRecipe) -> Result<RecipeId, StoreError>;

    /// Replace the supplied fields. Returns 1 when a record matched, 0 otherwise.
    async fn update_by_id(&self, id: RecipeId, changes: RecipeChanges)
        -> Result<u64, StoreError>;

    /// Remove a record. Returns 1 when a record was removed, 0 otherwise.
    async fn delete_by_id(&self, id: RecipeId) -> Result<u64, StoreError>;
}

//! In-memory store for tests and local experiments.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use super::RecipeStore;
use crate::error::StoreError;
use crate::recipe::{NewRecipe, Recipe, RecipeChanges, RecipeId};

/// A [`RecipeStore`] backed by a vector, preserving insertion order.
///
/// Every trait call is counted, and the store can be switched into a failing mode to
/// exercise storage error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Recipe>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a record up without counting as a store call.
    pub fn get(&self, id: RecipeId) -> Option<Recipe> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Make every following call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Query("memory store lock poisoned".to_string())
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        self.enter()?;
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| owner.is_none() || r.owner_id.as_deref() == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<RecipeId, StoreError> {
        self.enter()?;
        let id = Uuid::new_v4();
        self.records.write().map_err(poisoned)?.push(Recipe {
            id,
            title: recipe.title,
            ingredients: recipe.ingredients,
            preparation: recipe.preparation,
            image: recipe.image,
            category: recipe.category,
            owner_id: recipe.owner_id,
        });
        Ok(id)
    }

    async fn update_by_id(
        &self,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<u64, StoreError> {
        self.enter()?;
        let mut records = self.records.write().map_err(poisoned)?;
        match records.iter_mut().find(|r| r.id == id) {
            Some(recipe) => {
                changes.apply_to(recipe);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<u64, StoreError> {
        self.enter()?;
        let mut records = self.records.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_recipe(title: &str, owner: Option<&str>) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            ingredients: Some(json!(["eggs", "potato"])),
            preparation: None,
            image: "/uploads/default.png".to_string(),
            category: None,
            owner_id: owner.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_find_by_owner_scopes_exactly() {
        let store = MemoryStore::new();
        store.insert(new_recipe("a", Some("u1"))).await.unwrap();
        store.insert(new_recipe("b", Some("u2"))).await.unwrap();
        store.insert(new_recipe("c", None)).await.unwrap();

        let mine = store.find_by_owner(Some("u1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a");

        let all = store.find_by_owner(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_counts() {
        let store = MemoryStore::new();
        let id = store.insert(new_recipe("a", None)).await.unwrap();

        let changes = RecipeChanges {
            title: Some("b".to_string()),
            ..RecipeChanges::default()
        };
        assert_eq!(store.update_by_id(id, changes.clone()).await.unwrap(), 1);
        assert_eq!(
            store.update_by_id(Uuid::new_v4(), changes).await.unwrap(),
            0
        );
        assert_eq!(store.get(id).unwrap().title, "b");

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_counts_calls() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let result = store.find_by_owner(None).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.calls(), 1);
    }
}

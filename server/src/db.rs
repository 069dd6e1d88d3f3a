use anyhow::Context;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use recetario_core::{NewRecipe, Recipe, RecipeChanges, RecipeId, RecipeStore, StoreError};
use std::fmt;
use uuid::Uuid;

use crate::models::{NewRecipeRow, RecipeChangeset, RecipeRow};
use crate::schema::recipes;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database pool")?;

    // Run pending migrations on startup
    let mut conn = pool
        .get()
        .context("Failed to get DB connection for migrations")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;

    Ok(pool)
}

/// Run a diesel query on the blocking thread pool with a pooled connection.
pub async fn run_blocking<T, F>(pool: &DbPool, query: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| StoreError::Unavailable(format!("Database connection failed: {}", e)))?;
        query(&mut conn).map_err(|e| StoreError::Query(e.to_string()))
    })
    .await
    .map_err(|e| StoreError::Unavailable(format!("Database task failed: {}", e)))?
}

/// PostgreSQL-backed [`RecipeStore`].
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgRecipeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgRecipeStore")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        let owner = owner.map(str::to_string);

        let rows = run_blocking(&self.pool, move |conn| {
            let mut query = recipes::table
                .select(RecipeRow::as_select())
                .into_boxed();
            if let Some(owner) = owner {
                query = query.filter(recipes::owner_id.eq(owner));
            }
            query.order(recipes::created_at.asc()).load::<RecipeRow>(conn)
        })
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<RecipeId, StoreError> {
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(recipes::table)
                .values(&NewRecipeRow::from(&recipe))
                .returning(recipes::id)
                .get_result::<Uuid>(conn)
        })
        .await
    }

    async fn update_by_id(
        &self,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<u64, StoreError> {
        let changeset = RecipeChangeset::from(changes);

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(recipes::table.find(id))
                .set((&changeset, recipes::updated_at.eq(diesel::dsl::now)))
                .execute(conn)
        })
        .await?;

        Ok(updated as u64)
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<u64, StoreError> {
        let deleted = run_blocking(&self.pool, move |conn| {
            diesel::delete(recipes::table.find(id)).execute(conn)
        })
        .await?;

        Ok(deleted as u64)
    }
}

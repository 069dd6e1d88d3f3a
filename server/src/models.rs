use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recetario_core::{NewRecipe, Recipe, RecipeChanges};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub owner_id: Option<String>,
    pub title: String,
    pub ingredients: Option<serde_json::Value>,
    pub preparation: Option<serde_json::Value>,
    pub image: String,
    pub category: Option<serde_json::Value>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            title: row.title,
            ingredients: row.ingredients,
            preparation: row.preparation,
            image: row.image,
            category: row.category,
            owner_id: row.owner_id,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub owner_id: Option<&'a str>,
    pub title: &'a str,
    pub ingredients: Option<&'a serde_json::Value>,
    pub preparation: Option<&'a serde_json::Value>,
    pub image: &'a str,
    pub category: Option<&'a serde_json::Value>,
}

impl<'a> From<&'a NewRecipe> for NewRecipeRow<'a> {
    fn from(recipe: &'a NewRecipe) -> Self {
        NewRecipeRow {
            owner_id: recipe.owner_id.as_deref(),
            title: &recipe.title,
            ingredients: recipe.ingredients.as_ref(),
            preparation: recipe.preparation.as_ref(),
            image: &recipe.image,
            category: recipe.category.as_ref(),
        }
    }
}

/// Outer `None` skips the column, `Some(None)` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangeset {
    pub title: Option<String>,
    pub ingredients: Option<Option<serde_json::Value>>,
    pub preparation: Option<Option<serde_json::Value>>,
    pub image: Option<String>,
    pub category: Option<Option<serde_json::Value>>,
}

impl From<RecipeChanges> for RecipeChangeset {
    fn from(changes: RecipeChanges) -> Self {
        RecipeChangeset {
            title: changes.title,
            ingredients: changes.ingredients,
            preparation: changes.preparation,
            image: changes.image,
            category: changes.category,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub username: &'a str,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

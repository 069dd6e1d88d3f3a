use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::Identity;
use crate::state::AppState;
use axum::{extract::State, Json};
use recetario_core::Recipe;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    #[schema(value_type = Option<Object>)]
    pub ingredients: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub preparation: Option<Value>,
    pub image: String,
    #[schema(value_type = Option<Object>)]
    pub category: Option<Value>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            ingredients: recipe.ingredients,
            preparation: recipe.preparation,
            image: recipe.image,
            category: recipe.category,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Recipes visible to the caller", body = Vec<RecipeResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    )
)]
pub async fn list_recipes(
    Identity(owner): Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = state
        .recipes
        .list(owner.as_deref())
        .await
        .map_err(|e| ApiError::service(e, "Failed to fetch recipes"))?;

    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

use super::form::{RecipeForm, RecipeRequest};
use crate::api::error::ApiError;
use crate::api::{ApiPath, ErrorResponse};
use crate::auth::Identity;
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use recetario_core::EditOutcome;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    /// The image reference written by this edit; null when the stored image was kept.
    pub image: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(
        content = RecipeRequest,
        content_type = "multipart/form-data",
        description = "Multipart with an optional image file, or the same fields as JSON"
    ),
    responses(
        (status = 200, description = "Recipe updated successfully", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Storage or upload failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    )
)]
pub async fn update_recipe(
    // Edits are authenticated but not restricted to the owner
    _identity: Identity,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    form: RecipeForm,
) -> Result<Json<UpdateRecipeResponse>, ApiError> {
    let outcome = state
        .recipes
        .edit(id, form.draft, form.upload, form.prior_image)
        .await
        .map_err(|e| ApiError::service(e, "Failed to update recipe"))?;

    match outcome {
        EditOutcome::Updated(edited) => Ok(Json(UpdateRecipeResponse {
            image: edited.image,
        })),
        EditOutcome::NotFound => Err(ApiError::not_found("Recipe not found")),
        EditOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

use super::form::{RecipeForm, RecipeRequest};
use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::Identity;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use recetario_core::CreateOutcome;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
    /// Image reference stored with the recipe: the upload, or the default image.
    pub image: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(
        content = RecipeRequest,
        content_type = "multipart/form-data",
        description = "Multipart with an optional image file, or the same fields as JSON"
    ),
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid title or rejected image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage or upload failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    )
)]
pub async fn create_recipe(
    Identity(owner): Identity,
    State(state): State<AppState>,
    form: RecipeForm,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), ApiError> {
    let outcome = state
        .recipes
        .create(form.draft, form.upload, owner.as_deref())
        .await
        .map_err(|e| ApiError::service(e, "Failed to create recipe"))?;

    match outcome {
        CreateOutcome::Created(created) => {
            tracing::info!(recipe_id = %created.id, "recipe created");
            Ok((
                StatusCode::CREATED,
                Json(CreateRecipeResponse {
                    id: created.id,
                    image: created.image,
                }),
            ))
        }
        CreateOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

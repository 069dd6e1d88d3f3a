use crate::api::error::ApiError;
use crate::api::{ApiPath, ErrorResponse};
use crate::auth::Identity;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
};
use recetario_core::DeleteOutcome;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    )
)]
pub async fn delete_recipe(
    _identity: Identity,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let outcome = state
        .recipes
        .delete(id)
        .await
        .map_err(|e| ApiError::service(e, "Failed to delete recipe"))?;

    match outcome {
        DeleteOutcome::Deleted => {
            tracing::info!(recipe_id = %id, "recipe deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(ApiError::not_found("Recipe not found")),
    }
}

pub mod create;
pub mod delete;
pub mod form;
pub mod list;
pub mod update;

use crate::state::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            put(update::update_recipe).delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        list::RecipeResponse,
        create::CreateRecipeResponse,
        update::UpdateRecipeResponse,
        form::RecipeRequest,
    ))
)]
pub struct ApiDoc;

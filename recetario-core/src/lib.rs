//! Recipe persistence and mutation rules.
//!
//! The HTTP layer hands raw field values, an optional pending upload and an optional
//! caller identity to [`RecipeService`]; the service validates, resolves the image
//! reference and talks to a [`RecipeStore`].

pub mod error;
pub mod image;
pub mod recipe;
pub mod service;
pub mod store;
pub mod upload;

pub use error::{ServiceError, StoreError, UploadError, ValidationError};
pub use image::{validate_image, AcceptedImage, ALLOWED_FORMATS, MAX_FILE_SIZE};
pub use recipe::{coerce_text, NewRecipe, Recipe, RecipeChanges, RecipeDraft, RecipeId};
pub use service::{
    validate_title, CreateOutcome, CreatedRecipe, DeleteOutcome, EditOutcome, EditedRecipe,
    RecipeService,
};
pub use store::{MemoryStore, RecipeStore};
pub use upload::{FakeUploader, ImageUploader, PendingImage};

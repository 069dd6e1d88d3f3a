//! Validation, image resolution and owner scoping on top of a [`RecipeStore`].
//!
//! Every mutating operation validates before it touches the uploader or the store, so a
//! rejected request never writes anything.

use serde_json::Value;
use std::sync::Arc;

use crate::error::{ServiceError, ValidationError};
use crate::recipe::{coerce_text, NewRecipe, Recipe, RecipeChanges, RecipeDraft, RecipeId};
use crate::store::RecipeStore;
use crate::upload::{ImageUploader, PendingImage};

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRecipe {
    pub id: RecipeId,
    pub image: String,
}

/// Result of a successful edit. `image` is `None` when the stored image was left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedRecipe {
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(CreatedRecipe),
    Rejected(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Updated(EditedRecipe),
    NotFound,
    Rejected(ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Check a raw title value.
///
/// An absent or `null` title and a title that is blank after trimming are both rejected.
/// The returned text is the coerced value, untrimmed.
pub fn validate_title(value: Option<&Value>) -> Result<String, ValidationError> {
    let title = value
        .and_then(coerce_text)
        .ok_or(ValidationError::MissingTitle)?;

    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }

    Ok(title)
}

/// Treat an explicit `null` on a free-form field as "no value".
fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// Present fields become replacements, `null` clears, absent fields stay untouched.
fn replacement(value: Option<Value>) -> Option<Option<Value>> {
    value.map(|v| if v.is_null() { None } else { Some(v) })
}

#[derive(Debug)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    uploader: Arc<dyn ImageUploader>,
    default_image: String,
}

impl RecipeService {
    /// `default_image` is stored on recipes created without an upload.
    pub fn new(
        store: Arc<dyn RecipeStore>,
        uploader: Arc<dyn ImageUploader>,
        default_image: impl Into<String>,
    ) -> Self {
        Self {
            store,
            uploader,
            default_image: default_image.into(),
        }
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Recipes visible to `owner`, or every recipe when there is no identity.
    pub async fn list(&self, owner: Option<&str>) -> Result<Vec<Recipe>, ServiceError> {
        Ok(self.store.find_by_owner(owner).await?)
    }

    pub async fn create(
        &self,
        draft: RecipeDraft,
        upload: Option<PendingImage>,
        owner: Option<&str>,
    ) -> Result<CreateOutcome, ServiceError> {
        let title = match validate_title(draft.title.as_ref()) {
            Ok(title) => title,
            Err(rejection) => return Ok(CreateOutcome::Rejected(rejection)),
        };

        let uploaded = match upload {
            Some(upload) => Some(self.uploader.upload(upload).await?),
            None => None,
        };
        let image = uploaded
            .clone()
            .unwrap_or_else(|| self.default_image.clone());

        let inserted = self
            .store
            .insert(NewRecipe {
                title,
                ingredients: non_null(draft.ingredients),
                preparation: non_null(draft.preparation),
                image: image.clone(),
                category: non_null(draft.category),
                owner_id: owner.map(str::to_string),
            })
            .await;

        match inserted {
            Ok(id) => Ok(CreateOutcome::Created(CreatedRecipe { id, image })),
            Err(err) => {
                self.discard(uploaded.as_deref()).await;
                Err(err.into())
            }
        }
    }

    /// Edit a recipe in place.
    ///
    /// The image is taken from the new upload first, then from `prior_image`; with neither
    /// the stored image is left untouched. A blank `prior_image` counts as absent. A new
    /// upload is discarded again when the recipe is missing or the store fails.
    pub async fn edit(
        &self,
        id: RecipeId,
        draft: RecipeDraft,
        upload: Option<PendingImage>,
        prior_image: Option<String>,
    ) -> Result<EditOutcome, ServiceError> {
        let title = match validate_title(draft.title.as_ref()) {
            Ok(title) => title,
            Err(rejection) => return Ok(EditOutcome::Rejected(rejection)),
        };

        let uploaded = match upload {
            Some(upload) => Some(self.uploader.upload(upload).await?),
            None => None,
        };
        let image = uploaded
            .clone()
            .or_else(|| prior_image.filter(|image| !image.trim().is_empty()));

        let changes = RecipeChanges {
            title: Some(title),
            ingredients: replacement(draft.ingredients),
            preparation: replacement(draft.preparation),
            image: image.clone(),
            category: replacement(draft.category),
        };

        match self.store.update_by_id(id, changes).await {
            Ok(0) => {
                self.discard(uploaded.as_deref()).await;
                Ok(EditOutcome::NotFound)
            }
            Ok(_) => Ok(EditOutcome::Updated(EditedRecipe { image })),
            Err(err) => {
                self.discard(uploaded.as_deref()).await;
                Err(err.into())
            }
        }
    }

    /// Drop an upload that no record ended up referencing. The outcome already decided
    /// stands, so a failed removal is not reported.
    async fn discard(&self, uploaded: Option<&str>) {
        if let Some(reference) = uploaded {
            let _ = self.uploader.discard(reference).await;
        }
    }

    pub async fn delete(&self, id: RecipeId) -> Result<DeleteOutcome, ServiceError> {
        match self.store.delete_by_id(id).await? {
            0 => Ok(DeleteOutcome::NotFound),
            _ => Ok(DeleteOutcome::Deleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(Some(&json!("Paella"))).unwrap(), "Paella");
        assert_eq!(validate_title(Some(&json!(" Paella "))).unwrap(), " Paella ");
        assert_eq!(validate_title(Some(&json!(7))).unwrap(), "7");
        assert_eq!(
            validate_title(Some(&json!("   "))),
            Err(ValidationError::BlankTitle)
        );
        assert_eq!(
            validate_title(Some(&json!([]))),
            Err(ValidationError::BlankTitle)
        );
        assert_eq!(validate_title(None), Err(ValidationError::MissingTitle));
        assert_eq!(
            validate_title(Some(&Value::Null)),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn test_replacement_distinguishes_absent_and_null() {
        assert_eq!(replacement(None), None);
        assert_eq!(replacement(Some(Value::Null)), Some(None));
        assert_eq!(replacement(Some(json!("x"))), Some(Some(json!("x"))));
        assert_eq!(non_null(Some(Value::Null)), None);
    }
}

//! Request body for create and edit, read from either multipart or JSON.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    Json,
};
use recetario_core::{PendingImage, RecipeDraft};
use serde_json::{Map, Value};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::api::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Title,
    Ingredients,
    Preparation,
    Category,
    Image,
}

/// Map a field name to its slot. The flag is true for the English name, which wins over
/// the Spanish alias when a request carries both.
fn slot(name: &str) -> Option<(Slot, bool)> {
    let slot = match name {
        "title" => (Slot::Title, true),
        "receta" => (Slot::Title, false),
        "ingredients" => (Slot::Ingredients, true),
        "ingredientes" => (Slot::Ingredients, false),
        "preparation" => (Slot::Preparation, true),
        "elaboracion" => (Slot::Preparation, false),
        "category" => (Slot::Category, true),
        "categoria" => (Slot::Category, false),
        "image" => (Slot::Image, true),
        "img" => (Slot::Image, false),
        _ => return None,
    };
    Some(slot)
}

#[derive(Default)]
struct Fields {
    values: HashMap<Slot, (bool, Value)>,
}

impl Fields {
    fn set(&mut self, name: &str, value: Value) {
        let Some((slot, canonical)) = slot(name) else {
            return;
        };
        match self.values.get(&slot) {
            Some((true, _)) if !canonical => {}
            _ => {
                self.values.insert(slot, (canonical, value));
            }
        }
    }

    fn take(&mut self, slot: Slot) -> Option<Value> {
        self.values.remove(&slot).map(|(_, value)| value)
    }
}

/// A parsed create/edit request.
#[derive(Debug, Default)]
pub struct RecipeForm {
    pub draft: RecipeDraft,
    pub upload: Option<PendingImage>,
    /// Text sent under the image field: the image reference the client already has.
    pub prior_image: Option<String>,
}

impl RecipeForm {
    fn from_fields(mut fields: Fields, upload: Option<PendingImage>) -> Self {
        let prior_image = match fields.take(Slot::Image) {
            Some(Value::String(image)) => Some(image),
            _ => None,
        };

        RecipeForm {
            draft: RecipeDraft {
                title: fields.take(Slot::Title),
                ingredients: fields.take(Slot::Ingredients),
                preparation: fields.take(Slot::Preparation),
                category: fields.take(Slot::Category),
            },
            upload,
            prior_image,
        }
    }

    fn from_json(body: Map<String, Value>) -> Self {
        let mut fields = Fields::default();
        for (name, value) in body {
            fields.set(&name, value);
        }
        Self::from_fields(fields, None)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = Fields::default();
        let mut upload = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let is_file = field.file_name().is_some();
            let file_name = field.file_name().map(str::to_string);

            if is_file && matches!(slot(&name), Some((Slot::Image, _))) {
                let data = field.bytes().await.map_err(multipart_error)?;
                // An empty file input is submitted as a zero-byte part
                if !data.is_empty() {
                    upload = Some(PendingImage::new(data.to_vec(), file_name));
                }
                continue;
            }

            let text = field.text().await.map_err(multipart_error)?;
            fields.set(&name, Value::String(text));
        }

        Ok(Self::from_fields(fields, upload))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "File too large. Maximum size is 10MB",
        )
    } else {
        ApiError::bad_request(format!("Failed to read multipart data: {}", err.body_text()))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for RecipeForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        Ok(Self::from_json(body))
    }
}

/// Documentation shape of the create/edit body. Spanish aliases (`receta`, `ingredientes`,
/// `elaboracion`, `categoria`, `img`) are accepted too.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeRequest {
    /// Required; numbers and other JSON values are converted to text.
    #[schema(value_type = String)]
    pub title: String,
    #[schema(value_type = Option<Object>)]
    pub ingredients: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub preparation: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub category: Option<Value>,
    /// A new file (multipart) or the image reference to keep (text).
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

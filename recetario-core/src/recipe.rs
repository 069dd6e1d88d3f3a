use serde_json::Value;
use uuid::Uuid;

/// Native identifier of a stored recipe.
pub type RecipeId = Uuid;

/// A stored recipe as exposed to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub ingredients: Option<Value>,
    pub preparation: Option<Value>,
    pub image: String,
    pub category: Option<Value>,
    /// Identity of the creator. `None` means visible to everyone.
    pub owner_id: Option<String>,
}

/// Fields for a new record. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Option<Value>,
    pub preparation: Option<Value>,
    pub image: String,
    pub category: Option<Value>,
    pub owner_id: Option<String>,
}

/// Partial replacement of a record's mutable fields.
///
/// `None` leaves a field untouched. For the free-form fields `Some(None)` clears the value.
/// The id and owner are not representable here and can never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub ingredients: Option<Option<Value>>,
    pub preparation: Option<Option<Value>>,
    pub image: Option<String>,
    pub category: Option<Option<Value>>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.ingredients.is_none()
            && self.preparation.is_none()
            && self.image.is_none()
            && self.category.is_none()
    }

    /// Apply the changes to an in-memory record.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.clone();
        }
        if let Some(preparation) = &self.preparation {
            recipe.preparation = preparation.clone();
        }
        if let Some(image) = &self.image {
            recipe.image = image.clone();
        }
        if let Some(category) = &self.category {
            recipe.category = category.clone();
        }
    }
}

/// Raw field values as they arrived with a request. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub title: Option<Value>,
    pub ingredients: Option<Value>,
    pub preparation: Option<Value>,
    pub category: Option<Value>,
}

impl RecipeDraft {
    /// Draft with only a title, mostly useful in tests.
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(Value::String(title.to_string())),
            ..Self::default()
        }
    }
}

/// Turn a JSON value into text the way a form field would be read.
///
/// Strings are kept verbatim, numbers and booleans use their display form, arrays are
/// joined with commas and objects become JSON text. `null` has no text form.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| coerce_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

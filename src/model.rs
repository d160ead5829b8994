use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::editor::IngredientId;
use crate::error::RecipeError;

/// A recipe as stored by the recipe service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecipe {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Base serving count the quantities are calibrated for.
    /// Negative counts from the service are read as absent.
    #[serde(default, deserialize_with = "lenient_servings")]
    pub servings_default: Option<u32>,
    /// Relative path of the stored photo, if any
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<PersistedIngredient>,
}

fn lenient_servings<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|servings| *servings >= 0)
        .map(|servings| u32::try_from(servings).unwrap_or(u32::MAX)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedIngredient {
    #[serde(default)]
    pub name: String,
    /// `None` for quantity-less entries like "a pinch of salt"
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

/// One element of the JSON-encoded `ingredients` form part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientPayload {
    pub ingredient_name: String,
    pub amount: f64,
    pub unit: String,
    pub id: IngredientId,
}

/// A photo attached to a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        ImageUpload {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk, keeping its file name
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(ImageUpload { file_name, bytes })
    }

    /// File extension, lowercased
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Everything sent to the recipe service in one create request
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePayload {
    pub title: String,
    pub instructions: String,
    pub servings_default: u32,
    pub ingredients: Vec<IngredientPayload>,
    pub image: Option<ImageUpload>,
}

impl RecipePayload {
    /// The `ingredients` form part
    pub fn ingredients_json(&self) -> Result<String, RecipeError> {
        Ok(serde_json::to_string(&self.ingredients)?)
    }
}

/// The service's answer to a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecipe {
    #[serde(default)]
    pub message: String,
    pub id: u64,
    #[serde(default)]
    pub image_url: Option<String>,
}

mod http;
mod memory;

pub use http::HttpRecipeStore;
pub use memory::MemoryRecipeStore;

use async_trait::async_trait;

use crate::error::RecipeError;
use crate::model::{CreatedRecipe, PersistedRecipe, RecipePayload};

/// The service that owns persisted recipes
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Short name used in log lines
    fn store_name(&self) -> &str;

    /// Persist a new recipe in one request
    async fn create(&self, payload: &RecipePayload) -> Result<CreatedRecipe, RecipeError>;

    /// Fetch a single recipe by id
    async fn get(&self, id: u64) -> Result<PersistedRecipe, RecipeError>;

    /// Fetch every stored recipe
    async fn list(&self) -> Result<Vec<PersistedRecipe>, RecipeError>;
}

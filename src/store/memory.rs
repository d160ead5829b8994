use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::error::RecipeError;
use crate::model::{CreatedRecipe, PersistedIngredient, PersistedRecipe, RecipePayload};
use crate::store::RecipeStore;

/// In-process recipe store with sequential ids
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<Vec<PersistedRecipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing recipes
    pub fn with_recipes(recipes: Vec<PersistedRecipe>) -> Self {
        MemoryRecipeStore {
            recipes: Mutex::new(recipes),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PersistedRecipe>> {
        // Recipes stay consistent even if a holder panicked mid-read.
        self.recipes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn create(&self, payload: &RecipePayload) -> Result<CreatedRecipe, RecipeError> {
        let mut recipes = self.lock();
        let id = recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let image = payload
            .image
            .as_ref()
            .map(|image| format!("media/recipe_{}/{}", id, image.file_name));

        recipes.push(PersistedRecipe {
            id,
            title: payload.title.clone(),
            instructions: Some(payload.instructions.clone()),
            servings_default: Some(payload.servings_default),
            image: image.clone(),
            ingredients: payload
                .ingredients
                .iter()
                .map(|ingredient| PersistedIngredient {
                    name: ingredient.ingredient_name.clone(),
                    amount: Some(ingredient.amount),
                    unit: ingredient.unit.clone(),
                })
                .collect(),
        });
        debug!("Stored recipe {} in memory", id);

        Ok(CreatedRecipe {
            message: "Рецепт создан!".to_string(),
            id,
            image_url: image,
        })
    }

    async fn get(&self, id: u64) -> Result<PersistedRecipe, RecipeError> {
        self.lock()
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or(RecipeError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<PersistedRecipe>, RecipeError> {
        Ok(self.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::IngredientId;
    use crate::model::{ImageUpload, IngredientPayload};

    fn payload(title: &str, image: Option<ImageUpload>) -> RecipePayload {
        RecipePayload {
            title: title.to_string(),
            instructions: "Mix".to_string(),
            servings_default: 1,
            ingredients: vec![IngredientPayload {
                ingredient_name: "Egg".to_string(),
                amount: 2.0,
                unit: "шт".to_string(),
                id: IngredientId::new(1),
            }],
            image,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryRecipeStore::new();
        let first = store.create(&payload("A", None)).await.unwrap();
        let second = store.create(&payload("B", None)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_stores_image_path() {
        let store = MemoryRecipeStore::new();
        let created = store
            .create(&payload("A", Some(ImageUpload::new("pie.jpg", vec![0]))))
            .await
            .unwrap();
        assert_eq!(created.image_url.as_deref(), Some("media/recipe_1/pie.jpg"));

        let recipe = store.get(created.id).await.unwrap();
        assert_eq!(recipe.image.as_deref(), Some("media/recipe_1/pie.jpg"));
        assert_eq!(recipe.ingredients[0].name, "Egg");
        assert_eq!(recipe.ingredients[0].amount, Some(2.0));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryRecipeStore::new();
        assert!(matches!(store.get(9).await, Err(RecipeError::NotFound(9))));
    }
}

use log::debug;
use serde::Serialize;

use crate::model::PersistedRecipe;
use crate::scale::{DisplayIngredient, ServingScaler, TargetServings};

pub const NO_INSTRUCTIONS_PREVIEW: &str = "Инструкции не добавлены...";
pub const NO_INSTRUCTIONS_DETAIL: &str = "Инструкция не предоставлена.";

/// Catalog card for one recipe in the list screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    pub servings: Option<u32>,
    pub ingredient_count: usize,
    pub preview: String,
    pub has_image: bool,
}

impl RecipeSummary {
    pub fn from_recipe(recipe: &PersistedRecipe) -> Self {
        RecipeSummary {
            id: recipe.id,
            title: recipe.title.clone(),
            servings: recipe.servings_default,
            ingredient_count: recipe.ingredients.len(),
            preview: non_empty(recipe.instructions.as_deref())
                .unwrap_or(NO_INSTRUCTIONS_PREVIEW)
                .to_string(),
            has_image: recipe.image.is_some(),
        }
    }
}

/// Build the catalog, keeping the service's order
pub fn summarize(recipes: &[PersistedRecipe]) -> Vec<RecipeSummary> {
    recipes.iter().map(RecipeSummary::from_recipe).collect()
}

/// Detail screen state: one recipe and the serving count the user wants
#[derive(Debug, Clone)]
pub struct RecipeView {
    recipe: PersistedRecipe,
    target: TargetServings,
}

impl RecipeView {
    /// Opens at the recipe's own base count (one when it has none)
    pub fn new(recipe: PersistedRecipe) -> Self {
        let target = TargetServings::for_recipe(&recipe);
        RecipeView { recipe, target }
    }

    pub fn recipe(&self) -> &PersistedRecipe {
        &self.recipe
    }

    pub fn target(&self) -> TargetServings {
        self.target
    }

    pub fn set_target(&mut self, target: TargetServings) {
        self.target = target;
    }

    /// Apply raw user input; invalid or sub-one input is treated as one
    pub fn set_target_input(&mut self, input: &str) -> TargetServings {
        self.target = TargetServings::from_input(input);
        debug!(
            "Recipe {} target servings set to {} from {:?}",
            self.recipe.id, self.target, input
        );
        self.target
    }

    /// Ingredients scaled to the current target
    pub fn ingredients(&self) -> Vec<DisplayIngredient> {
        ServingScaler::scale(&self.recipe, self.target)
    }

    pub fn instructions(&self) -> &str {
        non_empty(self.recipe.instructions.as_deref()).unwrap_or(NO_INSTRUCTIONS_DETAIL)
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

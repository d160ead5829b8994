//! Recipe catalog editor.
//!
//! Two independent pieces do the real work:
//!
//! - [`IngredientListEditor`] and [`RecipeForm`] author a new recipe, keep
//!   the ingredient rows consistent and validate the draft before it is
//!   handed to a [`RecipeStore`].
//! - [`ServingScaler`] recomputes a stored recipe's quantities for any
//!   serving count, driven by [`RecipeView`] on the detail screen.
//!
//! Persistence itself lives behind the [`RecipeStore`] trait.

pub mod config;
pub mod editor;
pub mod error;
pub mod form;
pub mod model;
pub mod scale;
pub mod store;
pub mod validation;
pub mod view;

pub use config::AppConfig;
pub use editor::{IngredientDraft, IngredientField, IngredientId, IngredientListEditor};
pub use error::{RecipeError, SubmitError};
pub use form::{RecipeDraft, RecipeForm};
pub use model::{
    CreatedRecipe, ImageUpload, IngredientPayload, PersistedIngredient, PersistedRecipe,
    RecipePayload,
};
pub use scale::{DisplayIngredient, ServingScaler, TargetServings};
pub use store::{HttpRecipeStore, MemoryRecipeStore, RecipeStore};
pub use validation::{FieldKey, ValidationErrors};
pub use view::{RecipeSummary, RecipeView};

/// Fetch the catalog from the configured recipe service
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = recipe_book::fetch_recipes().await?;
/// for card in catalog {
///     println!("{} ({} ingredients)", card.title, card.ingredient_count);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_recipes() -> Result<Vec<RecipeSummary>, RecipeError> {
    let store = HttpRecipeStore::from_config(&AppConfig::load()?)?;
    let recipes = store.list().await?;
    Ok(view::summarize(&recipes))
}

/// Fetch one recipe from the configured recipe service
pub async fn fetch_recipe(id: u64) -> Result<PersistedRecipe, RecipeError> {
    let store = HttpRecipeStore::from_config(&AppConfig::load()?)?;
    store.get(id).await
}

/// Fetch one recipe and open it scaled to `servings`
///
/// # Example
/// ```no_run
/// # use recipe_book::TargetServings;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let view = recipe_book::view_recipe(1, Some(TargetServings::new(6))).await?;
/// for ingredient in view.ingredients() {
///     println!("{}", ingredient);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn view_recipe(
    id: u64,
    servings: Option<TargetServings>,
) -> Result<RecipeView, RecipeError> {
    let mut view = RecipeView::new(fetch_recipe(id).await?);
    if let Some(servings) = servings {
        view.set_target(servings);
    }
    Ok(view)
}

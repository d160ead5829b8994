//! The recipe authoring form.
//!
//! [`RecipeForm`] is owned by whatever drives the authoring screen and is
//! passed around by reference; all edits to the ingredient rows go through
//! its [`IngredientListEditor`].

use log::{error, info, warn};

use crate::editor::IngredientListEditor;
use crate::error::SubmitError;
use crate::model::{CreatedRecipe, ImageUpload, IngredientPayload, RecipePayload};
use crate::store::RecipeStore;
use crate::validation::{self, ValidationErrors};

/// Base serving count sent with every new recipe.
///
/// The form has no serving-count input, so every recipe is created for one
/// serving whatever `RecipeDraft::servings_default` holds.
pub const SUBMITTED_SERVINGS_DEFAULT: u32 = 1;

/// A recipe being authored, not yet persisted
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub instructions: String,
    pub servings_default: u32,
    pub image: Option<ImageUpload>,
    pub ingredients: IngredientListEditor,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self::with_editor(IngredientListEditor::default())
    }
}

impl RecipeDraft {
    pub fn with_editor(ingredients: IngredientListEditor) -> Self {
        RecipeDraft {
            title: String::new(),
            instructions: String::new(),
            servings_default: 1,
            image: None,
            ingredients,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        validation::validate_recipe(
            &self.title,
            &self.instructions,
            self.ingredients.ingredients(),
        )
    }

    /// Build the wire payload. Returns `None` if any amount does not parse,
    /// which cannot happen for a draft that passed `validate`.
    pub fn to_payload(&self) -> Option<RecipePayload> {
        let ingredients = self
            .ingredients
            .ingredients()
            .iter()
            .map(|row| {
                Some(IngredientPayload {
                    ingredient_name: row.name.clone(),
                    amount: validation::parse_amount(&row.amount)?,
                    unit: row.unit.clone(),
                    id: row.id,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(RecipePayload {
            title: self.title.clone(),
            instructions: self.instructions.clone(),
            servings_default: SUBMITTED_SERVINGS_DEFAULT,
            ingredients,
            image: self.image.clone(),
        })
    }

    /// Back to a fresh draft with a single empty row
    fn reset(&mut self) {
        self.title.clear();
        self.instructions.clear();
        self.servings_default = 1;
        self.image = None;
        self.ingredients.reset();
    }
}

/// Draft plus the error set currently shown to the user
#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    draft: RecipeDraft,
    errors: ValidationErrors,
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a form whose new ingredient rows use `unit`
    pub fn with_default_unit(unit: impl Into<String>) -> Self {
        RecipeForm {
            draft: RecipeDraft::with_editor(IngredientListEditor::with_default_unit(unit)),
            errors: ValidationErrors::default(),
        }
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn ingredients(&self) -> &IngredientListEditor {
        &self.draft.ingredients
    }

    pub fn ingredients_mut(&mut self) -> &mut IngredientListEditor {
        &mut self.draft.ingredients
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.draft.instructions = instructions.into();
    }

    pub fn set_servings_default(&mut self, servings: u32) {
        self.draft.servings_default = servings.max(1);
    }

    pub fn set_image(&mut self, image: Option<ImageUpload>) {
        self.draft.image = image;
    }

    /// Recompute the error set over the whole draft; true when it is empty
    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }

    /// Validate, then hand the draft to `store` as one request.
    ///
    /// On success the form is reset to a fresh single-row draft. On a store
    /// failure the draft is kept as entered so the user can try again.
    pub async fn submit(&mut self, store: &dyn RecipeStore) -> Result<CreatedRecipe, SubmitError> {
        if !self.validate() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let payload = self
            .draft
            .to_payload()
            .ok_or_else(|| SubmitError::Invalid(self.errors.clone()))?;

        if self.draft.servings_default != SUBMITTED_SERVINGS_DEFAULT {
            warn!(
                "Draft base servings {} is not submitted; recipe is created for {}",
                self.draft.servings_default, SUBMITTED_SERVINGS_DEFAULT
            );
        }

        match store.create(&payload).await {
            Ok(created) => {
                info!(
                    "Saved recipe {:?} as {} via {}",
                    payload.title,
                    created.id,
                    store.store_name()
                );
                self.draft.reset();
                self.errors.clear();
                Ok(created)
            }
            Err(e) => {
                error!("Failed to save recipe via {}: {}", store.store_name(), e);
                Err(SubmitError::Connection(e))
            }
        }
    }
}

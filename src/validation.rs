//! Validation rules shared by the authoring form and the ingredient editor.
//!
//! Error keys are positional: `ingredient_name_<i>` and `amount_<i>` refer to
//! the ingredient's index at the time of the pass, not its stable id. A
//! [`ValidationErrors`] set is therefore rebuilt from scratch on every pass
//! and never carried across edits.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::editor::IngredientDraft;

pub const TITLE_REQUIRED: &str = "Введите название блюда";
pub const INSTRUCTIONS_REQUIRED: &str = "Введите инструкцию приготовления";
pub const INGREDIENT_NAME_REQUIRED: &str = "Введите название ингредиента";
/// Used for both the empty and the negative amount case.
pub const AMOUNT_INVALID: &str = "Количество должно быть больше 0";

/// Key of a field that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Title,
    Instructions,
    IngredientName(usize),
    Amount(usize),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Title => f.write_str("title"),
            FieldKey::Instructions => f.write_str("instructions"),
            FieldKey::IngredientName(index) => write!(f, "ingredient_name_{}", index),
            FieldKey::Amount(index) => write!(f, "amount_{}", index),
        }
    }
}

/// Field-keyed, human readable validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldKey, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.errors.insert(key, message.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    /// Look up a message by its rendered key, e.g. `"amount_0"`
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(key, _)| key.to_string() == name)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.errors.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.errors.iter().map(|(key, message)| (*key, message.as_str()))
    }

    /// Rendered keys in a stable order
    pub fn keys(&self) -> Vec<String> {
        self.errors.keys().map(FieldKey::to_string).collect()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.errors
                .iter()
                .map(|(key, message)| (key.to_string(), message)),
        )
    }
}

/// Parse an amount as a finite, non-negative number.
///
/// This is the single predicate behind both the keystroke guard
/// ([`amount_input_allowed`]) and the submission rule ([`amount_is_valid`]).
pub fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Keystroke-level guard: an amount field may hold an empty string or a
/// non-negative number, anything else is silently refused.
pub fn amount_input_allowed(value: &str) -> bool {
    value.is_empty() || parse_amount(value).is_some()
}

/// Submission-level rule: an amount must be present and non-negative.
pub fn amount_is_valid(value: &str) -> bool {
    !value.is_empty() && parse_amount(value).is_some()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check every ingredient row, recording positional errors into `errors`.
pub fn validate_ingredients(ingredients: &[IngredientDraft], errors: &mut ValidationErrors) {
    for (index, ingredient) in ingredients.iter().enumerate() {
        if is_blank(&ingredient.name) {
            errors.insert(FieldKey::IngredientName(index), INGREDIENT_NAME_REQUIRED);
        }
        if !amount_is_valid(&ingredient.amount) {
            errors.insert(FieldKey::Amount(index), AMOUNT_INVALID);
        }
    }
}

/// Check the whole recipe: title, instructions, then each ingredient row.
pub fn validate_recipe(
    title: &str,
    instructions: &str,
    ingredients: &[IngredientDraft],
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if is_blank(title) {
        errors.insert(FieldKey::Title, TITLE_REQUIRED);
    }
    if is_blank(instructions) {
        errors.insert(FieldKey::Instructions, INSTRUCTIONS_REQUIRED);
    }
    validate_ingredients(ingredients, &mut errors);
    errors
}

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationErrors};

/// Unit label seeded into new rows when no other default is configured
pub const DEFAULT_UNIT: &str = "г";

/// Stable identity of an ingredient row.
///
/// Minted once when a row is created and carried with the row through edits
/// and reordering; it is the reconciliation key for the row, never its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(u64);

impl IngredientId {
    pub fn new(raw: u64) -> Self {
        IngredientId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ingredient row of the authoring form
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientDraft {
    pub id: IngredientId,
    /// Stored as typed; only trimmed when validated
    pub name: String,
    /// Raw numeric text; empty until the user types a quantity
    pub amount: String,
    pub unit: String,
}

/// A single field edit for an ingredient row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientField {
    Name(String),
    Amount(String),
    Unit(String),
}

/// Ordered, never-empty list of ingredient rows
#[derive(Debug, Clone)]
pub struct IngredientListEditor {
    ingredients: Vec<IngredientDraft>,
    default_unit: String,
    next_id: u64,
}

impl Default for IngredientListEditor {
    fn default() -> Self {
        Self::with_default_unit(DEFAULT_UNIT)
    }
}

impl IngredientListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor whose new rows use `unit` as their unit label
    pub fn with_default_unit(unit: impl Into<String>) -> Self {
        let mut editor = IngredientListEditor {
            ingredients: Vec::new(),
            default_unit: unit.into(),
            next_id: 1,
        };
        editor.add();
        editor
    }

    pub fn ingredients(&self) -> &[IngredientDraft] {
        &self.ingredients
    }

    pub fn get(&self, index: usize) -> Option<&IngredientDraft> {
        self.ingredients.get(index)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Always false while the editor is alive; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// Whether `remove` would currently do anything
    pub fn can_remove(&self) -> bool {
        self.ingredients.len() > 1
    }

    /// Append an empty row with a fresh id and return that id
    pub fn add(&mut self) -> IngredientId {
        let id = self.mint_id();
        self.ingredients.push(IngredientDraft {
            id,
            name: String::new(),
            amount: String::new(),
            unit: self.default_unit.clone(),
        });
        debug!("Added ingredient row {} (now {})", id, self.ingredients.len());
        id
    }

    /// Remove the row at `index`.
    ///
    /// Refused silently when it is the last remaining row or when `index` is
    /// out of range. Returns the removed row otherwise.
    pub fn remove(&mut self, index: usize) -> Option<IngredientDraft> {
        if !self.can_remove() || index >= self.ingredients.len() {
            debug!("Refusing to remove ingredient row {}", index);
            return None;
        }
        Some(self.ingredients.remove(index))
    }

    /// Apply one field edit to the row at `index`.
    ///
    /// Amount edits go through the keystroke guard: anything that is not
    /// empty and not a non-negative number leaves the previous value in place.
    /// Returns whether the edit was applied.
    pub fn update_field(&mut self, index: usize, field: IngredientField) -> bool {
        let Some(row) = self.ingredients.get_mut(index) else {
            return false;
        };

        match field {
            IngredientField::Name(name) => row.name = name,
            IngredientField::Unit(unit) => row.unit = unit,
            IngredientField::Amount(amount) => {
                if !validation::amount_input_allowed(&amount) {
                    debug!("Rejected amount input {:?} for row {}", amount, row.id);
                    return false;
                }
                row.amount = amount;
            }
        }
        true
    }

    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        self.update_field(index, IngredientField::Name(name.into()))
    }

    pub fn set_amount(&mut self, index: usize, amount: impl Into<String>) -> bool {
        self.update_field(index, IngredientField::Amount(amount.into()))
    }

    pub fn set_unit(&mut self, index: usize, unit: impl Into<String>) -> bool {
        self.update_field(index, IngredientField::Unit(unit.into()))
    }

    /// Positional errors for every row, recomputed from scratch
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        validation::validate_ingredients(&self.ingredients, &mut errors);
        errors
    }

    /// Drop all rows and start again from a single empty one.
    /// Ids keep counting up so a stale id never matches a new row.
    pub fn reset(&mut self) {
        self.ingredients.clear();
        self.add();
    }

    fn mint_id(&mut self) -> IngredientId {
        let id = IngredientId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldKey;

    #[test]
    fn test_starts_with_one_empty_row() {
        let editor = IngredientListEditor::new();
        assert_eq!(editor.len(), 1);
        let row = editor.get(0).unwrap();
        assert_eq!(row.name, "");
        assert_eq!(row.amount, "");
        assert_eq!(row.unit, DEFAULT_UNIT);
    }

    #[test]
    fn test_add_appends_with_unique_ids() {
        let mut editor = IngredientListEditor::new();
        let second = editor.add();
        let third = editor.add();
        assert_eq!(editor.len(), 3);
        assert_ne!(second, third);
        assert_ne!(editor.get(0).unwrap().id, second);
        assert_eq!(editor.get(2).unwrap().id, third);
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let mut editor = IngredientListEditor::new();
        editor.set_name(0, "Flour");
        editor.set_amount(0, "200");
        let before = editor.ingredients().to_vec();

        editor.add();
        let last = editor.len() - 1;
        editor.remove(last);

        assert_eq!(editor.ingredients(), before.as_slice());
    }

    #[test]
    fn test_remove_last_row_is_refused() {
        let mut editor = IngredientListEditor::new();
        assert!(!editor.can_remove());
        assert!(editor.remove(0).is_none());
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range_is_refused() {
        let mut editor = IngredientListEditor::new();
        editor.add();
        assert!(editor.remove(5).is_none());
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn test_remove_shifts_rows_keeping_ids() {
        let mut editor = IngredientListEditor::new();
        let first = editor.get(0).unwrap().id;
        let second = editor.add();
        let third = editor.add();
        editor.set_name(2, "Sugar");

        let removed = editor.remove(1).unwrap();
        assert_eq!(removed.id, second);
        assert_eq!(editor.len(), 2);
        assert_eq!(editor.get(0).unwrap().id, first);
        assert_eq!(editor.get(1).unwrap().id, third);
        assert_eq!(editor.get(1).unwrap().name, "Sugar");
    }

    #[test]
    fn test_amount_guard_rejects_invalid_input() {
        let mut editor = IngredientListEditor::new();
        assert!(editor.set_amount(0, "2"));
        for value in ["-1", "-0.5", "abc"] {
            assert!(!editor.set_amount(0, value));
            assert_eq!(editor.get(0).unwrap().amount, "2");
        }
    }

    #[test]
    fn test_amount_guard_accepts_valid_input() {
        let mut editor = IngredientListEditor::new();
        for value in ["", "0", "3.5"] {
            assert!(editor.set_amount(0, value));
            assert_eq!(editor.get(0).unwrap().amount, value);
        }
    }

    #[test]
    fn test_name_and_unit_accept_anything() {
        let mut editor = IngredientListEditor::new();
        assert!(editor.set_name(0, "  Salt "));
        assert!(editor.set_unit(0, ""));
        let row = editor.get(0).unwrap();
        assert_eq!(row.name, "  Salt ");
        assert_eq!(row.unit, "");
    }

    #[test]
    fn test_edit_keeps_id() {
        let mut editor = IngredientListEditor::new();
        let id = editor.get(0).unwrap().id;
        editor.set_name(0, "Milk");
        editor.set_amount(0, "1");
        assert_eq!(editor.get(0).unwrap().id, id);
    }

    #[test]
    fn test_update_out_of_range() {
        let mut editor = IngredientListEditor::new();
        assert!(!editor.set_name(3, "Ghost"));
    }

    #[test]
    fn test_validate_rows() {
        let mut editor = IngredientListEditor::new();
        editor.add();
        editor.set_name(0, "Water");
        editor.set_amount(0, "1");
        let errors = editor.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(FieldKey::IngredientName(1)));
        assert!(errors.contains(FieldKey::Amount(1)));
    }

    #[test]
    fn test_reset_mints_fresh_id() {
        let mut editor = IngredientListEditor::new();
        let old = editor.get(0).unwrap().id;
        editor.add();
        editor.reset();
        assert_eq!(editor.len(), 1);
        assert_ne!(editor.get(0).unwrap().id, old);
    }

    #[test]
    fn test_custom_default_unit() {
        let mut editor = IngredientListEditor::with_default_unit("g");
        editor.add();
        assert!(editor.ingredients().iter().all(|row| row.unit == "g"));
    }
}

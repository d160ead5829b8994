use std::fmt;

use serde::Serialize;

use crate::model::PersistedRecipe;

/// A serving count of at least one.
///
/// Every way of building one clamps, so the scaler never sees zero or a
/// negative target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetServings(u32);

impl TargetServings {
    pub fn new(servings: u32) -> Self {
        TargetServings(servings.max(1))
    }

    /// Parse user input by its leading integer (`"2.5"` is 2, `"3 portions"`
    /// is 3); anything non-numeric or below one becomes one
    pub fn from_input(input: &str) -> Self {
        let text = input.trim_start();
        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit);

        let mut value: u32 = 0;
        let mut seen = false;
        for digit in digits {
            seen = true;
            value = value
                .saturating_mul(10)
                .saturating_add(u32::from(digit - b'0'));
        }

        if !seen || negative {
            return TargetServings(1);
        }
        Self::new(value)
    }

    /// The recipe's own base count, or one when it has none
    pub fn for_recipe(recipe: &PersistedRecipe) -> Self {
        Self::new(recipe.servings_default.unwrap_or(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for TargetServings {
    fn default() -> Self {
        TargetServings(1)
    }
}

impl fmt::Display for TargetServings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ingredient as shown for a particular serving count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayIngredient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: String,
}

impl DisplayIngredient {
    /// `"50.0 g"`, or just the unit when there is no amount
    pub fn quantity_label(&self) -> String {
        match self.amount {
            Some(amount) if self.unit.is_empty() => format!("{:.1}", amount),
            Some(amount) => format!("{:.1} {}", amount, self.unit),
            None => self.unit.clone(),
        }
    }
}

impl fmt::Display for DisplayIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quantity = self.quantity_label();
        if quantity.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, quantity)
        }
    }
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Proportional serving-count recalculation
#[derive(Debug, Clone, Copy, Default)]
pub struct ServingScaler;

impl ServingScaler {
    /// Scale every ingredient of `recipe` from its base count to `target`.
    ///
    /// A recipe with no base count (or zero) is echoed unchanged, and
    /// ingredients without an amount always pass through as they are.
    pub fn scale(recipe: &PersistedRecipe, target: TargetServings) -> Vec<DisplayIngredient> {
        let factor = match recipe.servings_default {
            Some(base) if base > 0 => Some(f64::from(target.get()) / f64::from(base)),
            _ => None,
        };

        recipe
            .ingredients
            .iter()
            .map(|ingredient| DisplayIngredient {
                name: ingredient.name.clone(),
                amount: match (ingredient.amount, factor) {
                    (Some(amount), Some(factor)) => Some(round1(amount * factor)),
                    (amount, _) => amount,
                },
                unit: ingredient.unit.clone(),
            })
            .collect()
    }
}

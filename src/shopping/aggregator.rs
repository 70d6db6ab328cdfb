//! Ingredient aggregation into a consolidated shopping list.
//!
//! This module folds the ingredients of every recipe into one ordered
//! mapping from display key to total quantity, keeping amounts with
//! different units apart.

use crate::models::{Ingredient, Recipe, ShoppingListEntry};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// Shopping list keyed by display key, in order of first occurrence.
pub type ShoppingList = IndexMap<String, ShoppingListEntry>;

/// Errors raised while building a shopping list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShoppingListError {
    /// A quantity was present but negative, NaN or infinite.
    #[error("invalid quantity {quantity} for ingredient '{item}'")]
    InvalidQuantity { item: String, quantity: f64 },
}

/// Build a shopping list from recipes, in recipe order then ingredient order.
///
/// Entries whose total is not strictly positive are dropped, so ingredients
/// without a quantity ("salt to taste") never reach the list.
pub fn build_shopping_list<'a, I>(recipes: I) -> Result<ShoppingList, ShoppingListError>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut list = ShoppingList::new();

    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            add_ingredient(&mut list, ingredient)?;
        }
    }

    let before = list.len();
    list.retain(|_, entry| entry.quantity > 0.0);
    debug!(
        "Shopping list has {} entries ({} dropped with zero quantity)",
        list.len(),
        before - list.len()
    );

    Ok(list)
}

/// Fold a single ingredient into the list.
pub fn add_ingredient(
    list: &mut ShoppingList,
    ingredient: &Ingredient,
) -> Result<(), ShoppingListError> {
    let quantity = checked_quantity(ingredient)?;
    let unit = ingredient.unit();

    let key = base_key(&ingredient.item, unit);
    let conflicting = list
        .get(&key)
        .is_some_and(|entry| entry.unit.as_deref() != unit);

    // The bare entry is left alone; the newcomer goes under its own unit.
    let key = if conflicting {
        let qualified = unit_qualified_key(&ingredient.item, unit);
        debug!("Unit conflict on '{}', using '{}'", key, qualified);
        qualified
    } else {
        key
    };

    accumulate(list, key, quantity, unit);
    Ok(())
}

/// Key computed from an ingredient's own item and unit.
pub fn base_key(item: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} ({})", item, unit),
        None => item.to_string(),
    }
}

fn unit_qualified_key(item: &str, unit: Option<&str>) -> String {
    format!("{} ({})", item, unit.unwrap_or("unitless"))
}

fn accumulate(list: &mut ShoppingList, key: String, quantity: f64, unit: Option<&str>) {
    match list.get_mut(&key) {
        Some(entry) if entry.unit.as_deref() == unit => entry.quantity += quantity,
        _ => {
            list.insert(
                key,
                ShoppingListEntry {
                    quantity,
                    unit: unit.map(String::from),
                },
            );
        }
    }
}

fn checked_quantity(ingredient: &Ingredient) -> Result<f64, ShoppingListError> {
    match ingredient.quantity {
        None => Ok(0.0),
        Some(q) if q.is_finite() && q >= 0.0 => Ok(q),
        Some(q) => Err(ShoppingListError::InvalidQuantity {
            item: ingredient.item.clone(),
            quantity: q,
        }),
    }
}

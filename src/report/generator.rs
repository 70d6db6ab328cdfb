//! Text and JSON output generation.
//!
//! This module renders recipes and the shopping list as plain text and
//! writes them into a fresh output folder.

use crate::models::{Recipe, ShoppingListEntry};
use crate::shopping::ShoppingList;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the text shopping list.
pub const SHOPPING_LIST_TEXT: &str = "SHOPPINGLIST.txt";

/// File name of the JSON shopping list.
pub const SHOPPING_LIST_JSON: &str = "shopping_list.json";

/// File name of the saved recipes.
pub const RECIPES_JSON: &str = "recipes.json";

/// Format a quantity, dropping the decimal point for whole numbers.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.is_finite() && quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        format!("{}", quantity)
    }
}

/// Format a single recipe for a text file.
pub fn format_recipe(recipe: &Recipe) -> String {
    let mut output = String::new();

    output.push_str(&format!("Recipe: {}\n", recipe.title));
    output.push_str(&format!("Description: {}\n\n", recipe.description));

    output.push_str("Ingredients:\n");
    for ingredient in &recipe.ingredients {
        let line = match (ingredient.quantity, ingredient.unit()) {
            (Some(q), Some(unit)) => format!("{} {} {}", format_quantity(q), unit, ingredient.item),
            (Some(q), None) => format!("{} {}", format_quantity(q), ingredient.item),
            (None, Some(unit)) => format!("{} {}", unit, ingredient.item),
            (None, None) => ingredient.item.clone(),
        };
        output.push_str(&format!("- {}\n", line));
    }
    output.push('\n');

    output.push_str("Instructions:\n");
    for (i, step) in recipe.instructions.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, step));
    }
    output.push('\n');

    if let Some(ref source) = recipe.source {
        output.push_str(&format!("Source: {}\n", source));
    }

    output.trim().to_string()
}

/// Format one shopping list line.
pub fn format_shopping_line(key: &str, entry: &ShoppingListEntry) -> String {
    match entry.unit {
        Some(ref unit) => format!("{}: {} {}", key, format_quantity(entry.quantity), unit),
        None => format!("{}: {}", key, format_quantity(entry.quantity)),
    }
}

/// Render the shopping list as text.
pub fn generate_shopping_list_text(list: &ShoppingList) -> String {
    let mut output = String::new();

    output.push_str("Shopping List:\n\n");
    for (key, entry) in list {
        output.push_str(&format_shopping_line(key, entry));
        output.push('\n');
    }

    output
}

/// Render the shopping list as JSON.
pub fn generate_shopping_list_json(list: &ShoppingList) -> Result<String> {
    serde_json::to_string_pretty(list).map_err(Into::into)
}

/// Turn a recipe title into a safe file name.
pub fn recipe_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    let stem = if stem.is_empty() {
        "recipe".to_string()
    } else {
        stem
    };
    format!("{}.txt", stem)
}

/// Create a new, not yet existing, folder for this run.
pub fn create_output_dir(parent: &Path, prefix: &str, timestamp: i64) -> Result<PathBuf> {
    let dir = parent.join(format!("{}_{}", prefix, timestamp));

    if dir.exists() {
        anyhow::bail!("Output folder already exists: {}", dir.display());
    }

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output folder: {}", dir.display()))?;

    info!("Created output folder: {}", dir.display());
    Ok(dir)
}

/// Write each recipe to its own text file. Returns the written paths.
///
/// Titles that sanitize to the same name get a numeric suffix.
pub fn write_recipes(dir: &Path, recipes: &[Recipe]) -> Result<Vec<PathBuf>> {
    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(recipes.len());

    for recipe in recipes {
        let base = recipe_filename(&recipe.title);
        let mut filename = base.clone();
        let mut n = 2;
        while !used.insert(filename.clone()) {
            filename = format!("{}_{}.txt", base.trim_end_matches(".txt"), n);
            n += 1;
        }

        let path = dir.join(&filename);
        std::fs::write(&path, format_recipe(recipe))
            .with_context(|| format!("Failed to write recipe to {}", path.display()))?;
        debug!("Wrote {}", path.display());
        paths.push(path);
    }

    Ok(paths)
}

/// Save recipes as JSON so a later run can rebuild from them.
pub fn write_recipes_json(dir: &Path, recipes: &[Recipe]) -> Result<PathBuf> {
    let path = dir.join(RECIPES_JSON);
    let content = serde_json::to_string_pretty(recipes)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write recipes to {}", path.display()))?;
    Ok(path)
}

/// Load recipes previously saved with [`write_recipes_json`].
pub fn load_recipes_json(path: &Path) -> Result<Vec<Recipe>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipes file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse recipes file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use crate::shopping::build_shopping_list;
    use tempfile::TempDir;

    fn create_test_recipe() -> Recipe {
        Recipe {
            title: "Chicken Quesadilla".to_string(),
            description: "Crispy and cheesy".to_string(),
            ingredients: vec![
                Ingredient::new("tortilla", None, Some(2.0)),
                Ingredient::new("chicken breast", Some("cup"), Some(1.5)),
                Ingredient::new("salt", Some("pinch"), None),
                Ingredient::new("salsa", None, None),
            ],
            instructions: vec!["Fill the tortillas".to_string(), "Grill".to_string()],
            source: Some("https://example.com/quesadilla".to_string()),
        }
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(3.5), "3.5");
    }

    #[test]
    fn test_format_recipe() {
        let text = format_recipe(&create_test_recipe());

        let expected = "Recipe: Chicken Quesadilla\n\
            Description: Crispy and cheesy\n\n\
            Ingredients:\n\
            - 2 tortilla\n\
            - 1.5 cup chicken breast\n\
            - pinch salt\n\
            - salsa\n\n\
            Instructions:\n\
            1. Fill the tortillas\n\
            2. Grill\n\n\
            Source: https://example.com/quesadilla";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_recipe_without_source() {
        let recipe = Recipe {
            source: None,
            ..create_test_recipe()
        };
        let text = format_recipe(&recipe);
        assert!(text.ends_with("2. Grill"));
        assert!(!text.contains("Source:"));
    }

    #[test]
    fn test_shopping_list_text() {
        let recipes = vec![Recipe {
            ingredients: vec![
                Ingredient::new("chicken breast", Some("lb"), Some(2.0)),
                Ingredient::new("chicken breast", Some("lb"), Some(1.5)),
                Ingredient::new("eggs", None, Some(2.0)),
                Ingredient::new("eggs", None, Some(3.0)),
                Ingredient::new("salt", None, None),
            ],
            ..create_test_recipe()
        }];
        let list = build_shopping_list(&recipes).unwrap();

        let text = generate_shopping_list_text(&list);

        assert_eq!(
            text,
            "Shopping List:\n\nchicken breast (lb): 3.5 lb\neggs: 5\n"
        );
    }

    #[test]
    fn test_shopping_list_json() {
        let recipes = vec![create_test_recipe()];
        let list = build_shopping_list(&recipes).unwrap();

        let json = generate_shopping_list_json(&list).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tortilla"]["quantity"], 2.0);
        assert_eq!(value["chicken breast (cup)"]["unit"], "cup");
        assert!(value.get("salsa").is_none());
    }

    #[test]
    fn test_recipe_filename() {
        assert_eq!(recipe_filename("Chicken Quesadilla"), "Chicken_Quesadilla.txt");
        assert_eq!(
            recipe_filename("Mom's Greek-Yogurt Parfait!"),
            "Mom_s_Greek-Yogurt_Parfait_.txt"
        );
        assert_eq!(recipe_filename("a/b"), "a_b.txt");
        assert_eq!(recipe_filename(""), "recipe.txt");
    }

    #[test]
    fn test_create_output_dir() {
        let temp_dir = TempDir::new().unwrap();

        let dir = create_output_dir(temp_dir.path(), "recipes", 1700000000).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with("recipes_1700000000"));

        assert!(create_output_dir(temp_dir.path(), "recipes", 1700000000).is_err());
    }

    #[test]
    fn test_write_recipes_dedupes_names() {
        let temp_dir = TempDir::new().unwrap();
        let recipes = vec![create_test_recipe(), create_test_recipe()];

        let paths = write_recipes(temp_dir.path(), &recipes).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("Chicken_Quesadilla.txt"));
        assert!(paths[1].ends_with("Chicken_Quesadilla_2.txt"));
        let content = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(content.starts_with("Recipe: Chicken Quesadilla"));
    }

    #[test]
    fn test_recipes_json_round_trip_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let recipes = vec![create_test_recipe()];

        let path = write_recipes_json(temp_dir.path(), &recipes).unwrap();
        let loaded = load_recipes_json(&path).unwrap();

        assert_eq!(loaded, recipes);
    }
}

//! Data models for the meal planner.
//!
//! This module contains the core data structures used throughout
//! the application: the structured shapes the LLM fills in (meal ideas,
//! recipes, ingredients) and the shopping list produced from them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single ingredient line within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Canonical ingredient name in its simplest form (e.g. "chicken breast").
    pub item: String,
    /// Unit of measure, absent for countable items like "2 eggs".
    #[serde(default)]
    pub unit: Option<String>,
    /// Amount needed, absent when the recipe gives none (e.g. "salt to taste").
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl Ingredient {
    /// Creates an ingredient from its parts.
    pub fn new(item: impl Into<String>, unit: Option<&str>, quantity: Option<f64>) -> Self {
        Self {
            item: item.into(),
            unit: unit.map(String::from),
            quantity,
        }
    }

    /// Returns the unit, treating an empty string the same as no unit.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| !u.is_empty())
    }
}

/// A complete recipe ready to shop for and follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// URL of the page the recipe was based on, if any.
    #[serde(default)]
    pub source: Option<String>,
}

/// General meal categories derived from the user's context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIdeas {
    pub ideas: Vec<String>,
}

/// Recipes generated for one meal idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecipes {
    pub recipes: Vec<Recipe>,
}

/// One consolidated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Total amount across all recipes.
    pub quantity: f64,
    /// Unit shared by every amount folded into this entry.
    pub unit: Option<String>,
}

/// A type the LLM can be asked to produce as structured JSON output.
///
/// The schema follows the strict subset accepted by OpenAI structured
/// outputs: every property is listed in `required`, optional fields are
/// expressed as nullable types, and additional properties are rejected.
pub trait StructuredOutput: serde::de::DeserializeOwned {
    /// Name sent alongside the schema.
    const SCHEMA_NAME: &'static str;

    /// JSON schema describing the expected response.
    fn json_schema() -> Value;
}

fn ingredient_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "item": {
                "type": "string",
                "description": "Ingredient name in its simplest form, e.g. 'chicken breast' instead of 'boneless skinless chicken breasts, diced'"
            },
            "unit": {
                "type": ["string", "null"],
                "description": "Unit of measure such as 'cup', 'tbsp' or 'lb'; null for countable items"
            },
            "quantity": {
                "type": ["number", "null"],
                "description": "Numeric amount; null when not specified"
            }
        },
        "required": ["item", "unit", "quantity"],
        "additionalProperties": false
    })
}

fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "ingredients": { "type": "array", "items": ingredient_schema() },
            "instructions": { "type": "array", "items": { "type": "string" } },
            "source": {
                "type": ["string", "null"],
                "description": "URL of the research the recipe is based on, if any"
            }
        },
        "required": ["title", "description", "ingredients", "instructions", "source"],
        "additionalProperties": false
    })
}

impl StructuredOutput for MealIdeas {
    const SCHEMA_NAME: &'static str = "meal_ideas";

    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "ideas": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["ideas"],
            "additionalProperties": false
        })
    }
}

impl StructuredOutput for IdeaRecipes {
    const SCHEMA_NAME: &'static str = "idea_recipes";

    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipes": { "type": "array", "items": recipe_schema() }
            },
            "required": ["recipes"],
            "additionalProperties": false
        })
    }
}

/// Summary of a completed run, printed at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of meal ideas generated.
    pub ideas: usize,
    /// Number of recipe files written.
    pub recipes_written: usize,
    /// Number of lines in the shopping list.
    pub shopping_items: usize,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_unit_treats_empty_as_absent() {
        assert_eq!(Ingredient::new("eggs", Some(""), Some(2.0)).unit(), None);
        assert_eq!(Ingredient::new("eggs", None, Some(2.0)).unit(), None);
        assert_eq!(
            Ingredient::new("milk", Some("cup"), Some(1.0)).unit(),
            Some("cup")
        );
    }

    #[test]
    fn test_recipe_deserializes_with_null_fields() {
        let json = r#"{
            "title": "Chicken Quesadilla",
            "description": "Cheesy and quick",
            "ingredients": [
                {"item": "tortilla", "unit": null, "quantity": 2},
                {"item": "salt", "unit": null, "quantity": null},
                {"item": "chicken breast", "unit": "cup", "quantity": 1.5}
            ],
            "instructions": ["Fill", "Fold", "Grill"],
            "source": null
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].quantity, Some(2.0));
        assert_eq!(recipe.ingredients[1].quantity, None);
        assert_eq!(recipe.ingredients[2].unit(), Some("cup"));
        assert!(recipe.source.is_none());
    }

    #[test]
    fn test_recipe_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "title": "Toast",
            "description": "Bread, but hot",
            "ingredients": [{"item": "bread"}],
            "instructions": []
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients[0], Ingredient::new("bread", None, None));
    }

    #[test]
    fn test_schemas_require_every_property() {
        let schema = IdeaRecipes::json_schema();
        let recipe = &schema["properties"]["recipes"]["items"];
        let required: Vec<_> = recipe["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for key in recipe["properties"].as_object().unwrap().keys() {
            assert!(required.contains(&key.as_str()), "{} not required", key);
        }
        assert_eq!(MealIdeas::SCHEMA_NAME, "meal_ideas");
    }
}

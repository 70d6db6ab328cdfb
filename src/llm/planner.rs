//! Meal planning: ideas first, then recipes for every idea.
//!
//! Recipe generation for each idea is independent, so all ideas are
//! fetched concurrently and awaited together.

use crate::llm::client::{ChatMessage, LlmClient};
use crate::models::{IdeaRecipes, MealIdeas, Recipe};
use crate::search::{format_search_results, ExaClient};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::future::Future;
use tracing::{debug, info, warn};

/// Plans meals using an LLM and, optionally, web search for context.
pub struct MealPlanner {
    llm: LlmClient,
    search: Option<ExaClient>,
}

impl MealPlanner {
    /// Create a planner. Without a search client, recipes are generated
    /// from the model's own knowledge.
    pub fn new(llm: LlmClient, search: Option<ExaClient>) -> Self {
        info!(
            "Initializing meal planner with model {} (web search {})",
            llm.model_name(),
            if search.is_some() { "on" } else { "off" }
        );
        Self { llm, search }
    }

    /// Split the user's context into general meal ideas.
    pub async fn get_meal_ideas(&self, context: &str) -> Result<MealIdeas> {
        let messages = [
            ChatMessage::system(MEAL_IDEAS_SYSTEM_PROMPT),
            ChatMessage::user(context),
        ];

        let ideas: MealIdeas = self
            .llm
            .complete(&messages)
            .await
            .context("Failed to generate meal ideas")?;

        info!("Generated {} meal ideas", ideas.ideas.len());
        debug!("Meal ideas: {:?}", ideas.ideas);
        Ok(ideas)
    }

    /// Generate complete recipes for one meal idea.
    pub async fn get_recipes(&self, idea: &str) -> Result<IdeaRecipes> {
        let research = match &self.search {
            Some(search) => {
                let results = search
                    .search(idea)
                    .await
                    .with_context(|| format!("Search failed for '{}'", idea))?;
                format_search_results(&results)
            }
            None => String::new(),
        };

        let messages = [
            ChatMessage::system(RECIPES_SYSTEM_PROMPT),
            ChatMessage::user(recipe_prompt(idea, &research)),
        ];

        let recipes: IdeaRecipes = self.llm.complete(&messages).await?;

        if recipes.recipes.is_empty() {
            warn!("No recipes generated for '{}'", idea);
        }
        Ok(recipes)
    }

    /// Fetch recipes for all ideas concurrently.
    pub async fn get_all_recipes(&self, ideas: &[String]) -> Result<Vec<Recipe>> {
        gather_recipes(ideas, |idea| self.get_recipes(idea)).await
    }
}

/// Build the user message for a recipe request.
pub fn recipe_prompt(idea: &str, research: &str) -> String {
    format!("Meal Idea: {}\n\nContext:\n{}", idea, research)
}

/// Run `fetch` for every idea at once and flatten the recipes in idea order.
///
/// The first failed fetch (in idea order) fails the whole batch.
pub async fn gather_recipes<'a, F, Fut>(ideas: &'a [String], fetch: F) -> Result<Vec<Recipe>>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<IdeaRecipes>>,
{
    info!("Fetching recipes for {} ideas", ideas.len());

    let results = join_all(ideas.iter().map(|idea| fetch(idea.as_str()))).await;

    let mut all_recipes = Vec::new();
    for (idea, result) in ideas.iter().zip(results) {
        let recipes = result.with_context(|| format!("Failed to get recipes for '{}'", idea))?;
        debug!("'{}' produced {} recipes", idea, recipes.recipes.len());
        all_recipes.extend(recipes.recipes);
    }

    Ok(all_recipes)
}

/// System prompt for turning context into meal ideas
const MEAL_IDEAS_SYSTEM_PROMPT: &str = r#"You help a user decide what to eat. The user describes what they are looking for in their food,
and you split that description into discrete GENERAL CATEGORIES of meals. Do not get too specific with each meal.

EXAMPLE

CONTEXT:
"My personal trainer told me I need to eat more protein. I have to eat 2 cups of chicken a day, and 1 cup of greek yogurt. I think the yogurt would be good with some honey, blueberries, and granola. Perhaps some quesadillas for the chicken too?"
OUTPUT:
tasty grilled chicken meals, chicken quesadilla, greek yogurt with honey and fruit, parfait breakfast
"#;

/// System prompt for recipe generation
const RECIPES_SYSTEM_PROMPT: &str = r#"You help a chef prepare the meals they have in mind. The chef gives you a meal idea and you
write complete recipes they can shop for and follow. You may also receive research the chef has gathered;
when it is present, base your recipes on it and set the source to the URL you drew from.

Write every ingredient name in its simplest form (e.g. "chicken breast", "greek yogurt") so the same
ingredient is spelled the same way across recipes. Use numeric quantities and short units (cup, tbsp, tsp, lb, oz, g).
"#;

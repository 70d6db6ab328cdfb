//! Mealprep - LLM-powered meal planner.
//!
//! Turns free-text context into meal ideas, researched recipes, and a
//! consolidated shopping list.

pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod report;
pub mod search;
pub mod shopping;

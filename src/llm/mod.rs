//! LLM modules for meal planning.
//!
//! This module provides the structured-output chat client and the planner
//! that drives it.

pub mod client;
pub mod planner;

pub use client::{LlmClient, LlmConfig};
pub use planner::MealPlanner;

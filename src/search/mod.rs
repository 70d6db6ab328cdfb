//! Web search modules.

pub mod exa;

pub use exa::{format_search_results, ExaClient, SearchConfig, SearchResult};

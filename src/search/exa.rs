//! Web search through the Exa API.
//!
//! Search results give the LLM real recipes to draw from when it writes
//! its own.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the search client.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_url: String,
    pub api_key: String,
    pub num_results: usize,
    pub search_type: String,
    pub use_autoprompt: bool,
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.exa.ai".to_string(),
            api_key: String::new(),
            num_results: 5,
            search_type: "neural".to_string(),
            use_autoprompt: true,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    search_type: &'a str,
    use_autoprompt: bool,
    num_results: usize,
    contents: Contents,
}

#[derive(Debug, Serialize)]
struct Contents {
    text: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

/// A single page returned by the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Client for the Exa search endpoint.
#[derive(Debug, Clone)]
pub struct ExaClient {
    config: SearchConfig,
    http_client: reqwest::Client,
}

impl ExaClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Search the web for `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.config.api_url.trim_end_matches('/'));

        let request = SearchRequest {
            query,
            search_type: &self.config.search_type,
            use_autoprompt: self.config.use_autoprompt,
            num_results: self.config.num_results,
            contents: Contents { text: true },
        };

        debug!("Searching for: {}", query);

        let response = self
            .http_client
            .post(&url)
            .header("accept", "application/json")
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Search timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!("Cannot connect to search API at {}", self.config.api_url)
                } else {
                    anyhow::anyhow!("Failed to send search request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Search API error {}: {}", status, body));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        info!(
            "Search for '{}' returned {} results",
            query,
            search_response.results.len()
        );

        Ok(search_response.results)
    }
}

/// Format search results as context for the LLM.
pub fn format_search_results(results: &[SearchResult]) -> String {
    let mut output = String::new();

    for result in results {
        output.push_str(&format!("URL: {}\n\n", result.url));
        output.push_str(&format!(
            "Author: {}\n\n",
            result.author.as_deref().unwrap_or("Unknown")
        ));
        output.push_str(&format!("Text: {}\n\n", result.text.as_deref().unwrap_or("")));
        output.push_str("\n\n");
    }

    output.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_search_results() {
        let results = vec![
            SearchResult {
                url: "https://example.com/a".to_string(),
                title: None,
                author: Some("Jamie".to_string()),
                text: Some("Grill the chicken.".to_string()),
            },
            SearchResult {
                url: "https://example.com/b".to_string(),
                title: Some("B".to_string()),
                author: None,
                text: None,
            },
        ];

        let formatted = format_search_results(&results);

        assert!(formatted.starts_with("URL: https://example.com/a\n\nAuthor: Jamie\n\n"));
        assert!(formatted.contains("Text: Grill the chicken.\n\n\n\nURL: https://example.com/b"));
        assert!(formatted.contains("Author: Unknown"));
        assert!(formatted.ends_with("Text:"));
    }

    #[test]
    fn test_format_no_results() {
        assert_eq!(format_search_results(&[]), "");
    }

    #[test]
    fn test_request_serialization() {
        let request = SearchRequest {
            query: "chicken quesadilla",
            search_type: "neural",
            use_autoprompt: true,
            num_results: 5,
            contents: Contents { text: true },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "neural");
        assert_eq!(value["useAutoprompt"], true);
        assert_eq!(value["numResults"], 5);
        assert_eq!(value["contents"]["text"], true);
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{"results": [{"url": "https://x.test", "author": null, "text": "t", "score": 0.9}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].text.as_deref(), Some("t"));
    }
}

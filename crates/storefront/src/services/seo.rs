//! AI-assisted SEO suggestions for product listings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::claude::{ClaudeClient, ClaudeError, Message};

const SYSTEM_PROMPT: &str = "You are an SEO expert specializing in e-commerce product listings \
for a luxury watch retailer. Respond with a single JSON object and nothing else.";

/// Errors from the SEO suggestion service.
#[derive(Debug, Error)]
pub enum SeoError {
    /// The Claude request failed.
    #[error("Claude request failed: {0}")]
    Claude(#[from] ClaudeError),

    /// The model answered with something other than the expected JSON.
    #[error("Unexpected model output: {0}")]
    Output(String),
}

/// Keywords and rewritten copy for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoSuggestion {
    pub keywords: Vec<String>,
    pub optimized_description: String,
}

#[derive(Deserialize)]
struct RawSuggestion {
    suggested_keywords: String,
    optimized_description: String,
}

/// Drafts SEO keywords and descriptions through Claude.
#[derive(Clone)]
pub struct SeoService {
    client: ClaudeClient,
}

impl SeoService {
    #[must_use]
    pub const fn new(client: ClaudeClient) -> Self {
        Self { client }
    }

    /// Suggest keywords and an optimized description for a product.
    ///
    /// # Errors
    ///
    /// Returns `SeoError` if the request fails or the answer cannot be parsed.
    #[instrument(skip(self, current_description), fields(model = %self.client.model()))]
    pub async fn suggest(
        &self,
        product_name: &str,
        current_description: &str,
    ) -> Result<SeoSuggestion, SeoError> {
        let prompt = build_prompt(product_name, current_description);
        let response = self
            .client
            .chat(vec![Message::user(prompt)], Some(SYSTEM_PROMPT.to_string()))
            .await?;

        let suggestion = parse_suggestion(&response.text())?;
        tracing::info!(
            keywords = suggestion.keywords.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "SEO suggestion generated"
        );
        Ok(suggestion)
    }
}

fn build_prompt(product_name: &str, current_description: &str) -> String {
    format!(
        "Analyze the product below and suggest relevant SEO keywords and an \
optimized product description that improves search visibility while staying \
accurate and appealing to buyers.\n\n\
Product Name: {product_name}\n\
Current Description: {current_description}\n\n\
Answer with JSON of the form \
{{\"suggested_keywords\": \"keyword one, keyword two\", \
\"optimized_description\": \"...\"}}. \
suggested_keywords is a single comma-separated string."
    )
}

/// Parse the model's JSON answer, tolerating a surrounding code fence.
fn parse_suggestion(raw: &str) -> Result<SeoSuggestion, SeoError> {
    let body = strip_code_fence(raw.trim());
    let parsed: RawSuggestion =
        serde_json::from_str(body).map_err(|e| SeoError::Output(e.to_string()))?;

    let keywords: Vec<String> = parsed
        .suggested_keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    let optimized_description = parsed.optimized_description.trim().to_string();

    if keywords.is_empty() && optimized_description.is_empty() {
        return Err(SeoError::Output("empty suggestion".to_string()));
    }

    Ok(SeoSuggestion {
        keywords,
        optimized_description,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

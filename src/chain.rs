//! LLM-backed answer chain.
//!
//! Embeds the question, retrieves the top-k chunks, formats the instruction
//! prompt and asks the hosted model. Text in, text out; upstream failures
//! surface as errors for the HTTP layer to render.

use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::rag::VectorStore;

/// Literal substring of the model's refusal sentence; its presence in a
/// reply is the signal that triggers the deterministic fallback.
pub const NO_MATCH_MARKER: &str = "Sorry";

const PROMPT_TEMPLATE: &str = r#"You are an expert assistant for laptop recommendations, specializing in finding laptops that precisely match user queries.

Your task is to analyze the provided context, which contains laptop details in the format: Product Name | Specification | Price. Recommend laptops that exactly match the user's query, including price range and specific features (e.g., RAM, storage).

Guidelines:
- If the query specifies a price range (e.g., "₹50000 to ₹70000"), only recommend laptops within that range.
- If specific features are requested (e.g., "16 GB RAM", "1 TB harddisk"), only include laptops that match those features exactly.
- Define "best" as laptops with the strongest specifications (e.g., faster processor, higher RAM, larger storage) within the price range and requested features.
- List up to 3 laptops, sorted by price (cheapest first), including product name, key specifications, and price.
- If no laptops match all criteria, respond with: "Sorry, no laptops found matching your criteria in the dataset."
- Do not invent information, include laptops outside the context, or make assumptions about user intent (e.g., "for college students").
- Keep the response concise and user-friendly.

Context:
{context}

Question:
{question}

Helpful Answer:
"#;

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chat_model: String,
    pub embedding_model: String,
    pub top_k: usize,
    pub temperature: f64,
    pub max_tokens: i32,
}

pub struct AnswerChain {
    store: Arc<dyn VectorStore>,
    provider: Arc<dyn LlmProvider>,
    config: ChainConfig,
}

impl AnswerChain {
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<dyn LlmProvider>,
        config: ChainConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    pub async fn answer(&self, question: &str) -> Result<String, ApiError> {
        let query_embedding = self
            .provider
            .embed(&[question.to_string()], &self.config.embedding_model)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Upstream("empty embedding response".to_string()))?;

        let hits = self
            .store
            .search(&query_embedding, self.config.top_k)
            .await?;

        let context = hits
            .iter()
            .map(|hit| hit.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = render_prompt(&context, question);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens);

        self.provider.chat(request, &self.config.chat_model).await
    }
}

fn render_prompt(context: &str, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_substitutes_context_and_question() {
        let prompt = render_prompt(
            "HP Pavilion | i5 | ₹55990.00\n\nDell Inspiron | R5 | ₹47990.50",
            "best laptop below 60000",
        );

        assert!(prompt.contains("HP Pavilion | i5 | ₹55990.00"));
        assert!(prompt.contains("Question:\nbest laptop below 60000"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }

    #[test]
    fn refusal_sentence_contains_the_marker() {
        assert!(PROMPT_TEMPLATE.contains("Sorry, no laptops found matching your criteria"));
        assert!("Sorry, no laptops found matching your criteria in the dataset."
            .contains(NO_MATCH_MARKER));
    }
}

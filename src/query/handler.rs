//! Query handler: the one component with decision logic.
//!
//! Primary path hands the transcript-refined query to the answer chain.
//! When the model signals failure and structured constraints were extracted,
//! the handler discards the model answer and recommends straight from the
//! catalog instead.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;

use super::constraints::{self, QueryConstraints};
use crate::catalog::{Catalog, CatalogRow};
use crate::chain::{AnswerChain, NO_MATCH_MARKER};
use crate::core::errors::ApiError;
use crate::history::ConversationLog;

pub const EMPTY_QUERY_PROMPT: &str = "Please enter a query.";

const MAX_RECOMMENDATIONS: usize = 3;

pub struct QueryHandler {
    catalog: Arc<Catalog>,
    chain: AnswerChain,
    history: ConversationLog,
}

impl QueryHandler {
    pub fn new(catalog: Arc<Catalog>, chain: AnswerChain, history: ConversationLog) -> Self {
        Self {
            catalog,
            chain,
            history,
        }
    }

    /// Answer a free-text query and append the turn to the log.
    ///
    /// An empty query short-circuits without touching the model or the log.
    /// A chain error propagates without appending; the HTTP layer turns it
    /// into a human-readable message.
    pub async fn handle(&self, query: &str) -> Result<String, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(EMPTY_QUERY_PROMPT.to_string());
        }

        let constraints = constraints::extract(query);

        let refined = format!(
            "{}\nPrevious chats:\n{}",
            query,
            self.history.transcript()
        );
        let mut response = self.chain.answer(&refined).await?;

        if response.contains(NO_MATCH_MARKER) && !constraints.is_empty() {
            tracing::debug!("Model reply signalled no match; using catalog fallback");
            response = self.fallback(&constraints);
        }

        self.history.append(query, response.as_str());
        Ok(response)
    }

    /// Deterministic recommendation path: trust the dataset, not the model.
    fn fallback(&self, constraints: &QueryConstraints) -> String {
        let matches = filter_catalog(&self.catalog, constraints);
        let described = describe_constraints(constraints);

        if matches.is_empty() {
            return format!("Sorry, no laptops found {} in the dataset.", described);
        }

        let listing = matches
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|row| row.format())
            .collect::<Vec<_>>()
            .join("\n");
        format!("Recommended laptops {}:\n{}", described, listing)
    }
}

/// Rows satisfying every extracted constraint, cheapest first.
///
/// Feature checks run against the raw specification text, mirroring the
/// extraction patterns ("<n> gb ram", "<n> tb") with flexible whitespace.
pub fn filter_catalog<'a>(catalog: &'a Catalog, c: &QueryConstraints) -> Vec<&'a CatalogRow> {
    let ram_re = c.required_ram.as_ref().map(|ram| {
        Regex::new(&format!(r"(?i){}\s*gb\s*ram", regex::escape(ram))).expect("ram filter regex")
    });
    let storage_re = c.required_storage.as_ref().map(|storage| {
        Regex::new(&format!(r"(?i){}\s*tb", regex::escape(storage))).expect("storage filter regex")
    });

    let mut rows: Vec<&CatalogRow> = catalog
        .rows()
        .iter()
        .filter(|row| {
            if let (Some(min), Some(max)) = (c.price_min, c.price_max) {
                if row.price < min || row.price > max {
                    return false;
                }
            }
            if let Some(re) = &ram_re {
                if !re.is_match(&row.specification) {
                    return false;
                }
            }
            if let Some(re) = &storage_re {
                if !re.is_match(&row.specification) {
                    return false;
                }
            }
            true
        })
        .collect();

    rows.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
    rows
}

/// Human-readable echo of the constraints that are actually present.
fn describe_constraints(c: &QueryConstraints) -> String {
    let mut parts = Vec::new();

    if let (Some(min), Some(max)) = (c.price_min, c.price_max) {
        parts.push(format!("between ₹{:.2} and ₹{:.2}", min, max));
    }

    let mut features = Vec::new();
    if let Some(ram) = &c.required_ram {
        features.push(format!("{} GB RAM", ram));
    }
    if let Some(storage) = &c.required_storage {
        features.push(format!("{} TB storage", storage));
    }
    if !features.is_empty() {
        parts.push(format!("with {}", features.join(" and ")));
    }

    parts.join(" ")
}

//! Structured constraint extraction from free-text queries.
//!
//! Pure function, best-effort, first match only. No min<max validation, no
//! multiple ranges, no unit normalization ("gb ram" and "tb" literals only).

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConstraints {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub required_ram: Option<String>,
    pub required_storage: Option<String>,
}

impl QueryConstraints {
    /// True when nothing structured was found; the fallback path never
    /// triggers in that case.
    pub fn is_empty(&self) -> bool {
        self.price_min.is_none()
            && self.required_ram.is_none()
            && self.required_storage.is_none()
    }
}

fn price_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(?:rs|rupees)?\s*to\s*(\d+)\s*(?:rs|rupees)?")
            .expect("price range regex")
    })
}

fn ram_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*gb\s*ram").expect("ram regex"))
}

fn storage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*tb\s*(?:harddisk|hdd|ssd)").expect("storage regex"))
}

pub fn extract(query: &str) -> QueryConstraints {
    let mut constraints = QueryConstraints::default();

    if let Some(caps) = price_range_re().captures(query) {
        constraints.price_min = caps[1].parse().ok();
        constraints.price_max = caps[2].parse().ok();
    }

    if let Some(caps) = ram_re().captures(query) {
        constraints.required_ram = Some(caps[1].to_string());
    }

    if let Some(caps) = storage_re().captures(query) {
        constraints.required_storage = Some(caps[1].to_string());
    }

    constraints
}

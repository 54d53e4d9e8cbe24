//! Catalog row chunking.
//!
//! Each row is rendered to its canonical pipe-delimited line and split into
//! fixed-size character windows with a fixed overlap. Rows are short, so the
//! common case is one chunk per row.

use uuid::Uuid;

use super::store::StoredChunk;
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 400,
            chunk_overlap: 50,
        }
    }
}

/// Render every catalog row and split it into overlapping windows.
pub fn chunk_catalog(catalog: &Catalog, config: ChunkerConfig) -> Vec<StoredChunk> {
    let mut chunks = Vec::with_capacity(catalog.len());

    for row in catalog.rows() {
        let text = row.format();
        for window in split_into_windows(&text, config.chunk_size, config.chunk_overlap) {
            chunks.push(StoredChunk {
                chunk_id: Uuid::new_v4().to_string(),
                content: window,
                price: row.price,
                specification: row.specification.clone(),
            });
        }
    }

    chunks
}

/// Fixed-size sliding window over characters; step = size - overlap.
fn split_into_windows(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    if total_chars == 0 {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut windows = Vec::new();
    let mut start = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        let window: String = chars[start..end].iter().collect();
        windows.push(window.trim().to_string());

        if end == total_chars {
            break;
        }
        start += step;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRow;

    #[test]
    fn short_row_yields_a_single_chunk() {
        let catalog = Catalog::from_rows(vec![CatalogRow {
            name: "HP Pavilion".to_string(),
            specification: "Intel i5 16 GB RAM 1 TB HDD".to_string(),
            price: 55990.0,
        }]);

        let chunks = chunk_catalog(&catalog, ChunkerConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].content,
            "HP Pavilion | Intel i5 16 GB RAM 1 TB HDD | ₹55990.00"
        );
        assert_eq!(chunks[0].price, 55990.0);
        assert_eq!(chunks[0].specification, "Intel i5 16 GB RAM 1 TB HDD");
    }

    #[test]
    fn long_text_is_windowed_with_overlap() {
        let text = "x".repeat(1000);
        let windows = split_into_windows(&text, 400, 50);

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].chars().count(), 400);
        assert_eq!(windows[1].chars().count(), 400);
        // windows advance by 350, so the last starts at 700
        assert_eq!(windows[2].chars().count(), 300);
        assert!(windows.iter().all(|w| w.chars().count() <= 400));
    }

    #[test]
    fn consecutive_windows_share_the_overlap_region() {
        let text: String = ('a'..='z').cycle().take(500).collect();
        let windows = split_into_windows(&text, 400, 50);

        assert_eq!(windows.len(), 2);
        let tail: String = windows[0].chars().skip(350).collect();
        let head: String = windows[1].chars().take(50).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn empty_text_yields_no_windows() {
        assert!(split_into_windows("", 400, 50).is_empty());
    }
}

//! One crawl's worth of openings.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::Opening;

/// Openings from a single crawl, indexed by code and kept in page order.
#[derive(Debug)]
pub struct Dataset {
    by_code: HashMap<String, Opening>,
    ordered: Vec<Opening>,
    crawled_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Index `openings`. On duplicate codes the later row wins the lookup;
    /// the ordered list keeps every row.
    pub fn new(openings: Vec<Opening>, ttl: Duration) -> Self {
        let by_code = openings
            .iter()
            .map(|opening| (opening.code.clone(), opening.clone()))
            .collect();
        let crawled_at = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| crawled_at.checked_add_signed(ttl));

        Self {
            by_code,
            ordered: openings,
            crawled_at,
            expires_at,
        }
    }

    pub fn get(&self, code: &str) -> Option<&Opening> {
        self.by_code.get(code)
    }

    pub fn openings(&self) -> &[Opening] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn crawled_at(&self) -> DateTime<Utc> {
        self.crawled_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_code_keeps_last_row_for_lookup() {
        let dataset = Dataset::new(
            vec![
                Opening::new("A00", "first", "1 b4"),
                Opening::new("A01", "other", "1 b3"),
                Opening::new("A00", "second", "1 g4"),
            ],
            Duration::from_secs(180),
        );

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.get("A00").unwrap().author, "second");
        assert_eq!(dataset.openings()[0].author, "first");
    }

    #[test]
    fn expiry_is_ttl_after_crawl() {
        let dataset = Dataset::new(vec![], Duration::from_secs(180));
        assert_eq!(
            dataset.expires_at().unwrap() - dataset.crawled_at(),
            chrono::Duration::seconds(180)
        );
    }
}

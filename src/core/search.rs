//! Case-insensitive substring search over route records.
//!
//! Each field is tested on its own, so a query never matches across the
//! border of two fields. Results keep table order; there is no ranking.

use rayon::prelude::*;

use crate::core::route::RouteRecord;

/// Below this many rows a sequential scan beats fanning out to rayon.
const PARALLEL_THRESHOLD: usize = 2048;

/// Lower-cased searchable fields of one record.
#[derive(Debug, Clone)]
struct Haystack {
    verb: String,
    uri_pattern: String,
    handler: String,
    prefix: String,
}

impl Haystack {
    fn new(record: &RouteRecord) -> Self {
        Self {
            verb: record.verb.to_lowercase(),
            uri_pattern: record.uri_pattern.to_lowercase(),
            handler: record.handler().to_lowercase(),
            prefix: record.prefix.to_lowercase(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.verb.contains(needle)
            || self.uri_pattern.contains(needle)
            || self.handler.contains(needle)
            || self.prefix.contains(needle)
    }
}

/// Precomputed lower-case view of a record set.
///
/// Built once per loaded set; each query then only lower-cases itself.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    haystacks: Vec<Haystack>,
}

impl SearchIndex {
    pub fn build(records: &[RouteRecord]) -> Self {
        Self {
            haystacks: records.iter().map(Haystack::new).collect(),
        }
    }

    /// Indices of matching records, ascending.
    pub fn matches(&self, query: &str) -> Vec<usize> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return (0..self.haystacks.len()).collect();
        }

        if self.haystacks.len() < PARALLEL_THRESHOLD {
            return self
                .haystacks
                .iter()
                .enumerate()
                .filter(|(_, h)| h.contains(&needle))
                .map(|(i, _)| i)
                .collect();
        }

        // Indexed collect keeps the original order
        self.haystacks
            .par_iter()
            .enumerate()
            .filter(|(_, h)| h.contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Records matching `query`, in their original order.
    ///
    /// `records` must be the slice this index was built from.
    pub fn filter(&self, records: &[RouteRecord], query: &str) -> Vec<RouteRecord> {
        debug_assert_eq!(records.len(), self.haystacks.len());
        self.matches(query)
            .into_iter()
            .filter_map(|i| records.get(i).cloned())
            .collect()
    }
}

/// Filter `records` by `query` without keeping an index around.
pub fn filter(records: &[RouteRecord], query: &str) -> Vec<RouteRecord> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| Haystack::new(r).contains(&needle))
        .cloned()
        .collect()
}

fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

//! # Tally Module
//!
//! Vote counts per candidate, updated immutably.
//!
//! ## Copy-on-Increment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   before: { a: 1 }  ──── incremented("b") ────►  after: { a: 1, b: 1 }  │
//! │      │                                                                  │
//! │      └── still { a: 1 } (borrowed, never written)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The election session swaps its stored tally for the returned value on
//! every accepted vote.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Tally
// =============================================================================

/// Candidate id → vote count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally(BTreeMap<String, u64>);

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `candidate_id`, 0 when absent.
    #[inline]
    pub fn get(&self, candidate_id: &str) -> u64 {
        self.0.get(candidate_id).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of candidates with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(id, count)| (id.as_str(), *count))
    }

    /// Returns a new tally with `candidate_id` bumped by one.
    ///
    /// `self` is left as it was.
    #[must_use]
    pub fn incremented(&self, candidate_id: &str) -> Tally {
        let mut next = self.0.clone();
        let count = next.entry(candidate_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        Tally(next)
    }
}

impl From<BTreeMap<String, u64>> for Tally {
    fn from(counts: BTreeMap<String, u64>) -> Self {
        Tally(counts)
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Tally(iter.into_iter().map(|(id, count)| (id.into(), count)).collect())
    }
}

// =============================================================================
// Pure Updaters
// =============================================================================

/// Increments `candidate_id` in a copy of `current`.
///
/// ## Example
/// ```rust
/// use ballot_core::tally::{tally_pure, Tally};
///
/// let before: Tally = [("a", 1)].into_iter().collect();
/// let after = tally_pure(&before, "b");
///
/// assert_eq!(after.get("a"), 1);
/// assert_eq!(after.get("b"), 1);
/// assert_eq!(before.get("b"), 0);
/// ```
pub fn tally_pure(current: &Tally, candidate_id: &str) -> Tally {
    current.incremented(candidate_id)
}

/// [`tally_pure`] over an untyped mapping.
///
/// Anything that is not a JSON object is treated as an empty tally. An
/// existing count that is not a number restarts from 0.
pub fn tally_pure_value(current: &Value, candidate_id: &str) -> Value {
    let mut counts = current.as_object().cloned().unwrap_or_else(Map::new);

    let previous = counts.get(candidate_id);
    let next = match previous.and_then(Value::as_u64) {
        Some(count) => Value::from(count.saturating_add(1)),
        None => match previous.and_then(Value::as_f64) {
            Some(count) => Value::from(count + 1.0),
            None => Value::from(1u64),
        },
    };

    counts.insert(candidate_id.to_string(), next);
    Value::Object(counts)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_increment_new_candidate() {
        let before: Tally = [("a", 1)].into_iter().collect();
        let after = tally_pure(&before, "b");

        assert_eq!(after, [("a", 1), ("b", 1)].into_iter().collect::<Tally>());
        assert_eq!(before, [("a", 1)].into_iter().collect::<Tally>());
    }

    #[test]
    fn test_increment_existing_candidate() {
        let before: Tally = [("a", 1)].into_iter().collect();
        let after = tally_pure(&before, "a");

        assert_eq!(after.get("a"), 2);
        assert_eq!(after.len(), 1);
        assert_eq!(before.get("a"), 1);
    }

    #[test]
    fn test_total() {
        let tally = Tally::new().incremented("a").incremented("b").incremented("a");
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.get("missing"), 0);
    }

    #[test]
    fn test_value_tally_is_not_mutated() {
        let before = json!({ "a": 1 });
        let after = tally_pure_value(&before, "b");

        assert_eq!(after, json!({ "a": 1, "b": 1 }));
        assert_eq!(before, json!({ "a": 1 }));

        assert_eq!(tally_pure_value(&before, "a"), json!({ "a": 2 }));
    }

    #[test]
    fn test_value_tally_defaults_non_object_to_empty() {
        assert_eq!(tally_pure_value(&json!(null), "a"), json!({ "a": 1 }));
        assert_eq!(tally_pure_value(&json!([1, 2]), "a"), json!({ "a": 1 }));
        assert_eq!(tally_pure_value(&json!("tally"), "a"), json!({ "a": 1 }));
    }

    #[test]
    fn test_value_tally_non_numeric_count_restarts() {
        let after = tally_pure_value(&json!({ "a": "many" }), "a");
        assert_eq!(after, json!({ "a": 1 }));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let tally = Tally::new().incremented("C1");
        assert_eq!(serde_json::to_value(&tally).unwrap(), json!({ "C1": 1 }));
    }
}

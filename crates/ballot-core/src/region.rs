//! # Region Vote Counter
//!
//! Sums votes over a tree of regions (country → state → district → ...).
//!
//! Both counters walk the tree with an explicit work stack instead of
//! recursion, so nesting depth is bounded by heap, not by the call stack.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A region and the regions nested inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionNode {
    pub name: String,
    pub votes: u64,
    #[serde(default)]
    pub sub_regions: Vec<RegionNode>,
}

impl RegionNode {
    /// Creates a leaf region.
    pub fn leaf(name: impl Into<String>, votes: u64) -> Self {
        RegionNode {
            name: name.into(),
            votes,
            sub_regions: Vec::new(),
        }
    }

    /// Adds a nested region (builder style).
    #[must_use]
    pub fn with_sub_region(mut self, region: RegionNode) -> Self {
        self.sub_regions.push(region);
        self
    }

    /// Votes at this node plus every descendant.
    pub fn total_votes(&self) -> u64 {
        let mut total: u64 = 0;
        let mut pending: Vec<&RegionNode> = vec![self];

        while let Some(node) = pending.pop() {
            total = total.saturating_add(node.votes);
            pending.extend(node.sub_regions.iter());
        }

        total
    }
}

/// Counts votes in an untyped region tree.
///
/// ## Rules
/// - A node that is not an object, or whose `votes` is not a number,
///   contributes 0 and its children are not visited
/// - `subRegions` that is absent or not an array counts as empty
///
/// ## Example
/// ```rust
/// use ballot_core::region::count_votes_in_regions;
/// use serde_json::json;
///
/// let tree = json!({
///     "name": "root",
///     "votes": 5,
///     "subRegions": [
///         { "name": "a", "votes": 3, "subRegions": [] },
///         { "name": "b", "votes": 2 }
///     ]
/// });
/// assert_eq!(count_votes_in_regions(&tree), 10.0);
/// assert_eq!(count_votes_in_regions(&json!(null)), 0.0);
/// ```
pub fn count_votes_in_regions(region: &Value) -> f64 {
    let mut total = 0.0;
    let mut pending: Vec<&Value> = vec![region];

    while let Some(node) = pending.pop() {
        let Some(obj) = node.as_object() else {
            continue;
        };
        let Some(votes) = obj.get("votes").and_then(Value::as_f64) else {
            continue;
        };

        total += votes;

        if let Some(children) = obj.get("subRegions").and_then(Value::as_array) {
            pending.extend(children.iter());
        }
    }

    total
}

// =============================================================================
// Unit Tests
// =============================================================================

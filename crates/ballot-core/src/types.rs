//! # Domain Types
//!
//! Core records used throughout Ballot Box.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Candidate    │   │      Voter      │   │ CandidateResult │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id, name       │       │
//! │  │  name           │   │  name           │   │  party          │       │
//! │  │  party          │   │  age            │   │  votes          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   VoteReceipt   │   │ValidationResult │   │ ElectionSummary │       │
//! │  │  voterId        │   │  valid          │   │  counts,        │       │
//! │  │  candidateId    │   │  reason         │   │  turnout        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tally and region trees live in their own modules ([`crate::tally`],
//! [`crate::region`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};

// =============================================================================
// Candidate
// =============================================================================

/// A candidate on the ballot. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, party: impl Into<String>) -> Self {
        Candidate {
            id: id.into(),
            name: name.into(),
            party: party.into(),
        }
    }
}

/// Loose decoding: `id` must be a string, `name` and `party` fall back to
/// empty strings when absent or not strings.
impl TryFrom<&Value> for Candidate {
    type Error = CoreError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| CoreError::InvalidInput("candidate must be an object".into()))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::InvalidInput("candidate id must be a string".into()))?;

        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Candidate::new(id, text("name"), text("party")))
    }
}

// =============================================================================
// Voter
// =============================================================================

/// A person asking to be registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Voter {
    pub id: String,
    pub name: String,
    pub age: u32,
}

impl Voter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: u32) -> Self {
        Voter {
            id: id.into(),
            name: name.into(),
            age,
        }
    }
}

// =============================================================================
// Vote Receipt
// =============================================================================

/// Handed to the success path of a cast vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub voter_id: String,
    pub candidate_id: String,
}

// =============================================================================
// Candidate Result
// =============================================================================

/// One row of the results table: a candidate plus its current count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CandidateResult {
    pub id: String,
    pub name: String,
    pub party: String,
    pub votes: u64,
}

impl CandidateResult {
    pub fn from_candidate(candidate: &Candidate, votes: u64) -> Self {
        CandidateResult {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            party: candidate.party.clone(),
            votes,
        }
    }
}

// =============================================================================
// Validation Result
// =============================================================================

/// Outcome of a voter validator. `reason` is empty when `valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult {
            valid: true,
            reason: String::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: reason.into(),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(outcome: Result<(), ValidationError>) -> Self {
        match outcome {
            Ok(()) => ValidationResult::valid(),
            Err(err) => ValidationResult::invalid(err.to_string()),
        }
    }
}

// =============================================================================
// Election Summary
// =============================================================================

/// Turnout snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    #[ts(as = "String")]
    pub election_id: Uuid,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub candidate_count: usize,
    pub registered_count: usize,
    pub voted_count: usize,
    pub total_votes: u64,
    /// Voted over registered, 0.0 when nobody is registered.
    pub turnout: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_from_value() {
        let candidate = Candidate::try_from(&json!({
            "id": "C1",
            "name": "Alice",
            "party": "Blue"
        }))
        .unwrap();
        assert_eq!(candidate, Candidate::new("C1", "Alice", "Blue"));

        // Missing name/party are tolerated
        let candidate = Candidate::try_from(&json!({ "id": "C2" })).unwrap();
        assert_eq!(candidate.name, "");
        assert_eq!(candidate.party, "");

        assert!(Candidate::try_from(&json!({ "id": 7 })).is_err());
        assert!(Candidate::try_from(&json!("C1")).is_err());
    }

    #[test]
    fn test_vote_receipt_uses_camel_case() {
        let receipt = VoteReceipt {
            voter_id: "V1".to_string(),
            candidate_id: "C1".to_string(),
        };
        let value = serde_json::to_value(&receipt).unwrap();
        assert_eq!(value, json!({ "voterId": "V1", "candidateId": "C1" }));
    }

    #[test]
    fn test_validation_result_from_outcome() {
        assert_eq!(ValidationResult::from(Ok(())), ValidationResult::valid());

        let result = ValidationResult::from(Err(ValidationError::MissingField("age".into())));
        assert!(!result.valid);
        assert_eq!(result.reason, "Missing field: age");
    }
}

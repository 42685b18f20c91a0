//! # Validation Module
//!
//! Configurable voter validation.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      validate(voter)                                    │
//! │                                                                         │
//! │  1. voter is an object?            no ──► "Invalid voter object"       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. every required key present?    no ──► "Missing field: <first>"     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. age is a number >= minAge?     no ──► "Age below minimum           │
//! │           │                                requirement"                 │
//! │           ▼                                                             │
//! │  { valid: true, reason: "" }                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Required fields are a presence check on the key only: `{"age": null}`
//! has an `age` field.
//!
//! ## Usage
//! ```rust
//! use ballot_core::validation::{create_vote_validator, ValidatorRules};
//! use serde_json::json;
//!
//! let validate = create_vote_validator(ValidatorRules::new(18.0, ["id", "age"]));
//!
//! let result = validate(&json!({ "id": "V1" }));
//! assert_eq!(result.reason, "Missing field: age");
//!
//! assert!(validate(&json!({ "id": "V1", "age": 18 })).valid);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{ValidationResult, Voter};
use crate::DEFAULT_MIN_AGE;

// =============================================================================
// Rules
// =============================================================================

/// Rule set a validator enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRules {
    /// Minimum acceptable age (inclusive).
    #[serde(default = "default_min_age", alias = "min_age")]
    pub min_age: f64,

    /// Keys that must be present on the voter object, checked in order.
    #[serde(default, alias = "required_fields")]
    pub required_fields: Vec<String>,
}

fn default_min_age() -> f64 {
    DEFAULT_MIN_AGE
}

impl Default for ValidatorRules {
    fn default() -> Self {
        ValidatorRules {
            min_age: DEFAULT_MIN_AGE,
            required_fields: Vec::new(),
        }
    }
}

impl ValidatorRules {
    pub fn new<I, S>(min_age: f64, required_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidatorRules {
            min_age,
            required_fields: required_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads rules from an untyped config object.
    ///
    /// ## Defaults
    /// - `minAge` absent, null or not a number → 18
    /// - `requiredFields` absent or not an array → no required fields
    /// - non-string entries inside `requiredFields` are ignored
    pub fn from_value(config: &Value) -> Self {
        let min_age = config
            .get("minAge")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_MIN_AGE);

        let required_fields = config
            .get("requiredFields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ValidatorRules {
            min_age,
            required_fields,
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

/// A reusable, immutable voter validator.
///
/// Cloning shares the rule set; the validator holds no mutable state and can
/// be used from any number of threads.
#[derive(Debug, Clone)]
pub struct VoterValidator {
    rules: Arc<ValidatorRules>,
}

impl VoterValidator {
    pub fn new(rules: ValidatorRules) -> Self {
        VoterValidator {
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &ValidatorRules {
        &self.rules
    }

    /// Runs the checks, stopping at the first failure.
    pub fn check(&self, voter: &Value) -> Result<(), ValidationError> {
        let obj = voter
            .as_object()
            .ok_or(ValidationError::InvalidVoterObject)?;

        if let Some(missing) = self
            .rules
            .required_fields
            .iter()
            .find(|field| !obj.contains_key(field.as_str()))
        {
            return Err(ValidationError::MissingField(missing.clone()));
        }

        match obj.get("age").and_then(Value::as_f64) {
            Some(age) if age >= self.rules.min_age => Ok(()),
            _ => Err(ValidationError::AgeBelowMinimum),
        }
    }

    /// [`check`](Self::check) folded into a [`ValidationResult`].
    pub fn validate(&self, voter: &Value) -> ValidationResult {
        self.check(voter).into()
    }

    /// Validates a typed voter through its JSON shape.
    pub fn validate_voter(&self, voter: &Voter) -> ValidationResult {
        match serde_json::to_value(voter) {
            Ok(value) => self.validate(&value),
            Err(_) => ValidationError::InvalidVoterObject.into(),
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(err: ValidationError) -> Self {
        ValidationResult::invalid(err.to_string())
    }
}

/// Builds a validation function from `rules`.
///
/// Equal rules give functions with identical behavior.
pub fn create_vote_validator(
    rules: ValidatorRules,
) -> impl Fn(&Value) -> ValidationResult + Clone + Send + Sync {
    let validator = VoterValidator::new(rules);
    move |voter: &Value| validator.validate(voter)
}

// =============================================================================
// Unit Tests
// =============================================================================

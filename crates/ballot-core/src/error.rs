//! # Error Types
//!
//! Domain-specific error types for ballot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ballot-core errors (this file)                                        │
//! │  ├── VoteError          - Why a ballot was refused                     │
//! │  ├── RegistrationError  - Why a voter was not registered               │
//! │  ├── ValidationError    - Why a voter failed a validator's rules       │
//! │  └── CoreError          - Wraps the above plus input decoding          │
//! │                                                                         │
//! │  ballot-cli errors (separate crate)                                    │
//! │  └── CliError           - Config, file and JSON failures               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Display` text of [`VoteError`] and [`ValidationError`] is part of the
//! public contract: callers match on the exact reason strings.

use thiserror::Error;

// =============================================================================
// Vote Error
// =============================================================================

/// Reasons a cast vote is refused.
///
/// Checked in declaration order; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum VoteError {
    /// The voter id never passed registration.
    #[error("Voter not registered")]
    VoterNotRegistered,

    /// The candidate id was not part of the ballot.
    #[error("Candidate not found")]
    CandidateNotFound,

    /// The voter already has a recorded vote.
    #[error("Voter already voted")]
    AlreadyVoted,
}

impl VoteError {
    /// The reason string handed to error callbacks.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

// =============================================================================
// Registration Error
// =============================================================================

/// Reasons a voter is not added to the register.
///
/// The boolean registration API discards these; they exist for callers and
/// log lines that want to know which check failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// Input was not a JSON object.
    #[error("Invalid voter object")]
    InvalidVoter,

    /// `id` missing or not a string.
    #[error("Voter id must be a string")]
    InvalidId,

    /// `age` missing or not a number.
    #[error("Voter age must be a number")]
    InvalidAge,

    #[error("Voter age {age} is below the minimum of {min}")]
    Underage { age: f64, min: f64 },

    #[error("Voter {0} is already registered")]
    AlreadyRegistered(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rule failures reported by a [`VoterValidator`](crate::validation::VoterValidator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input was not a JSON object.
    #[error("Invalid voter object")]
    InvalidVoterObject,

    /// A required key is absent from the voter object.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// `age` is not a number or is below the configured minimum.
    #[error("Age below minimum requirement")]
    AgeBelowMinimum,
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for the untyped entry points that can fail at more than
/// one stage (decoding, validation, registration, voting).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input could not be turned into a domain record.
    ///
    /// ## When This Occurs
    /// - A candidate entry is not an object or lacks a string `id`
    /// - A vote request lacks a string `voterId` or `candidateId`
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Vote rejected: {0}")]
    Vote(#[from] VoteError),

    #[error("Registration rejected: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// The bare reason, without the stage prefix.
    ///
    /// Wrapped vote and validation errors keep their exact contract strings.
    pub fn reason(&self) -> String {
        match self {
            CoreError::InvalidInput(msg) => msg.clone(),
            CoreError::Vote(err) => err.reason(),
            CoreError::Registration(err) => err.to_string(),
            CoreError::Validation(err) => err.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_error_reasons() {
        assert_eq!(VoteError::VoterNotRegistered.reason(), "Voter not registered");
        assert_eq!(VoteError::CandidateNotFound.reason(), "Candidate not found");
        assert_eq!(VoteError::AlreadyVoted.reason(), "Voter already voted");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::InvalidVoterObject.to_string(),
            "Invalid voter object"
        );
        assert_eq!(
            ValidationError::MissingField("age".to_string()).to_string(),
            "Missing field: age"
        );
        assert_eq!(
            ValidationError::AgeBelowMinimum.to_string(),
            "Age below minimum requirement"
        );
    }

    #[test]
    fn test_registration_error_messages() {
        let err = RegistrationError::Underage { age: 17.0, min: 18.0 };
        assert_eq!(err.to_string(), "Voter age 17 is below the minimum of 18");

        let err = RegistrationError::AlreadyRegistered("V1".to_string());
        assert_eq!(err.to_string(), "Voter V1 is already registered");
    }

    #[test]
    fn test_vote_error_converts_to_core_error() {
        let core_err: CoreError = VoteError::AlreadyVoted.into();
        assert!(matches!(core_err, CoreError::Vote(VoteError::AlreadyVoted)));
        assert_eq!(core_err.to_string(), "Vote rejected: Voter already voted");
    }

    #[test]
    fn test_core_error_reason_drops_prefix() {
        let err: CoreError = VoteError::VoterNotRegistered.into();
        assert_eq!(err.reason(), "Voter not registered");

        let err: CoreError = ValidationError::MissingField("age".to_string()).into();
        assert_eq!(err.reason(), "Missing field: age");

        let err: CoreError = RegistrationError::AlreadyRegistered("V1".to_string()).into();
        assert_eq!(err.reason(), "Voter V1 is already registered");

        let err = CoreError::InvalidInput("voterId must be a string".to_string());
        assert_eq!(err.reason(), "voterId must be a string");
        assert_eq!(err.to_string(), "Invalid input: voterId must be a string");
    }
}

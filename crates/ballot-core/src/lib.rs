//! # ballot-core: Pure Election Logic for Ballot Box
//!
//! This crate contains the whole election model as plain data and pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ballot Box Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ballot-cli (apps/ballot-cli)                 │   │
//! │  │    config file + env ──► scenario JSON ──► JSON report          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ballot-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ election  │  │   tally   │  │  region   │  │ validation│  │   │
//! │  │   │ Election  │  │   Tally   │  │RegionNode │  │ Validator │  │   │
//! │  │   │  Shared   │  │tally_pure │  │ count_..  │  │   Rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`election`] - Election session: registration, voting, results
//! - [`validation`] - Rule-driven voter validator factory
//! - [`region`] - Vote totals over nested regions
//! - [`tally`] - Immutable vote count updates
//! - [`types`] - Shared records (Candidate, Voter, CandidateResult, ...)
//! - [`error`] - Domain error types
//!
//! ## Loosely-Shaped Input
//! Every entry point that can receive data of unknown shape has a
//! `serde_json::Value` variant. Bad shapes degrade to a neutral answer
//! (`false`, `0`, an empty tally, an "Invalid voter object" result); they
//! never panic.
//!
//! ## Example Usage
//!
//! ```rust
//! use ballot_core::{create_election, Candidate, Voter, VoteError};
//!
//! let mut election = create_election([
//!     Candidate::new("C1", "Alice", "Blue"),
//!     Candidate::new("C2", "Bob", "Green"),
//! ]);
//!
//! assert!(election.register_voter(&Voter::new("V1", "Dana", 34)));
//! assert!(election.cast_vote("V1", "C2").is_ok());
//! assert_eq!(election.cast_vote("V1", "C1"), Err(VoteError::AlreadyVoted));
//!
//! let winner = election.winner().unwrap();
//! assert_eq!((winner.id.as_str(), winner.votes), ("C2", 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod election;
pub mod error;
pub mod region;
pub mod tally;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use election::{create_election, Election, SharedElection};
pub use error::{CoreError, CoreResult, RegistrationError, ValidationError, VoteError};
pub use region::{count_votes_in_regions, RegionNode};
pub use tally::{tally_pure, tally_pure_value, Tally};
pub use types::*;
pub use validation::{create_vote_validator, ValidatorRules, VoterValidator};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum registration age, and the validator default when no `minAge`
/// is configured.
pub const DEFAULT_MIN_AGE: f64 = 18.0;

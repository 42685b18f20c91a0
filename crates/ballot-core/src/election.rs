//! # Election Session
//!
//! Owns the register, the set of voters who have voted and the running
//! tally for one ballot.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Election Session Operations                          │
//! │                                                                         │
//! │  Caller                     Method                  State Change        │
//! │  ──────                     ──────                  ────────────        │
//! │                                                                         │
//! │  New voter ───────────────► register_voter() ─────► registered += id    │
//! │                                                                         │
//! │  Ballot ──────────────────► cast_vote() ──────────► tally = tally + 1   │
//! │                                                     voted += id         │
//! │                                                                         │
//! │  Results screen ──────────► results() ────────────► (read only)         │
//! │                                                                         │
//! │  Announcement ────────────► winner() ─────────────► (read only)         │
//! │                                                                         │
//! │  NOTE: Only `&mut self` methods touch state. Share a session across     │
//! │        threads through `SharedElection`.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cast Vote Checks
//! 1. voter registered?       no → [`VoteError::VoterNotRegistered`]
//! 2. candidate on ballot?    no → [`VoteError::CandidateNotFound`]
//! 3. voter not yet voted?    no → [`VoteError::AlreadyVoted`]

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, RegistrationError, VoteError};
use crate::tally::{tally_pure, Tally};
use crate::types::{Candidate, CandidateResult, ElectionSummary, VoteReceipt, Voter};
use crate::validation::VoterValidator;
use crate::DEFAULT_MIN_AGE;

// =============================================================================
// Election
// =============================================================================

/// A single in-memory election.
///
/// ## Invariants
/// - Every id in the tally is a candidate id supplied at creation
/// - `voted ⊆ registered`
/// - `tally.total() == voted.len()`
#[derive(Debug, Clone)]
pub struct Election {
    id: Uuid,
    opened_at: DateTime<Utc>,
    /// Ballot order as supplied.
    candidates: Vec<Candidate>,
    /// Candidate id → index into `candidates`.
    lookup: HashMap<String, usize>,
    tally: Tally,
    registered: HashSet<String>,
    voted: HashSet<String>,
}

/// Creates an election over `candidates`.
pub fn create_election(candidates: impl IntoIterator<Item = Candidate>) -> Election {
    Election::new(candidates.into_iter().collect())
}

impl Election {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        // Later duplicates shadow earlier ones in the lookup; the ballot
        // order keeps every entry.
        let lookup = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| (candidate.id.clone(), index))
            .collect();

        let election = Election {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            candidates,
            lookup,
            tally: Tally::new(),
            registered: HashSet::new(),
            voted: HashSet::new(),
        };

        info!(
            election_id = %election.id,
            candidates = election.candidates.len(),
            "Election opened"
        );
        election
    }

    /// Creates an election from an untyped candidate list.
    ///
    /// A non-array input gives an election with no candidates. Entries that
    /// are not candidate objects with a string `id` are skipped.
    pub fn from_value(candidates: &Value) -> Self {
        let Some(entries) = candidates.as_array() else {
            debug!("Candidate list is not an array, opening empty election");
            return Election::new(Vec::new());
        };

        let candidates = entries
            .iter()
            .filter_map(|entry| match Candidate::try_from(entry) {
                Ok(candidate) => Some(candidate),
                Err(err) => {
                    debug!(%err, "Skipping malformed candidate");
                    None
                }
            })
            .collect();

        Election::new(candidates)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a voter. Returns `false` (and changes nothing) when the
    /// voter is underage or already registered.
    pub fn register_voter(&mut self, voter: &Voter) -> bool {
        let outcome = self.try_register_voter(voter);
        self.report_registration(outcome)
    }

    /// [`register_voter`](Self::register_voter) keeping the rejection reason.
    pub fn try_register_voter(&mut self, voter: &Voter) -> Result<(), RegistrationError> {
        self.admit(&voter.id, f64::from(voter.age))
    }

    /// Registers a voter from untyped input.
    ///
    /// Also rejects non-objects, a non-string `id` and a non-numeric `age`.
    pub fn register_voter_value(&mut self, voter: &Value) -> bool {
        let outcome = self.try_register_voter_value(voter);
        self.report_registration(outcome)
    }

    pub fn try_register_voter_value(&mut self, voter: &Value) -> Result<(), RegistrationError> {
        let obj = voter.as_object().ok_or(RegistrationError::InvalidVoter)?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or(RegistrationError::InvalidId)?;
        let age = obj
            .get("age")
            .and_then(Value::as_f64)
            .ok_or(RegistrationError::InvalidAge)?;

        self.admit(id, age)
    }

    /// Screens an untyped voter with `validator`, then registers it.
    ///
    /// Validator rules run first, so a voter refused by them never reaches
    /// the register. Nothing changes on error.
    pub fn enroll(&mut self, validator: &VoterValidator, voter: &Value) -> CoreResult<()> {
        if let Err(err) = validator.check(voter) {
            debug!(election_id = %self.id, reason = %err, "Voter failed validation");
            return Err(err.into());
        }
        self.try_register_voter_value(voter).map_err(|err| {
            debug!(election_id = %self.id, reason = %err, "Registration rejected");
            CoreError::from(err)
        })
    }

    fn admit(&mut self, voter_id: &str, age: f64) -> Result<(), RegistrationError> {
        if age < DEFAULT_MIN_AGE {
            return Err(RegistrationError::Underage {
                age,
                min: DEFAULT_MIN_AGE,
            });
        }

        if self.registered.contains(voter_id) {
            return Err(RegistrationError::AlreadyRegistered(voter_id.to_string()));
        }

        self.registered.insert(voter_id.to_string());
        debug!(election_id = %self.id, voter_id, "Voter registered");
        Ok(())
    }

    fn report_registration(&self, outcome: Result<(), RegistrationError>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(err) => {
                debug!(election_id = %self.id, reason = %err, "Registration rejected");
                false
            }
        }
    }

    // =========================================================================
    // Voting
    // =========================================================================

    /// Records one vote.
    ///
    /// On success the stored tally is replaced by an incremented copy and the
    /// voter is marked as having voted. On failure nothing changes.
    pub fn cast_vote(
        &mut self,
        voter_id: &str,
        candidate_id: &str,
    ) -> Result<VoteReceipt, VoteError> {
        if let Err(err) = self.check_vote(voter_id, candidate_id) {
            debug!(
                election_id = %self.id,
                voter_id,
                candidate_id,
                reason = %err,
                "Vote rejected"
            );
            return Err(err);
        }

        self.tally = tally_pure(&self.tally, candidate_id);
        self.voted.insert(voter_id.to_string());

        info!(election_id = %self.id, voter_id, candidate_id, "Vote recorded");

        Ok(VoteReceipt {
            voter_id: voter_id.to_string(),
            candidate_id: candidate_id.to_string(),
        })
    }

    /// Continuation-passing form of [`cast_vote`](Self::cast_vote).
    ///
    /// Exactly one callback runs and its return value is passed through.
    /// If either callback is `None` the call does nothing and returns `None`.
    ///
    /// ## Example
    /// ```rust
    /// use ballot_core::{create_election, Candidate, Voter};
    ///
    /// let mut election = create_election([Candidate::new("C1", "Alice", "Blue")]);
    /// election.register_voter(&Voter::new("V1", "Bob", 30));
    ///
    /// let message = election.cast_vote_with(
    ///     "V1",
    ///     "C1",
    ///     Some(|receipt: ballot_core::VoteReceipt| format!("thanks {}", receipt.voter_id)),
    ///     Some(|err: ballot_core::VoteError| err.reason()),
    /// );
    /// assert_eq!(message.as_deref(), Some("thanks V1"));
    /// ```
    pub fn cast_vote_with<R, S, E>(
        &mut self,
        voter_id: &str,
        candidate_id: &str,
        on_success: Option<S>,
        on_error: Option<E>,
    ) -> Option<R>
    where
        S: FnOnce(VoteReceipt) -> R,
        E: FnOnce(VoteError) -> R,
    {
        let (Some(on_success), Some(on_error)) = (on_success, on_error) else {
            debug!(election_id = %self.id, voter_id, "Ignoring vote without both callbacks");
            return None;
        };

        Some(match self.cast_vote(voter_id, candidate_id) {
            Ok(receipt) => on_success(receipt),
            Err(err) => on_error(err),
        })
    }

    /// Casts a vote from an untyped `{ voterId, candidateId }` request.
    ///
    /// A request without string ids is refused as invalid input before any
    /// vote check runs.
    pub fn cast_vote_value(&mut self, request: &Value) -> CoreResult<VoteReceipt> {
        let field = |key: &str| {
            request
                .get(key)
                .and_then(Value::as_str)
                .ok_or_else(|| CoreError::InvalidInput(format!("{key} must be a string")))
        };
        let voter_id = field("voterId")?;
        let candidate_id = field("candidateId")?;

        Ok(self.cast_vote(voter_id, candidate_id)?)
    }

    fn check_vote(&self, voter_id: &str, candidate_id: &str) -> Result<(), VoteError> {
        if !self.registered.contains(voter_id) {
            return Err(VoteError::VoterNotRegistered);
        }
        if !self.lookup.contains_key(candidate_id) {
            return Err(VoteError::CandidateNotFound);
        }
        if self.voted.contains(voter_id) {
            return Err(VoteError::AlreadyVoted);
        }
        Ok(())
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// One row per candidate, most votes first. Ties keep ballot order.
    pub fn results(&self) -> Vec<CandidateResult> {
        self.results_by(|a, b| b.votes.cmp(&a.votes))
    }

    /// One row per candidate, stably sorted with `compare`.
    pub fn results_by<F>(&self, compare: F) -> Vec<CandidateResult>
    where
        F: FnMut(&CandidateResult, &CandidateResult) -> Ordering,
    {
        let mut rows: Vec<CandidateResult> = self
            .candidates
            .iter()
            .map(|candidate| CandidateResult::from_candidate(candidate, self.tally.get(&candidate.id)))
            .collect();
        rows.sort_by(compare);
        rows
    }

    /// The leading candidate, or `None` when there are no candidates or no
    /// votes have been cast for anyone.
    pub fn winner(&self) -> Option<CandidateResult> {
        self.results()
            .into_iter()
            .next()
            .filter(|leader| leader.votes > 0)
    }

    pub fn summary(&self) -> ElectionSummary {
        let registered_count = self.registered.len();
        let voted_count = self.voted.len();
        let turnout = if registered_count == 0 {
            0.0
        } else {
            voted_count as f64 / registered_count as f64
        };

        ElectionSummary {
            election_id: self.id,
            opened_at: self.opened_at,
            candidate_count: self.candidates.len(),
            registered_count,
            voted_count,
            total_votes: self.tally.total(),
            turnout,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Candidates in ballot order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.lookup
            .get(candidate_id)
            .and_then(|&index| self.candidates.get(index))
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn is_registered(&self, voter_id: &str) -> bool {
        self.registered.contains(voter_id)
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.voted.contains(voter_id)
    }
}

// =============================================================================
// Shared Election
// =============================================================================

/// An election shared between threads.
///
/// ## Thread Safety
/// Every closure runs under one `Mutex` lock, so a vote's
/// check-then-record sequence is atomic and a voter can never be counted
/// twice by racing callers.
#[derive(Debug, Clone)]
pub struct SharedElection {
    election: Arc<Mutex<Election>>,
}

impl SharedElection {
    pub fn new(election: Election) -> Self {
        SharedElection {
            election: Arc::new(Mutex::new(election)),
        }
    }

    /// Executes a function with read access to the election.
    pub fn with_election<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Election) -> R,
    {
        let election = self.election.lock().unwrap_or_else(PoisonError::into_inner);
        f(&election)
    }

    /// Executes a function with write access to the election.
    ///
    /// ## Usage
    /// ```rust
    /// use ballot_core::{create_election, Candidate, SharedElection, Voter};
    ///
    /// let shared = SharedElection::new(create_election([Candidate::new("C1", "A", "P")]));
    /// shared.with_election_mut(|e| e.register_voter(&Voter::new("V1", "B", 40)));
    /// let receipt = shared.with_election_mut(|e| e.cast_vote("V1", "C1"));
    /// assert!(receipt.is_ok());
    /// ```
    pub fn with_election_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Election) -> R,
    {
        let mut election = self.election.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut election)
    }
}

impl From<Election> for SharedElection {
    fn from(election: Election) -> Self {
        SharedElection::new(election)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

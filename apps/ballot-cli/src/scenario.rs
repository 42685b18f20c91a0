//! # Scenario Runner
//!
//! A scenario is a JSON file describing one election from start to finish.
//!
//! ## Scenario Format
//! ```json
//! {
//!   "candidates": [{ "id": "C1", "name": "Alice", "party": "Blue" }],
//!   "voters":     [{ "id": "V1", "name": "Dana", "age": 34 }],
//!   "votes":      [{ "voterId": "V1", "candidateId": "C1" }],
//!   "regions":    { "name": "root", "votes": 5, "subRegions": [] }
//! }
//! ```
//!
//! ## Run Flow
//! ```text
//! voters ──► enroll (validator, then register) ──┐
//!                                                ├──► results / winner / summary
//! votes ───► cast_vote_value ────────────────────┘
//! regions ─► count_votes_in_regions
//! ```
//!
//! Candidates, voters and votes are kept as raw JSON so malformed entries
//! are reported one by one instead of failing the whole file.

use std::path::Path;

use ballot_core::{
    count_votes_in_regions, CandidateResult, CoreResult, Election, ElectionSummary, VoteReceipt,
    VoterValidator,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{CliError, CliResult};

// =============================================================================
// Input
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Any JSON; a non-array gives an election without candidates.
    #[serde(default)]
    pub candidates: Value,

    #[serde(default)]
    pub voters: Vec<Value>,

    /// `{ voterId, candidateId }` requests, in casting order.
    #[serde(default)]
    pub votes: Vec<Value>,

    #[serde(default)]
    pub regions: Option<Value>,
}

impl Scenario {
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(json: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Plays the scenario against a fresh election.
    pub fn run(&self, validator: &VoterValidator) -> Report {
        let mut election = Election::from_value(&self.candidates);

        let registrations = self
            .voters
            .iter()
            .map(|voter| RegistrationOutcome::new(voter, election.enroll(validator, voter)))
            .collect();

        let votes = self
            .votes
            .iter()
            .map(|request| VoteOutcome::new(request, election.cast_vote_value(request)))
            .collect();

        let region_total = self.regions.as_ref().map(count_votes_in_regions);

        let report = Report {
            summary: election.summary(),
            registrations,
            votes,
            results: election.results(),
            winner: election.winner(),
            region_total,
        };

        info!(
            election_id = %report.summary.election_id,
            voted = report.summary.voted_count,
            winner = report.winner.as_ref().map(|w| w.id.as_str()).unwrap_or("none"),
            "Scenario complete"
        );
        report
    }
}

// =============================================================================
// Output
// =============================================================================

/// Reads `key` from an entry when it is a string.
fn string_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    /// `None` when the entry had no string id.
    pub voter_id: Option<String>,
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RegistrationOutcome {
    fn new(voter: &Value, outcome: CoreResult<()>) -> Self {
        RegistrationOutcome {
            voter_id: string_field(voter, "id"),
            registered: outcome.is_ok(),
            reason: outcome.err().map(|err| err.reason()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    /// `None` when the request had no string `voterId`.
    pub voter_id: Option<String>,
    pub candidate_id: Option<String>,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VoteOutcome {
    fn new(request: &Value, outcome: CoreResult<VoteReceipt>) -> Self {
        VoteOutcome {
            voter_id: string_field(request, "voterId"),
            candidate_id: string_field(request, "candidateId"),
            accepted: outcome.is_ok(),
            reason: outcome.err().map(|err| err.reason()),
        }
    }
}

/// Everything the CLI prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: ElectionSummary,
    pub registrations: Vec<RegistrationOutcome>,
    pub votes: Vec<VoteOutcome>,
    pub results: Vec<CandidateResult>,
    pub winner: Option<CandidateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_total: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_core::ValidatorRules;

    const SCENARIO: &str = r#"{
        "candidates": [
            { "id": "C1", "name": "Alice", "party": "Blue" },
            { "id": "C2", "name": "Bob", "party": "Green" }
        ],
        "voters": [
            { "id": "V1", "name": "Dana", "age": 34 },
            { "id": "V2", "name": "Eli", "age": 17 },
            { "id": "V3", "age": 40 },
            "garbage"
        ],
        "votes": [
            { "voterId": "V1", "candidateId": "C2" },
            { "voterId": "V1", "candidateId": "C1" },
            { "voterId": "V2", "candidateId": "C1" },
            { "voterId": "V3", "candidateId": "C9" },
            { "voterId": 7, "candidateId": "C1" },
            "V3:C1"
        ],
        "regions": {
            "name": "root", "votes": 5,
            "subRegions": [{ "name": "a", "votes": 3 }, { "name": "b", "votes": 2 }]
        }
    }"#;

    fn run_default() -> Report {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        scenario.run(&VoterValidator::new(ValidatorRules::default()))
    }

    #[test]
    fn test_registrations() {
        let report = run_default();
        let registered: Vec<bool> = report.registrations.iter().map(|r| r.registered).collect();
        assert_eq!(registered, vec![true, false, true, false]);

        assert_eq!(
            report.registrations[1].reason.as_deref(),
            Some("Age below minimum requirement")
        );
        assert_eq!(report.registrations[0].reason, None);
        assert_eq!(report.registrations[3].voter_id, None);
        assert_eq!(report.registrations[3].reason.as_deref(), Some("Invalid voter object"));
    }

    #[test]
    fn test_vote_outcomes() {
        let report = run_default();
        let reasons: Vec<Option<&str>> = report.votes.iter().map(|v| v.reason.as_deref()).collect();
        assert_eq!(
            reasons,
            vec![
                None,
                Some("Voter already voted"),
                Some("Voter not registered"),
                Some("Candidate not found"),
                Some("voterId must be a string"),
                Some("voterId must be a string"),
            ]
        );
    }

    #[test]
    fn test_malformed_vote_entries_do_not_fail_the_file() {
        let report = run_default();

        let numeric_id = &report.votes[4];
        assert!(!numeric_id.accepted);
        assert_eq!(numeric_id.voter_id, None);
        assert_eq!(numeric_id.candidate_id.as_deref(), Some("C1"));

        let bare_string = &report.votes[5];
        assert!(!bare_string.accepted);
        assert_eq!(bare_string.voter_id, None);
        assert_eq!(bare_string.candidate_id, None);

        assert_eq!(report.summary.voted_count, 1);
    }

    #[test]
    fn test_results_and_winner() {
        let report = run_default();
        assert_eq!(report.winner.as_ref().map(|w| w.id.as_str()), Some("C2"));
        assert_eq!(report.results[0].votes, 1);
        assert_eq!(report.results[1].id, "C1");
        assert_eq!(report.summary.registered_count, 2);
        assert_eq!(report.summary.voted_count, 1);
        assert_eq!(report.region_total, Some(10.0));
    }

    #[test]
    fn test_required_fields_block_registration() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let report = scenario.run(&VoterValidator::new(ValidatorRules::new(18.0, ["name"])));

        assert!(!report.registrations[2].registered);
        assert_eq!(report.registrations[2].reason.as_deref(), Some("Missing field: name"));
        assert_eq!(report.votes[3].reason.as_deref(), Some("Voter not registered"));
    }

    #[test]
    fn test_empty_scenario() {
        let report = Scenario::parse("{}")
            .unwrap()
            .run(&VoterValidator::new(ValidatorRules::default()));
        assert!(report.results.is_empty());
        assert_eq!(report.winner, None);
        assert_eq!(report.region_total, None);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let value = serde_json::to_value(run_default()).unwrap();
        assert!(value.get("regionTotal").is_some());
        assert_eq!(value["votes"][0]["voterId"], "V1");
        assert!(value["votes"][0].get("reason").is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Scenario::parse("{ nope"), Err(CliError::Json(_))));
    }
}

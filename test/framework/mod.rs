//! # Ranked Ballot Testing Framework
//!
//! A reusable harness for the ranked ballot ledger supporting property-based
//! testing, invariant checking, and state exploration.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs             : core TestEnv, ballot harness, mock registry
//! ├── generators.rs      : property-based input generators
//! ├── invariants.rs      : ledger invariants and transition checks
//! └── state_explorer.rs  : action-sequence exploration
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_framework::{BallotTestHarness, TestEnv};
//!
//! let mut env = TestEnv::new();
//! let harness = BallotTestHarness::new(&mut env, false);
//! let members = harness.enroll_members(3);
//!
//! let id = harness.create_proposal("Budget", ["A", "B", "C", "D"]);
//! harness.submit(&members[0], id, ["A", "C", "B", "D"]);
//! harness.close(id);
//! ```

extern crate std;


use ranked_ballot::{
    ballot::Ballot, proposal::Proposal, RankedBallotContract, RankedBallotContractClient,
};
use soroban_sdk::{
    contract, contracterror, contractimpl,
    testutils::{Address as _, Ledger as _},
    Address, Env, String,
};

// ── Mock Credential Registry ─────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    NotMinted = 1,
}

/// Minimal membership-credential registry: `token_id -> owner`.
#[contract]
pub struct MockCredentialRegistry;

#[contractimpl]
impl MockCredentialRegistry {
    /// Mint or reassign `token_id` to `owner`.
    pub fn mint(env: Env, token_id: u32, owner: Address) {
        env.storage().persistent().set(&token_id, &owner);
    }

    pub fn burn(env: Env, token_id: u32) {
        env.storage().persistent().remove(&token_id);
    }

    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, RegistryError> {
        env.storage()
            .persistent()
            .get(&token_id)
            .ok_or(RegistryError::NotMinted)
    }
}

// ── Core Test Environment ────────────────────────────────────────────────────

/// Wraps the Soroban `Env` with time control and address management.
pub struct TestEnv {
    pub env: Env,
    generated_addresses: std::vec::Vec<Address>,
}

impl TestEnv {
    /// Create a new test environment with all auth mocked.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        Self {
            env,
            generated_addresses: std::vec::Vec::new(),
        }
    }

    pub fn generate_address(&mut self) -> Address {
        let addr = Address::generate(&self.env);
        self.generated_addresses.push(addr.clone());
        addr
    }

    pub fn generate_addresses(&mut self, n: usize) -> std::vec::Vec<Address> {
        (0..n).map(|_| self.generate_address()).collect()
    }

    pub fn set_timestamp(&self, ts: u64) {
        self.env.ledger().set_timestamp(ts);
    }

    /// Advance the ledger timestamp by `delta` seconds.
    pub fn advance_time(&self, delta: u64) {
        let current = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(current.saturating_add(delta));
    }

    pub fn timestamp(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    /// Register a fresh, empty credential registry.
    pub fn deploy_registry(&self) -> Address {
        self.env.register(MockCredentialRegistry, ())
    }

    /// Convert a host string into a contract `String`.
    pub fn string(&self, value: &str) -> String {
        String::from_str(&self.env, value)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ── Ballot Ledger Harness ────────────────────────────────────────────────────

/// A voter together with the credential it holds in the registry.
#[derive(Debug, Clone)]
pub struct Member {
    pub address: Address,
    pub credential_id: u32,
}

/// Pre-wired ledger fixture: contract initialised, registry bound, admin set.
pub struct BallotTestHarness<'a> {
    pub env: &'a mut TestEnv,
    pub client: RankedBallotContractClient<'static>,
    pub contract_id: Address,
    pub admin: Address,
    pub registry: MockCredentialRegistryClient<'static>,
    pub registry_id: Address,
}

impl<'a> BallotTestHarness<'a> {
    pub fn new(env: &'a mut TestEnv, strict_ranking: bool) -> Self {
        let registry_id = env.deploy_registry();
        let registry = MockCredentialRegistryClient::new(&env.env, &registry_id);
        let contract_id = env.env.register(RankedBallotContract, ());
        let client = RankedBallotContractClient::new(&env.env, &contract_id);
        let admin = env.generate_address();

        client.initialize(&admin, &registry_id, &strict_ranking);

        Self {
            env,
            client,
            contract_id,
            admin,
            registry,
            registry_id,
        }
    }

    /// Mint `credential_id` to a fresh address.
    pub fn enroll_member(&self, credential_id: u32) -> Member {
        let address = Address::generate(&self.env.env);
        self.registry.mint(&credential_id, &address);
        Member {
            address,
            credential_id,
        }
    }

    /// Enroll `n` members holding credentials `1..=n`.
    pub fn enroll_members(&self, n: usize) -> std::vec::Vec<Member> {
        (1..=n as u32).map(|id| self.enroll_member(id)).collect()
    }

    pub fn create_proposal(&self, name: &str, options: [&str; 4]) -> u64 {
        let s = |v: &str| self.env.string(v);
        self.client.create_proposal(
            &self.admin,
            &s(name),
            &s(options[0]),
            &s(options[1]),
            &s(options[2]),
            &s(options[3]),
        )
    }

    pub fn close(&self, proposal_id: u64) {
        self.client.close_proposal(&self.admin, &proposal_id);
    }

    /// Submit a ballot as `member` using its own credential.
    pub fn submit(&self, member: &Member, proposal_id: u64, ranks: [&str; 4]) {
        let s = |v: &str| self.env.string(v);
        self.client.submit_ballot(
            &member.address,
            &member.credential_id,
            &proposal_id,
            &s(ranks[0]),
            &s(ranks[1]),
            &s(ranks[2]),
            &s(ranks[3]),
        );
    }

    pub fn ballot(&self, proposal_id: u64, member: &Member) -> Option<Ballot> {
        self.client.get_ballot(&proposal_id, &member.address)
    }

    pub fn proposal_count(&self) -> u64 {
        self.client.proposal_count()
    }

    pub fn signal_sequence(&self) -> u64 {
        self.client.signal_sequence()
    }

    /// Snapshot of all observable ledger state for invariant checking.
    ///
    /// Ballots are read for every proposal plus one id past the end, for each
    /// of `members`.
    pub fn snapshot(&self, members: &[Member]) -> LedgerSnapshot {
        let proposal_count = self.client.proposal_count();
        let proposals: std::vec::Vec<Proposal> = (0..proposal_count)
            .map(|id| self.client.get_proposal(&id))
            .collect();

        let mut ballots = std::vec::Vec::new();
        for id in 0..=proposal_count {
            for m in members {
                ballots.push((id, m.address.clone(), self.client.get_ballot(&id, &m.address)));
            }
        }

        let ballot_counts = (0..proposal_count)
            .map(|id| (id, self.client.ballot_count(&id)))
            .collect();
        let indexed_voters = (0..proposal_count)
            .map(|id| (id, self.client.get_voters(&id, &0, &u32::MAX).len()))
            .collect();

        LedgerSnapshot {
            timestamp: self.env.timestamp(),
            proposal_count,
            latest_proposal_id: self.client.latest_proposal_id(),
            signal_sequence: self.client.signal_sequence(),
            strict_ranking: self.client.get_config().strict_ranking,
            proposals,
            ballots,
            ballot_counts,
            indexed_voters,
        }
    }
}

/// Immutable snapshot of ledger state at a point in time.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub timestamp: u64,
    pub proposal_count: u64,
    pub latest_proposal_id: Option<u64>,
    pub signal_sequence: u64,
    pub strict_ranking: bool,
    pub proposals: std::vec::Vec<Proposal>,
    /// `(proposal_id, voter, ballot)` for each tracked voter.
    pub ballots: std::vec::Vec<(u64, Address, Option<Ballot>)>,
    /// `(proposal_id, ballot_count)` per existing proposal.
    pub ballot_counts: std::vec::Vec<(u64, u32)>,
    /// `(proposal_id, first voter page length)` per existing proposal.
    pub indexed_voters: std::vec::Vec<(u64, u32)>,
}

impl LedgerSnapshot {
    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(id as usize)
    }

    pub fn ballot(&self, proposal_id: u64, voter: &Address) -> Option<&Ballot> {
        self.ballots
            .iter()
            .find(|(id, v, _)| *id == proposal_id && v == voter)
            .and_then(|(_, _, b)| b.as_ref())
    }

    /// Tracked voters holding a ballot on `proposal_id`.
    pub fn recorded_ballots(&self, proposal_id: u64) -> usize {
        self.ballots
            .iter()
            .filter(|(id, _, b)| *id == proposal_id && b.is_some())
            .count()
    }

    pub fn open_proposals(&self) -> usize {
        self.proposals.iter().filter(|p| p.is_open).count()
    }
}

// ── Test Outcome Tracking ────────────────────────────────────────────────────

/// Result of a single test action, used by the state explorer.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Ok,
    /// The contract rejected the action with this error code.
    ExpectedError(u32),
    UnexpectedError(std::string::String),
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ActionOutcome::Ok)
    }
}

/// Summary of a test run with coverage metrics.
#[derive(Debug, Clone)]
pub struct TestRunSummary {
    pub actions_executed: usize,
    pub invariant_checks: usize,
    pub invariant_violations: std::vec::Vec<std::string::String>,
    pub entry_points_hit: std::collections::HashSet<std::string::String>,
    pub transitions_observed: usize,
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self {
            actions_executed: 0,
            invariant_checks: 0,
            invariant_violations: std::vec::Vec::new(),
            entry_points_hit: std::collections::HashSet::new(),
            transitions_observed: 0,
        }
    }

    /// True when no invariant violations were detected.
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Coverage ratio: entry points hit / total known entry points.
    pub fn entry_point_coverage(&self, total_entry_points: usize) -> f64 {
        if total_entry_points == 0 {
            return 0.0;
        }
        self.entry_points_hit.len() as f64 / total_entry_points as f64
    }
}

impl Default for TestRunSummary {
    fn default() -> Self {
        Self::new()
    }
}

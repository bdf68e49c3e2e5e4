//! Ranked ballots keyed by `(proposal_id, voter)`.
//!
//! A voter holds at most one ballot per proposal; a later accepted
//! submission replaces the earlier one outright.  The per-proposal voter index
//! records first-submission order so an off-chain tabulator can snapshot the
//! final ballots without replaying every event.  Each indexed voter is its own
//! entry under `(VOTERS, proposal_id, n)`, so the index never caps how many
//! voters a proposal can take.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::proposal::OPTION_COUNT;

// ── Storage key prefixes ─────────────────────────────────────────────────────

const BALLOT: Symbol = symbol_short!("BALLOT");
const VOTERS: Symbol = symbol_short!("VOTERS");
const VOTER_CT: Symbol = symbol_short!("VOTER_CT");

/// Largest page `voters` returns, whatever limit is asked for.
pub const MAX_VOTER_PAGE: u32 = 200;

// TTL: ~60 days, same horizon as proposals so ballots outlive closing
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

/// One voter's full ranking for a proposal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ballot {
    pub voter: Address,
    /// Credential presented with the accepted submission.
    pub credential_id: u32,
    /// 1st through 4th preference; index is rank.
    pub ranks: Vec<String>,
    pub submitted_at: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn ballot_key(proposal_id: u64, voter: &Address) -> (Symbol, u64, Address) {
    (BALLOT, proposal_id, voter.clone())
}

fn voter_key(proposal_id: u64, index: u32) -> (Symbol, u64, u32) {
    (VOTERS, proposal_id, index)
}

fn voter_count_key(proposal_id: u64) -> (Symbol, u64) {
    (VOTER_CT, proposal_id)
}

/// Write (or overwrite) `ballot` for `proposal_id`.
pub(crate) fn store(env: &Env, proposal_id: u64, ballot: &Ballot) {
    let key = ballot_key(proposal_id, &ballot.voter);
    let first_submission = !env.storage().persistent().has(&key);

    env.storage().persistent().set(&key, ballot);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    if first_submission {
        let index = voter_count(env, proposal_id);
        let vkey = voter_key(proposal_id, index);
        env.storage().persistent().set(&vkey, &ballot.voter);
        env.storage()
            .persistent()
            .extend_ttl(&vkey, TTL_THRESHOLD, TTL_EXTEND_TO);

        let ckey = voter_count_key(proposal_id);
        env.storage()
            .persistent()
            .set(&ckey, &index.saturating_add(1));
        env.storage()
            .persistent()
            .extend_ttl(&ckey, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub(crate) fn load(env: &Env, proposal_id: u64, voter: &Address) -> Option<Ballot> {
    env.storage()
        .persistent()
        .get(&ballot_key(proposal_id, voter))
}

pub(crate) fn has_ballot(env: &Env, proposal_id: u64, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&ballot_key(proposal_id, voter))
}

pub(crate) fn voter_count(env: &Env, proposal_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&voter_count_key(proposal_id))
        .unwrap_or(0)
}

/// Indexed voters `start..start + limit`, with `limit` clamped to
/// [`MAX_VOTER_PAGE`].  Empty once `start` passes the end.
pub(crate) fn voters(env: &Env, proposal_id: u64, start: u32, limit: u32) -> Vec<Address> {
    let end = start
        .saturating_add(limit.min(MAX_VOTER_PAGE))
        .min(voter_count(env, proposal_id));

    let mut page = Vec::new(env);
    for index in start..end {
        if let Some(voter) = env.storage().persistent().get(&voter_key(proposal_id, index)) {
            page.push_back(voter);
        }
    }
    page
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Strict-ranking check: four non-empty, pairwise distinct entries.
///
/// Ranks are never compared against the proposal's option labels.
pub fn is_strict_ranking(ranks: &Vec<String>) -> bool {
    if ranks.len() != OPTION_COUNT {
        return false;
    }
    for (i, rank) in ranks.iter().enumerate() {
        if rank.len() == 0 {
            return false;
        }
        for other in ranks.iter().skip(i + 1) {
            if rank == other {
                return false;
            }
        }
    }
    true
}

pub(crate) fn ranks_of(
    env: &Env,
    rank_1: &String,
    rank_2: &String,
    rank_3: &String,
    rank_4: &String,
) -> Vec<String> {
    let mut ranks = Vec::new(env);
    ranks.push_back(rank_1.clone());
    ranks.push_back(rank_2.clone());
    ranks.push_back(rank_3.clone());
    ranks.push_back(rank_4.clone());
    ranks
}

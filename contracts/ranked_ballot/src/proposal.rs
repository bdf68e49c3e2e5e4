//! Proposal types, storage, and open/closed lifecycle for the ballot ledger.
//!
//! Proposals live in an append-only list addressed by a dense, zero-based id.
//! The counter stored under `PROP_CTR` is the number of proposals created so
//! far, so the next id is always the current count.

use soroban_sdk::{contracttype, symbol_short, Env, String, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

pub(crate) const PROPOSAL_CTR: Symbol = symbol_short!("PROP_CTR");
pub(crate) const PROPOSAL: Symbol = symbol_short!("PROP");

/// Every proposal offers exactly this many options.
pub const OPTION_COUNT: u32 = 4;

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Lifecycle of a proposal.
///
/// ```text
/// Open ──close──► Closed   (terminal)
/// ```
///
/// Stored as the `is_open` flag on [`Proposal`]; ballots are accepted only
/// while open.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub name: String,
    /// Four option labels, in the order supplied at creation.
    pub options: Vec<String>,
    pub is_open: bool,
    pub created_at: u64,
    /// Timestamp of the first close; repeated closes leave it untouched.
    pub closed_at: Option<u64>,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

/// Number of proposals ever created.
pub(crate) fn count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&PROPOSAL_CTR)
        .unwrap_or(0u64)
}

/// Reserve the next id.  Ids start at zero and never skip.
pub(crate) fn next_id(env: &Env) -> u64 {
    let id = count(env);
    env.storage()
        .instance()
        .set(&PROPOSAL_CTR, &id.saturating_add(1));
    id
}

/// Highest assigned id, or `None` before the first proposal.
pub(crate) fn latest_id(env: &Env) -> Option<u64> {
    count(env).checked_sub(1)
}

pub(crate) fn proposal_key(id: u64) -> (Symbol, u64) {
    (PROPOSAL, id)
}

pub(crate) fn store(env: &Env, proposal: &Proposal) {
    let key = proposal_key(proposal.id);
    env.storage().persistent().set(&key, proposal);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, id: u64) -> Option<Proposal> {
    if id >= count(env) {
        return None;
    }
    env.storage().persistent().get(&proposal_key(id))
}

pub(crate) fn options_of(
    env: &Env,
    option_1: &String,
    option_2: &String,
    option_3: &String,
    option_4: &String,
) -> Vec<String> {
    let mut options = Vec::new(env);
    options.push_back(option_1.clone());
    options.push_back(option_2.clone());
    options.push_back(option_3.clone());
    options.push_back(option_4.clone());
    options
}

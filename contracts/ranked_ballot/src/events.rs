//! Structured signal stream for the ballot ledger.
//!
//! Every signal is published under `(TAG, seq, ...)` where `seq` is a
//! contract-wide counter starting at 1.  An off-chain tabulator orders the
//! stream by `seq`, applies last-write-wins per `(proposal_id, voter)` to
//! `VOTED` signals, and stops at the first `VOTE_END` for each proposal.

#![allow(deprecated)] // events().publish migration tracked separately

use common::AuthPolicy;
use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String, Symbol};

const SIG_SEQ: Symbol = symbol_short!("SIG_SEQ");

// ── Event payloads ───────────────────────────────────────────────────────────

/// Fired once per successful `create_proposal`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalCreatedEvent {
    pub proposal_id: u64,
    pub name: String,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,
    pub timestamp: u64,
}

/// Fired once per accepted ballot, including overwrites.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoterVotedEvent {
    pub credential_id: u32,
    pub proposal_id: u64,
    pub voter: Address,
    pub rank_1: String,
    pub rank_2: String,
    pub rank_3: String,
    pub rank_4: String,
    pub timestamp: u64,
}

/// Fired on every `close_proposal`, redundant closes included.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VotingEndedEvent {
    pub proposal_id: u64,
    pub timestamp: u64,
}

/// Fired when the administrator policy is replaced.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyChangedEvent {
    pub changed_by: Address,
    pub policy: AuthPolicy,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryBoundEvent {
    pub registry: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrictRankingEvent {
    pub enabled: bool,
    pub timestamp: u64,
}

/// Fired when a threshold signer approves a pending admin action.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionApprovedEvent {
    pub signer: Address,
    pub digest: BytesN<32>,
    pub approvals: u32,
    pub timestamp: u64,
}

// ── Sequencing ───────────────────────────────────────────────────────────────

/// Number of signals emitted so far.
pub fn sequence(env: &Env) -> u64 {
    env.storage().instance().get(&SIG_SEQ).unwrap_or(0u64)
}

fn next_seq(env: &Env) -> u64 {
    let seq = sequence(env).saturating_add(1);
    env.storage().instance().set(&SIG_SEQ, &seq);
    seq
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_proposal_created(
    env: &Env,
    proposal_id: u64,
    name: &String,
    option_1: &String,
    option_2: &String,
    option_3: &String,
    option_4: &String,
) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("PROP_NEW"), seq, proposal_id),
        ProposalCreatedEvent {
            proposal_id,
            name: name.clone(),
            option_1: option_1.clone(),
            option_2: option_2.clone(),
            option_3: option_3.clone(),
            option_4: option_4.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_voter_voted(
    env: &Env,
    credential_id: u32,
    proposal_id: u64,
    voter: &Address,
    rank_1: &String,
    rank_2: &String,
    rank_3: &String,
    rank_4: &String,
) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("VOTED"), seq, proposal_id),
        VoterVotedEvent {
            credential_id,
            proposal_id,
            voter: voter.clone(),
            rank_1: rank_1.clone(),
            rank_2: rank_2.clone(),
            rank_3: rank_3.clone(),
            rank_4: rank_4.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_voting_ended(env: &Env, proposal_id: u64) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("VOTE_END"), seq, proposal_id),
        VotingEndedEvent {
            proposal_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transferred(env: &Env, changed_by: &Address, policy: &AuthPolicy) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("ADMIN_SET"), seq),
        PolicyChangedEvent {
            changed_by: changed_by.clone(),
            policy: policy.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_changed(env: &Env, changed_by: &Address, policy: &AuthPolicy) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("POLICY"), seq),
        PolicyChangedEvent {
            changed_by: changed_by.clone(),
            policy: policy.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_registry_bound(env: &Env, registry: &Address) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("REG_BIND"), seq),
        RegistryBoundEvent {
            registry: registry.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_strict_ranking(env: &Env, enabled: bool) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("STRICT"), seq),
        StrictRankingEvent {
            enabled,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_approved(env: &Env, signer: &Address, digest: &BytesN<32>, approvals: u32) {
    let seq = next_seq(env);
    env.events().publish(
        (symbol_short!("APPROVE"), seq),
        ActionApprovedEvent {
            signer: signer.clone(),
            digest: digest.clone(),
            approvals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

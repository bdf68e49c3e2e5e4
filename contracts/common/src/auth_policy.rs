//! Pluggable administrator guard.
//!
//! A contract stores one [`AuthPolicy`] in instance storage and calls
//! [`require_authorized`] at the top of every admin-only entry point.  The
//! guard never calls `require_auth` itself; the entry point authenticates the
//! caller first, the guard only decides whether that caller may act.
//!
//! ## Policies
//! | Variant     | Who may act                                              |
//! |-------------|----------------------------------------------------------|
//! | `SingleKey` | exactly the stored address                               |
//! | `Threshold` | any signer, once `threshold - 1` other signers approved  |
//! | `RoleList`  | any listed member                                        |
//!
//! Threshold approvals are bound to a 32-byte action digest computed by the
//! contract, so an approval for one action can never authorise another.
//! Approvals are consumed when the action executes, and every
//! [`set_policy`] starts a new epoch in which earlier approvals no longer
//! count.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, Symbol, Vec};

use crate::CommonError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const POLICY: Symbol = symbol_short!("AUTH_POL");
const APPROVAL: Symbol = symbol_short!("AUTH_APR");
const EPOCH: Symbol = symbol_short!("AUTH_EPO");

// ~30 days at 5s/ledger
const APPROVAL_TTL_THRESHOLD: u32 = 518_400;
const APPROVAL_TTL_EXTEND_TO: u32 = 1_036_800;

// ── Types ────────────────────────────────────────────────────────────────────

/// Who holds the administrator capability.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthPolicy {
    /// One address holds the capability outright.
    SingleKey(Address),
    /// `(signers, threshold)`: M-of-N approval per action.
    Threshold(Vec<Address>, u32),
    /// Every listed address holds the capability.
    RoleList(Vec<Address>),
}

fn approval_key(
    env: &Env,
    digest: &BytesN<32>,
    signer: &Address,
) -> (Symbol, u32, BytesN<32>, Address) {
    (APPROVAL, policy_epoch(env), digest.clone(), signer.clone())
}

// ── Policy storage ───────────────────────────────────────────────────────────

/// Check structural soundness of a policy before it is installed.
///
/// Member lists must be non-empty and a threshold must lie in
/// `1..=signers.len()`.  A `SingleKey` is accepted as-is.
pub fn validate_policy(policy: &AuthPolicy) -> Result<(), CommonError> {
    match policy {
        AuthPolicy::SingleKey(_) => Ok(()),
        AuthPolicy::Threshold(signers, threshold) => {
            if signers.is_empty() || *threshold == 0 || *threshold > signers.len() {
                return Err(CommonError::InvalidInput);
            }
            Ok(())
        }
        AuthPolicy::RoleList(members) => {
            if members.is_empty() {
                return Err(CommonError::InvalidInput);
            }
            Ok(())
        }
    }
}

/// Install `policy`.  Callers validate and authorise beforehand.
///
/// Bumps the policy epoch, orphaning every approval recorded so far.
pub fn set_policy(env: &Env, policy: &AuthPolicy) {
    let epoch = policy_epoch(env).wrapping_add(1);
    env.storage().instance().set(&EPOCH, &epoch);
    env.storage().instance().set(&POLICY, policy);
}

/// Number of policies installed so far.
pub fn policy_epoch(env: &Env) -> u32 {
    env.storage().instance().get(&EPOCH).unwrap_or(0)
}

pub fn get_policy(env: &Env) -> Option<AuthPolicy> {
    env.storage().instance().get(&POLICY)
}

/// Whether `caller` is recognised by `policy` at all.
///
/// For a threshold policy this means "is a signer"; it does not imply the
/// caller can act alone.
pub fn is_member(policy: &AuthPolicy, caller: &Address) -> bool {
    match policy {
        AuthPolicy::SingleKey(admin) => admin == caller,
        AuthPolicy::Threshold(signers, _) => signers.contains(caller),
        AuthPolicy::RoleList(members) => members.contains(caller),
    }
}

// ── Threshold approvals ──────────────────────────────────────────────────────

/// Record `signer`'s approval of the action identified by `digest`.
///
/// Only meaningful under a threshold policy; any other policy rejects the
/// call with `AccessDenied`.  Approving twice is idempotent.  Returns the
/// number of approvals now recorded for the digest.
pub fn record_approval(
    env: &Env,
    signer: &Address,
    digest: &BytesN<32>,
) -> Result<u32, CommonError> {
    let policy = get_policy(env).ok_or(CommonError::NotInitialized)?;
    let signers = match &policy {
        AuthPolicy::Threshold(signers, _) => signers.clone(),
        _ => return Err(CommonError::AccessDenied),
    };
    if !signers.contains(signer) {
        return Err(CommonError::NotASigner);
    }

    let key = approval_key(env, digest, signer);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, APPROVAL_TTL_THRESHOLD, APPROVAL_TTL_EXTEND_TO);

    Ok(count_approvals(env, &signers, digest, None))
}

/// Number of current signers that approved `digest`.
///
/// Returns 0 when the active policy is not a threshold policy.
pub fn approval_count(env: &Env, digest: &BytesN<32>) -> u32 {
    match get_policy(env) {
        Some(AuthPolicy::Threshold(signers, _)) => count_approvals(env, &signers, digest, None),
        _ => 0,
    }
}

fn count_approvals(
    env: &Env,
    signers: &Vec<Address>,
    digest: &BytesN<32>,
    skip: Option<&Address>,
) -> u32 {
    let mut n = 0u32;
    for signer in signers.iter() {
        if skip == Some(&signer) {
            continue;
        }
        if env.storage().persistent().has(&approval_key(env, digest, &signer)) {
            n = n.saturating_add(1);
        }
    }
    n
}

fn clear_approvals(env: &Env, signers: &Vec<Address>, digest: &BytesN<32>) {
    for signer in signers.iter() {
        env.storage()
            .persistent()
            .remove(&approval_key(env, digest, &signer));
    }
}

// ── Guard ────────────────────────────────────────────────────────────────────

/// Guard for admin-only entry points.
///
/// `digest` identifies the exact action being performed; it is only read
/// under a threshold policy, where the caller's own invocation counts as one
/// approval and the remaining `threshold - 1` must already be on record.
pub fn require_authorized(
    env: &Env,
    caller: &Address,
    digest: &BytesN<32>,
) -> Result<(), CommonError> {
    let policy = get_policy(env).ok_or(CommonError::NotInitialized)?;
    match policy {
        AuthPolicy::SingleKey(admin) => {
            if admin != *caller {
                return Err(CommonError::AccessDenied);
            }
        }
        AuthPolicy::RoleList(members) => {
            if !members.contains(caller) {
                return Err(CommonError::AccessDenied);
            }
        }
        AuthPolicy::Threshold(signers, threshold) => {
            if !signers.contains(caller) {
                return Err(CommonError::AccessDenied);
            }
            let others = count_approvals(env, &signers, digest, Some(caller));
            if others.saturating_add(1) < threshold {
                return Err(CommonError::ApprovalThresholdNotMet);
            }
            clear_approvals(env, &signers, digest);
        }
    }
    Ok(())
}

//! Administrative actions and their approval digests.
//!
//! Each admin entry point describes itself as an [`AdminAction`].  Under a
//! threshold policy co-signers approve that exact value ahead of time via
//! `approve_admin_action`; the digest binds an approval to the action and its
//! arguments.

use common::AuthPolicy;
use soroban_sdk::{contracttype, xdr::ToXdr, Address, BytesN, Env, String, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdminAction {
    TransferAdministration(Address),
    SetAuthPolicy(AuthPolicy),
    BindCredentialRegistry(Address),
    SetStrictRanking(bool),
    /// `(name, options)` with the four option labels in order.
    CreateProposal(String, Vec<String>),
    CloseProposal(u64),
}

/// SHA-256 over the XDR encoding of `action`.
pub fn action_digest(env: &Env, action: &AdminAction) -> BytesN<32> {
    // to_xdr takes ownership
    let encoded = action.clone().to_xdr(env);
    env.crypto().sha256(&encoded).into()
}

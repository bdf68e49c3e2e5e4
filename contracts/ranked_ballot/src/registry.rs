//! Binding to the external membership-credential registry.
//!
//! The registry is any contract exposing `owner_of(token_id) -> Address`
//! (the usual non-fungible token interface).  Ownership is resolved on every
//! ballot submission; nothing is cached.

use soroban_sdk::{contractclient, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const REGISTRY: Symbol = symbol_short!("CRED_REG");

#[contractclient(name = "CredentialRegistryClient")]
#[allow(dead_code)]
pub trait CredentialRegistry {
    fn owner_of(env: Env, token_id: u32) -> Address;
}

pub(crate) fn bind(env: &Env, registry: &Address) {
    env.storage().instance().set(&REGISTRY, registry);
}

pub(crate) fn bound(env: &Env) -> Option<Address> {
    env.storage().instance().get(&REGISTRY)
}

/// Resolve the current holder of `credential_id`.
///
/// Every failure mode collapses to `CredentialLookupFailed`: no registry
/// bound, an unminted id, or a registry call that traps.
pub(crate) fn owner_of(env: &Env, credential_id: u32) -> Result<Address, ContractError> {
    let registry = bound(env).ok_or(ContractError::CredentialLookupFailed)?;
    let client = CredentialRegistryClient::new(env, &registry);
    match client.try_owner_of(&credential_id) {
        Ok(Ok(owner)) => Ok(owner),
        _ => Err(ContractError::CredentialLookupFailed),
    }
}

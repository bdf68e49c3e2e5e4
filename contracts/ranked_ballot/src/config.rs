//! Ledger configuration held in instance storage.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

const CONFIG: Symbol = symbol_short!("CONFIG");

// Instance entries (admin policy, registry, counters) share one TTL.
const INSTANCE_TTL_THRESHOLD: u32 = 1_036_800;
const INSTANCE_TTL_EXTEND_TO: u32 = 2_073_600;

/// Tunables fixed at `initialize` and adjustable by the administrator.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Reject ballots whose four ranks are empty or repeat a value.
    /// Off by default: the ledger records whatever ranking it is given.
    pub strict_ranking: bool,
}

pub(crate) fn load(env: &Env) -> LedgerConfig {
    env.storage()
        .instance()
        .get(&CONFIG)
        .unwrap_or_default()
}

pub(crate) fn store(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub(crate) fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ranked_ballot::{RankedBallotContract, RankedBallotContractClient};
use soroban_sdk::{
    contract, contracterror, contractimpl,
    testutils::{Address as _, Ledger as _},
    Address, Env, String,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    NotMinted = 1,
}

#[contract]
pub struct FuzzRegistry;

#[contractimpl]
impl FuzzRegistry {
    pub fn mint(env: Env, token_id: u32, owner: Address) {
        env.storage().persistent().set(&token_id, &owner);
    }

    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, RegistryError> {
        env.storage()
            .persistent()
            .get(&token_id)
            .ok_or(RegistryError::NotMinted)
    }
}

const LABELS: [&str; 6] = ["", "A", "B", "C", "D", "Abstain"];

/// Actions covering every mutating ledger entry point.
///
/// Label and index fields are small integers mapped onto fixed pools so the
/// fuzzer spends its time on state, not on string contents.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    CreateProposal { labels: [u8; 5] },
    CloseProposal { proposal: u8 },
    Submit { voter: u8, credential: u8, proposal: u8, ranks: [u8; 4] },
    TransferCredential { credential: u8, to: u8 },
    SetStrictRanking { enabled: bool },
    IntruderClose { proposal: u8 },
    AdvanceTime { delta: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let intruder = Address::generate(&env);

    let registry_id = env.register(FuzzRegistry, ());
    let registry = FuzzRegistryClient::new(&env, &registry_id);

    let contract_id = env.register(RankedBallotContract, ());
    let client = RankedBallotContractClient::new(&env, &contract_id);

    if client.try_initialize(&admin, &registry_id, &false).is_err() {
        return;
    }

    // Credentials 0..4 start with voter i; id 4 is never minted.
    let voters: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    for (i, v) in voters.iter().enumerate() {
        registry.mint(&(i as u32), v);
    }

    let label = |i: u8| String::from_str(&env, LABELS[i as usize % LABELS.len()]);

    for action in actions {
        let count_before = client.proposal_count();
        let seq_before = client.signal_sequence();
        let mut accepted = false;
        let mut mutating = true;

        match action {
            FuzzAction::CreateProposal { labels } => {
                accepted = client
                    .try_create_proposal(
                        &admin,
                        &label(labels[0]),
                        &label(labels[1]),
                        &label(labels[2]),
                        &label(labels[3]),
                        &label(labels[4]),
                    )
                    .is_ok();
                if accepted {
                    assert_eq!(client.proposal_count(), count_before + 1);
                    assert_eq!(client.latest_proposal_id(), Some(count_before));
                }
            }
            FuzzAction::CloseProposal { proposal } => {
                let id = proposal as u64;
                let prior = client.try_get_proposal(&id);
                accepted = client.try_close_proposal(&admin, &id).is_ok();
                assert_eq!(accepted, id < count_before);
                if let Ok(Ok(prior)) = prior {
                    let now = client.get_proposal(&id);
                    assert!(!now.is_open);
                    if !prior.is_open {
                        assert_eq!(now.closed_at, prior.closed_at);
                    }
                }
            }
            FuzzAction::Submit {
                voter,
                credential,
                proposal,
                ranks,
            } => {
                let voter = &voters[voter as usize % voters.len()];
                let id = proposal as u64;
                let prior = client.get_ballot(&id, voter);
                let was_open = matches!(client.try_is_open(&id), Ok(Ok(true)));

                accepted = client
                    .try_submit_ballot(
                        voter,
                        &(credential as u32 % 5),
                        &id,
                        &label(ranks[0]),
                        &label(ranks[1]),
                        &label(ranks[2]),
                        &label(ranks[3]),
                    )
                    .is_ok();

                if accepted {
                    assert!(was_open, "ballot accepted on a closed or missing proposal");
                    assert!(client.has_voted(&id, voter));
                } else {
                    assert_eq!(client.get_ballot(&id, voter), prior);
                }
            }
            FuzzAction::TransferCredential { credential, to } => {
                mutating = false;
                let to = &voters[to as usize % voters.len()];
                registry.mint(&(credential as u32 % 4), to);
            }
            FuzzAction::SetStrictRanking { enabled } => {
                accepted = client.try_set_strict_ranking(&admin, &enabled).is_ok();
                assert!(accepted);
            }
            FuzzAction::IntruderClose { proposal } => {
                let res = client.try_close_proposal(&intruder, &(proposal as u64));
                assert!(res.is_err(), "non-admin closed a proposal");
            }
            FuzzAction::AdvanceTime { delta } => {
                mutating = false;
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        let seq_after = client.signal_sequence();
        let expected = if mutating && accepted { 1 } else { 0 };
        assert_eq!(
            seq_after,
            seq_before + expected,
            "INVARIANT VIOLATION: signal count does not match accepted mutations"
        );
        let next_id = client.proposal_count();
        assert!(next_id >= count_before);
        assert!(client.get_voters(&next_id, &0, &10).is_empty());
        assert_eq!(client.ballot_count(&next_id), 0);
        for v in &voters {
            assert_eq!(client.get_ballot(&next_id, v), None);
        }
    }
});

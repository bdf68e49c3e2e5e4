#![no_std]

//! # Ranked Ballot Ledger
//!
//! Records proposals and ranked-choice ballots for credential-gated
//! governance:
//!
//! - **Proposal ledger**: append-only, dense zero-based ids, four options per
//!   proposal, `Open → Closed` lifecycle
//! - **Ballot store**: one ballot per `(proposal, voter)`, last write wins,
//!   accepted only while the proposal is open and only from the current
//!   holder of the presented membership credential
//! - **Authorization guard**: pluggable administrator policy (single key,
//!   M-of-N threshold, or role list) gating every admin mutation
//! - **Signal stream**: sequenced `PROP_NEW` / `VOTED` / `VOTE_END` events
//!   from which an off-chain process tabulates the Instant-Runoff result
//!
//! Tabulation itself happens off-chain.

pub mod admin;
pub mod ballot;
pub mod config;
pub mod events;
pub mod proposal;
pub mod registry;

use common::{auth_policy, AuthPolicy, CommonError};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol, Vec};

use admin::{action_digest, AdminAction};
use ballot::Ballot;
use config::LedgerConfig;
use proposal::Proposal;

// ── Storage key constants ─────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    IndexOutOfRange = 4,
    ProposalClosed = 5,
    NotCredentialHolder = 6,
    CredentialLookupFailed = 7,
    InvalidRanking = 8,
    InvalidPolicy = 9,
    ApprovalsPending = 10,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied | CommonError::NotASigner => ContractError::Unauthorized,
            CommonError::ApprovalThresholdNotMet => ContractError::ApprovalsPending,
            CommonError::InvalidInput => ContractError::InvalidPolicy,
        }
    }
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct RankedBallotContract;

#[contractimpl]
impl RankedBallotContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `admin`: sole administrator, installed as a single-key policy and
    ///   replaceable later.
    /// * `credential_registry`: registry consulted on every ballot.
    /// * `strict_ranking`: reject empty or repeated ranks when `true`.
    pub fn initialize(
        env: Env,
        admin: Address,
        credential_registry: Address,
        strict_ranking: bool,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        auth_policy::set_policy(&env, &AuthPolicy::SingleKey(admin));
        registry::bind(&env, &credential_registry);
        config::store(&env, &LedgerConfig { strict_ranking });
        env.storage().instance().set(&INITIALIZED, &true);
        config::extend_instance_ttl(&env);

        Ok(())
    }

    // ── Authorization guard ───────────────────────────────────────────────────

    /// Whether `caller` is recognised by the current administrator policy.
    ///
    /// Under a threshold policy this is true for every signer, even though a
    /// signer still needs co-signer approvals to act.
    pub fn is_administrator(env: Env, caller: Address) -> bool {
        auth_policy::get_policy(&env)
            .map(|policy| auth_policy::is_member(&policy, &caller))
            .unwrap_or(false)
    }

    /// Hand the administrator capability to `new_admin` in one step.
    ///
    /// Replaces whatever policy is active with a single-key policy.  The new
    /// address is not validated.
    pub fn transfer_administration(
        env: Env,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::authorize(
            &env,
            &caller,
            &AdminAction::TransferAdministration(new_admin.clone()),
        )?;

        let policy = AuthPolicy::SingleKey(new_admin);
        auth_policy::set_policy(&env, &policy);
        events::publish_admin_transferred(&env, &caller, &policy);

        Ok(())
    }

    /// Install a new administrator policy (single key, threshold, role list).
    pub fn set_auth_policy(
        env: Env,
        caller: Address,
        policy: AuthPolicy,
    ) -> Result<(), ContractError> {
        Self::authorize(&env, &caller, &AdminAction::SetAuthPolicy(policy.clone()))?;
        auth_policy::validate_policy(&policy)?;

        auth_policy::set_policy(&env, &policy);
        events::publish_policy_changed(&env, &caller, &policy);

        Ok(())
    }

    /// Record a threshold signer's approval of `action`.
    ///
    /// Returns the number of approvals now on record for that exact action.
    pub fn approve_admin_action(
        env: Env,
        signer: Address,
        action: AdminAction,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        signer.require_auth();

        let digest = action_digest(&env, &action);
        let approvals = auth_policy::record_approval(&env, &signer, &digest)?;
        events::publish_action_approved(&env, &signer, &digest, approvals);

        Ok(approvals)
    }

    pub fn approval_count(env: Env, action: AdminAction) -> u32 {
        auth_policy::approval_count(&env, &action_digest(&env, &action))
    }

    /// Point ownership checks at a different credential registry.
    pub fn bind_credential_registry(
        env: Env,
        caller: Address,
        credential_registry: Address,
    ) -> Result<(), ContractError> {
        Self::authorize(
            &env,
            &caller,
            &AdminAction::BindCredentialRegistry(credential_registry.clone()),
        )?;

        registry::bind(&env, &credential_registry);
        events::publish_registry_bound(&env, &credential_registry);

        Ok(())
    }

    pub fn set_strict_ranking(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::authorize(&env, &caller, &AdminAction::SetStrictRanking(enabled))?;

        config::store(&env, &LedgerConfig { strict_ranking: enabled });
        events::publish_strict_ranking(&env, enabled);

        Ok(())
    }

    // ── Proposal ledger ───────────────────────────────────────────────────────

    /// Append an open proposal and return its id.
    ///
    /// Ids are zero-based and dense: the first call returns 0 and ids never
    /// skip.
    /// Names and labels are stored verbatim, empty or duplicate included.
    pub fn create_proposal(
        env: Env,
        caller: Address,
        name: String,
        option_1: String,
        option_2: String,
        option_3: String,
        option_4: String,
    ) -> Result<u64, ContractError> {
        let options = proposal::options_of(&env, &option_1, &option_2, &option_3, &option_4);
        Self::authorize(
            &env,
            &caller,
            &AdminAction::CreateProposal(name.clone(), options.clone()),
        )?;

        let id = proposal::next_id(&env);
        let record = Proposal {
            id,
            name: name.clone(),
            options,
            is_open: true,
            created_at: env.ledger().timestamp(),
            closed_at: None,
        };
        proposal::store(&env, &record);
        events::publish_proposal_created(
            &env, id, &name, &option_1, &option_2, &option_3, &option_4,
        );

        Ok(id)
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<Proposal, ContractError> {
        proposal::load(&env, proposal_id).ok_or(ContractError::IndexOutOfRange)
    }

    /// Number of proposals created so far.
    pub fn proposal_count(env: Env) -> u64 {
        proposal::count(&env)
    }

    /// Highest assigned proposal id; `None` until the first proposal exists.
    pub fn latest_proposal_id(env: Env) -> Option<u64> {
        proposal::latest_id(&env)
    }

    pub fn is_open(env: Env, proposal_id: u64) -> Result<bool, ContractError> {
        proposal::load(&env, proposal_id)
            .map(|p| p.is_open)
            .ok_or(ContractError::IndexOutOfRange)
    }

    /// Close a proposal to further ballots.
    ///
    /// Closing an already-closed proposal succeeds and re-emits `VOTE_END`
    /// without touching stored state; consumers key on the first occurrence.
    pub fn close_proposal(
        env: Env,
        caller: Address,
        proposal_id: u64,
    ) -> Result<(), ContractError> {
        Self::authorize(&env, &caller, &AdminAction::CloseProposal(proposal_id))?;

        let mut record =
            proposal::load(&env, proposal_id).ok_or(ContractError::IndexOutOfRange)?;
        if record.is_open {
            record.is_open = false;
            record.closed_at = Some(env.ledger().timestamp());
            proposal::store(&env, &record);
        }
        events::publish_voting_ended(&env, proposal_id);

        Ok(())
    }

    // ── Ballot store ──────────────────────────────────────────────────────────

    /// Submit (or replace) `voter`'s ranking for `proposal_id`.
    ///
    /// Checks run in order: the voter signs, the registry resolves
    /// `credential_id`, the voter holds it, the proposal exists and is open,
    /// and, under strict ranking, the four ranks are non-empty and distinct.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_ballot(
        env: Env,
        voter: Address,
        credential_id: u32,
        proposal_id: u64,
        rank_1: String,
        rank_2: String,
        rank_3: String,
        rank_4: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let owner = registry::owner_of(&env, credential_id)?;
        if owner != voter {
            return Err(ContractError::NotCredentialHolder);
        }

        let record = proposal::load(&env, proposal_id).ok_or(ContractError::IndexOutOfRange)?;
        if !record.is_open {
            return Err(ContractError::ProposalClosed);
        }

        let ranks = ballot::ranks_of(&env, &rank_1, &rank_2, &rank_3, &rank_4);
        if config::load(&env).strict_ranking && !ballot::is_strict_ranking(&ranks) {
            return Err(ContractError::InvalidRanking);
        }

        let entry = Ballot {
            voter: voter.clone(),
            credential_id,
            ranks,
            submitted_at: env.ledger().timestamp(),
        };
        ballot::store(&env, proposal_id, &entry);
        events::publish_voter_voted(
            &env,
            credential_id,
            proposal_id,
            &voter,
            &rank_1,
            &rank_2,
            &rank_3,
            &rank_4,
        );
        config::extend_instance_ttl(&env);

        Ok(())
    }

    /// The ballot stored for `(proposal_id, voter)`, or `None` if that voter
    /// never submitted one.
    pub fn get_ballot(env: Env, proposal_id: u64, voter: Address) -> Option<Ballot> {
        ballot::load(&env, proposal_id, &voter)
    }

    pub fn has_voted(env: Env, proposal_id: u64, voter: Address) -> bool {
        ballot::has_ballot(&env, proposal_id, &voter)
    }

    /// One page of voters with a ballot on `proposal_id`, in first-submission
    /// order.  At most `ballot::MAX_VOTER_PAGE` addresses per call.
    pub fn get_voters(env: Env, proposal_id: u64, start: u32, limit: u32) -> Vec<Address> {
        ballot::voters(&env, proposal_id, start, limit)
    }

    /// Number of distinct voters with a ballot on `proposal_id`.
    pub fn ballot_count(env: Env, proposal_id: u64) -> u32 {
        ballot::voter_count(&env, proposal_id)
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_auth_policy(env: Env) -> Result<AuthPolicy, ContractError> {
        auth_policy::get_policy(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_credential_registry(env: Env) -> Result<Address, ContractError> {
        registry::bound(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_config(env: Env) -> LedgerConfig {
        config::load(&env)
    }

    /// Number of signals emitted so far; the `seq` of the latest event.
    pub fn signal_sequence(env: Env) -> u64 {
        events::sequence(&env)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Authenticate `caller` and run the administrator guard for `action`.
    fn authorize(env: &Env, caller: &Address, action: &AdminAction) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        auth_policy::require_authorized(env, caller, &action_digest(env, action))?;
        config::extend_instance_ttl(env);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

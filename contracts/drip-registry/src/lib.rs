//! Track registry that drips NEP-141 payouts to content owners and co-beneficiaries.

use crate::errors::DripError;
use crate::state::DripRegistryState;
use crate::types::{PendingDrip, RegistryConfig, TrackTerms, TrackView};
use near_sdk::json_types::U128;
use near_sdk::{
    env, ext_contract, near, AccountId, FunctionError, PanicOnDefault, Promise, PromiseOrValue,
};

mod admin;
mod authorization;
pub mod disbursement;
pub mod errors;
mod events;
pub mod state;
mod storage;
mod tracks;
mod treasury;
pub mod types;
pub mod validation;

/// Upper bound on what a token contract may return from `ft_transfer`.
const MAX_TRANSFER_RESULT_LEN: usize = 64;

#[ext_contract(ext_self)]
pub trait SelfCallback {
    fn on_drip_resolved(&mut self, drip: PendingDrip) -> bool;
    fn on_withdraw_resolved(&mut self, receiver_id: AccountId, amount: U128) -> bool;
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct DripRegistry {
    state: DripRegistryState,
}

#[near]
impl DripRegistry {
    #[init]
    pub fn new(owner_id: AccountId, token_id: AccountId) -> Self {
        Self {
            state: DripRegistryState::new(owner_id, token_id).unwrap_or_else(|e| e.panic()),
        }
    }

    #[private]
    #[init(ignore_state)]
    pub fn migrate() -> Self {
        Self {
            state: DripRegistryState::migrate(),
        }
    }

    // --- Authorization ---

    #[handle_result]
    pub fn set_authorized(&mut self, account_id: AccountId, enabled: bool) -> Result<(), DripError> {
        self.state
            .set_authorized(&env::predecessor_account_id(), account_id, enabled)
    }

    pub fn is_authorized(&self, account_id: AccountId) -> bool {
        self.state.is_authorized(&account_id)
    }

    // --- Tracks ---

    #[payable]
    #[handle_result]
    pub fn register_track(
        &mut self,
        track_id: String,
        co_beneficiary: Option<AccountId>,
        base_amount: U128,
        owner_share: u8,
        co_beneficiary_share: u8,
    ) -> Result<(), DripError> {
        self.state.register_track(
            &env::predecessor_account_id(),
            env::attached_deposit().as_yoctonear(),
            track_id,
            TrackTerms {
                co_beneficiary,
                base_amount: base_amount.0,
                owner_share,
                co_beneficiary_share,
            },
        )
    }

    #[payable]
    #[handle_result]
    pub fn update_track(
        &mut self,
        track_id: String,
        co_beneficiary: Option<AccountId>,
        base_amount: U128,
        owner_share: u8,
        co_beneficiary_share: u8,
    ) -> Result<(), DripError> {
        self.state.update_track(
            &env::predecessor_account_id(),
            env::attached_deposit().as_yoctonear(),
            track_id,
            TrackTerms {
                co_beneficiary,
                base_amount: base_amount.0,
                owner_share,
                co_beneficiary_share,
            },
        )
    }

    pub fn get_track(&self, track_id: String) -> Option<TrackView> {
        self.state.get_track(&track_id)
    }

    // --- Disbursement ---

    #[handle_result]
    pub fn drip_for_track(&mut self, track_id: String) -> Result<PromiseOrValue<bool>, DripError> {
        self.state
            .drip_for_track(&env::predecessor_account_id(), track_id)
    }

    #[private]
    pub fn on_drip_resolved(&mut self, drip: PendingDrip) -> bool {
        self.state.resolve_drip(transfer_succeeded(), drip)
    }

    // --- Treasury ---

    /// NEP-141 receiver; only `{"action":"deposit"}` from the owner is accepted.
    #[handle_result]
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> Result<U128, DripError> {
        self.state
            .deposit(&env::predecessor_account_id(), &sender_id, amount.0, &msg)?;
        Ok(U128(0))
    }

    #[handle_result]
    pub fn withdraw(&mut self, amount: U128) -> Result<Promise, DripError> {
        self.state.withdraw(&env::predecessor_account_id(), amount.0)
    }

    #[private]
    pub fn on_withdraw_resolved(&mut self, receiver_id: AccountId, amount: U128) -> bool {
        self.state
            .resolve_withdraw(transfer_succeeded(), receiver_id, amount.0)
    }

    pub fn get_treasury_balance(&self) -> U128 {
        U128(self.state.treasury_balance)
    }

    // --- Admin ---

    #[handle_result]
    pub fn set_owner(&mut self, new_owner: AccountId) -> Result<(), DripError> {
        self.state
            .set_owner(&env::predecessor_account_id(), new_owner)
    }

    #[handle_result]
    pub fn set_ft_transfer_gas(&mut self, gas_tgas: u64) -> Result<(), DripError> {
        self.state
            .set_ft_transfer_gas(&env::predecessor_account_id(), gas_tgas)
    }

    /// Deploys the wasm passed as raw input and chains `migrate`. Owner only.
    #[handle_result]
    pub fn update_contract(&self) -> Result<Promise, DripError> {
        self.state.update_contract(&env::predecessor_account_id())
    }

    pub fn get_config(&self) -> RegistryConfig {
        self.state.config()
    }
}

fn transfer_succeeded() -> bool {
    env::promise_results_count() == 1
        && env::promise_result_checked(0, MAX_TRANSFER_RESULT_LEN).is_ok()
}

//! Minimal NEP-141 Mock FT for Drip Registry Integration Testing
//!
//! Implements only what the registry's treasury touches:
//! - ft_transfer_call (owner deposits into the treasury)
//! - ft_transfer (drip legs and withdrawals, batched or single)
//! - ft_balance_of (view balance)
//!
//! Test hooks make a chosen receiver reject transfers, or make the next
//! registry-initiated transfer call back into the registry before it resolves.

use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{env, near, AccountId, Gas, NearToken, PanicOnDefault, Promise, PromiseOrValue};

const GAS_FOR_FT_ON_TRANSFER: Gas = Gas::from_tgas(40);
const GAS_FOR_RESOLVE_TRANSFER: Gas = Gas::from_tgas(10);
const GAS_FOR_REENTRY: Gas = Gas::from_tgas(20);
const GAS_FOR_REENTRY_RESULT: Gas = Gas::from_tgas(5);
const MAX_RESULT_LEN: usize = 256;

/// Registry call attempted from inside the next `ft_transfer` it sends.
#[near(serializers = [borsh, json])]
#[derive(Clone)]
pub struct ReentryHook {
    pub registry_id: AccountId,
    pub track_id: String,
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockFT {
    balances: LookupMap<AccountId, u128>,
    total_supply: u128,
    /// Test helper: if set, the next ft_transfer will fail
    fail_next_transfer: bool,
    /// Test helper: every ft_transfer to this account fails
    rejected_receiver: Option<AccountId>,
    reentry: Option<ReentryHook>,
    last_reentry_succeeded: Option<bool>,
}

#[near]
impl MockFT {
    #[init]
    pub fn new(owner_id: AccountId, total_supply: U128) -> Self {
        let mut balances = LookupMap::new(b"b");
        balances.insert(owner_id, total_supply.0);
        Self {
            balances,
            total_supply: total_supply.0,
            fail_next_transfer: false,
            rejected_receiver: None,
            reentry: None,
            last_reentry_succeeded: None,
        }
    }

    // =========================================================================
    // NEP-141 Core
    // =========================================================================

    #[payable]
    pub fn ft_transfer(
        &mut self,
        receiver_id: AccountId,
        amount: U128,
        memo: Option<String>,
    ) -> PromiseOrValue<()> {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );

        if self.fail_next_transfer {
            self.fail_next_transfer = false;
            env::panic_str("MockFT: Simulated transfer failure");
        }
        if self.rejected_receiver.as_ref() == Some(&receiver_id) {
            env::panic_str("MockFT: Receiver rejects transfers");
        }

        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);

        match self.reentry.take() {
            Some(hook) if hook.registry_id == sender_id => Promise::new(hook.registry_id)
                .function_call(
                    "drip_for_track".to_string(),
                    near_sdk::serde_json::json!({ "track_id": hook.track_id })
                        .to_string()
                        .into_bytes(),
                    NearToken::from_near(0),
                    GAS_FOR_REENTRY,
                )
                .then(
                    Self::ext(env::current_account_id())
                        .with_static_gas(GAS_FOR_REENTRY_RESULT)
                        .on_reentry_result(),
                )
                .into(),
            other => {
                self.reentry = other;
                PromiseOrValue::Value(())
            }
        }
    }

    #[payable]
    pub fn ft_transfer_call(
        &mut self,
        receiver_id: AccountId,
        amount: U128,
        memo: Option<String>,
        msg: String,
    ) -> PromiseOrValue<U128> {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );
        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);

        Promise::new(receiver_id.clone())
            .function_call(
                "ft_on_transfer".to_string(),
                near_sdk::serde_json::json!({
                    "sender_id": sender_id,
                    "amount": amount,
                    "msg": msg
                })
                .to_string()
                .into_bytes(),
                NearToken::from_near(0),
                GAS_FOR_FT_ON_TRANSFER,
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE_TRANSFER)
                    .ft_resolve_transfer(sender_id, receiver_id, amount),
            )
            .into()
    }

    pub fn ft_balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.balances.get(&account_id).copied().unwrap_or(0))
    }

    pub fn ft_total_supply(&self) -> U128 {
        U128(self.total_supply)
    }

    // =========================================================================
    // Test Helpers (not in real FT)
    // =========================================================================

    /// Mint tokens to account (for testing only)
    pub fn mint(&mut self, account_id: AccountId, amount: U128) {
        let current = self.balances.get(&account_id).copied().unwrap_or(0);
        self.balances.insert(account_id, current + amount.0);
        self.total_supply += amount.0;
    }

    /// Set flag to fail the next ft_transfer call (for testing callbacks)
    pub fn set_fail_next_transfer(&mut self, should_fail: bool) {
        self.fail_next_transfer = should_fail;
    }

    pub fn set_rejected_receiver(&mut self, account_id: Option<AccountId>) {
        self.rejected_receiver = account_id;
    }

    /// Arms a one-shot call to `drip_for_track` made while the registry's next transfer is executing.
    pub fn set_reentry_hook(&mut self, registry_id: AccountId, track_id: String) {
        self.reentry = Some(ReentryHook {
            registry_id,
            track_id,
        });
        self.last_reentry_succeeded = None;
    }

    pub fn get_last_reentry_succeeded(&self) -> Option<bool> {
        self.last_reentry_succeeded
    }

    #[private]
    pub fn on_reentry_result(&mut self) {
        let succeeded = env::promise_results_count() == 1
            && env::promise_result_checked(0, MAX_RESULT_LEN).is_ok();
        self.last_reentry_succeeded = Some(succeeded);
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn internal_transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        _memo: Option<String>,
    ) {
        let sender_balance = self.balances.get(sender_id).copied().unwrap_or(0);
        assert!(sender_balance >= amount, "Insufficient balance");

        self.balances
            .insert(sender_id.clone(), sender_balance - amount);
        let receiver_balance = self.balances.get(receiver_id).copied().unwrap_or(0);
        self.balances
            .insert(receiver_id.clone(), receiver_balance + amount);
    }

    #[private]
    pub fn ft_resolve_transfer(
        &mut self,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: U128,
    ) -> U128 {
        // Receiver reports how much it did not use; a failed call keeps nothing.
        let unused = match env::promise_result_checked(0, MAX_RESULT_LEN) {
            Ok(data) => near_sdk::serde_json::from_slice::<U128>(&data)
                .map(|unused| std::cmp::min(unused.0, amount.0))
                .unwrap_or(0),
            Err(_) => amount.0,
        };

        if unused > 0 {
            let receiver_balance = self.balances.get(&receiver_id).copied().unwrap_or(0);
            let refund = std::cmp::min(unused, receiver_balance);
            if refund > 0 {
                self.balances.insert(receiver_id, receiver_balance - refund);
                let sender_balance = self.balances.get(&sender_id).copied().unwrap_or(0);
                self.balances.insert(sender_id, sender_balance + refund);
            }
        }

        U128(amount.0 - unused)
    }
}

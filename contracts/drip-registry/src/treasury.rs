use crate::errors::DripError;
use crate::events::DripEvent;
use crate::ext_self;
use crate::state::DripRegistryState;
use crate::types::TransferMessage;
use near_sdk::json_types::U128;
use near_sdk::serde_json;
use near_sdk::{env, log, AccountId, Gas, NearToken, Promise};

pub(crate) const GAS_FOR_RESOLVE: Gas = Gas::from_tgas(10);
const FT_TRANSFER_METHOD: &str = "ft_transfer";

impl DripRegistryState {
    /// Fails while any treasury transfer is waiting for its callback.
    pub fn ensure_idle(&self) -> Result<(), DripError> {
        if self.transfer_in_flight {
            return Err(DripError::ReentrantCall);
        }
        Ok(())
    }

    pub(crate) fn acquire_guard(&mut self) {
        self.transfer_in_flight = true;
    }

    pub(crate) fn release_guard(&mut self) {
        self.transfer_in_flight = false;
    }

    pub(crate) fn ft_transfer_gas(&self) -> Gas {
        Gas::from_tgas(self.ft_transfer_gas_tgas)
    }

    /// Appends an `ft_transfer` action to `batch`; actions sharing a receipt succeed or fail together.
    pub(crate) fn push_ft_transfer(
        &self,
        batch: Promise,
        receiver_id: &AccountId,
        amount: u128,
        memo: String,
    ) -> Promise {
        batch.function_call(
            FT_TRANSFER_METHOD.to_string(),
            serde_json::json!({
                "receiver_id": receiver_id,
                "amount": U128(amount),
                "memo": memo,
            })
            .to_string()
            .into_bytes(),
            NearToken::from_yoctonear(1),
            self.ft_transfer_gas(),
        )
    }

    /// Credits tokens received through `ft_transfer_call`.
    pub fn deposit(
        &mut self,
        predecessor: &AccountId,
        sender_id: &AccountId,
        amount: u128,
        msg: &str,
    ) -> Result<(), DripError> {
        if predecessor != &self.token_id {
            return Err(DripError::UnsupportedToken);
        }
        self.ensure_idle()?;
        if !self.is_owner(sender_id) {
            return Err(DripError::Unauthorized);
        }
        if amount == 0 {
            return Err(DripError::InvalidAmount);
        }
        match serde_json::from_str::<TransferMessage>(msg) {
            Ok(TransferMessage::Deposit) => {}
            Err(_) => return Err(DripError::InvalidMessage),
        }

        self.treasury_balance = self
            .treasury_balance
            .checked_add(amount)
            .ok_or(DripError::InvalidAmount)?;

        DripEvent::TokenDeposited {
            sender_id: sender_id.clone(),
            amount: U128(amount),
            treasury_balance: U128(self.treasury_balance),
        }
        .emit();
        Ok(())
    }

    pub fn withdraw(&mut self, caller: &AccountId, amount: u128) -> Result<Promise, DripError> {
        self.ensure_idle()?;
        self.assert_owner(caller)?;
        if amount == 0 {
            return Err(DripError::InvalidAmount);
        }
        if self.treasury_balance < amount {
            return Err(DripError::InsufficientBalance);
        }

        self.treasury_balance -= amount;
        self.acquire_guard();

        let transfer = self.push_ft_transfer(
            Promise::new(self.token_id.clone()),
            caller,
            amount,
            "treasury withdrawal".to_string(),
        );
        Ok(transfer.then(
            ext_self::ext(env::current_account_id())
                .with_static_gas(GAS_FOR_RESOLVE)
                .on_withdraw_resolved(caller.clone(), U128(amount)),
        ))
    }

    pub fn resolve_withdraw(
        &mut self,
        transfer_succeeded: bool,
        receiver_id: AccountId,
        amount: u128,
    ) -> bool {
        self.release_guard();

        if !transfer_succeeded {
            self.treasury_balance += amount;
            log!(
                "{}: withdrawal of {} to {} reverted, treasury restored",
                DripError::TransferFailed,
                amount,
                receiver_id
            );
            return false;
        }

        DripEvent::TokenWithdrawn {
            receiver_id,
            amount: U128(amount),
            treasury_balance: U128(self.treasury_balance),
        }
        .emit();
        true
    }
}

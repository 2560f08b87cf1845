use crate::errors::DripError;
use crate::events::DripEvent;
use crate::state::DripRegistryState;
use crate::validation::ensure_real_identity;
use near_sdk::{env, log, AccountId, Gas, NearToken, Promise};

const MIN_FT_TRANSFER_GAS_TGAS: u64 = 5;
const MAX_FT_TRANSFER_GAS_TGAS: u64 = 100;
const MIGRATE_GAS: Gas = Gas::from_tgas(100);
const NO_ARGS: Vec<u8> = vec![];

impl DripRegistryState {
    pub fn set_owner(&mut self, caller: &AccountId, new_owner: AccountId) -> Result<(), DripError> {
        self.assert_owner(caller)?;
        ensure_real_identity(&new_owner)?;
        log!("Changing owner from {} to {}", self.owner_id, new_owner);
        let old_owner = std::mem::replace(&mut self.owner_id, new_owner.clone());
        DripEvent::OwnerChanged {
            old_owner,
            new_owner,
        }
        .emit();
        Ok(())
    }

    pub fn set_ft_transfer_gas(&mut self, caller: &AccountId, gas_tgas: u64) -> Result<(), DripError> {
        self.assert_owner(caller)?;
        if !(MIN_FT_TRANSFER_GAS_TGAS..=MAX_FT_TRANSFER_GAS_TGAS).contains(&gas_tgas) {
            return Err(DripError::InvalidAmount);
        }
        self.ft_transfer_gas_tgas = gas_tgas;
        DripEvent::GasUpdated { gas_tgas }.emit();
        Ok(())
    }

    pub fn update_contract(&self, caller: &AccountId) -> Result<Promise, DripError> {
        self.assert_owner(caller)?;
        let code = env::input()
            .filter(|input| !input.is_empty())
            .ok_or(DripError::MissingInput)?;
        log!("Upgrading contract by owner: {}", self.owner_id);
        Ok(Promise::new(env::current_account_id())
            .deploy_contract(code)
            .function_call(
                "migrate".to_string(),
                NO_ARGS,
                NearToken::from_near(0),
                MIGRATE_GAS,
            ))
    }
}

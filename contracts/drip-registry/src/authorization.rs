use crate::errors::DripError;
use crate::events::DripEvent;
use crate::state::DripRegistryState;
use crate::validation::ensure_real_identity;
use near_sdk::AccountId;

impl DripRegistryState {
    pub fn set_authorized(
        &mut self,
        caller: &AccountId,
        account_id: AccountId,
        enabled: bool,
    ) -> Result<(), DripError> {
        self.assert_owner(caller)?;
        ensure_real_identity(&account_id)?;
        self.authorized.insert(account_id.clone(), enabled);
        DripEvent::AuthorizedAddressSet {
            account_id,
            enabled,
        }
        .emit();
        Ok(())
    }

    pub fn is_authorized(&self, account_id: &AccountId) -> bool {
        self.is_owner(account_id) || self.authorized.get(account_id).copied().unwrap_or(false)
    }
}

use crate::errors::DripError;
use near_sdk::{env, AccountId, NearToken, Promise};

pub(crate) fn storage_cost(bytes: u64) -> u128 {
    u128::from(bytes) * env::storage_byte_cost().as_yoctonear()
}

/// Settles the storage delta of a write that started at `before` bytes.
///
/// Growth is paid from `attached_deposit`, the surplus goes back to `payer`,
/// and bytes freed by the write are refunded to `freed_to`. On shortfall no
/// refund is issued and the caller must undo its write.
pub(crate) fn settle_storage(
    before: u64,
    attached_deposit: u128,
    payer: &AccountId,
    freed_to: &AccountId,
) -> Result<(), DripError> {
    let after = env::storage_usage();

    if after >= before {
        let cost = storage_cost(after - before);
        if attached_deposit < cost {
            return Err(DripError::InsufficientStorageDeposit);
        }
        refund(payer, attached_deposit - cost);
    } else {
        refund(freed_to, storage_cost(before - after));
        refund(payer, attached_deposit);
    }
    Ok(())
}

fn refund(account_id: &AccountId, amount: u128) {
    if amount > 0 {
        let _ = Promise::new(account_id.clone()).transfer(NearToken::from_yoctonear(amount));
    }
}

use crate::errors::DripError;
use crate::events::DripEvent;
use crate::ext_self;
use crate::state::DripRegistryState;
use crate::treasury::GAS_FOR_RESOLVE;
use crate::types::{DripPayouts, PendingDrip, Track};
use crate::validation::validate_track_id;
use near_sdk::json_types::U128;
use near_sdk::{env, log, AccountId, Promise, PromiseOrValue};

/// `floor(amount * percent / 100)` without widening; `percent` never exceeds 100 once validated.
pub fn share_of(amount: u128, percent: u8) -> u128 {
    let percent = u128::from(percent);
    (amount / 100) * percent + (amount % 100) * percent / 100
}

/// Rounding remainders stay in the treasury.
pub fn compute_payouts(track: &Track) -> DripPayouts {
    let owner_payout = share_of(track.base_amount, track.owner_share);
    let co_payout = match track.co_beneficiary {
        Some(_) => share_of(track.base_amount, track.co_beneficiary_share),
        None => 0,
    };
    DripPayouts {
        owner_payout,
        co_payout,
    }
}

impl DripRegistryState {
    pub fn drip_for_track(
        &mut self,
        caller: &AccountId,
        track_id: String,
    ) -> Result<PromiseOrValue<bool>, DripError> {
        self.ensure_idle()?;
        if !self.is_authorized(caller) {
            return Err(DripError::Unauthorized);
        }
        validate_track_id(&track_id)?;
        let track = self
            .tracks
            .get(&track_id)
            .cloned()
            .ok_or(DripError::NotFound)?;

        let payouts = compute_payouts(&track);
        // Checked against the nominal amount, not the floored payouts.
        if self.treasury_balance < track.base_amount {
            return Err(DripError::InsufficientBalance);
        }

        let pending = PendingDrip {
            track_id,
            owner_id: track.owner_id.clone(),
            owner_payout: U128(payouts.owner_payout),
            co_beneficiary: track.co_beneficiary.clone(),
            co_payout: U128(payouts.co_payout),
            base_amount: U128(track.base_amount),
        };

        let mut legs: Vec<(&AccountId, u128)> = Vec::with_capacity(2);
        if payouts.owner_payout > 0 {
            legs.push((&track.owner_id, payouts.owner_payout));
        }
        if let Some(co_beneficiary) = track.co_beneficiary.as_ref() {
            if payouts.co_payout > 0 {
                legs.push((co_beneficiary, payouts.co_payout));
            }
        }

        if legs.is_empty() {
            Self::emit_dripped(pending);
            return Ok(PromiseOrValue::Value(true));
        }

        self.treasury_balance -= payouts.total();
        self.acquire_guard();

        let memo = format!("drip:{}", pending.track_id);
        let batch = legs.into_iter().fold(
            Promise::new(self.token_id.clone()),
            |batch, (receiver_id, amount)| {
                self.push_ft_transfer(batch, receiver_id, amount, memo.clone())
            },
        );

        Ok(PromiseOrValue::Promise(
            batch.then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE)
                    .on_drip_resolved(pending),
            ),
        ))
    }

    pub fn resolve_drip(&mut self, transfer_succeeded: bool, pending: PendingDrip) -> bool {
        self.release_guard();

        if !transfer_succeeded {
            self.treasury_balance += pending.reserved();
            log!(
                "{}: drip for track {} reverted, restored {} to treasury",
                DripError::TransferFailed,
                pending.track_id,
                pending.reserved()
            );
            return false;
        }

        Self::emit_dripped(pending);
        true
    }

    fn emit_dripped(pending: PendingDrip) {
        DripEvent::Dripped {
            track_id: pending.track_id,
            owner_id: pending.owner_id,
            owner_payout: pending.owner_payout,
            co_beneficiary: pending.co_beneficiary,
            co_payout: pending.co_payout,
            base_amount: pending.base_amount,
        }
        .emit();
    }
}

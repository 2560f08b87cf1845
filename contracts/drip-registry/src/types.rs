use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};
use serde::Deserialize;

/// Payout configuration for one content identifier.
#[near(serializers = [borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub owner_id: AccountId,
    pub co_beneficiary: Option<AccountId>,
    pub base_amount: u128,
    pub owner_share: u8,
    pub co_beneficiary_share: u8,
}

#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct TrackView {
    pub track_id: String,
    pub owner_id: AccountId,
    pub co_beneficiary: Option<AccountId>,
    pub base_amount: U128,
    pub owner_share: u8,
    pub co_beneficiary_share: u8,
}

impl TrackView {
    pub fn new(track_id: String, track: &Track) -> Self {
        Self {
            track_id,
            owner_id: track.owner_id.clone(),
            co_beneficiary: track.co_beneficiary.clone(),
            base_amount: U128(track.base_amount),
            owner_share: track.owner_share,
            co_beneficiary_share: track.co_beneficiary_share,
        }
    }
}

/// Mutable part of a track as submitted by register/update.
#[derive(Clone, Debug)]
pub struct TrackTerms {
    pub co_beneficiary: Option<AccountId>,
    pub base_amount: u128,
    pub owner_share: u8,
    pub co_beneficiary_share: u8,
}

/// Amounts owed to each party for a single drip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DripPayouts {
    pub owner_payout: u128,
    pub co_payout: u128,
}

impl DripPayouts {
    pub fn total(&self) -> u128 {
        self.owner_payout + self.co_payout
    }
}

/// Everything the drip callback needs to emit or roll back, carried through the promise.
#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDrip {
    pub track_id: String,
    pub owner_id: AccountId,
    pub owner_payout: U128,
    pub co_beneficiary: Option<AccountId>,
    pub co_payout: U128,
    pub base_amount: U128,
}

impl PendingDrip {
    pub fn reserved(&self) -> u128 {
        self.owner_payout.0 + self.co_payout.0
    }
}

#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    pub version: String,
    pub owner_id: AccountId,
    pub token_id: AccountId,
    pub ft_transfer_gas_tgas: u64,
    pub transfer_in_flight: bool,
}

/// `msg` payload accepted by `ft_on_transfer`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransferMessage {
    Deposit,
}

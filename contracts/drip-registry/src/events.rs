use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum DripEvent {
    #[event_version("1.0.0")]
    AuthorizedAddressSet { account_id: AccountId, enabled: bool },
    #[event_version("1.0.0")]
    TrackRegistered {
        track_id: String,
        owner_id: AccountId,
        co_beneficiary: Option<AccountId>,
        base_amount: U128,
        owner_share: u8,
        co_beneficiary_share: u8,
    },
    #[event_version("1.0.0")]
    TrackUpdated {
        track_id: String,
        owner_id: AccountId,
        co_beneficiary: Option<AccountId>,
        base_amount: U128,
        owner_share: u8,
        co_beneficiary_share: u8,
    },
    #[event_version("1.0.0")]
    Dripped {
        track_id: String,
        owner_id: AccountId,
        owner_payout: U128,
        co_beneficiary: Option<AccountId>,
        co_payout: U128,
        base_amount: U128,
    },
    #[event_version("1.0.0")]
    TokenDeposited {
        sender_id: AccountId,
        amount: U128,
        treasury_balance: U128,
    },
    #[event_version("1.0.0")]
    TokenWithdrawn {
        receiver_id: AccountId,
        amount: U128,
        treasury_balance: U128,
    },
    #[event_version("1.0.0")]
    OwnerChanged {
        old_owner: AccountId,
        new_owner: AccountId,
    },
    #[event_version("1.0.0")]
    GasUpdated { gas_tgas: u64 },
    #[event_version("1.0.0")]
    ContractUpgraded { owner_id: AccountId, timestamp: u64 },
    #[event_version("1.0.0")]
    StateMigrated {
        old_version: String,
        new_version: String,
    },
}

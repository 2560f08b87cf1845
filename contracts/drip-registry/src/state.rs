use crate::errors::DripError;
use crate::events::DripEvent;
use crate::types::{RegistryConfig, Track};
use crate::validation::ensure_real_identity;
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::store::LookupMap;
use near_sdk::{env, log, AccountId, BorshStorageKey};
use near_sdk_macros::NearSchema;
use semver::Version;

pub const DEFAULT_FT_TRANSFER_GAS_TGAS: u64 = 15;

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Tracks,
    Authorized,
}

#[derive(BorshSerialize, BorshDeserialize, NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct DripRegistryState {
    pub version: String,
    pub owner_id: AccountId,
    pub token_id: AccountId,
    pub tracks: LookupMap<String, Track>,
    pub authorized: LookupMap<AccountId, bool>,
    pub treasury_balance: u128,
    /// Held from transfer dispatch until its resolve callback runs.
    pub transfer_in_flight: bool,
    pub ft_transfer_gas_tgas: u64,
}

impl DripRegistryState {
    pub fn new(owner_id: AccountId, token_id: AccountId) -> Result<Self, DripError> {
        ensure_real_identity(&owner_id)?;
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            owner_id,
            token_id,
            tracks: LookupMap::new(StorageKey::Tracks),
            authorized: LookupMap::new(StorageKey::Authorized),
            treasury_balance: 0,
            transfer_in_flight: false,
            ft_transfer_gas_tgas: DEFAULT_FT_TRANSFER_GAS_TGAS,
        })
    }

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.owner_id == account_id
    }

    pub fn assert_owner(&self, caller: &AccountId) -> Result<(), DripError> {
        if !self.is_owner(caller) {
            return Err(DripError::Unauthorized);
        }
        Ok(())
    }

    pub fn config(&self) -> RegistryConfig {
        RegistryConfig {
            version: self.version.clone(),
            owner_id: self.owner_id.clone(),
            token_id: self.token_id.clone(),
            ft_transfer_gas_tgas: self.ft_transfer_gas_tgas,
            transfer_in_flight: self.transfer_in_flight,
        }
    }

    /// Re-reads persisted state after a code upgrade and stamps the crate version on it.
    /// Emits `contract_upgraded` on every run and `state_migrated` when the version moved.
    pub fn migrate() -> Self {
        const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
        let current_version = Version::parse(CURRENT_VERSION)
            .unwrap_or_else(|_| env::panic_str("Invalid current version in Cargo.toml"));

        // A registry holding funds must never silently reinitialise.
        let mut state: Self = env::state_read()
            .unwrap_or_else(|| env::panic_str("No readable registry state to migrate"));

        // Only reachable once the deployed code is live.
        DripEvent::ContractUpgraded {
            owner_id: state.owner_id.clone(),
            timestamp: env::block_timestamp_ms(),
        }
        .emit();

        if let Ok(state_version) = Version::parse(&state.version) {
            if state_version >= current_version {
                env::log_str("State is at current or newer version, no migration needed");
                return state;
            }
        }

        log!("Migrating from state version {}", state.version);
        let old_version = std::mem::replace(&mut state.version, CURRENT_VERSION.to_string());
        DripEvent::StateMigrated {
            old_version,
            new_version: CURRENT_VERSION.to_string(),
        }
        .emit();
        state
    }
}

use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, Clone, PartialEq, Eq, NearSchema, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub enum DripError {
    Unauthorized,
    InvalidIdentity,
    InvalidTrackId,
    AlreadyRegistered,
    NotFound,
    InvalidSplit,
    InsufficientBalance,
    TransferFailed,
    ReentrantCall,
    InsufficientStorageDeposit,
    UnsupportedToken,
    InvalidMessage,
    InvalidAmount,
    MissingInput,
}

impl DripError {
    pub fn message(&self) -> &'static str {
        match self {
            DripError::Unauthorized => "Unauthorized access",
            DripError::InvalidIdentity => "Invalid account: null or reserved identity not allowed",
            DripError::InvalidTrackId => "Invalid track id: exceeds maximum length",
            DripError::AlreadyRegistered => "Track already registered",
            DripError::NotFound => "Track not found",
            DripError::InvalidSplit => "Invalid split: shares must total 100",
            DripError::InsufficientBalance => "Insufficient treasury balance",
            DripError::TransferFailed => "Token transfer failed",
            DripError::ReentrantCall => "Reentrant call: a transfer is already in flight",
            DripError::InsufficientStorageDeposit => "Attached deposit does not cover storage",
            DripError::UnsupportedToken => "Only the configured token is accepted",
            DripError::InvalidMessage => "Invalid transfer message",
            DripError::InvalidAmount => "Invalid amount",
            DripError::MissingInput => "No input provided",
        }
    }
}

impl std::fmt::Display for DripError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl FunctionError for DripError {
    fn panic(&self) -> ! {
        env::panic_str(self.message())
    }
}

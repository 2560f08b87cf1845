use crate::errors::DripError;
use crate::types::TrackTerms;
use near_sdk::{env, AccountId};

/// Longest id whose map key (1-byte prefix, 4-byte length, id bytes) fits the 2048-byte storage key limit.
pub const MAX_TRACK_ID_LEN: usize = 2043;

const SYSTEM_ACCOUNT: &str = "system";
const ZERO_IMPLICIT_ACCOUNT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Accounts that stand in for "nobody" and can never receive or authorize anything.
pub fn is_null_identity(account_id: &AccountId) -> bool {
    let id = account_id.as_str();
    id == SYSTEM_ACCOUNT || id == ZERO_IMPLICIT_ACCOUNT
}

pub fn ensure_real_identity(account_id: &AccountId) -> Result<(), DripError> {
    if is_null_identity(account_id) {
        return Err(DripError::InvalidIdentity);
    }
    Ok(())
}

/// Owner-only tracks pay 100% to the owner; shared tracks must total exactly 100.
pub fn validate_split(terms: &TrackTerms) -> Result<(), DripError> {
    let owner_share = u16::from(terms.owner_share);
    let co_share = u16::from(terms.co_beneficiary_share);
    let valid = match terms.co_beneficiary {
        None => owner_share == 100 && co_share == 0,
        Some(_) => owner_share + co_share == 100,
    };
    if !valid {
        return Err(DripError::InvalidSplit);
    }
    Ok(())
}

pub fn validate_track_id(track_id: &str) -> Result<(), DripError> {
    if track_id.len() > MAX_TRACK_ID_LEN {
        return Err(DripError::InvalidTrackId);
    }
    Ok(())
}

/// The registry and its token cannot receive an `ft_transfer` leg sent from the registry.
pub fn validate_terms(terms: &TrackTerms, token_id: &AccountId) -> Result<(), DripError> {
    if let Some(co_beneficiary) = &terms.co_beneficiary {
        ensure_real_identity(co_beneficiary)?;
        if co_beneficiary == token_id || co_beneficiary == &env::current_account_id() {
            return Err(DripError::InvalidIdentity);
        }
    }
    validate_split(terms)
}

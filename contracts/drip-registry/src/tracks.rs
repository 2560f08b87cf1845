use crate::errors::DripError;
use crate::events::DripEvent;
use crate::state::DripRegistryState;
use crate::storage::settle_storage;
use crate::types::{Track, TrackTerms, TrackView};
use crate::validation::{validate_terms, validate_track_id, MAX_TRACK_ID_LEN};
use near_sdk::json_types::U128;
use near_sdk::{env, AccountId};

impl DripRegistryState {
    pub fn register_track(
        &mut self,
        caller: &AccountId,
        attached_deposit: u128,
        track_id: String,
        terms: TrackTerms,
    ) -> Result<(), DripError> {
        validate_track_id(&track_id)?;
        if self.tracks.contains_key(&track_id) {
            return Err(DripError::AlreadyRegistered);
        }
        validate_terms(&terms, &self.token_id)?;

        let track = Track {
            owner_id: caller.clone(),
            co_beneficiary: terms.co_beneficiary,
            base_amount: terms.base_amount,
            owner_share: terms.owner_share,
            co_beneficiary_share: terms.co_beneficiary_share,
        };

        let before = env::storage_usage();
        self.tracks.insert(track_id.clone(), track.clone());
        self.tracks.flush();
        if let Err(e) = settle_storage(before, attached_deposit, caller, caller) {
            self.tracks.remove(&track_id);
            self.tracks.flush();
            return Err(e);
        }

        DripEvent::TrackRegistered {
            track_id,
            owner_id: track.owner_id,
            co_beneficiary: track.co_beneficiary,
            base_amount: U128(track.base_amount),
            owner_share: track.owner_share,
            co_beneficiary_share: track.co_beneficiary_share,
        }
        .emit();
        Ok(())
    }

    pub fn update_track(
        &mut self,
        caller: &AccountId,
        attached_deposit: u128,
        track_id: String,
        terms: TrackTerms,
    ) -> Result<(), DripError> {
        validate_track_id(&track_id)?;
        let existing = self
            .tracks
            .get(&track_id)
            .cloned()
            .ok_or(DripError::NotFound)?;
        if caller != &existing.owner_id && !self.is_owner(caller) {
            return Err(DripError::Unauthorized);
        }
        validate_terms(&terms, &self.token_id)?;

        let updated = Track {
            owner_id: existing.owner_id.clone(),
            co_beneficiary: terms.co_beneficiary,
            base_amount: terms.base_amount,
            owner_share: terms.owner_share,
            co_beneficiary_share: terms.co_beneficiary_share,
        };

        let before = env::storage_usage();
        self.tracks.insert(track_id.clone(), updated.clone());
        self.tracks.flush();
        if let Err(e) = settle_storage(before, attached_deposit, caller, &existing.owner_id) {
            self.tracks.insert(track_id, existing);
            self.tracks.flush();
            return Err(e);
        }

        DripEvent::TrackUpdated {
            track_id,
            owner_id: updated.owner_id,
            co_beneficiary: updated.co_beneficiary,
            base_amount: U128(updated.base_amount),
            owner_share: updated.owner_share,
            co_beneficiary_share: updated.co_beneficiary_share,
        }
        .emit();
        Ok(())
    }

    pub fn get_track(&self, track_id: &str) -> Option<TrackView> {
        if track_id.len() > MAX_TRACK_ID_LEN {
            return None;
        }
        self.tracks
            .get(track_id)
            .map(|track| TrackView::new(track_id.to_string(), track))
    }
}

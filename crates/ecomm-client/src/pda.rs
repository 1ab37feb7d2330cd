//! PDA derivation for the per-user record accounts.
//!
//! The bump search is done here rather than through
//! `Pubkey::find_program_address` so exhaustion is a typed error instead of a
//! panic. Results are identical to the runtime's derivation: same seeds, same
//! hash preimage, same descending scan for the first off-curve candidate.

use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::constants::{MAX_BUMP, MAX_SEED_LEN, PDA_MARKER};
use crate::errors::{EcommError, EcommResult};
use crate::records::RecordKind;

/// Both record accounts of one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerPdas {
    pub address: (Pubkey, u8),
    pub profile: (Pubkey, u8),
}

impl OwnerPdas {
    pub fn get(&self, kind: RecordKind) -> (Pubkey, u8) {
        match kind {
            RecordKind::Address => self.address,
            RecordKind::Profile => self.profile,
        }
    }
}

/// Hash one candidate address: `sha256(tag || owner || [bump] || program || marker)`.
pub fn candidate_address(tag: &[u8], owner: &Pubkey, bump: u8, program_id: &Pubkey) -> Pubkey {
    let mut h = Sha256::new();
    h.update(tag);
    h.update(owner.as_ref());
    h.update([bump]);
    h.update(program_id.as_ref());
    h.update(PDA_MARKER);
    Pubkey::new_from_array(h.finalize().into())
}

/// Derive the address for `tag` and `owner` under `program_id`.
///
/// Scans bumps from 255 down to 0 and returns the first candidate that is not
/// an ed25519 point, so no private key can sign for it. Tags longer than
/// [`MAX_SEED_LEN`] are refused, as the runtime refuses them.
pub fn derive(tag: &str, owner: &Pubkey, program_id: &Pubkey) -> EcommResult<(Pubkey, u8)> {
    if tag.len() > MAX_SEED_LEN {
        return Err(EcommError::SeedTooLong { tag: tag.to_string(), len: tag.len(), max: MAX_SEED_LEN });
    }
    for bump in (0..=MAX_BUMP).rev() {
        let candidate = candidate_address(tag.as_bytes(), owner, bump, program_id);
        if !candidate.is_on_curve() {
            tracing::debug!(tag, %owner, %candidate, bump, "derived pda");
            return Ok((candidate, bump));
        }
    }
    Err(EcommError::NoValidBumpFound { tag: tag.to_string() })
}

pub fn derive_for(kind: RecordKind, owner: &Pubkey, program_id: &Pubkey) -> EcommResult<(Pubkey, u8)> {
    derive(kind.as_str(), owner, program_id)
}

pub fn derive_address_account(owner: &Pubkey, program_id: &Pubkey) -> EcommResult<(Pubkey, u8)> {
    derive_for(RecordKind::Address, owner, program_id)
}

pub fn derive_profile_account(owner: &Pubkey, program_id: &Pubkey) -> EcommResult<(Pubkey, u8)> {
    derive_for(RecordKind::Profile, owner, program_id)
}

/// Collect both PDAs used by most flows.
pub fn pdas_for_owner(owner: &Pubkey, program_id: &Pubkey) -> EcommResult<OwnerPdas> {
    Ok(OwnerPdas {
        address: derive_address_account(owner, program_id)?,
        profile: derive_profile_account(owner, program_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SEED_ADDRESS, SEED_PROFILE};
    use assert_matches::assert_matches;
    use rand::RngCore;

    fn random_pubkey() -> Pubkey {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Pubkey::new_from_array(bytes)
    }

    #[test]
    fn matches_runtime_derivation() {
        for _ in 0..16 {
            let owner = random_pubkey();
            let program = random_pubkey();
            let ours = derive_address_account(&owner, &program).unwrap();
            let runtime = Pubkey::find_program_address(&[SEED_ADDRESS, owner.as_ref()], &program);
            assert_eq!(ours, runtime);

            let ours = derive_profile_account(&owner, &program).unwrap();
            let runtime = Pubkey::find_program_address(&[SEED_PROFILE, owner.as_ref()], &program);
            assert_eq!(ours, runtime);
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let owner = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        assert_eq!(
            pdas_for_owner(&owner, &program).unwrap(),
            pdas_for_owner(&owner, &program).unwrap()
        );
    }

    #[test]
    fn domains_are_distinct() {
        let owner = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let pdas = pdas_for_owner(&owner, &program).unwrap();
        assert_ne!(pdas.address.0, pdas.profile.0);
    }

    #[test]
    fn owners_and_programs_are_distinct() {
        let program = Pubkey::new_unique();
        let a = derive_address_account(&Pubkey::new_unique(), &program).unwrap();
        let b = derive_address_account(&Pubkey::new_unique(), &program).unwrap();
        assert_ne!(a.0, b.0);

        let owner = Pubkey::new_unique();
        let c = derive_address_account(&owner, &Pubkey::new_unique()).unwrap();
        let d = derive_address_account(&owner, &Pubkey::new_unique()).unwrap();
        assert_ne!(c.0, d.0);
    }

    #[test]
    fn accepted_bump_is_first_off_curve() {
        let owner = random_pubkey();
        let program = random_pubkey();
        let (pda, bump) = derive("address", &owner, &program).unwrap();
        assert!(!pda.is_on_curve());
        for higher in (bump as u16 + 1)..=255 {
            let c = candidate_address(b"address", &owner, higher as u8, &program);
            assert!(c.is_on_curve());
        }
    }

    #[test]
    fn overlong_tags_are_refused_like_the_runtime() {
        let owner = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let tag = "t".repeat(40);
        assert!(Pubkey::try_find_program_address(&[tag.as_bytes(), owner.as_ref()], &program).is_none());
        let err = derive(&tag, &owner, &program).unwrap_err();
        assert!(err.is_programmer_error());
        assert_matches!(err, EcommError::SeedTooLong { len: 40, max: 32, .. });

        let edge = "t".repeat(MAX_SEED_LEN);
        let runtime = Pubkey::try_find_program_address(&[edge.as_bytes(), owner.as_ref()], &program);
        assert_eq!(derive(&edge, &owner, &program).ok(), runtime);
    }
}

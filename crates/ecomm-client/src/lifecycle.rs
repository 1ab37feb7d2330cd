//! Per-identity account lifecycle.
//!
//! `Unresolved -> Initialized -> Updated* -> Readable`
//!
//! Addresses are re-derived for every operation. Nothing is rolled back or
//! retried here: a failed submission leaves the ledger as it is and the error
//! goes to the caller. Retrying is safe because updates overwrite and a repeated
//! initialize is detected as [`EcommError::AlreadyInitialized`].
//!
//! One session per identity at a time. Two sessions writing the same PDAs race
//! on the ledger; there is no compare-and-swap.

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::config::ProgramIds;
use crate::connection::{Connection, Receipt};
use crate::errors::{EcommError, EcommResult, SubmissionError};
use crate::instruction;
use crate::pda::{self, OwnerPdas};
use crate::records::{AddressRecord, ProfileRecord, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unresolved,
    Initialized,
    Updated,
    Readable,
}

/// Drives one payer's record accounts through a [`Connection`].
pub struct AccountSession<'a, C: Connection> {
    conn: &'a C,
    programs: ProgramIds,
    payer: &'a Keypair,
    state: LifecycleState,
}

impl<'a, C: Connection> AccountSession<'a, C> {
    pub fn new(conn: &'a C, programs: ProgramIds, payer: &'a Keypair) -> Self {
        Self { conn, programs, payer, state: LifecycleState::Unresolved }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn owner(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    /// Derive both record PDAs for the payer.
    pub fn resolve(&self) -> EcommResult<OwnerPdas> {
        pda::pdas_for_owner(&self.owner(), &self.programs.program_id)
    }

    /// Check that the dispatcher program is deployed and executable.
    pub fn check_program(&self) -> EcommResult<()> {
        let id = self.programs.program_id;
        match self.conn.get_account(&id)? {
            None => Err(EcommError::ProgramNotFound(id)),
            Some(acc) if !acc.executable => Err(EcommError::ProgramNotExecutable(id)),
            Some(_) => Ok(()),
        }
    }

    /// First record PDA that already holds an account, if any.
    fn existing_account(&self, pdas: &OwnerPdas) -> EcommResult<Option<Pubkey>> {
        for key in [pdas.profile.0, pdas.address.0] {
            if self.conn.get_account(&key)?.is_some() {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    pub fn is_initialized(&self) -> EcommResult<bool> {
        let pdas = self.resolve()?;
        Ok(self.existing_account(&pdas)?.is_some())
    }

    /// Create both record accounts.
    pub fn initialize(&mut self) -> EcommResult<Receipt> {
        let pdas = self.resolve()?;
        if let Some(existing) = self.existing_account(&pdas)? {
            return Err(EcommError::AlreadyInitialized(existing));
        }

        let ix = instruction::ix_initialize(&self.programs, &self.owner(), &pdas)?;
        match self.conn.submit(ix, self.payer) {
            Ok(receipt) => {
                self.transition(LifecycleState::Initialized);
                Ok(receipt)
            }
            Err(SubmissionError::Rejected(reason)) => {
                tracing::warn!(%reason, "initialize rejected");
                // A concurrent or earlier initialize may have landed in between.
                match self.existing_account(&pdas) {
                    Ok(Some(existing)) => Err(EcommError::AlreadyInitialized(existing)),
                    Ok(None) => Err(SubmissionError::Rejected(reason).into()),
                    Err(recheck) => {
                        tracing::warn!(error = %recheck, "storage recheck failed after rejected initialize");
                        Err(SubmissionError::Rejected(reason).into())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_address(&mut self, record: AddressRecord) -> EcommResult<Receipt> {
        let (pda, _) = pda::derive_address_account(&self.owner(), &self.programs.program_id)?;
        let ix = instruction::ix_update_address(&self.programs, &self.owner(), &pda, record)?;
        self.submit_update(ix)
    }

    pub fn update_profile(&mut self, record: ProfileRecord) -> EcommResult<Receipt> {
        let (pda, _) = pda::derive_profile_account(&self.owner(), &self.programs.program_id)?;
        let ix = instruction::ix_update_profile(&self.programs, &self.owner(), &pda, record)?;
        self.submit_update(ix)
    }

    /// Write an address record through the address program directly.
    pub fn write_address_direct(&mut self, record: &AddressRecord) -> EcommResult<Receipt> {
        let (pda, _) = pda::derive_address_account(&self.owner(), &self.programs.program_id)?;
        let ix = instruction::ix_direct_write(&self.programs, &pda, record);
        self.submit_update(ix)
    }

    fn submit_update(&mut self, ix: Instruction) -> EcommResult<Receipt> {
        match self.conn.submit(ix, self.payer) {
            Ok(receipt) => {
                self.transition(LifecycleState::Updated);
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(error = %e, "update failed");
                Err(e.into())
            }
        }
    }

    pub fn read_address(&mut self) -> EcommResult<AddressRecord> {
        Ok(self.read_record::<AddressRecord>()?.0)
    }

    pub fn read_profile(&mut self) -> EcommResult<ProfileRecord> {
        Ok(self.read_record::<ProfileRecord>()?.0)
    }

    /// Fetch a record once, returning it with the account bytes it was decoded from.
    pub fn read_record<R: Record>(&mut self) -> EcommResult<(R, Vec<u8>)> {
        let (pda, _) = pda::derive_for(R::KIND, &self.owner(), &self.programs.program_id)?;
        let bytes = self
            .conn
            .get_account_bytes(&pda)?
            .ok_or(EcommError::AccountNotFound(pda))?;
        let record = R::decode(&bytes)?;
        self.transition(LifecycleState::Readable);
        Ok((record, bytes))
    }

    fn transition(&mut self, next: LifecycleState) {
        if self.state != next {
            tracing::info!(owner = %self.owner(), from = ?self.state, to = ?next, "lifecycle transition");
        }
        self.state = next;
    }
}

//! In-memory ledger emulating the dispatcher and record programs.
//!
//! Behaves like the deployed programs for the paths the client exercises:
//! positional account checks, PDA verification, account creation on
//! initialize and overwrite on update.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use ecomm_client::{
    encoded_size, pdas_for_owner, Connection, EcommIx, ProgramIds, Receipt, RecordKind, SubmissionError,
};
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::account::Account;
use solana_sdk::signature::{Keypair, Signature, Signer};

pub fn programs() -> ProgramIds {
    ProgramIds {
        program_id: Pubkey::new_unique(),
        address_program_id: Pubkey::new_unique(),
        profile_program_id: Pubkey::new_unique(),
    }
}

pub struct MemoryLedger {
    pub programs: ProgramIds,
    accounts: RefCell<HashMap<Pubkey, Account>>,
    submissions: Cell<usize>,
    reads: Cell<usize>,
    fail_next: RefCell<Option<SubmissionError>>,
    apply_before_fail: Cell<bool>,
    reads_down_after_fail: Cell<bool>,
    reads_down: Cell<bool>,
    /// Space allocated for profile accounts on initialize.
    pub profile_space: usize,
}

impl MemoryLedger {
    pub fn new(programs: ProgramIds) -> Self {
        Self {
            programs,
            accounts: RefCell::new(HashMap::new()),
            submissions: Cell::new(0),
            reads: Cell::new(0),
            fail_next: RefCell::new(None),
            apply_before_fail: Cell::new(false),
            reads_down_after_fail: Cell::new(false),
            reads_down: Cell::new(false),
            profile_space: encoded_size(RecordKind::Profile),
        }
    }

    /// Deployed programs that allocate profile accounts with address-record space.
    pub fn with_legacy_profile_space(programs: ProgramIds) -> Self {
        Self { profile_space: encoded_size(RecordKind::Address), ..Self::new(programs) }
    }

    pub fn deploy(&self, program: Pubkey, executable: bool) {
        self.accounts.borrow_mut().insert(
            program,
            Account { lamports: 1, data: vec![], owner: Pubkey::default(), executable, rent_epoch: 0 },
        );
    }

    pub fn put_account(&self, key: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts
            .borrow_mut()
            .insert(key, Account { lamports: 1, data, owner, executable: false, rent_epoch: 0 });
    }

    pub fn fail_next(&self, err: SubmissionError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    /// Apply the next instruction but still report `err`, as when a duplicate
    /// transaction lands while ours is rejected.
    pub fn apply_then_fail(&self, err: SubmissionError) {
        self.apply_before_fail.set(true);
        self.fail_next(err);
    }

    /// Fail the next submit with `err`, then fail every account read.
    pub fn fail_then_drop_reads(&self, err: SubmissionError) {
        self.reads_down_after_fail.set(true);
        self.fail_next(err);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn submissions(&self) -> usize {
        self.submissions.get()
    }

    pub fn data(&self, key: &Pubkey) -> Option<Vec<u8>> {
        self.accounts.borrow().get(key).map(|a| a.data.clone())
    }

    fn reject(msg: &str) -> SubmissionError {
        SubmissionError::Rejected(msg.to_string())
    }

    fn write_record(&self, key: &Pubkey, owner: &Pubkey, body: &[u8]) -> Result<(), SubmissionError> {
        let mut accounts = self.accounts.borrow_mut();
        let acc = accounts.get_mut(key).ok_or_else(|| Self::reject("AccountNotFound"))?;
        if acc.owner != *owner {
            return Err(Self::reject("IncorrectProgramId"));
        }
        if acc.data.len() < body.len() {
            return Err(Self::reject("AccountDataTooSmall"));
        }
        acc.data[..body.len()].copy_from_slice(body);
        Ok(())
    }

    fn dispatch(&self, ix: &Instruction) -> Result<(), SubmissionError> {
        let p = self.programs;

        if ix.program_id == p.address_program_id || ix.program_id == p.profile_program_id {
            let target = ix.accounts.first().ok_or_else(|| Self::reject("NotEnoughAccountKeys"))?;
            return self.write_record(&target.pubkey, &ix.program_id, &ix.data);
        }
        if ix.program_id != p.program_id {
            return Err(Self::reject("unknown program"));
        }

        let decoded = EcommIx::from_slice(&ix.data).map_err(|e| Self::reject(&e.to_string()))?;
        let payer = ix.accounts.first().ok_or_else(|| Self::reject("NotEnoughAccountKeys"))?;
        if !payer.is_signer {
            return Err(Self::reject("MissingRequiredSignature"));
        }
        let pdas = pdas_for_owner(&payer.pubkey, &p.program_id).map_err(|e| Self::reject(&e.to_string()))?;

        match decoded {
            EcommIx::Initialize => {
                if ix.accounts.len() < 5
                    || ix.accounts[1].pubkey != pdas.profile.0
                    || ix.accounts[2].pubkey != pdas.address.0
                {
                    return Err(Self::reject("InvalidInstructionData"));
                }
                let mut accounts = self.accounts.borrow_mut();
                if accounts.contains_key(&pdas.address.0) || accounts.contains_key(&pdas.profile.0) {
                    return Err(Self::reject("account already in use"));
                }
                accounts.insert(
                    pdas.address.0,
                    Account {
                        lamports: 1,
                        data: vec![0; encoded_size(RecordKind::Address)],
                        owner: ix.accounts[4].pubkey,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
                accounts.insert(
                    pdas.profile.0,
                    Account {
                        lamports: 1,
                        data: vec![0; self.profile_space],
                        owner: ix.accounts[3].pubkey,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
                Ok(())
            }
            EcommIx::UpdateAddress(_) => {
                if ix.accounts.len() < 3 || ix.accounts[1].pubkey != pdas.address.0 {
                    return Err(Self::reject("InvalidInstructionData"));
                }
                self.write_record(&pdas.address.0, &ix.accounts[2].pubkey, &ix.data[1..])
            }
            EcommIx::UpdateProfile(_) => {
                if ix.accounts.len() < 3 || ix.accounts[1].pubkey != pdas.profile.0 {
                    return Err(Self::reject("InvalidAccountData"));
                }
                self.write_record(&pdas.profile.0, &ix.accounts[2].pubkey, &ix.data[1..])
            }
        }
    }
}

impl Connection for MemoryLedger {
    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SubmissionError> {
        self.reads.set(self.reads.get() + 1);
        if self.reads_down.get() {
            return Err(SubmissionError::Network("connection reset".to_string()));
        }
        Ok(self.accounts.borrow().get(address).cloned())
    }

    fn submit(&self, instruction: Instruction, signer: &Keypair) -> Result<Receipt, SubmissionError> {
        self.submissions.set(self.submissions.get() + 1);
        if let Some(err) = self.fail_next.borrow_mut().take() {
            if self.apply_before_fail.replace(false) {
                let _ = self.dispatch(&instruction);
            }
            if self.reads_down_after_fail.replace(false) {
                self.reads_down.set(true);
            }
            return Err(err);
        }
        let payer_signed = instruction
            .accounts
            .iter()
            .any(|m| m.is_signer && m.pubkey == signer.pubkey());
        if !payer_signed && instruction.accounts.iter().any(|m| m.is_signer) {
            return Err(Self::reject("signer mismatch"));
        }
        self.dispatch(&instruction)?;
        Ok(Receipt { signature: Signature::new_unique() })
    }
}

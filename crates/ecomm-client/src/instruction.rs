//! Instruction encoding for the dispatcher program.
//!
//! Payload is one opcode byte followed by the fixed-layout record (nothing for
//! `Initialize`). The program reads accounts positionally, so each builder
//! emits its account list in the exact order the program expects.

use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use crate::config::ProgramIds;
use crate::errors::{EcommError, EcommResult};
use crate::pda::OwnerPdas;
use crate::records::{encoded_size, AddressRecord, ProfileRecord, Record, RecordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    UpdateAddress = 0,
    UpdateProfile = 1,
    Initialize = 2,
}

impl Opcode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Record carried after the opcode byte, if any.
    pub fn record_kind(self) -> Option<RecordKind> {
        match self {
            Self::UpdateAddress => Some(RecordKind::Address),
            Self::UpdateProfile => Some(RecordKind::Profile),
            Self::Initialize => None,
        }
    }

    /// Total payload length including the opcode byte.
    pub fn payload_len(self) -> usize {
        1 + self.record_kind().map_or(0, encoded_size)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = EcommError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::UpdateAddress),
            1 => Ok(Self::UpdateProfile),
            2 => Ok(Self::Initialize),
            other => Err(EcommError::UnknownOpcode(other)),
        }
    }
}

/// Typed dispatcher instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcommIx {
    UpdateAddress(AddressRecord),
    UpdateProfile(ProfileRecord),
    Initialize,
}

impl EcommIx {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::UpdateAddress(_) => Opcode::UpdateAddress,
            Self::UpdateProfile(_) => Opcode::UpdateProfile,
            Self::Initialize => Opcode::Initialize,
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.opcode().payload_len());
        out.push(self.opcode().as_u8());
        match self {
            Self::UpdateAddress(rec) => rec.write_fields(&mut out),
            Self::UpdateProfile(rec) => rec.write_fields(&mut out),
            Self::Initialize => {}
        }
        out
    }

    pub fn from_slice(data: &[u8]) -> EcommResult<Self> {
        let Some(&tag) = data.first() else {
            return Err(EcommError::malformed("empty instruction data"));
        };
        let opcode = Opcode::try_from(tag)?;
        check_payload(opcode, data)?;
        let body = &data[1..];
        Ok(match opcode {
            Opcode::UpdateAddress => Self::UpdateAddress(AddressRecord::decode(body)?),
            Opcode::UpdateProfile => Self::UpdateProfile(ProfileRecord::decode(body)?),
            Opcode::Initialize => Self::Initialize,
        })
    }
}

/// Check that `data` is a well-formed payload for `opcode`.
pub fn check_payload(opcode: Opcode, data: &[u8]) -> EcommResult<()> {
    let expected = opcode.payload_len();
    if data.len() != expected {
        return Err(EcommError::malformed(format!(
            "opcode {} expects {expected} bytes, got {}",
            opcode.as_u8(),
            data.len()
        )));
    }
    if data[0] != opcode.as_u8() {
        return Err(EcommError::malformed(format!(
            "leading byte {} does not match opcode {}",
            data[0],
            opcode.as_u8()
        )));
    }
    Ok(())
}

/// Assemble a dispatcher instruction after validating its payload.
pub fn build(
    program_id: Pubkey,
    opcode: Opcode,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
) -> EcommResult<Instruction> {
    check_payload(opcode, &data)?;
    tracing::debug!(?opcode, accounts = accounts.len(), bytes = data.len(), "built instruction");
    Ok(Instruction { program_id, accounts, data })
}

pub fn initialize_accounts(programs: &ProgramIds, payer: &Pubkey, pdas: &OwnerPdas) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(pdas.profile.0, false),
        AccountMeta::new(pdas.address.0, false),
        AccountMeta::new(programs.profile_program_id, false),
        AccountMeta::new(programs.address_program_id, false),
    ]
}

pub fn update_accounts(programs: &ProgramIds, payer: &Pubkey, kind: RecordKind, pda: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(*pda, false),
        AccountMeta::new_readonly(programs.record_program(kind), false),
    ]
}

/// Build the instruction creating both record accounts for `payer`.
pub fn ix_initialize(programs: &ProgramIds, payer: &Pubkey, pdas: &OwnerPdas) -> EcommResult<Instruction> {
    build(
        programs.program_id,
        Opcode::Initialize,
        initialize_accounts(programs, payer, pdas),
        EcommIx::Initialize.to_vec(),
    )
}

pub fn ix_update_address(
    programs: &ProgramIds,
    payer: &Pubkey,
    address_pda: &Pubkey,
    record: AddressRecord,
) -> EcommResult<Instruction> {
    build(
        programs.program_id,
        Opcode::UpdateAddress,
        update_accounts(programs, payer, RecordKind::Address, address_pda),
        EcommIx::UpdateAddress(record).to_vec(),
    )
}

pub fn ix_update_profile(
    programs: &ProgramIds,
    payer: &Pubkey,
    profile_pda: &Pubkey,
    record: ProfileRecord,
) -> EcommResult<Instruction> {
    build(
        programs.program_id,
        Opcode::UpdateProfile,
        update_accounts(programs, payer, RecordKind::Profile, profile_pda),
        EcommIx::UpdateProfile(record).to_vec(),
    )
}

/// Write a record straight to its record program, bypassing the dispatcher.
///
/// The record programs take the bare record (no opcode byte) and a single
/// writable account.
pub fn ix_direct_write<R: Record>(programs: &ProgramIds, pda: &Pubkey, record: &R) -> Instruction {
    Instruction {
        program_id: programs.record_program(R::KIND),
        accounts: vec![AccountMeta::new(*pda, false)],
        data: record.encode(),
    }
}

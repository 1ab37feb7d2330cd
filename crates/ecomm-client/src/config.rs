//! Configuration structures for ecomm-client.
//!
//! The client crate itself does not read environment variables or files. All
//! configuration must be provided explicitly by the caller; the CLI owns the
//! file and flag layering.

use std::str::FromStr;

use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;

use crate::constants::{DEFAULT_COMMITMENT, DEFAULT_RPC_URL};
use crate::errors::{EcommError, EcommResult};
use crate::records::RecordKind;

/// The three deployed programs one client talks to.
///
/// Passed explicitly to every operation; nothing here is global, so several
/// deployments can be driven from the same process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    /// Dispatcher program: owns the PDAs and routes opcodes.
    pub program_id: Pubkey,
    /// Program that owns and writes address records.
    pub address_program_id: Pubkey,
    /// Program that owns and writes profile records.
    pub profile_program_id: Pubkey,
}

impl ProgramIds {
    pub fn record_program(&self, kind: RecordKind) -> Pubkey {
        match kind {
            RecordKind::Address => self.address_program_id,
            RecordKind::Profile => self.profile_program_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: String,
    pub programs: ProgramIds,
}

impl ClientConfig {
    pub fn new(programs: ProgramIds) -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: DEFAULT_COMMITMENT.to_string(),
            programs,
        }
    }

    pub fn commitment_config(&self) -> EcommResult<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| EcommError::invalid_config(format!("unknown commitment: {}", self.commitment)))
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &ClientConfig) -> EcommResult<()> {
    if cfg.rpc_url.trim().is_empty() {
        return Err(EcommError::invalid_config("rpc_url must not be empty"));
    }

    cfg.commitment_config()?;

    let p = &cfg.programs;
    if p.program_id == p.address_program_id
        || p.program_id == p.profile_program_id
        || p.address_program_id == p.profile_program_id
    {
        return Err(EcommError::invalid_config("program ids must be distinct"));
    }

    if p.program_id == Pubkey::default() {
        return Err(EcommError::invalid_config("program_id is not set"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs() -> ProgramIds {
        ProgramIds {
            program_id: Pubkey::new_unique(),
            address_program_id: Pubkey::new_unique(),
            profile_program_id: Pubkey::new_unique(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = ClientConfig::new(programs());
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.commitment_config().unwrap(), CommitmentConfig::confirmed());
    }

    #[test]
    fn empty_url_detected() {
        let mut cfg = ClientConfig::new(programs());
        cfg.rpc_url = " ".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn unknown_commitment_detected() {
        let mut cfg = ClientConfig::new(programs());
        cfg.commitment = "eventually".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn duplicate_program_ids_detected() {
        let mut cfg = ClientConfig::new(programs());
        cfg.programs.profile_program_id = cfg.programs.address_program_id;
        assert!(validate_config(&cfg).is_err());
    }
}

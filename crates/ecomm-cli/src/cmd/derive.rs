use std::str::FromStr;

use anyhow::{anyhow, Result};
use ecomm_client::pdas_for_owner;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

use crate::io::config::Settings;
use crate::output;

#[derive(Debug, Serialize)]
pub struct DeriveOut {
    pub owner: String,
    pub program_id: String,
    pub address_pda: String,
    pub address_bump: u8,
    pub profile_pda: String,
    pub profile_bump: u8,
}

pub async fn run(settings: &Settings, owner: Option<&str>) -> Result<()> {
    let program_id = settings.program_id()?;
    let owner = match owner {
        Some(s) => Pubkey::from_str(s).map_err(|_| anyhow!("invalid owner pubkey: {s}"))?,
        None => settings.keypair()?.pubkey(),
    };

    let pdas = pdas_for_owner(&owner, &program_id)?;
    output::print(&DeriveOut {
        owner: owner.to_string(),
        program_id: program_id.to_string(),
        address_pda: pdas.address.0.to_string(),
        address_bump: pdas.address.1,
        profile_pda: pdas.profile.0.to_string(),
        profile_bump: pdas.profile.1,
    })
}

use anyhow::Result;
use serde::Serialize;

use crate::io::config::Settings;
use crate::output;
use crate::solana::client::SolanaClient;

#[derive(Debug, Serialize)]
pub struct InitOut {
    pub signature: String,
    pub address_pda: String,
    pub profile_pda: String,
}

pub async fn run(settings: &Settings) -> Result<()> {
    let client = SolanaClient::open(settings)?;
    let mut session = client.session();
    session.check_program()?;

    let pdas = session.resolve()?;
    let pb = output::spinner("initializing accounts");
    let receipt = session.initialize();
    pb.finish_and_clear();
    let receipt = receipt?;

    output::print(&InitOut {
        signature: receipt.signature.to_string(),
        address_pda: pdas.address.0.to_string(),
        profile_pda: pdas.profile.0.to_string(),
    })
}

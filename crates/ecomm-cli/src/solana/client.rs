use anyhow::Result;
use ecomm_client::{AccountSession, ClientConfig, RpcConnection};
use solana_sdk::signature::Keypair;

use crate::io::config::Settings;

/// Everything a networked command needs: connection, programs and payer.
pub struct SolanaClient {
    pub config: ClientConfig,
    pub conn: RpcConnection,
    pub payer: Keypair,
}

impl SolanaClient {
    pub fn open(settings: &Settings) -> Result<Self> {
        let config = settings.client_config()?;
        let conn = RpcConnection::from_config(&config)?;
        let payer = settings.keypair()?;
        tracing::info!(rpc = %config.rpc_url, program = %config.programs.program_id, "client ready");
        Ok(Self { config, conn, payer })
    }

    pub fn session(&self) -> AccountSession<'_, RpcConnection> {
        AccountSession::new(&self.conn, self.config.programs, &self.payer)
    }
}

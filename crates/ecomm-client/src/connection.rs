//! Ledger access used by the lifecycle orchestrator.
//!
//! [`Connection`] is the seam between the protocol core and the network. The
//! orchestrator only ever reads accounts and submits single instructions through
//! it; timeouts and confirmation policy belong to the implementation.

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_request::RpcError;
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::config::{validate_config, ClientConfig};
use crate::errors::{EcommResult, SubmissionError};

/// Proof that a transaction was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub signature: Signature,
}

pub trait Connection {
    /// Fetch an account, `None` if it does not exist.
    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SubmissionError>;

    /// Sign `instruction` with `signer` as fee payer, send it and wait for confirmation.
    fn submit(&self, instruction: Instruction, signer: &Keypair) -> Result<Receipt, SubmissionError>;

    fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SubmissionError> {
        Ok(self.get_account(address)?.map(|a| a.data))
    }
}

/// [`Connection`] over a JSON-RPC endpoint.
pub struct RpcConnection {
    rpc: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            commitment,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> EcommResult<Self> {
        validate_config(cfg)?;
        Ok(Self::new(&cfg.rpc_url, cfg.commitment_config()?))
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    /// Version string reported by the cluster.
    pub fn cluster_version(&self) -> Result<String, SubmissionError> {
        let v = self.rpc.get_version().map_err(classify)?;
        Ok(v.solana_core)
    }
}

impl Connection for RpcConnection {
    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SubmissionError> {
        let resp = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .map_err(classify)?;
        Ok(resp.value)
    }

    fn submit(&self, instruction: Instruction, signer: &Keypair) -> Result<Receipt, SubmissionError> {
        let bh = self.rpc.get_latest_blockhash().map_err(classify)?;
        let tx = Transaction::new_signed_with_payer(&[instruction], Some(&signer.pubkey()), &[signer], bh);
        let signature = self.rpc.send_and_confirm_transaction(&tx).map_err(classify)?;
        tracing::info!(%signature, "transaction confirmed");
        Ok(Receipt { signature })
    }
}

/// Map an RPC client error onto the submission taxonomy.
pub fn classify(err: ClientError) -> SubmissionError {
    let msg = err.to_string();
    if err.get_transaction_error().is_some() {
        return SubmissionError::Rejected(msg);
    }
    match err.kind() {
        ClientErrorKind::Reqwest(e) if e.is_timeout() => SubmissionError::Timeout(msg),
        ClientErrorKind::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => SubmissionError::Timeout(msg),
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => SubmissionError::Network(msg),
        ClientErrorKind::RpcError(RpcError::ForUser(m)) if m.contains("unable to confirm") => {
            SubmissionError::Timeout(msg)
        }
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. }) => SubmissionError::Rejected(msg),
        ClientErrorKind::TransactionError(_) | ClientErrorKind::SigningError(_) => SubmissionError::Rejected(msg),
        _ => SubmissionError::Network(msg),
    }
}

//! Constants shared between the on-chain programs and clients.
//!
//! Keep these stable because they affect PDA derivation and the wire format.

/// PDA seed for the per-user address record.
pub const SEED_ADDRESS: &[u8] = b"address";

/// PDA seed for the per-user profile record.
pub const SEED_PROFILE: &[u8] = b"profile";

/// Suffix appended to every PDA hash preimage by the runtime.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Longest seed the runtime accepts.
pub const MAX_SEED_LEN: usize = 32;

/// Highest bump tried by the derivation search.
pub const MAX_BUMP: u8 = u8::MAX;

/// Width of the fixed text fields (`address`, `name`).
pub const TEXT_FIELD_LEN: usize = 512;

/// Default RPC endpoint (local validator).
pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";

/// Default commitment level used for reads and confirmations.
pub const DEFAULT_COMMITMENT: &str = "confirmed";

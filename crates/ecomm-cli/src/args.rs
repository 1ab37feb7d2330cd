use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "ecomm", version, about = "Client for the ecomm address/profile programs")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub conn: ConnArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and identity settings. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnArgs {
    /// TOML config file.
    #[arg(long, global = true, env = "ECOMM_CONFIG")]
    pub config: Option<String>,

    /// RPC endpoint (default: http://localhost:8899)
    #[arg(long, global = true, env = "ECOMM_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Commitment level: processed|confirmed|finalized
    #[arg(long, global = true)]
    pub commitment: Option<String>,

    /// Payer keypair file (default: ~/.config/solana/id.json)
    #[arg(long, global = true, env = "ECOMM_KEYPAIR")]
    pub keypair: Option<String>,

    /// Dispatcher program id, or path to its keypair file.
    #[arg(long, global = true)]
    pub program_id: Option<String>,

    /// Address program id, or path to its keypair file.
    #[arg(long, global = true)]
    pub address_program: Option<String>,

    /// Profile program id, or path to its keypair file.
    #[arg(long, global = true)]
    pub profile_program: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the derived record accounts for an owner (no network).
    Derive {
        /// Owner pubkey (default: the payer keypair).
        #[arg(long)]
        owner: Option<String>,
    },

    /// Print encoded record and payload sizes.
    Sizes,

    /// Check cluster, keypair and program deployment.
    Doctor,

    /// Create the address and profile accounts for the payer.
    Init,

    /// Write the address record through the dispatcher program.
    SetAddress { address: String },

    /// Write the profile record through the dispatcher program.
    SetProfile {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        date: i32,
        #[arg(long, allow_hyphen_values = true)]
        month: i32,
        #[arg(long, allow_hyphen_values = true)]
        year: i32,
    },

    /// Write the address record straight to the address program.
    WriteAddress { address: String },

    /// Read and decode the address record.
    GetAddress {
        /// Also print the raw account bytes as hex.
        #[arg(long)]
        raw: bool,
    },

    /// Read and decode the profile record.
    GetProfile {
        #[arg(long)]
        raw: bool,
    },
}

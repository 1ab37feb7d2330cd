//! ecomm-client
//!
//! Rust client for the ecomm record programs: a dispatcher program that owns
//! one address account and one profile account per user, plus the two record
//! programs that write them.
//!
//! It includes:
//! - fixed-layout record encoding shared with the programs
//! - PDA derivation with an explicit bump search
//! - instruction builders for the dispatcher opcodes
//! - a lifecycle session that initializes, updates and reads accounts through
//!   any [`Connection`], with an RPC implementation included
//!
//! Program ids are always provided by the consumer through [`ProgramIds`].

pub mod config;
pub mod connection;
pub mod constants;
pub mod errors;
pub mod instruction;
pub mod lifecycle;
pub mod pda;
pub mod records;

pub use config::{validate_config, ClientConfig, ProgramIds};
pub use connection::{Connection, Receipt, RpcConnection};
pub use errors::{DecodeError, EcommError, EcommResult, SubmissionError};
pub use instruction::{EcommIx, Opcode};
pub use lifecycle::{AccountSession, LifecycleState};
pub use pda::{derive, pdas_for_owner, OwnerPdas};
pub use records::{encoded_size, AddressRecord, ProfileRecord, Record, RecordKind};

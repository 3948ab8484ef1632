//! Common types for the ENEDEX harness.
//!
//! This crate holds the data model shared by the pure derivations in
//! `enedex-core` and the on-chain harness: token pairs, creation bytecode,
//! permit messages, chain transaction types and the error taxonomy used to
//! reject malformed input before any hashing happens.

/// Transaction, receipt and event-log types exchanged with a chain client.
pub mod chain;
/// Input validation errors shared by the derivations.
pub mod error;
/// Network configuration types.
pub mod networks;
/// Token pair and creation bytecode types used for CREATE2 derivation.
pub mod pair;
/// Permit message, deadline, domain and signature types.
pub mod permit;
/// Redacting string wrapper for private keys.
pub mod secret_string;
/// Encoding, conversion and formatting helpers.
pub mod utils;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use chain::{Deployment, EventLog, Transaction, TransactionHash, TransactionReceipt};
pub use error::DerivationError;
pub use networks::{NetworkConfig, NetworksConfig};
pub use pair::{Bytecode, TokenPair};
pub use permit::{Deadline, Eip712Domain, PermitMessage, PermitSignature};
pub use secret_string::SecretString;
pub use utils::{
	address_from_slice, format_token_amount, parse_units, u256_from_be_slice, with_0x_prefix,
	without_0x_prefix,
};

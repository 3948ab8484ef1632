//! Helpers for encoding, conversion and display.

pub mod conversion;
pub mod eip712;
pub mod formatting;

pub use conversion::{address_from_slice, parse_units, u256_from_be_slice};
pub use eip712::{compute_final_digest, Eip712AbiEncoder};
pub use formatting::{format_token_amount, with_0x_prefix, without_0x_prefix};

//! Errors raised while validating derivation input.
//!
//! Both derivations fail fast: a malformed address, an integer that does not
//! fit into 256 bits or an empty creation bytecode is rejected before any
//! hash is computed.

use thiserror::Error;

/// Errors that can occur when building derivation input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
	/// An address input is not exactly 20 bytes long.
	#[error("Invalid address length: expected {expected} bytes, got {actual}")]
	InvalidAddressLength { expected: usize, actual: usize },
	/// A numeric field does not fit into an unsigned 256-bit integer.
	#[error("Integer overflow: {field} exceeds 256 bits")]
	IntegerOverflow { field: String },
	/// Creation bytecode is empty, so no init-code hash can be derived.
	#[error("Creation bytecode is empty")]
	EmptyBytecode,
	/// A hex or decimal string could not be parsed.
	#[error("Invalid input: {0}")]
	InvalidInput(String),
}

impl DerivationError {
	pub(crate) fn overflow(field: &str) -> Self {
		DerivationError::IntegerOverflow {
			field: field.to_string(),
		}
	}
}

//! Token pair and creation bytecode types.
//!
//! A `TokenPair` is unordered from the caller's point of view: it is stored in
//! the canonical ascending order the factory uses internally, so `(A, B)` and
//! `(B, A)` compare equal and hash to the same salt.

use crate::utils::{address_from_slice, without_0x_prefix};
use crate::DerivationError;
use alloy_primitives::{Address, Bytes};
use std::fmt;

/// Two token addresses in canonical ascending numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenPair {
	token0: Address,
	token1: Address,
}

impl TokenPair {
	/// Creates a pair from two addresses given in any order.
	///
	/// Equal addresses are accepted; canonicalization is then a no-op. The real
	/// factory never creates such a pair, but deriving its address is harmless.
	pub fn new(token_a: Address, token_b: Address) -> Self {
		if token_a <= token_b {
			Self {
				token0: token_a,
				token1: token_b,
			}
		} else {
			Self {
				token0: token_b,
				token1: token_a,
			}
		}
	}

	/// Creates a pair from raw address bytes, rejecting anything not 20 bytes long.
	pub fn from_slices(token_a: &[u8], token_b: &[u8]) -> Result<Self, DerivationError> {
		Ok(Self::new(
			address_from_slice(token_a)?,
			address_from_slice(token_b)?,
		))
	}

	/// The numerically smaller token.
	pub fn token0(&self) -> Address {
		self.token0
	}

	/// The numerically larger token.
	pub fn token1(&self) -> Address {
		self.token1
	}

	/// Returns true when both sides are the same address.
	pub fn is_self_pair(&self) -> bool {
		self.token0 == self.token1
	}

	/// Concatenation of the raw token bytes in canonical order.
	pub fn packed(&self) -> [u8; 40] {
		let mut out = [0u8; 40];
		out[..20].copy_from_slice(self.token0.as_slice());
		out[20..].copy_from_slice(self.token1.as_slice());
		out
	}
}

impl fmt::Display for TokenPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.token0, self.token1)
	}
}

/// Creation bytecode of a contract, guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode(Bytes);

impl Bytecode {
	/// Wraps raw creation code.
	pub fn new(code: impl Into<Bytes>) -> Result<Self, DerivationError> {
		let code = code.into();
		if code.is_empty() {
			return Err(DerivationError::EmptyBytecode);
		}
		Ok(Self(code))
	}

	/// Parses creation code from a hex string, with or without `0x`.
	pub fn from_hex(code: &str) -> Result<Self, DerivationError> {
		let bytes = hex::decode(without_0x_prefix(code.trim()))
			.map_err(|e| DerivationError::InvalidInput(format!("Invalid bytecode hex: {}", e)))?;
		Self::new(bytes)
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always false; empty bytecode cannot be constructed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl AsRef<[u8]> for Bytecode {
	fn as_ref(&self) -> &[u8] {
		self.as_slice()
	}
}

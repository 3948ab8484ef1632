//! Permit (EIP-2612) message types.
//!
//! A `PermitMessage` is the typed payload a token owner signs off-chain to
//! grant an allowance without sending a transaction. All integer fields are
//! full 256-bit words; the raw constructors reject wider input instead of
//! truncating it.

use crate::utils::{address_from_slice, u256_from_be_slice};
use crate::DerivationError;
use alloy_primitives::{Address, B256, U256};

/// Expiry of a permit.
///
/// The on-chain contract compares `deadline >= block.timestamp`, so the
/// maximum uint256 value never expires. Any `U256::MAX` converts to `Never`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
	/// Expires at the given unix timestamp.
	At(U256),
	/// Never expires (encoded as `2^256 - 1`).
	Never,
}

impl Deadline {
	/// The 256-bit word written into the struct hash.
	pub fn as_u256(&self) -> U256 {
		match self {
			Deadline::At(ts) => *ts,
			Deadline::Never => U256::MAX,
		}
	}

	pub fn is_never(&self) -> bool {
		matches!(self, Deadline::Never)
	}
}

impl From<U256> for Deadline {
	fn from(value: U256) -> Self {
		if value == U256::MAX {
			Deadline::Never
		} else {
			Deadline::At(value)
		}
	}
}

impl From<u64> for Deadline {
	fn from(value: u64) -> Self {
		Deadline::At(U256::from(value))
	}
}

/// The `Permit` struct signed by the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitMessage {
	pub owner: Address,
	pub spender: Address,
	pub value: U256,
	pub nonce: U256,
	pub deadline: Deadline,
}

impl PermitMessage {
	pub fn new(
		owner: Address,
		spender: Address,
		value: U256,
		nonce: U256,
		deadline: impl Into<Deadline>,
	) -> Self {
		Self {
			owner,
			spender,
			value,
			nonce,
			deadline: deadline.into(),
		}
	}

	/// Builds a message from raw bytes as returned by an RPC node.
	///
	/// Addresses must be exactly 20 bytes; integers are big-endian and may be
	/// shorter than 32 bytes, but must not carry significant bytes beyond 256 bits.
	pub fn from_raw(
		owner: &[u8],
		spender: &[u8],
		value: &[u8],
		nonce: &[u8],
		deadline: &[u8],
	) -> Result<Self, DerivationError> {
		Ok(Self {
			owner: address_from_slice(owner)?,
			spender: address_from_slice(spender)?,
			value: u256_from_be_slice(value, "value")?,
			nonce: u256_from_be_slice(nonce, "nonce")?,
			deadline: u256_from_be_slice(deadline, "deadline")?.into(),
		})
	}

}

/// EIP-712 domain of a token contract instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl Eip712Domain {
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		chain_id: u64,
		verifying_contract: Address,
	) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			chain_id,
			verifying_contract,
		}
	}
}

/// ECDSA signature over a permit digest, split the way `permit(...)` takes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitSignature {
	/// Recovery id, 27 or 28.
	pub v: u8,
	pub r: B256,
	pub s: B256,
}

impl PermitSignature {
	/// Parses a 65-byte `r || s || v` signature. `v` may be 0/1 or 27/28.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, DerivationError> {
		if bytes.len() != 65 {
			return Err(DerivationError::InvalidInput(format!(
				"Expected 65-byte signature, got {}",
				bytes.len()
			)));
		}
		let v = match bytes[64] {
			0 | 1 => bytes[64] + 27,
			27 | 28 => bytes[64],
			other => {
				return Err(DerivationError::InvalidInput(format!(
					"Invalid signature recovery id {}",
					other
				)))
			},
		};
		Ok(Self {
			v,
			r: B256::from_slice(&bytes[..32]),
			s: B256::from_slice(&bytes[32..64]),
		})
	}

	/// Serializes as `r || s || v` with `v` in 27/28 form.
	pub fn to_bytes(&self) -> [u8; 65] {
		let mut out = [0u8; 65];
		out[..32].copy_from_slice(self.r.as_slice());
		out[32..64].copy_from_slice(self.s.as_slice());
		out[64] = self.v;
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_max_deadline_is_never() {
		assert_eq!(Deadline::from(U256::MAX), Deadline::Never);
		assert_eq!(Deadline::Never.as_u256(), U256::MAX);
		assert_eq!(Deadline::from(1_700_000_000u64).as_u256(), U256::from(1_700_000_000u64));
	}

	#[test]
	fn test_from_raw_accepts_max_deadline() {
		let msg = PermitMessage::from_raw(&[1u8; 20], &[2u8; 20], &[10], &[], &[0xff; 32]).unwrap();
		assert!(msg.deadline.is_never());
		assert_eq!(msg.value, U256::from(10));
		assert_eq!(msg.nonce, U256::ZERO);
	}

	#[test]
	fn test_from_raw_rejects_wide_integer() {
		let mut wide = vec![0x01];
		wide.extend_from_slice(&[0u8; 32]);
		let err = PermitMessage::from_raw(&[1u8; 20], &[2u8; 20], &wide, &[0], &[0]).unwrap_err();
		assert_eq!(
			err,
			DerivationError::IntegerOverflow {
				field: "value".to_string()
			}
		);
	}

	#[test]
	fn test_from_raw_rejects_bad_address() {
		let err = PermitMessage::from_raw(&[1u8; 20], &[2u8; 32], &[1], &[0], &[0]).unwrap_err();
		assert_eq!(
			err,
			DerivationError::InvalidAddressLength {
				expected: 20,
				actual: 32
			}
		);
	}

	#[test]
	fn test_signature_bytes() {
		let mut raw = [0x11u8; 65];
		raw[64] = 1;
		let sig = PermitSignature::from_bytes(&raw).unwrap();
		assert_eq!(sig.v, 28);
		assert_eq!(sig.to_bytes()[64], 28);
		assert_eq!(&sig.to_bytes()[..64], &raw[..64]);

		raw[64] = 5;
		assert!(PermitSignature::from_bytes(&raw).is_err());
		assert!(PermitSignature::from_bytes(&raw[..64]).is_err());
	}
}

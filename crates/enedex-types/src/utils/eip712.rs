//! EIP-712 encoding primitives.
//!
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - A minimal ABI encoder for the static field types used by `Permit` and
//!   `EIP712Domain`: every field becomes one 32-byte word.

use alloy_primitives::{keccak256, Address, B256, U256};

/// Two-byte prefix of an EIP-712 signing payload.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// Computes keccak256(0x1901 || domain_separator || struct_hash).
pub fn compute_final_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
	let mut out = [0u8; 66];
	out[..2].copy_from_slice(&EIP712_PREFIX);
	out[2..34].copy_from_slice(domain_separator.as_slice());
	out[34..].copy_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Word-by-word ABI encoder for EIP-712 struct hashing.
#[derive(Debug, Default)]
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Pre-allocates room for `words` 32-byte words.
	pub fn with_words(words: usize) -> Self {
		Self {
			buf: Vec::with_capacity(words * 32),
		}
	}

	pub fn push_b256(&mut self, v: &B256) -> &mut Self {
		self.buf.extend_from_slice(v.as_slice());
		self
	}

	/// Addresses are left-padded with 12 zero bytes.
	pub fn push_address(&mut self, addr: &Address) -> &mut Self {
		self.buf.extend_from_slice(&[0u8; 12]);
		self.buf.extend_from_slice(addr.as_slice());
		self
	}

	/// Integers are written big-endian.
	pub fn push_u256(&mut self, v: U256) -> &mut Self {
		self.buf.extend_from_slice(&v.to_be_bytes::<32>());
		self
	}

	/// Dynamic `string`/`bytes` members are encoded as the hash of their contents.
	pub fn push_string(&mut self, s: &str) -> &mut Self {
		self.push_b256(&keccak256(s.as_bytes()))
	}

	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// keccak256 of everything pushed so far.
	pub fn hash(&self) -> B256 {
		keccak256(&self.buf)
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

//! Validating conversions from raw RPC data into typed values.
//!
//! Nothing here truncates or pads silently: an address must be exactly 20
//! bytes and an integer must fit into 256 bits, otherwise the caller gets a
//! `DerivationError`.

use crate::DerivationError;
use alloy_primitives::utils::{parse_units as alloy_parse_units, ParseUnits};
use alloy_primitives::{Address, U256};

const ADDRESS_LENGTH: usize = 20;

/// Converts a byte slice into an address, requiring exactly 20 bytes.
pub fn address_from_slice(bytes: &[u8]) -> Result<Address, DerivationError> {
	if bytes.len() != ADDRESS_LENGTH {
		return Err(DerivationError::InvalidAddressLength {
			expected: ADDRESS_LENGTH,
			actual: bytes.len(),
		});
	}
	Ok(Address::from_slice(bytes))
}

/// Converts a big-endian byte slice into a `U256`.
///
/// Slices shorter than 32 bytes are zero-extended on the left. Longer slices
/// are accepted only if the extra leading bytes are all zero.
pub fn u256_from_be_slice(bytes: &[u8], field: &str) -> Result<U256, DerivationError> {
	let significant = match bytes.iter().position(|b| *b != 0) {
		Some(first) => &bytes[first..],
		None => return Ok(U256::ZERO),
	};
	if significant.len() > 32 {
		return Err(DerivationError::overflow(field));
	}
	Ok(U256::from_be_slice(significant))
}

/// Scales a human readable token amount ("10", "1.5") by `decimals`.
///
/// Same rules as ethers' `parseUnits`: `parse_units("10", 18)` is 10^19.
/// Both sides of the decimal point must hold digits, so `""`, `"."` and
/// `"1."` are rejected, as are negative amounts.
pub fn parse_units(amount: &str, decimals: u8, field: &str) -> Result<U256, DerivationError> {
	let amount = amount.trim();
	let invalid = |reason: String| {
		DerivationError::InvalidInput(format!("Invalid {} '{}': {}", field, amount, reason))
	};

	let (whole, fraction) = match amount.split_once('.') {
		Some((whole, fraction)) => (whole, Some(fraction)),
		None => (amount, None),
	};
	let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
	if !is_digits(whole) || !fraction.map_or(true, is_digits) {
		return Err(invalid("expected a non-negative decimal number".to_string()));
	}
	if fraction.is_some_and(|f| f.len() > decimals as usize) {
		return Err(invalid(format!("more than {} decimal places", decimals)));
	}

	match alloy_parse_units(amount, decimals) {
		Ok(ParseUnits::U256(value)) => Ok(value),
		Ok(ParseUnits::I256(_)) => Err(invalid("negative amount".to_string())),
		Err(e) => Err(invalid(e.to_string())),
	}
}

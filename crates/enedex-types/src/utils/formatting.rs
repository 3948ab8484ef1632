//! Display helpers for hex strings and token amounts.

/// Adds a "0x" prefix unless one is already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a leading "0x" or "0X" if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Formats a raw on-chain amount with `decimals` places for logs.
///
/// Trailing fractional zeros are dropped: `("10000000000000000000", 18)`
/// renders as `"10"`, `("1500000", 6)` as `"1.5"`.
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let places = decimals as usize;
	let (integer_part, fraction_part) = if amount.len() <= places {
		("0".to_string(), format!("{:0>width$}", amount, width = places))
	} else {
		let split = amount.len() - places;
		(amount[..split].to_string(), amount[split..].to_string())
	};

	let fraction = fraction_part.trim_end_matches('0');
	if fraction.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, fraction)
	}
}

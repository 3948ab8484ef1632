//! CREATE2 pair address derivation.
//!
//! The factory deploys every pair with
//! `create2(0, code, keccak256(abi.encodePacked(token0, token1)))`, so the
//! resulting address is known before the pair exists:
//!
//! ```text
//! address = keccak256(0xff ++ factory ++ salt ++ keccak256(creation_code))[12..]
//! salt    = keccak256(token0 ++ token1)        with token0 < token1
//! ```

use alloy_primitives::{keccak256, Address, B256};
use enedex_types::{address_from_slice, DerivationError, TokenPair};

/// Prefix byte that separates CREATE2 preimages from RLP-encoded CREATE ones.
const CREATE2_PREFIX: u8 = 0xff;

/// Sorts two token addresses into the order the factory stores them in.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
	let pair = TokenPair::new(token_a, token_b);
	(pair.token0(), pair.token1())
}

/// keccak256 of the canonically ordered, packed token addresses.
pub fn pair_salt(pair: &TokenPair) -> B256 {
	keccak256(pair.packed())
}

/// keccak256 of the creation bytecode.
pub fn init_code_hash(creation_bytecode: impl AsRef<[u8]>) -> Result<B256, DerivationError> {
	let code = creation_bytecode.as_ref();
	if code.is_empty() {
		return Err(DerivationError::EmptyBytecode);
	}
	Ok(keccak256(code))
}

/// Address produced by CREATE2 for `deployer`, `salt` and `init_code_hash`.
pub fn create2_address(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
	let mut preimage = [0u8; 85];
	preimage[0] = CREATE2_PREFIX;
	preimage[1..21].copy_from_slice(deployer.as_slice());
	preimage[21..53].copy_from_slice(salt.as_slice());
	preimage[53..].copy_from_slice(init_code_hash.as_slice());
	Address::from_slice(&keccak256(preimage)[12..])
}

/// Pair address when the init-code hash is already known, e.g. from the
/// factory's `pairCodeHash()` view or a router constant.
pub fn pair_address_from_code_hash(
	factory: Address,
	token_a: Address,
	token_b: Address,
	init_code_hash: B256,
) -> Address {
	let pair = TokenPair::new(token_a, token_b);
	create2_address(factory, pair_salt(&pair), init_code_hash)
}

/// Derives the address `deployer` assigns to the pair `(token_a, token_b)`.
///
/// The token order does not matter. Equal tokens are not rejected.
///
/// # Errors
///
/// Returns [`DerivationError::EmptyBytecode`] for empty creation code.
pub fn derive_address(
	deployer: Address,
	token_a: Address,
	token_b: Address,
	creation_bytecode: impl AsRef<[u8]>,
) -> Result<Address, DerivationError> {
	let code_hash = init_code_hash(creation_bytecode)?;
	Ok(pair_address_from_code_hash(
		deployer, token_a, token_b, code_hash,
	))
}

/// [`derive_address`] for raw byte input, validating every address length.
pub fn derive_address_from_raw(
	deployer: &[u8],
	token_a: &[u8],
	token_b: &[u8],
	creation_bytecode: &[u8],
) -> Result<Address, DerivationError> {
	let deployer = address_from_slice(deployer)?;
	let pair = TokenPair::from_slices(token_a, token_b)?;
	derive_address(deployer, pair.token0(), pair.token1(), creation_bytecode)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256, hex};

	const TEST_ADDRESSES: [Address; 2] = [
		address!("1000000000000000000000000000000000000000"),
		address!("2000000000000000000000000000000000000000"),
	];

	// Minimal solc creation code used as a stand-in for the pair artifact.
	const FIXTURE_PAIR_BYTECODE: [u8; 51] = hex!(
		"6080604052348015600f57600080fd5b50603f80601d6000396000f3fe6080604052600080fdfea164736f6c634300060c000a"
	);

	#[test]
	fn test_create2_eip1014_vectors() {
		let cases = [
			(
				Address::ZERO,
				B256::ZERO,
				hex!("00").to_vec(),
				address!("4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38"),
			),
			(
				address!("deadbeef00000000000000000000000000000000"),
				B256::ZERO,
				hex!("00").to_vec(),
				address!("B928f69Bb1D91Cd65274e3c79d8986362984fDA3"),
			),
			(
				address!("00000000000000000000000000000000deadbeef"),
				b256!("00000000000000000000000000000000000000000000000000000000cafebabe"),
				hex!("deadbeef").to_vec(),
				address!("60f3f640a8508fC6a86d45DF051962668E1e8AC7"),
			),
		];

		for (deployer, salt, code, expected) in cases {
			let code_hash = init_code_hash(&code).unwrap();
			assert_eq!(create2_address(deployer, salt, code_hash), expected);
		}
	}

	#[test]
	fn test_uniswap_v2_mainnet_pairs() {
		let factory = address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");
		let code_hash = b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");
		let weth = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
		let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
		let dai = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

		assert_eq!(
			pair_address_from_code_hash(factory, weth, usdc, code_hash),
			address!("B4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc")
		);
		assert_eq!(
			pair_address_from_code_hash(factory, dai, weth, code_hash),
			address!("A478c2975Ab1Ea89e8196811F51A7B7Ade33eB11")
		);
	}

	#[test]
	fn test_create_pair_scenario_golden() {
		let deployer = address!("1000000000000000000000000000000000000000");
		let pair = TokenPair::new(TEST_ADDRESSES[0], TEST_ADDRESSES[1]);

		assert_eq!(
			pair_salt(&pair),
			b256!("46f6d8e235af442238360b5e39f221833e8e3bf86a1cfc4deeba7e65097d0211")
		);
		assert_eq!(
			init_code_hash(FIXTURE_PAIR_BYTECODE).unwrap(),
			b256!("4007f956e53b046ccfc6ce210fdcd0c78bd8056100e165f8ea4ae447dd7b0282")
		);

		let derived =
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], FIXTURE_PAIR_BYTECODE)
				.unwrap();
		assert_eq!(derived, address!("84ebe11ee632a2b0ac029371b8bf862c0ed57042"));
		assert_eq!(
			derived.to_checksum(None),
			"0x84EBe11EE632a2b0ac029371B8BF862c0eD57042"
		);
	}

	#[test]
	fn test_derive_address_order_independent() {
		let deployer = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
		let forward =
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], FIXTURE_PAIR_BYTECODE)
				.unwrap();
		let reverse =
			derive_address(deployer, TEST_ADDRESSES[1], TEST_ADDRESSES[0], FIXTURE_PAIR_BYTECODE)
				.unwrap();
		assert_eq!(forward, reverse);

		// Deterministic across calls.
		assert_eq!(
			forward,
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], FIXTURE_PAIR_BYTECODE)
				.unwrap()
		);
	}

	#[test]
	fn test_bytecode_mutation_changes_address() {
		let deployer = address!("1000000000000000000000000000000000000000");
		let original =
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], FIXTURE_PAIR_BYTECODE)
				.unwrap();

		let mut first = FIXTURE_PAIR_BYTECODE;
		first[0] ^= 0x01;
		assert_eq!(
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], first).unwrap(),
			address!("13b19e00f89ace27fec169eb2a533d011f9c3e88")
		);

		for index in 0..FIXTURE_PAIR_BYTECODE.len() {
			let mut mutated = FIXTURE_PAIR_BYTECODE;
			mutated[index] = mutated[index].wrapping_add(1);
			let derived =
				derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], mutated).unwrap();
			assert_ne!(derived, original, "byte {} did not change the address", index);
		}
	}

	#[test]
	fn test_matches_alloy_create2() {
		let deployer = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
		let pair = TokenPair::new(TEST_ADDRESSES[1], TEST_ADDRESSES[0]);
		let expected = deployer.create2_from_code(pair_salt(&pair), FIXTURE_PAIR_BYTECODE);
		assert_eq!(
			derive_address(deployer, TEST_ADDRESSES[1], TEST_ADDRESSES[0], FIXTURE_PAIR_BYTECODE)
				.unwrap(),
			expected
		);
	}

	#[test]
	fn test_self_pair_does_not_fail() {
		let deployer = address!("1000000000000000000000000000000000000000");
		let token = TEST_ADDRESSES[0];
		let derived = derive_address(deployer, token, token, FIXTURE_PAIR_BYTECODE).unwrap();
		assert_ne!(derived, Address::ZERO);
	}

	#[test]
	fn test_empty_bytecode_rejected() {
		let deployer = address!("1000000000000000000000000000000000000000");
		assert_eq!(
			derive_address(deployer, TEST_ADDRESSES[0], TEST_ADDRESSES[1], Vec::<u8>::new()),
			Err(DerivationError::EmptyBytecode)
		);
	}

	#[test]
	fn test_raw_input_validation() {
		let derived = derive_address_from_raw(
			TEST_ADDRESSES[0].as_slice(),
			TEST_ADDRESSES[1].as_slice(),
			TEST_ADDRESSES[0].as_slice(),
			&FIXTURE_PAIR_BYTECODE,
		)
		.unwrap();
		assert_eq!(derived, address!("84ebe11ee632a2b0ac029371b8bf862c0ed57042"));

		let err = derive_address_from_raw(
			&[0u8; 21],
			TEST_ADDRESSES[0].as_slice(),
			TEST_ADDRESSES[1].as_slice(),
			&FIXTURE_PAIR_BYTECODE,
		)
		.unwrap_err();
		assert_eq!(
			err,
			DerivationError::InvalidAddressLength {
				expected: 20,
				actual: 21
			}
		);
	}

	#[test]
	fn test_sort_tokens() {
		assert_eq!(
			sort_tokens(TEST_ADDRESSES[1], TEST_ADDRESSES[0]),
			(TEST_ADDRESSES[0], TEST_ADDRESSES[1])
		);
	}
}

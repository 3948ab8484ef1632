//! EIP-712 permit digest construction.
//!
//! Rebuilds, off-chain and byte for byte, the payload the LP token verifies in
//! `permit(owner, spender, value, deadline, v, r, s)`:
//!
//! ```text
//! structHash = keccak256(PERMIT_TYPEHASH ++ owner ++ spender ++ value ++ nonce ++ deadline)
//! digest     = keccak256(0x1901 ++ DOMAIN_SEPARATOR ++ structHash)
//! ```

use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};
use enedex_types::utils::{compute_final_digest, Eip712AbiEncoder};
use enedex_types::{DerivationError, Eip712Domain, PermitMessage, PermitSignature};

/// Canonical type string of the permit struct.
pub const PERMIT_TYPE: &str =
	"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Canonical type string of the domain used by the LP token.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// keccak256 of [`PERMIT_TYPE`], the token's `PERMIT_TYPEHASH`.
pub fn permit_typehash() -> B256 {
	keccak256(PERMIT_TYPE.as_bytes())
}

/// Computes the domain separator a token instance exposes as `DOMAIN_SEPARATOR()`.
pub fn domain_separator(domain: &Eip712Domain) -> B256 {
	let mut enc = Eip712AbiEncoder::with_words(5);
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()))
		.push_string(&domain.name)
		.push_string(&domain.version)
		.push_u256(U256::from(domain.chain_id))
		.push_address(&domain.verifying_contract);
	enc.hash()
}

/// Hash of the typed permit struct, one 32-byte word per field.
pub fn permit_struct_hash(message: &PermitMessage, struct_type_hash: B256) -> B256 {
	let mut enc = Eip712AbiEncoder::with_words(6);
	enc.push_b256(&struct_type_hash)
		.push_address(&message.owner)
		.push_address(&message.spender)
		.push_u256(message.value)
		.push_u256(message.nonce)
		.push_u256(message.deadline.as_u256());
	enc.hash()
}

/// Builds the digest that must be ECDSA-signed to authorize `message`.
///
/// Pure: identical input always yields the identical digest, which is what
/// lets the harness compare it with the contract's own view of the domain.
pub fn build_permit_digest(
	domain_separator: B256,
	message: &PermitMessage,
	struct_type_hash: B256,
) -> B256 {
	let struct_hash = permit_struct_hash(message, struct_type_hash);
	compute_final_digest(&domain_separator, &struct_hash)
}

/// [`build_permit_digest`] for raw RPC bytes.
///
/// Hash inputs must be exactly 32 bytes, addresses exactly 20 bytes and
/// integers at most 256 bits wide; anything else is rejected.
#[allow(clippy::too_many_arguments)]
pub fn build_permit_digest_from_raw(
	domain_separator: &[u8],
	owner: &[u8],
	spender: &[u8],
	value: &[u8],
	nonce: &[u8],
	deadline: &[u8],
	struct_type_hash: &[u8],
) -> Result<B256, DerivationError> {
	let domain_separator = b256_from_slice(domain_separator, "domain separator")?;
	let struct_type_hash = b256_from_slice(struct_type_hash, "struct type hash")?;
	let message = PermitMessage::from_raw(owner, spender, value, nonce, deadline)?;
	Ok(build_permit_digest(
		domain_separator,
		&message,
		struct_type_hash,
	))
}

/// Recovers the address that produced `signature` over `digest`.
pub fn recover_signer(
	digest: &B256,
	signature: &PermitSignature,
) -> Result<Address, DerivationError> {
	let y_parity = match signature.v {
		27 => false,
		28 => true,
		other => {
			return Err(DerivationError::InvalidInput(format!(
				"Invalid signature: recovery id {} is not 27 or 28",
				other
			)))
		},
	};
	let sig = PrimitiveSignature::new(
		U256::from_be_bytes(signature.r.0),
		U256::from_be_bytes(signature.s.0),
		y_parity,
	);
	sig.recover_address_from_prehash(digest)
		.map_err(|e| DerivationError::InvalidInput(format!("Signature recovery failed: {}", e)))
}

/// Returns true if `signature` over `digest` was made by `expected`.
pub fn verify_signer(
	digest: &B256,
	signature: &PermitSignature,
	expected: Address,
) -> Result<bool, DerivationError> {
	Ok(recover_signer(digest, signature)? == expected)
}

fn b256_from_slice(bytes: &[u8], what: &str) -> Result<B256, DerivationError> {
	if bytes.len() != 32 {
		return Err(DerivationError::InvalidInput(format!(
			"Expected 32-byte {}, got {} bytes",
			what,
			bytes.len()
		)));
	}
	Ok(B256::from_slice(bytes))
}

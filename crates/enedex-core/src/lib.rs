//! Pure derivations used to cross-check the ENEDEX contracts.
//!
//! Two independent, stateless computations live here:
//!
//! - [`create2`]: the address a factory assigns to a pair through CREATE2.
//! - [`permit`]: the EIP-712 digest an owner signs to authorize a permit.
//!
//! Neither performs I/O or keeps state, so both can be called from any number
//! of tasks at once. The harness compares their output with what the deployed
//! contracts report.

pub mod create2;
pub mod permit;

pub use create2::{
	create2_address, derive_address, derive_address_from_raw, init_code_hash,
	pair_address_from_code_hash, pair_salt, sort_tokens,
};
pub use permit::{
	build_permit_digest, build_permit_digest_from_raw, domain_separator, permit_struct_hash, permit_typehash, recover_signer,
	verify_signer, DOMAIN_TYPE, PERMIT_TYPE,
};

//! Derivation of the program-owned managed account address.
//!
//! The address is `sha256(owner || seed || program_id)`, computed by
//! [`Pubkey::create_with_seed`]. The create path and the read path must use
//! the same seed, otherwise they point at different accounts.

use solana_pubkey::Pubkey;

use crate::GreeterError;
use crate::GreeterResult;

/// Seed shared by every managed account this client creates or reads.
pub const MANAGED_ACCOUNT_SEED: &str = "hello";

/// Derive the address of the account `owner` manages for `program_id` under
/// `seed`.
///
/// Fails when the seed exceeds the 32 byte limit or the owner is not
/// allowed to own seed-derived accounts.
pub fn derive_managed_address(
	owner: &Pubkey,
	seed: &str,
	program_id: &Pubkey,
) -> GreeterResult<Pubkey> {
	Pubkey::create_with_seed(owner, seed, program_id).map_err(|err| {
		GreeterError::AddressDerivation {
			reason: err.to_string(),
		}
	})
}

/// [`derive_managed_address`] with [`MANAGED_ACCOUNT_SEED`].
pub fn managed_address(owner: &Pubkey, program_id: &Pubkey) -> GreeterResult<Pubkey> {
	derive_managed_address(owner, MANAGED_ACCOUNT_SEED, program_id)
}

//! Binary layout of the greeting record stored in the managed account.
//!
//! The program keeps a single counter, serialized as a little-endian `u32`
//! with no discriminator, version tag, or padding:
//!
//! ```text
//! | offset | size | field   |
//! |--------|------|---------|
//! | 0      | 4    | counter |
//! ```

use bytemuck::Pod;
use bytemuck::Zeroable;

use crate::GreeterError;
use crate::GreeterResult;

/// On-chain layout of the counter. A `[u8; 4]` keeps the struct alignment at
/// one so any 4-byte slice can be cast without copying.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(transparent)]
struct RawGreetingAccount {
	counter: [u8; 4],
}

/// Decoded contents of the managed account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GreetingAccount {
	pub counter: u32,
}

impl GreetingAccount {
	/// Number of bytes the account must be allocated with on-chain.
	pub const SIZE: usize = size_of::<RawGreetingAccount>();

	pub const fn new(counter: u32) -> Self {
		Self { counter }
	}

	pub const fn size() -> usize {
		Self::SIZE
	}
}

impl From<u32> for GreetingAccount {
	fn from(counter: u32) -> Self {
		Self::new(counter)
	}
}

impl From<GreetingAccount> for u32 {
	fn from(account: GreetingAccount) -> Self {
		account.counter
	}
}

/// Serialize `account` into its exact on-chain bytes.
pub fn encode(account: &GreetingAccount) -> [u8; GreetingAccount::SIZE] {
	let raw = RawGreetingAccount {
		counter: account.counter.to_le_bytes(),
	};
	bytemuck::cast(raw)
}

/// Deserialize account data. Any length other than
/// [`GreetingAccount::SIZE`] is rejected.
pub fn decode(data: &[u8]) -> GreeterResult<GreetingAccount> {
	let raw = bytemuck::try_from_bytes::<RawGreetingAccount>(data).map_err(|_| {
		GreeterError::MalformedRecord {
			expected: GreetingAccount::SIZE,
			actual: data.len(),
		}
	})?;

	Ok(GreetingAccount::new(u32::from_le_bytes(raw.counter)))
}

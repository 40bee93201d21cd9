//! Loading of local signing identities.
//!
//! Keypair files use the Solana CLI format: a JSON array of 64 bytes, the
//! ed25519 secret key followed by its public key.

use std::path::Path;
use std::str::FromStr;

use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

use crate::GreeterError;
use crate::GreeterResult;

/// Where the program identifier is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
	/// A program keypair file; only its public key is used.
	KeypairFile(std::path::PathBuf),
	/// A base58 program address.
	Address(String),
}

impl ProgramSource {
	pub fn resolve(&self) -> GreeterResult<Pubkey> {
		match self {
			Self::KeypairFile(path) => load_program_id(path),
			Self::Address(address) => {
				Pubkey::from_str(address).map_err(|err| GreeterError::program_id(address, err))
			}
		}
	}
}

/// Parse keypair bytes from the JSON representation.
fn parse_keypair(json: &str) -> Result<Keypair, String> {
	let bytes: Vec<u8> = serde_json::from_str(json).map_err(|err| err.to_string())?;
	Keypair::try_from(bytes.as_slice()).map_err(|err| err.to_string())
}

/// Load the user's wallet keypair.
pub fn load_wallet(path: &Path) -> GreeterResult<Keypair> {
	let json = std::fs::read_to_string(path).map_err(|err| GreeterError::wallet(path, err))?;
	let keypair = parse_keypair(&json).map_err(|reason| GreeterError::wallet(path, reason))?;
	tracing::debug!(path = %path.display(), pubkey = %keypair.pubkey(), "loaded wallet");

	Ok(keypair)
}

/// Load the program identifier from a program keypair file.
pub fn load_program_id(path: &Path) -> GreeterResult<Pubkey> {
	let origin = path.display();
	let json = std::fs::read_to_string(path).map_err(|err| GreeterError::program_id(&origin, err))?;
	let keypair = parse_keypair(&json).map_err(|reason| GreeterError::program_id(&origin, reason))?;

	Ok(keypair.pubkey())
}

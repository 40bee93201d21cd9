use std::path::PathBuf;

use solana_pubkey::Pubkey;

/// Errors produced by the [`Ledger`](crate::Ledger) facade.
///
/// Raw RPC client failures are classified here so the workflow can react to
/// specific causes without inspecting transport details.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
	#[error("RPC request failed: {message}")]
	Rpc { message: String },

	#[error("transaction rejected: {message}")]
	Rejected { message: String },

	/// The system program refused to create an account because the address
	/// already holds one.
	#[error("account already in use")]
	AccountInUse,
}

impl LedgerError {
	pub fn rpc(message: impl Into<String>) -> Self {
		Self::Rpc {
			message: message.into(),
		}
	}

	pub fn rejected(message: impl Into<String>) -> Self {
		Self::Rejected {
			message: message.into(),
		}
	}
}

/// The step of `transaction` that failed to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
	CreateAccount,
	InvokeProgram,
}

impl std::fmt::Display for TransactionStage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::CreateAccount => f.write_str("managed account creation"),
			Self::InvokeProgram => f.write_str("program invocation"),
		}
	}
}

/// Errors surfaced by every `greeter` command.
#[derive(Debug, thiserror::Error)]
pub enum GreeterError {
	#[error("cannot read config file {path}: {source}")]
	ConfigUnreadable {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("cannot read wallet {path}: {reason}")]
	WalletUnreadable { path: PathBuf, reason: String },

	#[error("cannot read program id from {origin}: {reason}")]
	ProgramIdUnreadable { origin: String, reason: String },

	#[error("cannot initialize connection to `{url}`: {reason}")]
	ConnectionInitFailed { url: String, reason: String },

	#[error("invalid airdrop amount `{amount}`")]
	InvalidAmount { amount: String },

	#[error("airdrop rejected: {source}")]
	AirdropRejected { source: LedgerError },

	#[error("cannot find the managed account {address}")]
	AccountNotFound { address: Pubkey },

	#[error("malformed greeting record: expected {expected} bytes, found {actual}")]
	MalformedRecord { expected: usize, actual: usize },

	#[error("{stage} failed: {source}")]
	TransactionFailed {
		stage: TransactionStage,
		source: LedgerError,
	},

	#[error("cannot derive managed account address: {reason}")]
	AddressDerivation { reason: String },

	#[error("managed account {address} is unusable: {reason}")]
	ManagedAccountMismatch { address: Pubkey, reason: String },

	#[error(transparent)]
	Rpc {
		#[from]
		source: LedgerError,
	},
}

impl GreeterError {
	pub fn wallet(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
		Self::WalletUnreadable {
			path: path.into(),
			reason: reason.to_string(),
		}
	}

	pub fn program_id(origin: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
		Self::ProgramIdUnreadable {
			origin: origin.to_string(),
			reason: reason.to_string(),
		}
	}

	pub fn connection(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
		Self::ConnectionInitFailed {
			url: url.into(),
			reason: reason.to_string(),
		}
	}
}

pub type GreeterResult<T> = Result<T, GreeterError>;

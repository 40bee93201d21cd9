//! Facade over the ledger's JSON-RPC endpoint.
//!
//! The workflow only talks to the [`Ledger`] trait, so tests can swap the
//! RPC-backed [`RpcLedger`] for an in-memory implementation.

use solana_account::Account;
use solana_instruction::Instruction;
use solana_instruction::error::InstructionError;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::client_error::Error as ClientError;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_system_interface::error::SystemError;
use solana_transaction::Transaction;
use solana_transaction_error::TransactionError;

use crate::LedgerError;
use crate::Settings;

/// Network operations consumed by the workflow.
///
/// Implementations translate their raw failures into [`LedgerError`] and
/// never retry.
#[allow(async_fn_in_trait)]
pub trait Ledger {
	/// Fetch the account stored at `address`, or `None` when it does not
	/// exist.
	async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;

	/// Ask the faucet to credit `lamports` to `address`.
	async fn request_airdrop(
		&self,
		address: &Pubkey,
		lamports: u64,
	) -> Result<Signature, LedgerError>;

	/// Minimum balance for an account of `size` bytes to be rent exempt.
	async fn minimum_balance_for_rent_exemption(&self, size: usize) -> Result<u64, LedgerError>;

	/// Sign `instructions` as a single transaction paid for by `payer`,
	/// submit it, and wait until it is confirmed.
	async fn submit_and_confirm(
		&self,
		instructions: &[Instruction],
		payer: &Keypair,
	) -> Result<Signature, LedgerError>;
}

/// [`Ledger`] backed by the nonblocking Solana RPC client.
pub struct RpcLedger {
	client: RpcClient,
}

impl RpcLedger {
	pub fn new(settings: &Settings) -> Self {
		let url = settings.json_rpc_url.clone();
		let client = match settings.timeout {
			Some(timeout) => {
				RpcClient::new_with_timeout_and_commitment(url, timeout, settings.commitment)
			}
			None => RpcClient::new_with_commitment(url, settings.commitment),
		};

		Self { client }
	}

	pub fn url(&self) -> String {
		self.client.url()
	}
}

/// Classify a raw client error.
fn classify(err: &ClientError) -> LedgerError {
	match err.get_transaction_error() {
		Some(TransactionError::InstructionError(_, InstructionError::Custom(code)))
			if code == SystemError::AccountAlreadyInUse as u32 =>
		{
			LedgerError::AccountInUse
		}
		Some(tx_err) => LedgerError::rejected(tx_err.to_string()),
		None => LedgerError::rpc(err.to_string()),
	}
}

impl Ledger for RpcLedger {
	async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
		let response = self
			.client
			.get_account_with_commitment(address, self.client.commitment())
			.await
			.map_err(|err| classify(&err))?;
		tracing::debug!(%address, found = response.value.is_some(), "fetched account");

		Ok(response.value)
	}

	async fn request_airdrop(
		&self,
		address: &Pubkey,
		lamports: u64,
	) -> Result<Signature, LedgerError> {
		let signature = self
			.client
			.request_airdrop(address, lamports)
			.await
			.map_err(|err| classify(&err))?;
		tracing::debug!(%address, lamports, %signature, "airdrop requested");

		Ok(signature)
	}

	async fn minimum_balance_for_rent_exemption(&self, size: usize) -> Result<u64, LedgerError> {
		self.client
			.get_minimum_balance_for_rent_exemption(size)
			.await
			.map_err(|err| classify(&err))
	}

	async fn submit_and_confirm(
		&self,
		instructions: &[Instruction],
		payer: &Keypair,
	) -> Result<Signature, LedgerError> {
		let blockhash = self
			.client
			.get_latest_blockhash()
			.await
			.map_err(|err| classify(&err))?;
		let transaction = Transaction::new_signed_with_payer(
			instructions,
			Some(&payer.pubkey()),
			&[payer],
			blockhash,
		);

		let signature = self
			.client
			.send_and_confirm_transaction(&transaction)
			.await
			.map_err(|err| classify(&err))?;
		tracing::debug!(%signature, "transaction confirmed");

		Ok(signature)
	}
}

//! The four user-facing commands, sequenced over a [`Ledger`].
//!
//! Each command derives whatever it needs from the payer and program id it
//! was constructed with. Nothing is cached between calls.

use solana_account::Account;
use solana_instruction::AccountMeta;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_system_interface::instruction as system_instruction;
use tracing::instrument;

use crate::GreeterError;
use crate::GreeterResult;
use crate::GreetingAccount;
use crate::Ledger;
use crate::LedgerError;
use crate::MANAGED_ACCOUNT_SEED;
use crate::TransactionStage;
use crate::managed_address;
use crate::record;
use crate::sol_to_lamports;

/// Metadata of the user's own account as returned by `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
	pub address: Pubkey,
	pub lamports: u64,
	pub owner: Pubkey,
	pub executable: bool,
	pub rent_epoch: u64,
	pub data_len: usize,
}

impl AccountSummary {
	fn new(address: Pubkey, account: &Account) -> Self {
		Self {
			address,
			lamports: account.lamports,
			owner: account.owner,
			executable: account.executable,
			rent_epoch: account.rent_epoch,
			data_len: account.data.len(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirdropReceipt {
	pub recipient: Pubkey,
	pub lamports: u64,
	pub signature: Signature,
}

/// Outcome of the create-if-absent step of `transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCreation {
	Created { signature: Signature, lamports: u64 },
	AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	pub payer: Pubkey,
	pub managed_account: Pubkey,
	pub creation: AccountCreation,
	pub signature: Signature,
}

/// Decoded managed account as returned by `transaction-result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingReport {
	pub owner: Pubkey,
	pub address: Pubkey,
	pub account: GreetingAccount,
}

/// Runs the client commands for one payer against one program.
pub struct Greeter<L> {
	ledger: L,
	payer: Keypair,
	program_id: Pubkey,
}

impl<L: Ledger> Greeter<L> {
	pub fn new(ledger: L, payer: Keypair, program_id: Pubkey) -> Self {
		Self {
			ledger,
			payer,
			program_id,
		}
	}

	pub fn ledger(&self) -> &L {
		&self.ledger
	}

	pub fn payer(&self) -> Pubkey {
		self.payer.pubkey()
	}

	pub fn program_id(&self) -> Pubkey {
		self.program_id
	}

	/// Address of the payer's managed account for the program.
	pub fn managed_address(&self) -> GreeterResult<Pubkey> {
		managed_address(&self.payer.pubkey(), &self.program_id)
	}

	/// Look up the payer's own account. A missing account is `Ok(None)`.
	#[instrument(skip_all, fields(payer = %self.payer.pubkey()))]
	pub async fn info(&self) -> GreeterResult<Option<AccountSummary>> {
		let address = self.payer.pubkey();
		let account = self.ledger.get_account(&address).await?;

		Ok(account.map(|account| AccountSummary::new(address, &account)))
	}

	/// Request `amount` SOL from the faucet for the payer.
	#[instrument(skip_all, fields(payer = %self.payer.pubkey(), amount = %amount))]
	pub async fn airdrop(&self, amount: &str) -> GreeterResult<AirdropReceipt> {
		let lamports = sol_to_lamports(amount)?;
		self.airdrop_lamports(lamports).await
	}

	/// Request exactly `lamports` from the faucet for the payer.
	pub async fn airdrop_lamports(&self, lamports: u64) -> GreeterResult<AirdropReceipt> {
		let recipient = self.payer.pubkey();
		let signature = self
			.ledger
			.request_airdrop(&recipient, lamports)
			.await
			.map_err(|source| GreeterError::AirdropRejected { source })?;
		tracing::info!(%recipient, lamports, %signature, "airdrop requested");

		Ok(AirdropReceipt {
			recipient,
			lamports,
			signature,
		})
	}

	/// Create the managed account when needed, then invoke the program on
	/// it.
	#[instrument(skip_all, fields(payer = %self.payer.pubkey(), program = %self.program_id))]
	pub async fn run_transaction(&self) -> GreeterResult<TransactionReceipt> {
		let managed_account = self.managed_address()?;
		let creation = self.ensure_managed_account(&managed_account).await?;

		let instruction = Instruction::new_with_bytes(
			self.program_id,
			&[],
			vec![AccountMeta::new(managed_account, false)],
		);
		let signature = self
			.ledger
			.submit_and_confirm(&[instruction], &self.payer)
			.await
			.map_err(|source| {
				GreeterError::TransactionFailed {
					stage: TransactionStage::InvokeProgram,
					source,
				}
			})?;
		tracing::info!(%managed_account, %signature, "program invoked");

		Ok(TransactionReceipt {
			payer: self.payer.pubkey(),
			managed_account,
			creation,
			signature,
		})
	}

	/// Create the managed account at `address` unless it already exists.
	///
	/// Another client can create the account between the existence check
	/// and the creation. A failed creation is therefore accepted when the
	/// account turns out to exist afterwards.
	pub async fn ensure_managed_account(&self, address: &Pubkey) -> GreeterResult<AccountCreation> {
		if let Some(account) = self.ledger.get_account(address).await? {
			self.check_managed_account(address, &account)?;
			tracing::debug!(%address, "managed account already exists");
			return Ok(AccountCreation::AlreadyExists);
		}

		let lamports = self
			.ledger
			.minimum_balance_for_rent_exemption(GreetingAccount::SIZE)
			.await?;
		let payer = self.payer.pubkey();
		let instruction = system_instruction::create_account_with_seed(
			&payer,
			address,
			&payer,
			MANAGED_ACCOUNT_SEED,
			lamports,
			GreetingAccount::SIZE as u64,
			&self.program_id,
		);

		match self
			.ledger
			.submit_and_confirm(&[instruction], &self.payer)
			.await
		{
			Ok(signature) => {
				tracing::info!(%address, lamports, %signature, "managed account created");
				Ok(AccountCreation::Created {
					signature,
					lamports,
				})
			}
			Err(source) => self.recover_from_failed_creation(address, source).await,
		}
	}

	async fn recover_from_failed_creation(
		&self,
		address: &Pubkey,
		source: LedgerError,
	) -> GreeterResult<AccountCreation> {
		let failed = |source| {
			GreeterError::TransactionFailed {
				stage: TransactionStage::CreateAccount,
				source,
			}
		};

		match self.ledger.get_account(address).await {
			Ok(Some(account)) => {
				self.check_managed_account(address, &account)?;
				tracing::warn!(%address, %source, "managed account was created concurrently");
				Ok(AccountCreation::AlreadyExists)
			}
			Ok(None) => Err(failed(source)),
			Err(recheck) => {
				tracing::warn!(%address, %recheck, "existence re-check failed");
				Err(failed(source))
			}
		}
	}

	fn check_managed_account(&self, address: &Pubkey, account: &Account) -> GreeterResult<()> {
		let mismatch = |reason: String| {
			GreeterError::ManagedAccountMismatch {
				address: *address,
				reason,
			}
		};

		if account.owner != self.program_id {
			return Err(mismatch(format!(
				"owned by {} instead of {}",
				account.owner, self.program_id
			)));
		}
		if account.data.len() < GreetingAccount::SIZE {
			return Err(mismatch(format!(
				"holds {} bytes, needs {}",
				account.data.len(),
				GreetingAccount::SIZE
			)));
		}

		Ok(())
	}

	/// Read and decode the payer's managed account.
	#[instrument(skip_all, fields(payer = %self.payer.pubkey(), program = %self.program_id))]
	pub async fn transaction_result(&self) -> GreeterResult<GreetingReport> {
		let address = self.managed_address()?;
		let account = self
			.ledger
			.get_account(&address)
			.await?
			.ok_or(GreeterError::AccountNotFound { address })?;

		Ok(GreetingReport {
			owner: self.payer.pubkey(),
			address,
			account: record::decode(&account.data)?,
		})
	}
}

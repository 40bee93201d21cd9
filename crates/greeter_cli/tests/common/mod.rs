//! In-memory [`Ledger`] used by the workflow tests.
//!
//! It understands exactly two programs: the system program's
//! `CreateAccountWithSeed` and the greeting program, which increments the
//! counter of the first account it is given.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;

use greeter_cli::GreetingAccount;
use greeter_cli::Ledger;
use greeter_cli::LedgerError;
use greeter_cli::record;
use solana_account::Account;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;

/// Bincode index of `SystemInstruction::CreateAccountWithSeed`.
const CREATE_ACCOUNT_WITH_SEED: u32 = 3;

/// Rent-exempt minimum using the default rent parameters.
pub fn rent_exempt_minimum(size: usize) -> u64 {
	(128 + size as u64) * 3_480 * 2
}

#[derive(Default)]
struct State {
	accounts: HashMap<Pubkey, Account>,
	transactions: Vec<Vec<Instruction>>,
	airdrops: Vec<(Pubkey, u64)>,
	calls: usize,
	reject_airdrops: bool,
	concurrent_creation: bool,
	reject_creation: bool,
	reject_invocation: bool,
}

pub struct InMemoryLedger {
	program_id: Pubkey,
	state: Mutex<State>,
}

struct CreateWithSeed {
	base: Pubkey,
	seed: String,
	lamports: u64,
	space: u64,
	owner: Pubkey,
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
	let bytes: [u8; 8] = data[offset..offset + 8]
		.try_into()
		.unwrap_or_else(|_| panic!("truncated u64 at {offset}"));
	u64::from_le_bytes(bytes)
}

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
	let bytes: [u8; 32] = data[offset..offset + 32]
		.try_into()
		.unwrap_or_else(|_| panic!("truncated pubkey at {offset}"));
	Pubkey::new_from_array(bytes)
}

fn decode_create_with_seed(data: &[u8]) -> CreateWithSeed {
	let tag = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
	assert_eq!(tag, CREATE_ACCOUNT_WITH_SEED, "unexpected system instruction");

	let base = read_pubkey(data, 4);
	let seed_len = read_u64(data, 36) as usize;
	let seed_end = 44 + seed_len;
	let seed = String::from_utf8(data[44..seed_end].to_vec())
		.unwrap_or_else(|err| panic!("seed is not utf-8: {err}"));

	CreateWithSeed {
		base,
		seed,
		lamports: read_u64(data, seed_end),
		space: read_u64(data, seed_end + 8),
		owner: read_pubkey(data, seed_end + 16),
	}
}

impl InMemoryLedger {
	pub fn new(program_id: Pubkey) -> Self {
		Self {
			program_id,
			state: Mutex::new(State::default()),
		}
	}

	fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
		let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
		f(&mut state)
	}

	pub fn insert_account(&self, address: Pubkey, account: Account) {
		self.with_state(|state| state.accounts.insert(address, account));
	}

	pub fn account(&self, address: &Pubkey) -> Option<Account> {
		self.with_state(|state| state.accounts.get(address).cloned())
	}

	pub fn transactions(&self) -> Vec<Vec<Instruction>> {
		self.with_state(|state| state.transactions.clone())
	}

	pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
		self.with_state(|state| state.airdrops.clone())
	}

	/// Number of `Ledger` calls served so far.
	pub fn calls(&self) -> usize {
		self.with_state(|state| state.calls)
	}

	pub fn reject_airdrops(&self) {
		self.with_state(|state| state.reject_airdrops = true);
	}

	/// Make the next account creation lose a race: another client creates
	/// the account first, so ours fails with `AccountInUse`.
	pub fn simulate_concurrent_creation(&self) {
		self.with_state(|state| state.concurrent_creation = true);
	}

	pub fn reject_creation(&self) {
		self.with_state(|state| state.reject_creation = true);
	}

	pub fn reject_invocation(&self) {
		self.with_state(|state| state.reject_invocation = true);
	}

	fn create_account_with_seed(
		&self,
		state: &mut State,
		instruction: &Instruction,
	) -> Result<(), LedgerError> {
		let args = decode_create_with_seed(&instruction.data);
		let address = instruction.accounts[1].pubkey;
		let expected = Pubkey::create_with_seed(&args.base, &args.seed, &args.owner)
			.map_err(|err| LedgerError::rejected(err.to_string()))?;
		if address != expected {
			return Err(LedgerError::rejected("address does not match seed"));
		}

		if state.concurrent_creation {
			state.concurrent_creation = false;
			state.accounts.insert(
				address,
				Account::new(args.lamports, args.space as usize, &args.owner),
			);
		}
		if state.accounts.contains_key(&address) {
			return Err(LedgerError::AccountInUse);
		}
		if state.reject_creation {
			return Err(LedgerError::rejected("insufficient funds for rent"));
		}

		state.accounts.insert(
			address,
			Account::new(args.lamports, args.space as usize, &args.owner),
		);
		Ok(())
	}

	fn greet(&self, state: &mut State, instruction: &Instruction) -> Result<(), LedgerError> {
		if state.reject_invocation {
			return Err(LedgerError::rejected("program failed to complete"));
		}

		let meta = instruction
			.accounts
			.first()
			.ok_or_else(|| LedgerError::rejected("not enough account keys"))?;
		if !meta.is_writable {
			return Err(LedgerError::rejected("greeted account must be writable"));
		}

		let account = state
			.accounts
			.get_mut(&meta.pubkey)
			.ok_or_else(|| LedgerError::rejected("account not found"))?;
		if account.owner != self.program_id {
			return Err(LedgerError::rejected("incorrect program id"));
		}

		let mut greeting = record::decode(&account.data)
			.map_err(|err| LedgerError::rejected(err.to_string()))?;
		greeting.counter += 1;
		account.data = record::encode(&greeting).to_vec();
		Ok(())
	}
}

impl Ledger for InMemoryLedger {
	async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
		self.with_state(|state| {
			state.calls += 1;
			Ok(state.accounts.get(address).cloned())
		})
	}

	async fn request_airdrop(
		&self,
		address: &Pubkey,
		lamports: u64,
	) -> Result<Signature, LedgerError> {
		self.with_state(|state| {
			state.calls += 1;
			if state.reject_airdrops {
				return Err(LedgerError::rpc("airdrop request limit reached"));
			}
			state.airdrops.push((*address, lamports));
			state
				.accounts
				.entry(*address)
				.or_insert_with(|| Account::new(0, 0, &Pubkey::default()))
				.lamports += lamports;
			Ok(Signature::from([state.airdrops.len() as u8; 64]))
		})
	}

	async fn minimum_balance_for_rent_exemption(&self, size: usize) -> Result<u64, LedgerError> {
		self.with_state(|state| state.calls += 1);
		Ok(rent_exempt_minimum(size))
	}

	async fn submit_and_confirm(
		&self,
		instructions: &[Instruction],
		payer: &Keypair,
	) -> Result<Signature, LedgerError> {
		let system_program = solana_system_interface::program::id();
		self.with_state(|state| {
			state.calls += 1;
			state.transactions.push(instructions.to_vec());
			for instruction in instructions {
				if instruction.program_id == system_program {
					assert_eq!(instruction.accounts[0].pubkey, payer.pubkey());
					self.create_account_with_seed(state, instruction)?;
				} else if instruction.program_id == self.program_id {
					self.greet(state, instruction)?;
				} else {
					return Err(LedgerError::rejected("unknown program"));
				}
			}
			Ok(Signature::from([state.transactions.len() as u8 + 100; 64]))
		})
	}
}

/// A program-owned greeting account holding `counter`.
pub fn greeting_account(program_id: &Pubkey, counter: u32) -> Account {
	let mut account = Account::new(
		rent_exempt_minimum(GreetingAccount::SIZE),
		GreetingAccount::SIZE,
		program_id,
	);
	account.data = record::encode(&GreetingAccount::new(counter)).to_vec();
	account
}

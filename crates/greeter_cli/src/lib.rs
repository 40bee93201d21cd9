//! Client for the greeting program.
//!
//! Every user keeps one managed account per program. Its address is derived
//! from the user's address, the seed [`MANAGED_ACCOUNT_SEED`], and the
//! program id. `transaction` creates the account on first use and then
//! invokes the program, which increments the counter stored inside it.
//! `transaction-result` reads that counter back.

pub mod address;
pub mod amount;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod record;
pub mod view;
pub mod workflow;

pub use crate::address::MANAGED_ACCOUNT_SEED;
pub use crate::address::derive_managed_address;
pub use crate::address::managed_address;
pub use crate::amount::sol_to_lamports;
pub use crate::config::Overrides;
pub use crate::config::Settings;
pub use crate::error::GreeterError;
pub use crate::error::GreeterResult;
pub use crate::error::LedgerError;
pub use crate::error::TransactionStage;
pub use crate::identity::ProgramSource;
pub use crate::identity::load_wallet;
pub use crate::ledger::Ledger;
pub use crate::ledger::RpcLedger;
pub use crate::record::GreetingAccount;
pub use crate::workflow::AccountCreation;
pub use crate::workflow::AccountSummary;
pub use crate::workflow::AirdropReceipt;
pub use crate::workflow::Greeter;
pub use crate::workflow::GreetingReport;
pub use crate::workflow::TransactionReceipt;

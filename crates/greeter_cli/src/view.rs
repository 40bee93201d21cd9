//! Terminal output for each command.

use std::fmt;

use solana_native_token::LAMPORTS_PER_SOL;

use crate::AccountCreation;
use crate::AccountSummary;
use crate::AirdropReceipt;
use crate::GreetingReport;
use crate::TransactionReceipt;

/// Render a lamport amount as SOL without losing precision.
fn sol(lamports: u64) -> String {
	let whole = lamports / LAMPORTS_PER_SOL;
	let fraction = lamports % LAMPORTS_PER_SOL;
	if fraction == 0 {
		return whole.to_string();
	}

	let digits = format!("{fraction:09}");
	format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Output of `info`.
pub struct InfoView<'a>(pub Option<&'a AccountSummary>);

impl fmt::Display for InfoView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Some(summary) = self.0 else {
			return f.write_str("account not found");
		};

		writeln!(f, "Address: {}", summary.address)?;
		writeln!(
			f,
			"Balance: {} lamports ({} SOL)",
			summary.lamports,
			sol(summary.lamports)
		)?;
		writeln!(f, "Owner: {}", summary.owner)?;
		writeln!(f, "Executable: {}", summary.executable)?;
		writeln!(f, "Data: {} bytes", summary.data_len)?;
		write!(f, "Rent epoch: {}", summary.rent_epoch)
	}
}

/// Output of `airdrop`.
pub struct AirdropView<'a>(pub &'a AirdropReceipt);

impl fmt::Display for AirdropView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let receipt = self.0;
		writeln!(
			f,
			"Airdropped {} SOL ({} lamports) to {}",
			sol(receipt.lamports),
			receipt.lamports,
			receipt.recipient
		)?;
		write!(f, "Signature: {}", receipt.signature)
	}
}

/// Output of `transaction`.
pub struct TransactionView<'a>(pub &'a TransactionReceipt);

impl fmt::Display for TransactionView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let receipt = self.0;
		match &receipt.creation {
			AccountCreation::Created {
				signature,
				lamports,
			} => {
				writeln!(
					f,
					"Created managed account {} with {} lamports ({})",
					receipt.managed_account, lamports, signature
				)?;
			}
			AccountCreation::AlreadyExists => {
				writeln!(f, "Using managed account {}", receipt.managed_account)?;
			}
		}
		write!(
			f,
			"Transaction on {} has been completed ({})",
			receipt.payer, receipt.signature
		)
	}
}

/// Output of `transaction-result`.
pub struct GreetingView<'a>(pub &'a GreetingReport);

impl fmt::Display for GreetingView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let report = self.0;
		write!(
			f,
			"{} has been greeted {} time(s)",
			report.address, report.account.counter
		)
	}
}

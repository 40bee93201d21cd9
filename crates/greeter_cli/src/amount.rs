//! Conversion of decimal SOL amounts into lamports.

use solana_native_token::LAMPORTS_PER_SOL;

use crate::GreeterError;
use crate::GreeterResult;

/// Number of fractional digits a lamport can represent.
const LAMPORT_DECIMALS: usize = 9;

/// Parse a decimal SOL quantity such as `1.5` or `.25` into lamports.
///
/// The conversion is exact. Signs, exponents, more than nine fractional
/// digits, zero, and values that overflow `u64` are rejected with
/// [`GreeterError::InvalidAmount`].
pub fn sol_to_lamports(amount: &str) -> GreeterResult<u64> {
	let invalid = || {
		GreeterError::InvalidAmount {
			amount: amount.to_string(),
		}
	};

	let trimmed = amount.trim();
	let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

	let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
	if (whole.is_empty() && fraction.is_empty())
		|| !all_digits(whole)
		|| !all_digits(fraction)
		|| fraction.len() > LAMPORT_DECIMALS
	{
		return Err(invalid());
	}

	let whole_lamports = if whole.is_empty() {
		0
	} else {
		whole
			.parse::<u64>()
			.ok()
			.and_then(|sol| sol.checked_mul(LAMPORTS_PER_SOL))
			.ok_or_else(invalid)?
	};
	let fraction_lamports = if fraction.is_empty() {
		0
	} else {
		let padded = format!("{fraction:0<LAMPORT_DECIMALS$}");
		padded.parse::<u64>().map_err(|_| invalid())?
	};

	match whole_lamports.checked_add(fraction_lamports) {
		Some(0) | None => Err(invalid()),
		Some(lamports) => Ok(lamports),
	}
}

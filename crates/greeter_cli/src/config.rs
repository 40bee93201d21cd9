//! Connection settings.
//!
//! Settings are layered: values given on the command line win over the
//! Solana CLI config file, which wins over built-in defaults.

use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use solana_cli_config::Config;
use solana_commitment_config::CommitmentConfig;
use typed_builder::TypedBuilder;

use crate::GreeterError;
use crate::GreeterResult;

/// Commitment used when neither the flags nor the config file choose one.
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Settings {
	#[builder(setter(into))]
	pub json_rpc_url: String,
	#[builder(default = CommitmentConfig::confirmed())]
	pub commitment: CommitmentConfig,
	#[builder(default)]
	pub timeout: Option<Duration>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub config_path: Option<PathBuf>,
	pub json_rpc_url: Option<String>,
	pub commitment: Option<String>,
	pub timeout: Option<Duration>,
}

/// Path of the Solana CLI config file, `~/.config/solana/cli/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
	(*solana_cli_config::CONFIG_FILE).clone().map(PathBuf::from)
}

/// Read the YAML config file at `path`.
pub fn load_config_file(path: &Path) -> GreeterResult<Config> {
	let Some(path_str) = path.to_str() else {
		return Err(GreeterError::ConfigUnreadable {
			path: path.to_path_buf(),
			source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is not UTF-8"),
		});
	};

	Config::load(path_str).map_err(|source| {
		GreeterError::ConfigUnreadable {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn parse_commitment(url: &str, value: &str) -> GreeterResult<CommitmentConfig> {
	CommitmentConfig::from_str(value)
		.map_err(|_| GreeterError::connection(url, format!("unknown commitment level `{value}`")))
}

fn validate_url(url: &str) -> GreeterResult<()> {
	if url.starts_with("http://") || url.starts_with("https://") {
		Ok(())
	} else {
		Err(GreeterError::connection(
			url,
			"expected an http:// or https:// endpoint",
		))
	}
}

/// Resolve the final settings.
///
/// The config file is only read when no RPC URL was given on the command
/// line.
pub fn resolve(overrides: &Overrides) -> GreeterResult<Settings> {
	let (url, file_commitment) = match &overrides.json_rpc_url {
		Some(url) => (url.clone(), None),
		None => {
			let path = match &overrides.config_path {
				Some(path) => path.clone(),
				None => {
					default_config_path().ok_or_else(|| {
						GreeterError::ConfigUnreadable {
							path: PathBuf::from("~/.config/solana/cli/config.yml"),
							source: std::io::Error::new(
								std::io::ErrorKind::NotFound,
								"home directory is unknown",
							),
						}
					})?
				}
			};
			let config = load_config_file(&path)?;
			tracing::debug!(path = %path.display(), url = %config.json_rpc_url, "loaded config");
			let commitment = Some(config.commitment).filter(|value| !value.is_empty());
			(config.json_rpc_url, commitment)
		}
	};

	validate_url(&url)?;

	let commitment_name = overrides
		.commitment
		.as_deref()
		.or(file_commitment.as_deref())
		.unwrap_or(DEFAULT_COMMITMENT);
	let commitment = parse_commitment(&url, commitment_name)?;

	Ok(Settings::builder()
		.json_rpc_url(url)
		.commitment(commitment)
		.timeout(overrides.timeout)
		.build())
}

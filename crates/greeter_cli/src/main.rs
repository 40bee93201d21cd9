use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use greeter_cli::Greeter;
use greeter_cli::GreeterResult;
use greeter_cli::Overrides;
use greeter_cli::ProgramSource;
use greeter_cli::RpcLedger;
use greeter_cli::view::AirdropView;
use greeter_cli::view::GreetingView;
use greeter_cli::view::InfoView;
use greeter_cli::view::TransactionView;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
	name = "greeter",
	version,
	about = "Greet an on-chain program through a seed-derived managed account"
)]
struct Cli {
	#[command(flatten)]
	connection: ConnectionArgs,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
	/// Solana CLI config file. Defaults to `~/.config/solana/cli/config.yml`.
	#[arg(short = 'C', long, global = true)]
	config: Option<PathBuf>,

	/// RPC endpoint. When given, the config file is not read.
	#[arg(short, long, global = true)]
	url: Option<String>,

	/// Commitment level: processed, confirmed, or finalized.
	#[arg(long, global = true)]
	commitment: Option<String>,

	/// RPC request timeout in seconds.
	#[arg(long, global = true, value_name = "SECS")]
	timeout: Option<u64>,

	/// Program keypair file. Only its public key is used.
	#[arg(long, global = true, default_value = "program/program.json")]
	program: PathBuf,

	/// Program address in base58. Takes precedence over `--program`.
	#[arg(long, global = true)]
	program_id: Option<String>,
}

impl ConnectionArgs {
	fn overrides(&self) -> Overrides {
		Overrides {
			config_path: self.config.clone(),
			json_rpc_url: self.url.clone(),
			commitment: self.commitment.clone(),
			timeout: self.timeout.map(Duration::from_secs),
		}
	}

	fn program_source(&self) -> ProgramSource {
		match &self.program_id {
			Some(address) => ProgramSource::Address(address.clone()),
			None => ProgramSource::KeypairFile(self.program.clone()),
		}
	}
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Show balance and metadata of the wallet's own account.
	Info {
		/// Wallet keypair file.
		wallet: PathBuf,
	},
	/// Request test funds for the wallet.
	Airdrop {
		/// Wallet keypair file.
		wallet: PathBuf,

		/// Amount of SOL, for example `1.5`.
		amount: String,
	},
	/// Create the managed account if needed and invoke the program on it.
	Transaction {
		/// Wallet keypair file.
		wallet: PathBuf,
	},
	/// Print how many times the managed account has been greeted.
	TransactionResult {
		/// Wallet keypair file.
		wallet: PathBuf,
	},
}

impl Commands {
	fn wallet(&self) -> &Path {
		match self {
			Self::Info { wallet }
			| Self::Airdrop { wallet, .. }
			| Self::Transaction { wallet }
			| Self::TransactionResult { wallet } => wallet.as_path(),
		}
	}
}

/// Load local inputs first so a bad wallet or program file fails before
/// anything touches the network.
fn connect(cli: &Cli) -> GreeterResult<Greeter<RpcLedger>> {
	let payer = greeter_cli::load_wallet(cli.command.wallet())?;
	let program_id = cli.connection.program_source().resolve()?;
	let settings = greeter_cli::config::resolve(&cli.connection.overrides())?;
	tracing::debug!(url = %settings.json_rpc_url, commitment = ?settings.commitment, "connecting");

	Ok(Greeter::new(RpcLedger::new(&settings), payer, program_id))
}

async fn run(cli: Cli) -> GreeterResult<String> {
	let greeter = connect(&cli)?;

	let output = match &cli.command {
		Commands::Info { .. } => {
			let summary = greeter.info().await?;
			InfoView(summary.as_ref()).to_string()
		}
		Commands::Airdrop { amount, .. } => {
			let receipt = greeter.airdrop(amount).await?;
			AirdropView(&receipt).to_string()
		}
		Commands::Transaction { .. } => {
			let receipt = greeter.run_transaction().await?;
			TransactionView(&receipt).to_string()
		}
		Commands::TransactionResult { .. } => {
			let report = greeter.transaction_result().await?;
			GreetingView(&report).to_string()
		}
	};

	Ok(output)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();

	match run(cli).await {
		Ok(output) => println!("{output}"),
		Err(err) => {
			eprintln!("Error: {err}");
			std::process::exit(1);
		}
	}
}

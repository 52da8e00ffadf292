use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod state;

/// Command-line harness for the BEKD biometric wallet protocol.
#[derive(Parser)]
#[command(name = "bekd-cli")]
#[command(about = "Enroll, retrieve, and authenticate against a simulated BEKD CA consortium")]
#[command(version)]
struct Cli {
    /// Path to the CA consortium state file shared across invocations.
    #[arg(long, global = true, default_value = ".bekd_ca_state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stand up a fresh simulated CA consortium (run once per demo wallet).
    Init {
        /// Number of biometric features per enrollment.
        #[arg(long, default_value = "128")]
        d: usize,

        /// Minimum matching tags required to recover the key.
        #[arg(long, default_value = "4")]
        tbio: usize,

        /// CA threshold (quorum is t + 1).
        #[arg(long, default_value = "1")]
        t: usize,

        /// Number of CA nodes in the consortium.
        #[arg(long, default_value = "3")]
        n: usize,

        /// Tag length in bytes.
        #[arg(long, default_value = "32")]
        lambda_bytes: usize,

        /// Chain id bound into the authentication digest.
        #[arg(long, default_value = "1")]
        chain_id: u64,
    },

    /// Enroll a (simulated) biometric and write a token to disk.
    Enroll {
        /// RNG seed for the simulated biometric; omit for OS randomness.
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the issued token.
        #[arg(long, default_value = ".token_store.json")]
        out: PathBuf,

        /// Embed the raw biometric in the token so a later `retrieve
        /// --simulate` can present a noisy copy of it. Test-harness only;
        /// a real token never carries this.
        #[arg(long)]
        store_biometric: bool,
    },

    /// Recover the key bound to a token from a presented biometric.
    Retrieve {
        /// Token to retrieve against.
        #[arg(long, default_value = ".token_store.json")]
        token: PathBuf,

        /// RNG seed for the simulated noisy presentation.
        #[arg(long)]
        seed: Option<u64>,

        /// Per-feature Gaussian noise standard deviation.
        #[arg(long, default_value = "0.1")]
        noise_std: f64,

        /// Fraction of features presented as exact matches.
        #[arg(long, default_value = "0.95")]
        match_ratio: f64,
    },

    /// Run the authentication ceremony with a previously recovered key.
    Authenticate {
        /// Token whose id (rho) is being spent.
        #[arg(long, default_value = ".token_store.json")]
        token: PathBuf,

        /// The key recovered by `retrieve`, as 64 hex chars.
        #[arg(long)]
        key: String,

        /// Free-text description of the operation being authorized;
        /// hashed to produce op_hash.
        #[arg(long)]
        op: String,

        /// The smart-wallet address bound into the EIP-712 domain, as 40
        /// hex chars. Distinct from the address derived from the
        /// recovered key.
        #[arg(long, default_value = "0000000000000000000000000000000000000000")]
        wallet_address: String,
    },

    /// Print a token's public fields.
    ShowToken {
        #[arg(long, default_value = ".token_store.json")]
        token: PathBuf,
    },

    /// Print the consortium's parameters and public key.
    Status,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { d, tbio, t, n, lambda_bytes, chain_id } => {
            commands::init(&cli.state, d, tbio, t, n, lambda_bytes, chain_id)
        }
        Commands::Enroll { seed, out, store_biometric } => {
            commands::enroll(&cli.state, &out, seed, store_biometric)
        }
        Commands::Retrieve { token, seed, noise_std, match_ratio } => {
            commands::retrieve(&cli.state, &token, seed, noise_std, match_ratio)
        }
        Commands::Authenticate { token, key, op, wallet_address } => {
            commands::authenticate(&cli.state, &token, &key, &op, &wallet_address)
        }
        Commands::ShowToken { token } => commands::show_token(&token),
        Commands::Status => commands::status(&cli.state),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

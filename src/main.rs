//! `ourchain` command-line wallet.
//!
//! ```text
//! wallet.toml + $OURCHAIN_PRIVATE_KEY
//!     → WalletContext
//!     → TransactionPipeline (utxos | send | deploy | call | query)
//!     → JSON on stdout, logs on stderr
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use ourchain_client::config::load_config;
use ourchain_client::identity::{canonical_string, fingerprint, AidCert};
use ourchain_client::observability::logging::init_logging;
use ourchain_client::transaction::ContractRequest;
use ourchain_client::{Amount, TransactionPipeline, WalletContext};

#[derive(Parser)]
#[command(name = "ourchain")]
#[command(about = "Wallet client for an OurChain ledger node", long_about = None)]
struct Cli {
    /// Wallet configuration file.
    #[arg(short, long, default_value = "wallet.toml")]
    config: PathBuf,

    /// Override the ledger endpoint from the configuration.
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List spendable outputs of the wallet address
    Utxos,
    /// Transfer funds to another address
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        fee: Option<Amount>,
    },
    /// Deploy a contract from a source file
    Deploy {
        #[arg(long)]
        code: PathBuf,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
        #[arg(long)]
        fee: Option<Amount>,
    },
    /// Call a deployed contract
    Call {
        #[arg(long)]
        address: String,
        #[arg(long)]
        code: Option<PathBuf>,
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
        #[arg(long)]
        fee: Option<Amount>,
    },
    /// Read-only contract query
    Query {
        #[arg(long)]
        address: String,
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
    },
    /// Print the canonical fingerprint of a certificate JSON file
    Fingerprint {
        #[arg(long)]
        cert: PathBuf,
        /// Also print the string that was hashed
        #[arg(long)]
        canonical: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Fingerprint { cert, canonical } = &cli.command {
        init_logging("warn");
        let cert: AidCert = serde_json::from_str(&std::fs::read_to_string(cert)?)?;
        if *canonical {
            eprintln!("{}", canonical_string(&cert));
        }
        println!("{}", fingerprint(&cert, None));
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;
    if let Some(endpoint) = cli.endpoint {
        config.ledger.endpoint = endpoint;
    }
    init_logging(&config.observability.log_level);

    let context = WalletContext::from_config(&config)?;
    let pipeline = TransactionPipeline::new(context);

    match cli.command {
        Commands::Utxos => {
            print_json(&pipeline.list_spendable().await?)?;
        }
        Commands::Send { to, amount, fee } => {
            let txid = pipeline.transfer(&to, amount, fee).await?;
            print_json(&serde_json::json!({ "txid": txid }))?;
        }
        Commands::Deploy {
            code,
            address,
            args,
            fee,
        } => {
            let contract = ContractRequest::deploy(std::fs::read_to_string(code)?)
                .address(address)
                .args(args)
                .build()?;
            print_json(&pipeline.deploy(contract, fee).await?)?;
        }
        Commands::Call {
            address,
            code,
            args,
            fee,
        } => {
            let mut builder = ContractRequest::call(address).args(args);
            if let Some(path) = code {
                builder = builder.code(std::fs::read_to_string(path)?);
            }
            let txid = pipeline.call(builder.build()?, fee).await?;
            print_json(&serde_json::json!({ "txid": txid }))?;
        }
        Commands::Query { address, args } => {
            print_json(&pipeline.contract_message(&address, &args).await?)?;
        }
        // Offline; handled before the configuration is loaded.
        Commands::Fingerprint { .. } => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

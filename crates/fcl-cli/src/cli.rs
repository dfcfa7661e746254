use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fcl",
    about = "FarmChain Ledger - register and query farmers, consumers, products and transactions",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding the ledger log
    #[arg(long, global = true, default_value = ".fcl")]
    pub data_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register, show, or list farmers
    Farmer(FarmerArgs),
    /// Register, show, or list consumers
    Consumer(ConsumerArgs),
    /// Register, show, or list products
    Product(ProductArgs),
    /// Record, show, or list transactions
    Transaction(TransactionArgs),
    /// Rewrite the ledger log keeping only the latest record per key
    Compact(CompactArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct FarmerArgs {
    #[command(subcommand)]
    pub action: FarmerAction,
}

#[derive(Subcommand)]
pub enum FarmerAction {
    Register {
        id: String,
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        location: Option<String>,
    },
    Get { id: String },
    List,
}

#[derive(Args)]
pub struct ConsumerArgs {
    #[command(subcommand)]
    pub action: ConsumerAction,
}

#[derive(Subcommand)]
pub enum ConsumerAction {
    Register { id: String, name: String, location: String },
    Get { id: String },
    List,
}

#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub action: ProductAction,
}

#[derive(Subcommand)]
pub enum ProductAction {
    Register {
        id: String,
        farmer_id: String,
        name: String,
        price: String,
    },
    Get { id: String },
    List,
}

#[derive(Args)]
pub struct TransactionArgs {
    #[command(subcommand)]
    pub action: TransactionAction,
}

#[derive(Subcommand)]
pub enum TransactionAction {
    Record {
        id: String,
        farmer_id: String,
        consumer_id: String,
        amount: String,
        /// Defaults to the current UTC time (RFC 3339)
        #[arg(long)]
        timestamp: Option<String>,
    },
    Get { id: String },
    List,
}

#[derive(Args)]
pub struct CompactArgs {}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `bind_addr` from the config file
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML server configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

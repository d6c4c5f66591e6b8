//! 命令行参数定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// OTC deal client: propose, accept and cancel token swaps on the OTC ledger.
#[derive(Parser, Debug)]
#[command(name = "otc-dealer", version, propagate_version = true)]
pub struct OtcDealerCli {
    /// Path to the configuration file (TOML).
    #[arg(long, short = 'c', env = "OTC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Wallet or node JSON-RPC endpoint; overrides the configuration.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the wallet is connected to the ledger's network.
    CheckNetwork,
    /// Propose a new deal.
    Propose(ProposeArgs),
    /// Accept an existing deal.
    Accept(IndexArgs),
    /// Cancel (remove) an outstanding deal.
    Cancel(IndexArgs),
}

#[derive(Args, Debug)]
pub struct ProposeArgs {
    /// Token provided by the proposer.
    #[arg(long)]
    pub token_offered: Option<String>,
    /// Token received in exchange.
    #[arg(long)]
    pub token_requested: Option<String>,
    /// Amount of the offered token, in base units.
    #[arg(long)]
    pub amount_offered: Option<String>,
    /// Amount of the requested token, in base units.
    #[arg(long)]
    pub amount_requested: Option<String>,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Deal index.
    #[arg(allow_hyphen_values = true)]
    pub index: String,
}

//! otc-dealer 主入口

mod cli;

use std::{process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::Parser;
use otc_dealer::{
    config::Config,
    domain::{DealActionKind, DealPayload},
    infrastructure::logging,
    service::TerminalNotifier,
    AppState,
};

use cli::{Commands, OtcDealerCli};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = OtcDealerCli::parse();

    let mut config = Config::from_env_and_file(cli.config.as_ref())?;
    if let Some(rpc_url) = cli.rpc_url {
        config.provider.rpc_url = Some(rpc_url);
    }
    config.validate()?;

    let _log_guard = logging::init_logging(&config.logging)?;

    tracing::info!(
        contract = %config.ledger.contract_address,
        chain_id = config.ledger.required_chain_id,
        "Starting otc-dealer"
    );

    let state = AppState::new(Arc::new(config), Arc::new(TerminalNotifier::new()))?;
    let orchestrator = state.orchestrator.clone();

    let status = match orchestrator.init().await {
        Ok(status) => status,
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            return Ok(ExitCode::from(1));
        }
    };

    let (kind, payload) = match cli.command {
        Commands::CheckNetwork => {
            println!("{}", serde_json::to_string_pretty(&status)?);
            let code = if status.network_warning.is_some() { 1 } else { 0 };
            return Ok(ExitCode::from(code));
        }
        Commands::Propose(args) => (
            DealActionKind::Propose,
            DealPayload::Proposal {
                token_offered: args.token_offered,
                token_requested: args.token_requested,
                amount_offered: args.amount_offered,
                amount_requested: args.amount_requested,
            },
        ),
        Commands::Accept(args) => (DealActionKind::Accept, DealPayload::index(args.index)),
        Commands::Cancel(args) => (DealActionKind::Cancel, DealPayload::index(args.index)),
    };

    let outcome = orchestrator.execute_deal_action(kind, payload).await;
    orchestrator.teardown().await;

    match outcome {
        Ok(receipt) => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            Ok(ExitCode::from(1))
        }
    }
}

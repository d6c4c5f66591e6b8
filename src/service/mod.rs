pub mod account_session;
pub mod interface_manifest;
pub mod ledger_client;
pub mod network_guard;
pub mod notifier;
pub mod orchestrator;
pub mod transaction_monitor;
pub mod wallet_provider;

pub use account_session::AccountSession;
pub use interface_manifest::InterfaceManifest;
pub use ledger_client::LedgerClient;
pub use network_guard::NetworkGuard;
pub use notifier::{LogNotifier, Notifier, TerminalNotifier};
pub use orchestrator::{DealOrchestrator, SessionStatus};
pub use transaction_monitor::TransactionMonitor;
pub use wallet_provider::{ContractCall, TransactionReceipt, WalletProvider};

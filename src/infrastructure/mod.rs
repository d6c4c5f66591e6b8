pub mod local_signer;
pub mod logging;
pub mod rpc_validator;
pub mod terminal_prompt;
pub mod wallet_bridge;

pub use local_signer::LocalSignerProvider;
pub use wallet_bridge::WalletBridgeProvider;

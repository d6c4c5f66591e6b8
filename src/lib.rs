//! otc-dealer - 链上 OTC 交易客户端
//!
//! 通过用户钱包向 OTC 合约提交、接受和撤销代币互换交易，
//! 负责网络校验、账户授权、交易提交和确认等待。

pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{DealError, OrchestrationError, ProviderError, Stage};

pub mod prelude {
    pub use crate::{
        app_state::AppState,
        config::Config,
        domain::{DealActionKind, DealPayload, Receipt, TransactionHandle, TransactionStatus},
        error::{DealError, OrchestrationError, Stage},
        service::{DealOrchestrator, WalletProvider},
    };
}

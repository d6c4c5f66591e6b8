//! 钱包提供方边界
//!
//! 执行环境需要提供四种能力：请求账户授权、读取当前网络、
//! 对账本地址提交具名调用、查询已提交调用的最终状态。
//! 所有组件都通过构造函数显式注入 `Arc<dyn WalletProvider>`。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// 对账本合约的一次具名调用（已按接口清单编码）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    /// 合约地址
    pub to: String,
    /// 函数名（仅用于日志和句柄）
    pub function: String,
    /// 0x 前缀的 calldata
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    /// 1 = success, 0 = reverted
    pub status: Option<u64>,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// 请求账户授权，可能弹出用户确认
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// 当前网络的 chain id
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// 提交变更调用，进入待处理池后立即返回交易哈希
    async fn send_transaction(
        &self,
        from: &str,
        call: &ContractCall,
    ) -> Result<String, ProviderError>;

    /// 查询交易回执，尚未打包时返回 None
    async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;

    /// 最新区块高度（用于计算确认数）
    async fn block_number(&self) -> Result<u64, ProviderError>;
}

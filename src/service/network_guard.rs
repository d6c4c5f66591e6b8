//! 网络校验：当前 chain id 必须等于账本所在网络

use std::sync::Arc;

use crate::{
    domain::NetworkIdentity,
    error::{DealError, ProviderError},
    service::wallet_provider::WalletProvider,
};

pub struct NetworkGuard {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl NetworkGuard {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    /// 每次调用都重新读取网络，不缓存
    pub async fn verify_network(&self, expected: u64) -> Result<NetworkIdentity, DealError> {
        let provider = self.provider.as_ref().ok_or(DealError::NoWalletAvailable)?;

        // 配置了钱包但连不上，等同于没有钱包
        let chain_id = provider.chain_id().await.map_err(|e| match e {
            ProviderError::Transport(reason) => {
                tracing::warn!(error = %reason, "Wallet provider unreachable");
                DealError::NoWalletAvailable
            }
            other => other.into(),
        })?;
        let current = NetworkIdentity { chain_id };

        if current.chain_id != expected {
            tracing::warn!(
                expected,
                actual = current.chain_id,
                "Connected to incorrect network"
            );
            return Err(DealError::NetworkMismatch {
                expected,
                actual: current.chain_id,
            });
        }

        tracing::debug!(chain_id = current.chain_id, "Network verified");
        Ok(current)
    }
}

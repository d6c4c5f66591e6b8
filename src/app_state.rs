use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::{Config, ProviderMode},
    infrastructure::{LocalSignerProvider, WalletBridgeProvider},
    service::{DealOrchestrator, InterfaceManifest, Notifier, WalletProvider},
};

/// 应用状态
/// 一个会话所需的全部组件
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<DealOrchestrator>,
}

impl AppState {
    /// 按配置装配钱包提供方、接口清单和编排器
    pub fn new(config: Arc<Config>, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        let manifest = InterfaceManifest::load(
            config.ledger.manifest_path.as_deref(),
            config.ledger.functions.clone(),
        )?;

        let provider = build_provider(&config)?;
        if provider.is_none() {
            tracing::warn!("No wallet provider configured (set OTC_RPC_URL)");
        }

        let orchestrator = Arc::new(DealOrchestrator::new(
            &config, provider, manifest, notifier,
        ));

        Ok(Self {
            config,
            orchestrator,
        })
    }
}

/// 没有配置 RPC 地址时返回 None（环境中没有钱包）
pub fn build_provider(config: &Config) -> anyhow::Result<Option<Arc<dyn WalletProvider>>> {
    let Some(rpc_url) = config.provider.rpc_url.as_deref() else {
        return Ok(None);
    };

    let provider: Arc<dyn WalletProvider> = match config.provider.mode {
        ProviderMode::WalletBridge => {
            tracing::info!(rpc = %rpc_url, "Using wallet bridge provider");
            Arc::new(WalletBridgeProvider::new(rpc_url))
        }
        ProviderMode::LocalSigner => {
            let key = config
                .provider
                .private_key
                .as_deref()
                .context("local_signer mode requires OTC_PRIVATE_KEY")?;
            Arc::new(LocalSignerProvider::new(
                rpc_url,
                key,
                config.ledger.required_chain_id,
                config.provider.auto_approve,
            )?)
        }
    };

    Ok(Some(provider))
}

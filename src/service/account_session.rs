//! 账户授权会话

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    domain::Account,
    error::{DealError, ProviderError},
    service::wallet_provider::WalletProvider,
};

pub struct AccountSession {
    provider: Option<Arc<dyn WalletProvider>>,
    account: Mutex<Option<Account>>,
}

impl AccountSession {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            provider,
            account: Mutex::new(None),
        }
    }

    /// 请求账户授权
    ///
    /// 没有钱包时立即失败，不弹出任何提示。每次调用都向钱包请求账户列表，
    /// 已授权的会话是否再次提示由钱包决定。
    pub async fn acquire_account(&self) -> Result<Account, DealError> {
        let provider = self.provider.as_ref().ok_or(DealError::NoWalletAvailable)?;

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(ProviderError::UserRejected) => {
                tracing::info!("User declined account authorization");
                self.revoke().await;
                return Err(DealError::UserDeclinedAuthorization);
            }
            Err(ProviderError::Transport(reason)) => {
                tracing::warn!(error = %reason, "Wallet provider unreachable");
                return Err(DealError::NoWalletAvailable);
            }
            Err(e) => return Err(e.into()),
        };

        // 钱包返回空列表等同于未授权
        let Some(address) = accounts.into_iter().next() else {
            tracing::info!("Wallet returned no authorized accounts");
            self.revoke().await;
            return Err(DealError::UserDeclinedAuthorization);
        };

        let account = Account::new(address);
        let mut current = self.account.lock().await;
        if current.as_ref().map(|a| &a.address) != Some(&account.address) {
            tracing::info!(address = %account.address, "Account authorized");
        }
        *current = Some(account.clone());

        Ok(account)
    }

    /// 当前已授权账户（不触发提示）
    pub async fn current(&self) -> Option<Account> {
        self.account.lock().await.clone()
    }

    /// 销毁会话中的账户
    pub async fn revoke(&self) {
        if let Some(account) = self.account.lock().await.take() {
            tracing::info!(address = %account.address, "Account session ended");
        }
    }
}

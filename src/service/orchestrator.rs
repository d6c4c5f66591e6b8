//! 交易编排器
//!
//! 每个用户操作的入口：校验输入 → 获取授权账户 → 提交账本调用 → 等待确认。
//! 任一步失败立即返回，并标注失败阶段。同一会话同时只允许一个操作在途。

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::{
    config::Config,
    domain::{DealAction, DealActionKind, DealPayload, NetworkIdentity, Receipt},
    error::{DealError, OrchestrationError, Stage},
    service::{
        account_session::AccountSession, interface_manifest::InterfaceManifest,
        ledger_client::LedgerClient, network_guard::NetworkGuard, notifier::Notifier,
        transaction_monitor::TransactionMonitor, wallet_provider::WalletProvider,
    },
};

/// `init()` 的结果：网络不匹配只警告，不阻止初始化
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub expected_chain_id: u64,
    pub network: Option<NetworkIdentity>,
    pub network_warning: Option<String>,
}

/// 需要钱包的组件
struct Connected {
    ledger: LedgerClient,
    monitor: TransactionMonitor,
}

pub struct DealOrchestrator {
    required_chain_id: u64,
    strict_network_check: bool,
    network_guard: NetworkGuard,
    session: AccountSession,
    connected: Option<Connected>,
    notifier: Arc<dyn Notifier>,
    in_flight: Mutex<()>,
}

impl DealOrchestrator {
    /// `provider` 为 None 表示环境中没有钱包，所有操作都会以 `NoWalletAvailable` 失败
    pub fn new(
        config: &Config,
        provider: Option<Arc<dyn WalletProvider>>,
        manifest: InterfaceManifest,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let connected = provider.as_ref().map(|provider| Connected {
            ledger: LedgerClient::new(
                provider.clone(),
                config.ledger.contract_address.clone(),
                manifest,
            ),
            monitor: TransactionMonitor::new(provider.clone(), &config.monitor),
        });

        Self {
            required_chain_id: config.ledger.required_chain_id,
            strict_network_check: config.ledger.strict_network_check,
            network_guard: NetworkGuard::new(provider.clone()),
            session: AccountSession::new(provider),
            connected,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &AccountSession {
        &self.session
    }

    /// 会话开始：校验一次网络
    ///
    /// 没有钱包是致命错误；网络不匹配通过通知器阻塞提示用户，但不会中断初始化，
    /// 之后的操作仍可执行，由提交阶段各自失败。
    pub async fn init(&self) -> Result<SessionStatus, OrchestrationError> {
        let mut status = SessionStatus {
            expected_chain_id: self.required_chain_id,
            network: None,
            network_warning: None,
        };

        match self.network_guard.verify_network(self.required_chain_id).await {
            Ok(network) => {
                tracing::info!(chain_id = network.chain_id, "Session initialized");
                status.network = Some(network);
            }
            Err(DealError::NetworkMismatch { expected, actual }) => {
                let message = format!(
                    "Incorrect network: connected to chain {}, please switch to chain {}",
                    actual, expected
                );
                self.notifier.warn(&message).await;
                status.network = Some(NetworkIdentity { chain_id: actual });
                status.network_warning = Some(message);
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "Session cannot start");
                return Err(OrchestrationError::new(Stage::Network, e));
            }
            Err(e) => {
                // 读取网络失败同样只提示
                let message = format!("Unable to verify network: {}", e);
                self.notifier.warn(&message).await;
                status.network_warning = Some(message);
            }
        }

        Ok(status)
    }

    /// 会话结束：撤销账户授权
    pub async fn teardown(&self) {
        self.session.revoke().await;
        tracing::info!("Session torn down");
    }

    /// 执行一个用户操作
    pub async fn execute_deal_action(
        &self,
        kind: DealActionKind,
        payload: DealPayload,
    ) -> Result<Receipt, OrchestrationError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            tracing::warn!(kind = %kind, "Rejected concurrent deal action");
            OrchestrationError::new(Stage::Concurrency, DealError::ConcurrentOperationInProgress)
        })?;

        let action_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("deal_action", %action_id, kind = %kind);

        let result = self.run(kind, &payload).instrument(span.clone()).await;
        let _entered = span.enter();
        match &result {
            Ok(receipt) => tracing::info!(
                submission_id = %receipt.handle.submission_id,
                status = %receipt.handle.status,
                "Deal action completed"
            ),
            Err(e) => tracing::warn!(stage = %e.stage, code = e.code(), error = %e.error, "Deal action failed"),
        }
        result
    }

    async fn run(
        &self,
        kind: DealActionKind,
        payload: &DealPayload,
    ) -> Result<Receipt, OrchestrationError> {
        // 1. 本地校验，不触网
        let action = DealAction::validate(kind, payload)
            .map_err(|e| OrchestrationError::new(Stage::Validation, e))?;

        // 2. 账户授权
        let account = self
            .session
            .acquire_account()
            .await
            .map_err(|e| OrchestrationError::new(Stage::Authorization, e))?;

        if self.strict_network_check {
            self.network_guard
                .verify_network(self.required_chain_id)
                .await
                .map_err(|e| OrchestrationError::new(Stage::Network, e))?;
        }

        let connected = self.connected.as_ref().ok_or_else(|| {
            OrchestrationError::new(Stage::Authorization, DealError::NoWalletAvailable)
        })?;

        // 3. 提交
        let submitted = match &action {
            DealAction::Propose(proposal) => connected.ledger.propose_deal(&account, proposal).await,
            DealAction::Accept(reference) => connected.ledger.accept_deal(&account, *reference).await,
            DealAction::Cancel(reference) => connected.ledger.cancel_deal(&account, *reference).await,
        }
        .map_err(|e| OrchestrationError::new(Stage::Submission, e))?;

        // 4. 等待最终结果
        let handle = connected
            .monitor
            .await_finality(submitted)
            .await
            .map_err(|e| OrchestrationError::new(Stage::Finality, e))?;

        Ok(Receipt {
            kind,
            account: account.address,
            handle,
        })
    }
}

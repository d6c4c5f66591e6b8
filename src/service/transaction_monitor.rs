// 交易确认监控
// 轮询交易回执直到账本给出最终结果；只报告结果，从不重新提交

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    config::MonitorConfig,
    domain::{TransactionHandle, TransactionStatus},
    error::DealError,
    service::wallet_provider::WalletProvider,
};

pub struct TransactionMonitor {
    provider: Arc<dyn WalletProvider>,
    poll_interval: Duration,
    finality_timeout: Option<Duration>,
    required_confirmations: u64,
}

/// 回执轮询得到的最终结果
struct Settlement {
    status: TransactionStatus,
    block_number: Option<u64>,
}

impl TransactionMonitor {
    pub fn new(provider: Arc<dyn WalletProvider>, config: &MonitorConfig) -> Self {
        Self {
            provider,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            finality_timeout: config.finality_timeout_secs.map(Duration::from_secs),
            required_confirmations: config.required_confirmations.max(1),
        }
    }

    pub fn with_finality_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.finality_timeout = timeout;
        self
    }

    /// 等待交易到达最终状态
    ///
    /// 成功返回 Confirmed 句柄；回滚返回 `Reverted`；配置了超时且超时返回
    /// `FinalityTimeout`（结果未知，调用方应重新查询账本，而不是重新提交）。
    pub async fn await_finality(
        &self,
        mut handle: TransactionHandle,
    ) -> Result<TransactionHandle, DealError> {
        match handle.status {
            TransactionStatus::Pending => {}
            TransactionStatus::Confirmed => return Ok(handle),
            TransactionStatus::Reverted => return Err(DealError::Reverted { handle }),
            TransactionStatus::Rejected => return Err(DealError::SigningRejected { handle }),
        }

        let settlement = match self.finality_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.poll_until_settled(&handle.submission_id))
                    .await
                {
                    Ok(settlement) => settlement,
                    Err(_) => {
                        tracing::warn!(
                            submission_id = %handle.submission_id,
                            timeout_secs = limit.as_secs(),
                            "Finality not reached before timeout"
                        );
                        return Err(DealError::FinalityTimeout {
                            submission_id: handle.submission_id,
                        });
                    }
                }
            }
            None => self.poll_until_settled(&handle.submission_id).await,
        };

        handle.transition(settlement.status);
        handle.block_number = settlement.block_number;

        match handle.status {
            TransactionStatus::Confirmed => {
                tracing::info!(
                    submission_id = %handle.submission_id,
                    block_number = ?handle.block_number,
                    "Transaction confirmed"
                );
                Ok(handle)
            }
            _ => {
                tracing::warn!(
                    submission_id = %handle.submission_id,
                    block_number = ?handle.block_number,
                    "Transaction reverted on-chain"
                );
                Err(DealError::Reverted { handle })
            }
        }
    }

    async fn poll_until_settled(&self, tx_hash: &str) -> Settlement {
        loop {
            match self.check_once(tx_hash).await {
                Ok(Some(settlement)) => return settlement,
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction not yet final");
                }
                Err(e) => {
                    // 查询失败不影响交易本身，继续轮询
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Failed to fetch transaction receipt");
                }
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn check_once(&self, tx_hash: &str) -> Result<Option<Settlement>, DealError> {
        let Some(receipt) = self.provider.transaction_receipt(tx_hash).await? else {
            return Ok(None);
        };

        // 没有 status 字段的旧式回执视为成功
        let status = TransactionStatus::from_receipt_status(receipt.status.unwrap_or(1));

        if status == TransactionStatus::Confirmed && self.required_confirmations > 1 {
            // 没有区块号就无法计算确认数，按已确认处理
            let Some(mined_at) = receipt.block_number else {
                tracing::warn!(tx_hash = %tx_hash, "Receipt without block number, skipping confirmation count");
                return Ok(Some(Settlement {
                    status,
                    block_number: None,
                }));
            };
            let head = self.provider.block_number().await?;
            let confirmations = head.saturating_sub(mined_at) + 1;
            if confirmations < self.required_confirmations {
                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations,
                    required = self.required_confirmations,
                    "Waiting for more confirmations"
                );
                return Ok(None);
            }
        }

        Ok(Some(Settlement {
            status,
            block_number: receipt.block_number,
        }))
    }
}

//! 交易句柄

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransactionStatus;

/// 一次变更请求的跟踪句柄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    /// 交易哈希；提交前被拒绝时为本地生成的标识
    pub submission_id: String,
    /// 调用的账本函数名
    pub function: String,
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionHandle {
    /// 已进入待处理池的交易
    pub fn pending(submission_id: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
            function: function.into(),
            status: TransactionStatus::Pending,
            block_number: None,
            submitted_at: Utc::now(),
        }
    }

    /// 签名方在提交前拒绝的交易（从未进入待处理池）
    pub fn rejected(function: impl Into<String>) -> Self {
        let mut handle = Self::pending(format!("unsubmitted-{}", uuid::Uuid::new_v4()), function);
        handle.transition(TransactionStatus::Rejected);
        handle
    }

    /// 状态转换；非法转换被忽略并返回 false
    pub fn transition(&mut self, target: TransactionStatus) -> bool {
        if !self.status.can_transition_to(&target) {
            tracing::warn!(
                submission_id = %self.submission_id,
                from = %self.status,
                to = %target,
                "Ignoring illegal transaction status transition"
            );
            return false;
        }
        self.status = target;
        true
    }
}

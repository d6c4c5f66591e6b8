//! 交易状态定义
//! 提交到账本的每一笔变更请求都使用这个状态机

use std::fmt;

use serde::{Deserialize, Serialize};

/// 交易状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// 已进入待处理池，等待账本确认
    Pending,

    /// 账本已确认执行成功
    Confirmed,

    /// 账本执行失败（revert）
    Reverted,

    /// 签名方在提交前拒绝
    Rejected,
}

impl TransactionStatus {
    /// 是否为最终状态（不可再转换）
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// 验证状态转换合法性
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use TransactionStatus::*;

        match (self, target) {
            (Pending, Confirmed) | (Pending, Reverted) | (Pending, Rejected) => true,

            // 最终状态不可转换
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
            Self::Rejected => "rejected",
        }
    }

    /// 由交易回执的 status 字段得出最终状态（1 = 成功，0 = 失败）
    pub fn from_receipt_status(status: u64) -> Self {
        if status == 1 {
            Self::Confirmed
        } else {
            Self::Reverted
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

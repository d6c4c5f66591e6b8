//! 统一错误定义
//!
//! 所有错误都带有稳定的错误码（用于日志和CLI输出），并由编排器附加发生阶段。

use std::fmt;

use serde::Serialize;

use crate::domain::TransactionHandle;

/// 钱包/节点边界错误（EIP-1193 语义）
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// 用户在钱包中拒绝了请求（EIP-1193 code 4001）
    #[error("user rejected the request")]
    UserRejected,

    /// JSON-RPC 返回的错误
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// 网络层失败（连接、超时、HTTP状态）
    #[error("transport error: {0}")]
    Transport(String),

    /// 响应格式不符合预期
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// EIP-1193 用户拒绝错误码
pub const EIP1193_USER_REJECTED: i64 = 4001;

impl ProviderError {
    /// 从 JSON-RPC 错误对象构造，4001 归类为用户拒绝
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == EIP1193_USER_REJECTED {
            Self::UserRejected
        } else {
            Self::Rpc {
                code,
                message: message.into(),
            }
        }
    }

    /// 节点返回的执行回滚（revert）
    pub fn is_execution_revert(&self) -> bool {
        match self {
            Self::Rpc { code, message } => {
                *code == 3 || message.to_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

/// 业务错误分类
#[derive(Debug, Clone, thiserror::Error)]
pub enum DealError {
    #[error("no wallet provider available")]
    NoWalletAvailable,

    #[error("incorrect network: expected chain {expected}, connected to {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("user declined account authorization")]
    UserDeclinedAuthorization,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("signer declined transaction {}", .handle.submission_id)]
    SigningRejected { handle: TransactionHandle },

    #[error("transaction {} reverted", .handle.submission_id)]
    Reverted { handle: TransactionHandle },

    #[error("finality not reached for {submission_id}; outcome unknown, re-query the ledger")]
    FinalityTimeout { submission_id: String },

    #[error("another deal action is already in progress")]
    ConcurrentOperationInProgress,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl DealError {
    /// 稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoWalletAvailable => "no_wallet_available",
            Self::NetworkMismatch { .. } => "network_mismatch",
            Self::UserDeclinedAuthorization => "user_declined_authorization",
            Self::Validation(_) => "validation_error",
            Self::Submission(_) => "submission_error",
            Self::SigningRejected { .. } => "signing_rejected",
            Self::Reverted { .. } => "transaction_reverted",
            Self::FinalityTimeout { .. } => "finality_timeout",
            Self::ConcurrentOperationInProgress => "concurrent_operation_in_progress",
            Self::Provider(_) => "provider_error",
        }
    }

    /// 是否终止整个会话（其余错误只取消当前操作）
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoWalletAvailable)
    }
}

/// 错误发生的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Concurrency,
    Validation,
    Authorization,
    Network,
    Submission,
    Finality,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Concurrency => "concurrency",
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::Network => "network",
            Self::Submission => "submission",
            Self::Finality => "finality",
        };
        f.write_str(s)
    }
}

/// 编排器返回的错误：业务错误 + 阶段
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{stage}] {error}")]
pub struct OrchestrationError {
    pub stage: Stage,
    #[source]
    pub error: DealError,
}

impl OrchestrationError {
    pub fn new(stage: Stage, error: DealError) -> Self {
        Self { stage, error }
    }

    pub fn code(&self) -> &'static str {
        self.error.code()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    stage: Stage,
    message: String,
}

impl OrchestrationError {
    /// CLI 输出用的 JSON 错误体
    pub fn to_json(&self) -> serde_json::Value {
        let body = ErrorBody {
            code: self.code(),
            stage: self.stage,
            message: self.error.to_string(),
        };
        serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_4001_is_user_rejection() {
        assert!(matches!(
            ProviderError::from_rpc(4001, "User rejected the request."),
            ProviderError::UserRejected
        ));
        assert!(matches!(
            ProviderError::from_rpc(-32000, "insufficient funds"),
            ProviderError::Rpc { code: -32000, .. }
        ));
    }

    #[test]
    fn test_execution_revert_detection() {
        let err = ProviderError::from_rpc(-32000, "execution reverted: deal not found");
        assert!(err.is_execution_revert());
        let err = ProviderError::from_rpc(3, "execution reverted");
        assert!(err.is_execution_revert());
        assert!(!ProviderError::Transport("timeout".into()).is_execution_revert());
    }

    #[test]
    fn test_orchestration_error_json() {
        let err = OrchestrationError::new(
            Stage::Validation,
            DealError::Validation("index must be a non-negative integer".into()),
        );
        let json = err.to_json();
        assert_eq!(json["code"], "validation_error");
        assert_eq!(json["stage"], "validation");
        assert_eq!(err.to_string(), "[validation] invalid input: index must be a non-negative integer");
    }

    #[test]
    fn test_only_missing_wallet_is_fatal() {
        assert!(DealError::NoWalletAvailable.is_fatal());
        assert!(!DealError::UserDeclinedAuthorization.is_fatal());
        assert!(!DealError::NetworkMismatch {
            expected: 1,
            actual: 2
        }
        .is_fatal());
    }
}

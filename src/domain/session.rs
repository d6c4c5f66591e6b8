//! 会话领域模型：授权账户与网络快照

use serde::{Deserialize, Serialize};

/// 已授权的用户账户
///
/// 只由 `AccountSession` 创建和销毁。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub session_active: bool,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            session_active: true,
        }
    }
}

/// 当前网络快照（每次校验重新读取，不跨调用缓存）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub chain_id: u64,
}

//! OTC 交易（deal）输入模型
//!
//! 用户输入先以 `DealPayload` 原样收集，提交时一次性校验为
//! `DealProposal` / `DealReference`。这里只校验形状（字段齐全、索引为非负整数），
//! 代币地址和金额的合法性由账本合约判定。

use serde::{Deserialize, Serialize};

use super::TransactionHandle;
use crate::error::DealError;

/// 三种用户操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealActionKind {
    Propose,
    Accept,
    Cancel,
}

impl std::fmt::Display for DealActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Propose => "propose",
            Self::Accept => "accept",
            Self::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// 未校验的原始输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealPayload {
    Proposal {
        token_offered: Option<String>,
        token_requested: Option<String>,
        amount_offered: Option<String>,
        amount_requested: Option<String>,
    },
    Index {
        index: String,
    },
}

impl DealPayload {
    pub fn proposal(
        token_offered: impl Into<String>,
        token_requested: impl Into<String>,
        amount_offered: impl Into<String>,
        amount_requested: impl Into<String>,
    ) -> Self {
        Self::Proposal {
            token_offered: Some(token_offered.into()),
            token_requested: Some(token_requested.into()),
            amount_offered: Some(amount_offered.into()),
            amount_requested: Some(amount_requested.into()),
        }
    }

    pub fn index(index: impl Into<String>) -> Self {
        Self::Index {
            index: index.into(),
        }
    }
}

/// 新建交易的提议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealProposal {
    pub token_offered: String,
    pub token_requested: String,
    pub amount_offered: String,
    pub amount_requested: String,
}

impl DealProposal {
    /// 四个字段必须全部存在且非空
    pub fn from_fields(
        token_offered: Option<&str>,
        token_requested: Option<&str>,
        amount_offered: Option<&str>,
        amount_requested: Option<&str>,
    ) -> Result<Self, DealError> {
        Ok(Self {
            token_offered: required("token_offered", token_offered)?,
            token_requested: required("token_requested", token_requested)?,
            amount_offered: required("amount_offered", amount_offered)?,
            amount_requested: required("amount_requested", amount_requested)?,
        })
    }

    /// 按账本接口声明的顺序排列的参数
    pub fn positional_args(&self) -> [&str; 4] {
        [
            self.token_offered.as_str(),
            self.token_requested.as_str(),
            self.amount_offered.as_str(),
            self.amount_requested.as_str(),
        ]
    }
}

fn required(name: &str, value: Option<&str>) -> Result<String, DealError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DealError::Validation(format!("{} is required", name))),
    }
}

/// 已存在交易的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealReference {
    pub index: u64,
}

impl DealReference {
    /// 只接受十进制数字（不允许符号、小数点、空白以外的字符）
    pub fn parse(raw: &str) -> Result<Self, DealError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DealError::Validation(format!(
                "deal index must be a non-negative integer, got {:?}",
                raw
            )));
        }
        let index = trimmed.parse::<u64>().map_err(|_| {
            DealError::Validation(format!("deal index out of range: {}", trimmed))
        })?;
        Ok(Self { index })
    }
}

/// 校验后的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealAction {
    Propose(DealProposal),
    Accept(DealReference),
    Cancel(DealReference),
}

impl DealAction {
    /// 将原始输入校验为具体操作；失败时不会产生任何网络调用
    pub fn validate(kind: DealActionKind, payload: &DealPayload) -> Result<Self, DealError> {
        match (kind, payload) {
            (
                DealActionKind::Propose,
                DealPayload::Proposal {
                    token_offered,
                    token_requested,
                    amount_offered,
                    amount_requested,
                },
            ) => DealProposal::from_fields(
                token_offered.as_deref(),
                token_requested.as_deref(),
                amount_offered.as_deref(),
                amount_requested.as_deref(),
            )
            .map(Self::Propose),
            (DealActionKind::Accept, DealPayload::Index { index }) => {
                DealReference::parse(index).map(Self::Accept)
            }
            (DealActionKind::Cancel, DealPayload::Index { index }) => {
                DealReference::parse(index).map(Self::Cancel)
            }
            (kind, _) => Err(DealError::Validation(format!(
                "payload does not match {} action",
                kind
            ))),
        }
    }

    pub fn kind(&self) -> DealActionKind {
        match self {
            Self::Propose(_) => DealActionKind::Propose,
            Self::Accept(_) => DealActionKind::Accept,
            Self::Cancel(_) => DealActionKind::Cancel,
        }
    }
}

/// 成功结果
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub kind: DealActionKind,
    pub account: String,
    pub handle: TransactionHandle,
}

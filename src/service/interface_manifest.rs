//! 账本接口清单
//!
//! 从 ABI（纯数组，或带 `abi` 字段的编译产物 JSON）中查找三个入口函数，
//! 并按声明顺序对位置参数做 ABI 编码。地址和金额不做业务校验，
//! 只有无法编码的值会在本地失败。

use std::{path::Path, str::FromStr};

use anyhow::{Context, Result};
use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Function, ParamType, Token,
    },
    types::{Address, U256},
};

use crate::{config::LedgerFunctions, domain::DealActionKind, error::DealError};

/// 已部署 OTC 合约的接口
pub const BUILTIN_MANIFEST: &str = r#"[
  {
    "type": "function",
    "name": "createDeal",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "token0", "type": "address" },
      { "name": "token1", "type": "address" },
      { "name": "amount0", "type": "uint256" },
      { "name": "amount1", "type": "uint256" }
    ],
    "outputs": []
  },
  {
    "type": "function",
    "name": "removeDeal",
    "stateMutability": "nonpayable",
    "inputs": [{ "name": "index", "type": "uint256" }],
    "outputs": []
  },
  {
    "type": "function",
    "name": "acceptDeal",
    "stateMutability": "nonpayable",
    "inputs": [{ "name": "index", "type": "uint256" }],
    "outputs": []
  }
]"#;

#[derive(Debug, Clone)]
pub struct InterfaceManifest {
    abi: Abi,
    functions: LedgerFunctions,
}

impl InterfaceManifest {
    pub fn builtin(functions: LedgerFunctions) -> Result<Self> {
        Self::from_json(BUILTIN_MANIFEST, functions)
    }

    /// 有路径时读取文件，否则使用内置清单
    pub fn load(path: Option<&Path>, functions: LedgerFunctions) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read interface manifest: {:?}", path))?;
                Self::from_json(&content, functions)
                    .with_context(|| format!("Invalid interface manifest: {:?}", path))
            }
            None => Self::builtin(functions),
        }
    }

    pub fn from_json(json: &str, functions: LedgerFunctions) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Manifest is not valid JSON")?;

        // 编译产物（hardhat/truffle）把 ABI 放在 abi 字段
        let abi_value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("abi") => {
                map.remove("abi").unwrap_or_default()
            }
            other => other,
        };

        let abi: Abi = serde_json::from_value(abi_value).context("Failed to parse ABI")?;
        let manifest = Self { abi, functions };
        manifest.check()?;
        Ok(manifest)
    }

    fn check(&self) -> Result<()> {
        for kind in [
            DealActionKind::Propose,
            DealActionKind::Accept,
            DealActionKind::Cancel,
        ] {
            let expected = expected_arity(kind);
            let function = self.function(kind)?;
            if function.inputs.len() != expected {
                anyhow::bail!(
                    "{} must take {} arguments, manifest declares {}",
                    function.name,
                    expected,
                    function.inputs.len()
                );
            }
        }
        Ok(())
    }

    pub fn function_name(&self, kind: DealActionKind) -> &str {
        match kind {
            DealActionKind::Propose => &self.functions.propose,
            DealActionKind::Accept => &self.functions.accept,
            DealActionKind::Cancel => &self.functions.cancel,
        }
    }

    fn function(&self, kind: DealActionKind) -> Result<&Function> {
        let name = self.function_name(kind);
        self.abi
            .function(name)
            .with_context(|| format!("Manifest does not declare function {}", name))
    }

    /// 按接口声明顺序编码调用，返回 0x 前缀的 calldata
    pub fn encode_call(&self, kind: DealActionKind, args: &[&str]) -> Result<String, DealError> {
        let function = self
            .function(kind)
            .map_err(|e| DealError::Submission(e.to_string()))?;

        if args.len() != function.inputs.len() {
            return Err(DealError::Submission(format!(
                "{} expects {} arguments, got {}",
                function.name,
                function.inputs.len(),
                args.len()
            )));
        }

        let tokens = function
            .inputs
            .iter()
            .zip(args)
            .map(|(param, value)| {
                tokenize(&param.kind, value).map_err(|e| {
                    DealError::Submission(format!(
                        "{}: cannot encode {} as {}: {}",
                        function.name, param.name, param.kind, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = function
            .encode_input(&tokens)
            .map_err(|e| DealError::Submission(e.to_string()))?;

        Ok(format!("0x{}", hex::encode(data)))
    }
}

fn expected_arity(kind: DealActionKind) -> usize {
    match kind {
        DealActionKind::Propose => 4,
        DealActionKind::Accept | DealActionKind::Cancel => 1,
    }
}

fn tokenize(kind: &ParamType, value: &str) -> Result<Token, String> {
    match kind {
        ParamType::Address => Address::from_str(value)
            .map(Token::Address)
            .map_err(|e| e.to_string()),
        ParamType::Uint(_) => U256::from_dec_str(value)
            .map(Token::Uint)
            .map_err(|e| format!("{:?}", e)),
        other => LenientTokenizer::tokenize(other, value).map_err(|e| e.to_string()),
    }
}

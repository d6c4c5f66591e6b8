// 外部钱包 JSON-RPC 桥接
// 钱包（如 Frame）在本地以 HTTP 暴露 EIP-1193 接口，私钥和用户确认都由钱包负责

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;

use crate::{
    error::ProviderError,
    infrastructure::rpc_validator,
    service::wallet_provider::{ContractCall, TransactionReceipt, WalletProvider},
};

/// 只读请求的超时；需要用户确认的请求不设超时
const READ_TIMEOUT_SECS: u64 = 30;

pub struct WalletBridgeProvider {
    http_client: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl WalletBridgeProvider {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client: client,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// 内部方法：发送 JSON-RPC 请求并取出 result
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, ProviderError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let mut request = self
            .http_client
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "RPC request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        tracing::trace!(method, "wallet bridge call completed");
        rpc_validator::rpc_result(json)
    }

    async fn read(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        self.call(method, params, Some(Duration::from_secs(READ_TIMEOUT_SECS)))
            .await
    }
}

fn as_str<'a>(value: &'a serde_json::Value, what: &str) -> Result<&'a str, ProviderError> {
    value
        .as_str()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("{} is not a string", what)))
}

#[async_trait]
impl WalletProvider for WalletBridgeProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let result = self.call("eth_requestAccounts", json!([]), None).await?;
        let accounts = result
            .as_array()
            .ok_or_else(|| ProviderError::InvalidResponse("accounts is not an array".into()))?;

        accounts
            .iter()
            .map(|a| as_str(a, "account").and_then(rpc_validator::validate_address))
            .collect()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let result = self.read("eth_chainId", json!([])).await?;
        rpc_validator::parse_quantity(as_str(&result, "chainId")?)
    }

    async fn send_transaction(
        &self,
        from: &str,
        call: &ContractCall,
    ) -> Result<String, ProviderError> {
        let tx = json!({
            "from": from,
            "to": call.to,
            "data": call.data,
        });

        // 钱包会弹出签名确认，不设超时
        let result = self.call("eth_sendTransaction", json!([tx]), None).await?;
        rpc_validator::validate_tx_hash(as_str(&result, "transaction hash")?)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let result = self
            .read("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let quantity = |field: &str| -> Result<Option<u64>, ProviderError> {
            match result.get(field).and_then(|v| v.as_str()) {
                Some(v) => rpc_validator::parse_quantity(v).map(Some),
                None => Ok(None),
            }
        };

        Ok(Some(TransactionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: quantity("blockNumber")?,
            status: quantity("status")?,
        }))
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        let result = self.read("eth_blockNumber", json!([])).await?;
        rpc_validator::parse_quantity(as_str(&result, "blockNumber")?)
    }
}

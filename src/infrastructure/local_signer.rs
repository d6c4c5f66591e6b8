// 本地私钥签名提供方
// 使用 ethers-rs SignerMiddleware 连接 HTTP 节点；授权和签名确认在终端完成

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, MiddlewareError, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, TransactionRequest, H256},
};

use crate::{
    error::ProviderError,
    infrastructure::terminal_prompt::{self, PromptLock},
    service::wallet_provider::{ContractCall, TransactionReceipt, WalletProvider},
};

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct LocalSignerProvider {
    client: SignerClient,
    prompt_lock: PromptLock,
    auto_approve: bool,
}

impl LocalSignerProvider {
    /// `chain_id` 用于 EIP-155 签名；节点处于其他网络时提交会被拒绝
    pub fn new(rpc_url: &str, private_key: &str, chain_id: u64, auto_approve: bool) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(rpc_url).context("Failed to create Ethereum provider")?;

        let wallet = LocalWallet::from_str(private_key.trim().trim_start_matches("0x"))
            .context("Invalid private key")?
            .with_chain_id(chain_id);

        tracing::info!(
            address = ?wallet.address(),
            rpc = %rpc_url,
            chain_id,
            "Local signer configured"
        );

        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
            prompt_lock: terminal_prompt::new_prompt_lock(),
            auto_approve,
        })
    }

    fn address(&self) -> Address {
        self.client.signer().address()
    }

    async fn approved(&self, action: &str, details: &str) -> bool {
        self.auto_approve || terminal_prompt::confirm(&self.prompt_lock, action, details).await
    }
}

/// 将 ethers 中间件错误映射为 EIP-1193 语义
fn map_middleware_error<E: MiddlewareError>(err: E) -> ProviderError {
    match err.as_error_response() {
        Some(rpc) => ProviderError::from_rpc(rpc.code, rpc.message.clone()),
        None => ProviderError::Transport(err.to_string()),
    }
}

#[async_trait]
impl WalletProvider for LocalSignerProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let address = format!("{:?}", self.address());
        if !self.approved("Authorize account", &address).await {
            return Err(ProviderError::UserRejected);
        }
        Ok(vec![address])
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id = self
            .client
            .get_chainid()
            .await
            .map_err(map_middleware_error)?;
        Ok(chain_id.as_u64())
    }

    async fn send_transaction(
        &self,
        from: &str,
        call: &ContractCall,
    ) -> Result<String, ProviderError> {
        let signer = self.address();
        if Address::from_str(from).ok() != Some(signer) {
            return Err(ProviderError::Rpc {
                code: -32602,
                message: format!("account {} is not managed by this signer", from),
            });
        }

        let to = Address::from_str(&call.to).map_err(|_| ProviderError::Rpc {
            code: -32602,
            message: format!("invalid contract address: {}", call.to),
        })?;
        let data = hex::decode(call.data.trim_start_matches("0x"))
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid calldata: {}", e)))?;

        let details = format!("{}() on {}", call.function, call.to);
        if !self.approved("Sign transaction", &details).await {
            return Err(ProviderError::UserRejected);
        }

        let tx = TransactionRequest::new()
            .from(signer)
            .to(to)
            .data(Bytes::from(data));

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(map_middleware_error)?;

        Ok(format!("{:?}", pending.tx_hash()))
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let hash = H256::from_str(tx_hash)
            .map_err(|_| ProviderError::InvalidResponse(format!("invalid tx hash: {}", tx_hash)))?;

        let receipt = self
            .client
            .get_transaction_receipt(hash)
            .await
            .map_err(map_middleware_error)?;

        Ok(receipt.map(|r| TransactionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: r.block_number.map(|n| n.as_u64()),
            status: r.status.map(|s| s.as_u64()),
        }))
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        let number = self
            .client
            .get_block_number()
            .await
            .map_err(map_middleware_error)?;
        Ok(number.as_u64())
    }
}

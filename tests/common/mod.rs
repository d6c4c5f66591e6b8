//! 测试辅助模块
//! 提供可编排响应、记录所有调用的内存钱包

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use otc_dealer::{
    config::{
        Config, LedgerConfig, LedgerFunctions, LoggingConfig, MonitorConfig, ProviderConfig,
        ProviderMode,
    },
    error::ProviderError,
    service::{ContractCall, InterfaceManifest, Notifier, TransactionReceipt, WalletProvider},
};

pub const AURORA_CHAIN_ID: u64 = 1_313_161_554;
pub const CONTRACT: &str = "0xea4B484756B4fbA56e02d482DCb33fF4C79E0a42";
pub const USER: &str = "0x742d35cc6634c0532925a3b844bc9e7595f0beb6";
pub const TOKEN_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const TOKEN_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const TX_HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

/// 钱包收到的调用
#[derive(Debug, Clone, PartialEq)]
pub enum WalletCall {
    RequestAccounts,
    ChainId,
    Send { from: String, call: ContractCall },
    Receipt(String),
    BlockNumber,
}

pub struct ScriptedWallet {
    chain_id: Mutex<Result<u64, ProviderError>>,
    accounts: Mutex<Result<Vec<String>, ProviderError>>,
    send_result: Mutex<Result<String, ProviderError>>,
    /// 每次查询弹出一个，只剩最后一个时一直返回它
    receipts: Mutex<VecDeque<Result<Option<TransactionReceipt>, ProviderError>>>,
    head_blocks: Mutex<VecDeque<u64>>,
    calls: Mutex<Vec<WalletCall>>,
}

impl ScriptedWallet {
    /// 授权成功、提交成功、第一次查询即确认
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: Mutex::new(Ok(chain_id)),
            accounts: Mutex::new(Ok(vec![USER.to_string()])),
            send_result: Mutex::new(Ok(TX_HASH.to_string())),
            receipts: Mutex::new(VecDeque::from([Ok(Some(receipt(1, 100)))])),
            head_blocks: Mutex::new(VecDeque::from([100])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_chain_error(self, error: ProviderError) -> Self {
        *self.chain_id.lock().unwrap() = Err(error);
        self
    }

    pub fn with_accounts_error(self, error: ProviderError) -> Self {
        *self.accounts.lock().unwrap() = Err(error);
        self
    }

    pub fn declining(self) -> Self {
        *self.accounts.lock().unwrap() = Err(ProviderError::UserRejected);
        self
    }

    pub fn with_accounts(self, accounts: Vec<String>) -> Self {
        *self.accounts.lock().unwrap() = Ok(accounts);
        self
    }

    pub fn with_send_result(self, result: Result<String, ProviderError>) -> Self {
        *self.send_result.lock().unwrap() = result;
        self
    }

    pub fn with_receipts(
        self,
        receipts: Vec<Result<Option<TransactionReceipt>, ProviderError>>,
    ) -> Self {
        *self.receipts.lock().unwrap() = receipts.into();
        self
    }

    pub fn with_head_blocks(self, blocks: Vec<u64>) -> Self {
        *self.head_blocks.lock().unwrap() = blocks.into();
        self
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<(String, ContractCall)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WalletCall::Send { from, call } => Some((from, call)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&WalletCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: WalletCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn pop_or_last<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

pub fn receipt(status: u64, block: u64) -> TransactionReceipt {
    TransactionReceipt {
        tx_hash: TX_HASH.to_string(),
        block_number: Some(block),
        status: Some(status),
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record(WalletCall::RequestAccounts);
        self.accounts.lock().unwrap().clone()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record(WalletCall::ChainId);
        self.chain_id.lock().unwrap().clone()
    }

    async fn send_transaction(
        &self,
        from: &str,
        call: &ContractCall,
    ) -> Result<String, ProviderError> {
        self.record(WalletCall::Send {
            from: from.to_string(),
            call: call.clone(),
        });
        self.send_result.lock().unwrap().clone()
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.record(WalletCall::Receipt(tx_hash.to_string()));
        pop_or_last(&self.receipts).unwrap_or(Ok(None))
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        self.record(WalletCall::BlockNumber);
        Ok(pop_or_last(&self.head_blocks).unwrap_or(0))
    }
}

/// 记录所有警告的通知器
#[derive(Default)]
pub struct RecordingNotifier {
    warnings: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// 不读取环境变量的测试配置
pub fn test_config() -> Config {
    Config {
        ledger: LedgerConfig {
            contract_address: CONTRACT.to_string(),
            required_chain_id: AURORA_CHAIN_ID,
            manifest_path: None,
            functions: LedgerFunctions::default(),
            strict_network_check: false,
        },
        provider: ProviderConfig {
            mode: ProviderMode::WalletBridge,
            rpc_url: None,
            private_key: None,
            auto_approve: false,
        },
        monitor: MonitorConfig {
            poll_interval_ms: 5,
            finality_timeout_secs: None,
            required_confirmations: 1,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "text".to_string(),
            enable_file_logging: false,
            log_file_path: None,
        },
    }
}

pub fn manifest() -> InterfaceManifest {
    InterfaceManifest::builtin(LedgerFunctions::default()).expect("builtin manifest")
}

pub fn as_provider(wallet: &Arc<ScriptedWallet>) -> Option<Arc<dyn WalletProvider>> {
    Some(wallet.clone() as Arc<dyn WalletProvider>)
}

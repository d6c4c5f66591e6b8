//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 已部署的 OTC 合约地址
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xea4B484756B4fbA56e02d482DCb33fF4C79E0a42";
/// Aurora 主网
pub const DEFAULT_CHAIN_ID: u64 = 1_313_161_554;

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 账本（合约）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub contract_address: String,
    pub required_chain_id: u64,
    /// ABI 文件路径；为空时使用内置清单
    pub manifest_path: Option<PathBuf>,
    #[serde(default)]
    pub functions: LedgerFunctions,
    /// 每次操作前都重新校验网络
    #[serde(default)]
    pub strict_network_check: bool,
}

/// 三个入口函数在接口清单中的名字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerFunctions {
    pub propose: String,
    pub cancel: String,
    pub accept: String,
}

/// 提供方模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderMode {
    /// 外部钱包的 JSON-RPC 接口（钱包持有私钥并负责确认）
    WalletBridge,
    /// 本地私钥 + 节点 RPC
    LocalSigner,
}

/// 钱包提供方配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub mode: ProviderMode,
    /// 为空表示环境中没有可用钱包
    pub rpc_url: Option<String>,
    /// 仅 local_signer 模式使用
    #[serde(default, skip_serializing)]
    pub private_key: Option<String>,
    /// 跳过终端确认（仅 local_signer 模式）
    #[serde(default)]
    pub auto_approve: bool,
}

/// 交易确认监控配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    /// 为空表示无限等待
    pub finality_timeout_secs: Option<u64>,
    pub required_confirmations: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
    pub enable_file_logging: bool,
    pub log_file_path: Option<String>,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_address: std::env::var("OTC_CONTRACT_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_CONTRACT_ADDRESS.into()),
            required_chain_id: env_parse("OTC_CHAIN_ID").unwrap_or(DEFAULT_CHAIN_ID),
            manifest_path: std::env::var("OTC_MANIFEST_PATH").ok().map(PathBuf::from),
            functions: LedgerFunctions::default(),
            strict_network_check: env_flag("OTC_STRICT_NETWORK"),
        }
    }
}

impl Default for LedgerFunctions {
    fn default() -> Self {
        Self {
            propose: "createDeal".into(),
            cancel: "removeDeal".into(),
            accept: "acceptDeal".into(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let mode = match std::env::var("OTC_PROVIDER_MODE").as_deref() {
            Ok("local_signer") | Ok("local") => ProviderMode::LocalSigner,
            _ => ProviderMode::WalletBridge,
        };
        Self {
            mode,
            rpc_url: std::env::var("OTC_RPC_URL").ok().filter(|s| !s.is_empty()),
            private_key: std::env::var("OTC_PRIVATE_KEY").ok(),
            auto_approve: env_flag("OTC_AUTO_APPROVE"),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: env_parse("OTC_POLL_INTERVAL_MS").unwrap_or(2_000),
            finality_timeout_secs: env_parse("OTC_FINALITY_TIMEOUT_SECS"),
            required_confirmations: env_parse("OTC_CONFIRMATIONS").unwrap_or(1),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
            enable_file_logging: env_flag("LOG_FILE_ENABLED"),
            log_file_path: std::env::var("LOG_FILE_PATH").ok(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self::default())
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        // 显式给出的路径必须存在
        if let Some(path) = path {
            if !path.as_ref().exists() {
                anyhow::bail!("Config file not found: {:?}", path.as_ref());
            }
            config = Self::from_file(path)?;
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let addr = self.ledger.contract_address.trim_start_matches("0x");
        if addr.len() != 40 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "contract_address is not a valid address: {}",
                self.ledger.contract_address
            );
        }

        if self.monitor.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        if self.monitor.required_confirmations == 0 {
            anyhow::bail!("required_confirmations must be at least 1");
        }

        if self.provider.mode == ProviderMode::LocalSigner
            && self.provider.rpc_url.is_some()
            && self.provider.private_key.is_none()
        {
            anyhow::bail!("local_signer mode requires OTC_PRIVATE_KEY");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}

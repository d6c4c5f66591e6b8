//! Domain 模块
//!
//! 包含 OTC 交易的领域模型

pub mod deal;
pub mod session;
pub mod transaction;
pub mod transaction_status;

// 重新导出常用类型
pub use deal::{DealAction, DealActionKind, DealPayload, DealProposal, DealReference, Receipt};
pub use session::{Account, NetworkIdentity};
pub use transaction::TransactionHandle;
pub use transaction_status::TransactionStatus;

mod common;

use std::{sync::Arc, time::Duration};

use common::*;
use otc_dealer::{
    config::MonitorConfig,
    domain::{TransactionHandle, TransactionStatus},
    error::{DealError, ProviderError},
    service::{TransactionMonitor, TransactionReceipt, WalletProvider},
};

fn monitor(wallet: &Arc<ScriptedWallet>, required_confirmations: u64) -> TransactionMonitor {
    let config = MonitorConfig {
        poll_interval_ms: 1,
        finality_timeout_secs: None,
        required_confirmations,
    };
    TransactionMonitor::new(wallet.clone() as Arc<dyn WalletProvider>, &config)
}

#[tokio::test]
async fn test_transient_errors_do_not_stop_polling() {
    let wallet = Arc::new(ScriptedWallet::new(AURORA_CHAIN_ID).with_receipts(vec![
        Err(ProviderError::Transport("connection reset".to_string())),
        Ok(None),
        Ok(Some(receipt(1, 50))),
    ]));

    let handle = monitor(&wallet, 1)
        .await_finality(TransactionHandle::pending(TX_HASH, "acceptDeal"))
        .await
        .unwrap();

    assert_eq!(handle.status, TransactionStatus::Confirmed);
    assert_eq!(handle.block_number, Some(50));
    assert_eq!(wallet.count(|c| matches!(c, WalletCall::Receipt(_))), 3);
    assert_eq!(wallet.count(|c| *c == WalletCall::BlockNumber), 0);
}

#[tokio::test]
async fn test_waits_for_required_confirmations() {
    let wallet = Arc::new(
        ScriptedWallet::new(AURORA_CHAIN_ID)
            .with_receipts(vec![Ok(Some(receipt(1, 100)))])
            .with_head_blocks(vec![100, 101, 102]),
    );

    let handle = monitor(&wallet, 3)
        .await_finality(TransactionHandle::pending(TX_HASH, "createDeal"))
        .await
        .unwrap();

    assert_eq!(handle.status, TransactionStatus::Confirmed);
    assert_eq!(wallet.count(|c| *c == WalletCall::BlockNumber), 3);
}

#[tokio::test]
async fn test_reverted_receipt_is_not_confirmed() {
    let wallet = Arc::new(
        ScriptedWallet::new(AURORA_CHAIN_ID)
            .with_receipts(vec![Ok(Some(receipt(0, 77)))])
            .with_head_blocks(vec![200]),
    );

    // 回滚不等待确认数
    let err = monitor(&wallet, 5)
        .await_finality(TransactionHandle::pending(TX_HASH, "removeDeal"))
        .await
        .unwrap_err();

    match err {
        DealError::Reverted { handle } => {
            assert_eq!(handle.status, TransactionStatus::Reverted);
            assert_eq!(handle.block_number, Some(77));
        }
        other => panic!("expected Reverted, got {:?}", other),
    }
    assert_eq!(wallet.count(|c| *c == WalletCall::BlockNumber), 0);
}

#[tokio::test]
async fn test_legacy_receipt_without_status_is_confirmed() {
    let wallet = Arc::new(ScriptedWallet::new(AURORA_CHAIN_ID).with_receipts(vec![Ok(Some(
        TransactionReceipt {
            tx_hash: TX_HASH.to_string(),
            block_number: Some(10),
            status: None,
        },
    ))]));

    let handle = monitor(&wallet, 1)
        .await_finality(TransactionHandle::pending(TX_HASH, "acceptDeal"))
        .await
        .unwrap();
    assert_eq!(handle.status, TransactionStatus::Confirmed);
}

#[tokio::test]
async fn test_receipt_without_block_number_settles_despite_confirmations() {
    let wallet = Arc::new(ScriptedWallet::new(AURORA_CHAIN_ID).with_receipts(vec![Ok(Some(
        TransactionReceipt {
            tx_hash: TX_HASH.to_string(),
            block_number: None,
            status: Some(1),
        },
    ))]));

    let handle = monitor(&wallet, 3)
        .with_finality_timeout(Some(Duration::from_secs(5)))
        .await_finality(TransactionHandle::pending(TX_HASH, "acceptDeal"))
        .await
        .unwrap();

    assert_eq!(handle.status, TransactionStatus::Confirmed);
    assert_eq!(handle.block_number, None);
    assert_eq!(wallet.count(|c| matches!(c, WalletCall::Receipt(_))), 1);
    assert_eq!(wallet.count(|c| *c == WalletCall::BlockNumber), 0);
}

#[tokio::test]
async fn test_finality_timeout_reports_unknown_outcome() {
    let wallet = Arc::new(ScriptedWallet::new(AURORA_CHAIN_ID).with_receipts(vec![Ok(None)]));

    let err = monitor(&wallet, 1)
        .with_finality_timeout(Some(Duration::from_millis(30)))
        .await_finality(TransactionHandle::pending(TX_HASH, "acceptDeal"))
        .await
        .unwrap_err();

    match err {
        DealError::FinalityTimeout { submission_id } => assert_eq!(submission_id, TX_HASH),
        other => panic!("expected FinalityTimeout, got {:?}", other),
    }
    assert!(wallet.count(|c| matches!(c, WalletCall::Receipt(_))) >= 1);
    assert!(wallet.sends().is_empty());
}

#[tokio::test]
async fn test_terminal_handles_are_not_polled() {
    let wallet = Arc::new(ScriptedWallet::new(AURORA_CHAIN_ID));

    let err = monitor(&wallet, 1)
        .await_finality(TransactionHandle::rejected("createDeal"))
        .await
        .unwrap_err();

    assert!(matches!(err, DealError::SigningRejected { .. }));
    assert!(wallet.calls().is_empty());
}

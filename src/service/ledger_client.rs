// 账本客户端：把三个领域操作绑定到合约接口
// 只负责编码和提交，提交进入待处理池即返回 Pending 句柄

use std::sync::Arc;

use crate::{
    domain::{Account, DealActionKind, DealProposal, DealReference, TransactionHandle},
    error::{DealError, ProviderError},
    service::{
        interface_manifest::InterfaceManifest,
        wallet_provider::{ContractCall, WalletProvider},
    },
};

pub struct LedgerClient {
    provider: Arc<dyn WalletProvider>,
    contract_address: String,
    manifest: InterfaceManifest,
}

impl LedgerClient {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        contract_address: impl Into<String>,
        manifest: InterfaceManifest,
    ) -> Self {
        Self {
            provider,
            contract_address: contract_address.into(),
            manifest,
        }
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub async fn propose_deal(
        &self,
        account: &Account,
        proposal: &DealProposal,
    ) -> Result<TransactionHandle, DealError> {
        self.submit(account, DealActionKind::Propose, &proposal.positional_args())
            .await
    }

    pub async fn cancel_deal(
        &self,
        account: &Account,
        reference: DealReference,
    ) -> Result<TransactionHandle, DealError> {
        let index = reference.index.to_string();
        self.submit(account, DealActionKind::Cancel, &[index.as_str()])
            .await
    }

    pub async fn accept_deal(
        &self,
        account: &Account,
        reference: DealReference,
    ) -> Result<TransactionHandle, DealError> {
        let index = reference.index.to_string();
        self.submit(account, DealActionKind::Accept, &[index.as_str()])
            .await
    }

    async fn submit(
        &self,
        account: &Account,
        kind: DealActionKind,
        args: &[&str],
    ) -> Result<TransactionHandle, DealError> {
        if !account.session_active {
            return Err(DealError::UserDeclinedAuthorization);
        }

        let function = self.manifest.function_name(kind).to_string();
        let call = ContractCall {
            to: self.contract_address.clone(),
            data: self.manifest.encode_call(kind, args)?,
            function: function.clone(),
        };

        tracing::debug!(
            from = %account.address,
            to = %call.to,
            function = %function,
            args = ?args,
            "Submitting ledger call"
        );

        match self.provider.send_transaction(&account.address, &call).await {
            Ok(tx_hash) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    function = %function,
                    from = %account.address,
                    "Ledger call accepted into pending pool"
                );
                Ok(TransactionHandle::pending(tx_hash, function))
            }
            Err(ProviderError::UserRejected) => {
                let handle = TransactionHandle::rejected(function);
                tracing::info!(
                    submission_id = %handle.submission_id,
                    function = %handle.function,
                    "Signer declined transaction"
                );
                Err(DealError::SigningRejected { handle })
            }
            Err(e) => {
                tracing::warn!(error = %e, function = %function, "Ledger call submission failed");
                let message = if e.is_execution_revert() {
                    format!("{} reverted: {}", function, e)
                } else {
                    format!("{}: {}", function, e)
                };
                Err(DealError::Submission(message))
            }
        }
    }
}

//! The deployment backend: submitting creation transactions and waiting
//! for them to be confirmed

use std::{future::Future, time::Duration};

use alloy::{
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::Bytes,
    providers::{DynProvider, PendingTransactionBuilder, Provider},
    rpc::types::TransactionRequest,
};
use tracing::{debug, info};

use crate::{
    errors::ScriptError,
    types::{DeployedContract, PendingDeployment},
};

/// A backend capable of deploying contracts.
///
/// Deployment is split in two so that a contract's address can only be read
/// once its deployment has been confirmed.
pub trait ContractDeployer {
    /// Submit the creation transaction for the given contract
    fn send_deployment(
        &self,
        contract: &str,
        calldata: Bytes,
    ) -> impl Future<Output = Result<PendingDeployment, ScriptError>>;

    /// Wait for a submitted deployment to be confirmed
    fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = Result<DeployedContract, ScriptError>>;
}

/// Deploys contracts over JSON-RPC, signing with the provider's wallet
pub struct RpcDeployer {
    /// The provider through which transactions are sent
    provider: DynProvider<Ethereum>,
    /// The number of confirmations to wait for on each deployment
    confirmations: u64,
    /// How long to wait for the confirmations before giving up
    timeout: Duration,
}

impl RpcDeployer {
    /// Create a deployer over the given provider
    pub fn new(provider: DynProvider<Ethereum>, confirmations: u64, timeout: Duration) -> Self {
        Self { provider, confirmations, timeout }
    }
}

impl ContractDeployer for RpcDeployer {
    async fn send_deployment(
        &self,
        contract: &str,
        calldata: Bytes,
    ) -> Result<PendingDeployment, ScriptError> {
        debug!("sending creation tx for {contract} ({} bytes)", calldata.len());
        let tx = TransactionRequest::default().with_deploy_code(calldata);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;

        let tx_hash = *pending_tx.tx_hash();
        info!("{contract} creation tx sent: {tx_hash}");
        Ok(PendingDeployment::new(contract, tx_hash))
    }

    async fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> Result<DeployedContract, ScriptError> {
        let contract = pending.contract().to_string();
        let tx_hash = pending.tx_hash();
        debug!("waiting for {} confirmation(s) of {contract}", self.confirmations);

        // `watch` resolves only once the required confirmations are reached
        PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.timeout))
            .watch()
            .await
            .map_err(|e| ScriptError::DeploymentConfirmation(format!("{contract}: {e}")))?;

        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ScriptError::DeploymentConfirmation(format!("{contract}: {e}")))?
            .ok_or_else(|| {
                ScriptError::DeploymentConfirmation(format!(
                    "{contract}: no receipt for creation tx {tx_hash}"
                ))
            })?;

        deployed_from_receipt(pending, &receipt)
    }
}

/// Resolve a pending deployment against the receipt of its creation
/// transaction, which must have succeeded and created a contract
pub fn deployed_from_receipt(
    pending: PendingDeployment,
    receipt: &impl ReceiptResponse,
) -> Result<DeployedContract, ScriptError> {
    let contract = pending.contract();
    if !receipt.status() {
        return Err(ScriptError::DeploymentConfirmation(format!(
            "{contract}: creation tx {} reverted",
            pending.tx_hash()
        )));
    }

    let address = receipt.contract_address().ok_or_else(|| {
        ScriptError::DeploymentConfirmation(format!("{contract}: receipt has no contract address"))
    })?;

    Ok(pending.into_deployed(address))
}

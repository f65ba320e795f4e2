//! Type definitions used throughout the scripts

use alloy::{
    dyn_abi::DynSolValue,
    json_abi::JsonAbi,
    primitives::{Address, Bytes, TxHash},
};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ARTIFACT_FORMAT, NFT_CONTRACT_KEY, NFT_CONTRACT_NAME, NFT_TOKEN_NAME, NFT_TOKEN_SYMBOL,
    TOKEN_CONTRACT_KEY, TOKEN_CONTRACT_NAME,
};

/// A compiled contract, as stored in the artifacts directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The artifact format tag
    #[serde(rename = "_format", default = "default_artifact_format")]
    pub format: String,
    /// The name of the contract
    pub contract_name: String,
    /// The path of the source file defining the contract
    pub source_name: String,
    /// The contract's JSON ABI
    pub abi: JsonAbi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
    /// The contract's runtime bytecode
    #[serde(default)]
    pub deployed_bytecode: Bytes,
}

/// The default value of [`ContractArtifact::format`]
fn default_artifact_format() -> String {
    ARTIFACT_FORMAT.to_string()
}

/// A contract to deploy, along with its constructor arguments
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentTarget {
    /// The name of the contract's artifact
    pub contract: String,
    /// The label under which the deployed address is logged
    pub label: String,
    /// The key under which the deployed address is recorded
    pub record_key: String,
    /// The constructor arguments
    pub constructor_args: Vec<DynSolValue>,
}

impl DeploymentTarget {
    /// A target for a contract whose label is its own name
    pub fn new(contract: &str, record_key: &str, constructor_args: Vec<DynSolValue>) -> Self {
        Self {
            contract: contract.to_string(),
            label: contract.to_string(),
            record_key: record_key.to_string(),
            constructor_args,
        }
    }
}

/// The contracts deployed by the `deploy` command, in deployment order:
/// the ERC-20 token, then the ERC-721 NFT
pub fn default_deployment_targets() -> Vec<DeploymentTarget> {
    vec![
        DeploymentTarget::new(TOKEN_CONTRACT_NAME, TOKEN_CONTRACT_KEY, vec![]),
        DeploymentTarget::new(
            NFT_CONTRACT_NAME,
            NFT_CONTRACT_KEY,
            vec![
                DynSolValue::String(NFT_TOKEN_NAME.to_string()),
                DynSolValue::String(NFT_TOKEN_SYMBOL.to_string()),
            ],
        ),
    ]
}

/// A deployment transaction which has been submitted but not yet confirmed.
///
/// The contract address is only available on the [`DeployedContract`]
/// obtained once the deployment is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeployment {
    /// The name of the contract being deployed
    contract: String,
    /// The hash of the creation transaction
    tx_hash: TxHash,
}

impl PendingDeployment {
    /// Track the creation transaction of the given contract
    pub fn new(contract: &str, tx_hash: TxHash) -> Self {
        Self { contract: contract.to_string(), tx_hash }
    }

    /// The name of the contract being deployed
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// The hash of the creation transaction
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Mark the deployment as confirmed at the given address
    pub fn into_deployed(self, address: Address) -> DeployedContract {
        DeployedContract { contract: self.contract, tx_hash: self.tx_hash, address }
    }
}

/// A confirmed contract deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The name of the deployed contract
    contract: String,
    /// The hash of the creation transaction
    tx_hash: TxHash,
    /// The address of the deployed contract
    address: Address,
}

impl DeployedContract {
    /// The name of the deployed contract
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// The hash of the creation transaction
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// The address of the deployed contract
    pub fn address(&self) -> Address {
        self.address
    }
}

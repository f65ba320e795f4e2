//! Constants used in the deploy scripts

/// The default path of the project configuration file
pub const DEFAULT_CONFIG_PATH: &str = "project.json";

/// The Solidity compiler version used when no configuration file is present
pub const DEFAULT_SOLIDITY_VERSION: &str = "0.8.19";

/// The default directory containing the Solidity sources
pub const DEFAULT_SOURCES_DIR: &str = "contracts";

/// The default directory to which compilation artifacts are written
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default directory to which typed bindings are written
pub const DEFAULT_BINDINGS_OUT_DIR: &str = "frontend/types";

/// The default RPC URL, a local devnet node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The number of confirmations to wait for on each deployment transaction
pub const DEFAULT_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of seconds to wait for a deployment to be confirmed
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// The name of the ERC-20 token contract
pub const TOKEN_CONTRACT_NAME: &str = "MyERC20";

/// The name of the ERC-721 NFT contract
pub const NFT_CONTRACT_NAME: &str = "MyERC721";

/// The name passed to the NFT contract's constructor
pub const NFT_TOKEN_NAME: &str = "MyERC721";

/// The symbol passed to the NFT contract's constructor
pub const NFT_TOKEN_SYMBOL: &str = "MYERC721";

/// The deployments key in the deployments record file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The token contract key in the deployments record file
pub const TOKEN_CONTRACT_KEY: &str = "erc20_contract";

/// The NFT contract key in the deployments record file
pub const NFT_CONTRACT_KEY: &str = "erc721_contract";

/// The artifact format tag written alongside compiled contracts
pub const ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";

/// The extension of Solidity source files
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of artifact files
pub const JSON_EXTENSION: &str = "json";

/// The suffix of debug artifact files, which are not contract artifacts
pub const DEBUG_ARTIFACT_SUFFIX: &str = ".dbg.json";

/// The name of the Solidity compiler command
pub const SOLC_COMMAND: &str = "solc";

/// The prefix of the version line printed by `solc --version`
pub const SOLC_VERSION_PREFIX: &str = "Version: ";

/// The outputs requested from `solc --combined-json`
pub const SOLC_COMBINED_OUTPUTS: &str = "abi,bin,bin-runtime";

/// The name of the module file written alongside generated bindings
pub const BINDINGS_MODULE_FILE: &str = "mod.rs";

/// The extension of generated ABI files
pub const ABI_FILE_EXTENSION: &str = "abi.json";

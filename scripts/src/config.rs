//! The project configuration, naming the compiler toolchain and the
//! locations of compilation and binding outputs

use std::{
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_BINDINGS_OUT_DIR, DEFAULT_SOLIDITY_VERSION,
        DEFAULT_SOURCES_DIR,
    },
    errors::ScriptError,
};

/// The project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// The Solidity compiler version, in `MAJOR.MINOR.PATCH` form
    pub solidity: String,
    /// The directory containing the Solidity sources
    pub sources: PathBuf,
    /// The directory to which compilation artifacts are written
    pub artifacts: PathBuf,
    /// Import remappings passed to the compiler, in `prefix=path` form
    pub remappings: Vec<String>,
    /// Typed binding generation settings
    pub bindings: BindingsConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            solidity: DEFAULT_SOLIDITY_VERSION.to_string(),
            sources: PathBuf::from(DEFAULT_SOURCES_DIR),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            remappings: Vec::new(),
            bindings: BindingsConfig::default(),
        }
    }
}

/// Settings for the typed binding generation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingsConfig {
    /// The directory to which bindings are written
    pub out_dir: PathBuf,
    /// The kind of bindings to generate
    pub target: BindingsTarget,
    /// Whether to emit signature constants for every function, rather than
    /// only for overloaded ones
    pub always_generate_overloads: bool,
    /// Additional artifact files to generate bindings for. `*` and `?`
    /// wildcards are expanded in the file name, e.g. `externalArtifacts/*.json`
    pub external_artifacts: Vec<PathBuf>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_BINDINGS_OUT_DIR),
            target: BindingsTarget::Alloy,
            always_generate_overloads: false,
            external_artifacts: Vec::new(),
        }
    }
}

/// The kinds of bindings that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingsTarget {
    /// Rust modules wrapping the artifacts in `alloy::sol!`
    Alloy,
    /// Bare JSON ABI files
    AbiJson,
}

impl Display for BindingsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingsTarget::Alloy => write!(f, "alloy"),
            BindingsTarget::AbiJson => write!(f, "abi-json"),
        }
    }
}

impl ProjectConfig {
    /// Load the configuration from the given path, falling back to the
    /// defaults if no file exists there
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let config = if path.exists() {
            let contents =
                fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
            serde_json::from_str(&contents).map_err(|e| ScriptError::Config(e.to_string()))?
        } else {
            debug!("no config found at {}, using defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the configured values are well-formed
    pub fn validate(&self) -> Result<(), ScriptError> {
        if !is_valid_version(&self.solidity) {
            return Err(ScriptError::Config(format!(
                "solidity version `{}` is not of the form MAJOR.MINOR.PATCH",
                self.solidity
            )));
        }

        if self.artifacts.as_os_str().is_empty() {
            return Err(ScriptError::Config("artifacts directory is empty".to_string()));
        }

        if self.bindings.out_dir.as_os_str().is_empty() {
            return Err(ScriptError::Config("bindings output directory is empty".to_string()));
        }

        for remapping in &self.remappings {
            if !remapping.contains('=') {
                return Err(ScriptError::Config(format!(
                    "remapping `{remapping}` is not of the form prefix=path"
                )));
            }
        }

        Ok(())
    }
}

/// Whether the given string is a `MAJOR.MINOR.PATCH` version
fn is_valid_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

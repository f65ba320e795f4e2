//! Generation of typed bindings from compiled contract artifacts

use std::{
    collections::HashSet,
    fmt::Write,
    fs,
    path::PathBuf,
};

use itertools::Itertools;
use tracing::debug;

use crate::{
    config::{BindingsConfig, BindingsTarget},
    constants::{ABI_FILE_EXTENSION, BINDINGS_MODULE_FILE},
    errors::ScriptError,
    types::ContractArtifact,
};

/// Write bindings for the given artifacts into the configured output
/// directory, returning the paths written
pub fn generate_bindings(
    artifacts: &[ContractArtifact],
    config: &BindingsConfig,
) -> Result<Vec<PathBuf>, ScriptError> {
    let mut seen = HashSet::new();
    if let Some(dup) = artifacts.iter().find(|a| !seen.insert(&a.contract_name)) {
        return Err(ScriptError::BindingGeneration(format!(
            "multiple artifacts define `{}`",
            dup.contract_name
        )));
    }

    fs::create_dir_all(&config.out_dir).map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    let mut written = Vec::with_capacity(artifacts.len() + 1);
    for artifact in artifacts {
        let (file_name, contents) = match config.target {
            BindingsTarget::Alloy => {
                let contents = render_alloy_module(artifact, config.always_generate_overloads)?;
                (format!("{}.rs", module_name(&artifact.contract_name)), contents)
            }
            BindingsTarget::AbiJson => {
                let contents = serde_json::to_string_pretty(&artifact.abi)
                    .map_err(|e| ScriptError::Serde(e.to_string()))?;
                (format!("{}.{ABI_FILE_EXTENSION}", artifact.contract_name), contents)
            }
        };

        let path = config.out_dir.join(file_name);
        debug!("writing {} bindings to {}", artifact.contract_name, path.display());
        fs::write(&path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        written.push(path);
    }

    if config.target == BindingsTarget::Alloy {
        let path = config.out_dir.join(BINDINGS_MODULE_FILE);
        let contents = render_module_index(artifacts.iter());
        fs::write(&path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        written.push(path);
    }

    Ok(written)
}

/// Render the Rust module wrapping the given artifact's ABI in `alloy::sol!`.
///
/// The ABI is inlined so that the module does not depend on where the
/// artifacts live.
pub fn render_alloy_module(
    artifact: &ContractArtifact,
    always_generate_overloads: bool,
) -> Result<String, ScriptError> {
    let name = &artifact.contract_name;
    let abi = serde_json::to_string_pretty(&artifact.abi)
        .map_err(|e| ScriptError::Serde(e.to_string()))?;
    let abi = abi.lines().map(|line| format!("    {line}")).join("\n");
    let hashes = "#".repeat(raw_string_hashes(&abi));

    let mut out = String::new();

    // Writing to a `String` is infallible
    let _ = writeln!(out, "//! Bindings for the `{name}` contract, generated from its artifact\n");
    let _ = writeln!(out, "alloy::sol!(");
    let _ = writeln!(out, "    #[sol(rpc)]");
    let _ = writeln!(out, "    {name},");
    let _ = writeln!(out, "    r{hashes}\"");
    let _ = writeln!(out, "{abi}");
    let _ = writeln!(out, "    \"{hashes}");
    let _ = writeln!(out, ");");

    let signatures = artifact
        .abi
        .functions
        .values()
        .filter(|overloads| always_generate_overloads || overloads.len() > 1)
        .flatten()
        .map(|f| f.signature())
        .sorted();

    let mut const_names = HashSet::new();
    for signature in signatures {
        let const_name = signature_const_name(&signature);
        if !const_names.insert(const_name.clone()) {
            return Err(ScriptError::BindingGeneration(format!(
                "`{name}`: signature `{signature}` maps to the already emitted constant \
                 `{const_name}`"
            )));
        }

        let _ = writeln!(out, "\n/// The signature of `{signature}`");
        let _ = writeln!(out, "pub const {const_name}: &str = {signature:?};");
    }

    Ok(out)
}

/// The number of `#`s needed for a raw string literal holding `contents`
fn raw_string_hashes(contents: &str) -> usize {
    let longest_run = contents
        .split('"')
        .skip(1)
        .map(|after_quote| after_quote.chars().take_while(|&c| c == '#').count())
        .max()
        .unwrap_or(0);

    longest_run + 1
}

/// Render the `mod.rs` declaring a module per contract
pub fn render_module_index<'a>(artifacts: impl Iterator<Item = &'a ContractArtifact>) -> String {
    let modules = artifacts
        .map(|a| format!("pub mod {};", module_name(&a.contract_name)))
        .sorted()
        .join("\n");

    format!("//! Typed contract bindings\n\n{modules}\n")
}

/// The snake case module name of a contract, e.g. `MyERC20` -> `my_erc20`
pub fn module_name(contract: &str) -> String {
    let chars: Vec<char> = contract.chars().collect();
    let mut name = String::with_capacity(contract.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                name.push('_');
            }
        }
        name.push(c.to_ascii_lowercase());
    }

    name
}

/// The constant name of a function signature,
/// e.g. `transferFrom(address,address,uint256)` -> `TRANSFER_FROM_ADDRESS_ADDRESS_UINT256`.
///
/// Tuples are spelled `TUPLE_..._END` and arrays `ARRAY` (or `ARRAY<N>` when
/// fixed-size), so distinct signatures map to distinct names.
pub fn signature_const_name(signature: &str) -> String {
    let (fn_name, params) = signature.split_once('(').unwrap_or((signature, ""));
    // The closing paren of the parameter list
    let params = params.strip_suffix(')').unwrap_or(params);

    let mut parts = vec![module_name(fn_name).to_ascii_uppercase()];
    let mut ident = String::new();
    let mut chars = params.chars();
    while let Some(c) = chars.next() {
        if c.is_ascii_alphanumeric() {
            ident.push(c.to_ascii_uppercase());
            continue;
        }

        if !ident.is_empty() {
            parts.push(std::mem::take(&mut ident));
        }
        match c {
            '(' => parts.push("TUPLE".to_string()),
            ')' => parts.push("END".to_string()),
            '[' => {
                let len: String = chars.by_ref().take_while(|&c| c != ']').collect();
                parts.push(format!("ARRAY{len}"));
            }
            _ => {}
        }
    }
    if !ident.is_empty() {
        parts.push(ident);
    }

    parts.join("_")
}

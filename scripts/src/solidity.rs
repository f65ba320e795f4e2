//! Helpers for building the Solidity calldata sent during deployment

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    primitives::Bytes,
};

use crate::{errors::ScriptError, types::ContractArtifact};

/// Build the creation calldata for the given contract: its creation bytecode
/// followed by the ABI-encoded constructor arguments
pub fn deploy_calldata(
    artifact: &ContractArtifact,
    constructor_args: &[DynSolValue],
) -> Result<Bytes, ScriptError> {
    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "`{}` has no creation bytecode, is it abstract or an interface?",
            artifact.contract_name
        )));
    }

    let encoded_args = match &artifact.abi.constructor {
        Some(constructor) => constructor
            .abi_encode_input(constructor_args)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
        None if constructor_args.is_empty() => Vec::new(),
        None => {
            return Err(ScriptError::CalldataConstruction(format!(
                "`{}` has no constructor, but {} arguments were given",
                artifact.contract_name,
                constructor_args.len()
            )))
        }
    };

    let mut calldata = artifact.bytecode.to_vec();
    calldata.extend(encoded_args);
    Ok(calldata.into())
}

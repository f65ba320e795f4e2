//! Implementations of the various deploy scripts

use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

use tracing::{info, warn};

use crate::{
    bindings::generate_bindings,
    cli::DeployArgs,
    compiler::{check_solc_version, compile_sources},
    config::ProjectConfig,
    constants::SOLIDITY_EXTENSION,
    deployer::{ContractDeployer, RpcDeployer},
    errors::ScriptError,
    solidity::deploy_calldata,
    types::{default_deployment_targets, DeployedContract, DeploymentTarget},
    utils::{
        collect_artifact_files, collect_files, expand_artifact_pattern, find_artifact,
        read_artifact, setup_client, write_artifact, write_deployed_address,
    },
};

/// Deploy the token and NFT contracts, printing each address once its
/// deployment is confirmed
pub async fn deploy(args: DeployArgs, config: &ProjectConfig) -> Result<(), ScriptError> {
    let provider = setup_client(&args.priv_key, &args.rpc_url).await?;
    let deployer = RpcDeployer::new(
        provider,
        args.confirmations,
        Duration::from_secs(args.timeout_secs),
    );

    deploy_contracts(
        &deployer,
        &default_deployment_targets(),
        &config.artifacts,
        args.deployments_path.as_deref(),
        &mut io::stdout(),
    )
    .await?;

    Ok(())
}

/// Deploy the given targets in order, one at a time.
///
/// Each target is confirmed before its address is written to `out` and, if
/// given, to the deployments record. The first failure aborts the remaining
/// deployments; those already confirmed stay deployed and logged.
pub async fn deploy_contracts(
    deployer: &impl ContractDeployer,
    targets: &[DeploymentTarget],
    artifacts_dir: &Path,
    deployments_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<Vec<DeployedContract>, ScriptError> {
    let mut deployed = Vec::with_capacity(targets.len());

    for target in targets {
        let artifact = find_artifact(artifacts_dir, &target.contract)?;
        let calldata = deploy_calldata(&artifact, &target.constructor_args)?;

        info!("deploying {}", target.contract);
        let pending = deployer.send_deployment(&target.contract, calldata).await?;
        let contract = deployer.wait_for_deployment(pending).await?;

        writeln!(out, "{} deployed to: {}", target.label, contract.address())
            .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

        if let Some(path) = deployments_path {
            write_deployed_address(path, &target.record_key, contract.address())?;
        }

        deployed.push(contract);
    }

    Ok(deployed)
}

/// Compile the project's Solidity sources with the configured compiler,
/// writing an artifact per contract
pub fn compile(config: &ProjectConfig) -> Result<(), ScriptError> {
    check_solc_version(config)?;

    let sources = collect_files(&config.sources, SOLIDITY_EXTENSION)?;
    if sources.is_empty() {
        warn!("no Solidity sources found under {}", config.sources.display());
        return Ok(());
    }
    info!("compiling {} source file(s) with solc {}", sources.len(), config.solidity);

    let artifacts = compile_sources(config, &sources)?;
    for artifact in &artifacts {
        let path = write_artifact(&config.artifacts, artifact)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

/// Generate typed bindings for every compiled artifact
pub fn bindings(config: &ProjectConfig) -> Result<(), ScriptError> {
    let mut artifact_files = if config.artifacts.exists() {
        collect_artifact_files(&config.artifacts)?
    } else {
        Vec::new()
    };
    for pattern in &config.bindings.external_artifacts {
        let matched = expand_artifact_pattern(pattern)?;
        if matched.is_empty() {
            warn!("external artifact pattern {} matched no files", pattern.display());
        }
        artifact_files.extend(matched);
    }

    if artifact_files.is_empty() {
        return Err(ScriptError::BindingGeneration(
            "no artifacts found, have the contracts been compiled?".to_string(),
        ));
    }

    let artifacts = artifact_files
        .iter()
        .map(|path| read_artifact(path))
        .collect::<Result<Vec<_>, _>>()?;

    let written = generate_bindings(&artifacts, &config.bindings)?;
    info!(
        "wrote {} {} binding file(s) to {}",
        written.len(),
        config.bindings.target,
        config.bindings.out_dir.display()
    );

    Ok(())
}

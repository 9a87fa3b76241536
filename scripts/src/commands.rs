//! Implementations of the release scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::{
    cli::{DeployArgs, PropagateArgs},
    config::{resolve_private_key, COMPILER},
    errors::ScriptError,
    propagate::{apply_patches, plan_propagation, ReleasePaths},
    types::Network,
    utils::{
        check_chain_id, compile_contract, deploy_contract, read_artifact, setup_client, write_file,
    },
};

/// Deploy the contract named in `args`, returning its address
pub async fn deploy(args: DeployArgs) -> Result<Address, ScriptError> {
    let network = args
        .network
        .config(args.project_id.as_deref(), args.rpc_url.as_deref())?;

    if network.network == Network::Mainnet {
        warn!("Deploying `{}` to MAINNET", args.contract);
    }
    if let Some(fork) = &network.forking {
        info!("{} node is expected to fork {}", network.network, fork);
    }

    let paths = ReleasePaths::from(args.paths);
    let artifacts_dir = paths.project_root.join(&args.artifacts_dir);
    if args.compile {
        let artifact_path =
            compile_contract(args.contract, &paths.project_root, &artifacts_dir, &COMPILER)?;
        info!("Artifact written to {}", artifact_path.display());
    }

    let artifact = read_artifact(&artifacts_dir, args.contract)?;
    artifact.check_no_constructor_args()?;
    let code = artifact.deployment_code()?;

    let priv_key = resolve_private_key(
        &network,
        args.priv_key.as_deref(),
        &paths.project_root.join(&args.secret_path),
    )?;
    let provider = setup_client(&priv_key, &network.url)?;
    check_chain_id(&provider, network.chain_id).await?;

    info!("Deploying {} to {}", args.contract, network.network);
    let address = deploy_contract(&provider, code, args.confirmations).await?;

    let output = format!("{} deployed to: {}", args.contract, address);
    println!("{output}");

    if args.record {
        let record_path = paths.bookkeeping(args.contract);
        write_file(&record_path, &format!("{output}\n"))?;
        info!("Recorded deployment in {}", record_path.display());
    }

    Ok(address)
}

/// Propagate the recorded address of the contract named in `args`,
/// returning the paths of the files that were written
pub fn propagate_address(args: PropagateArgs) -> Result<Vec<PathBuf>, ScriptError> {
    let paths = ReleasePaths::from(args.paths);
    let propagation = plan_propagation(args.contract, &paths)?;

    if args.dry_run {
        for patch in propagation.patches.iter().filter(|p| !p.is_noop()) {
            info!("Would update {}", patch.path.display());
        }
        return Ok(Vec::new());
    }

    let written = apply_patches(&propagation.patches)?;
    println!(
        "{} contract address updated to {}",
        propagation.contract, propagation.address
    );

    Ok(written)
}

//! Utilities for the release scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    str::FromStr,
};

use alloy::{
    json_abi::JsonAbi,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::CompilerConfig,
    constants::{
        ARTIFACT_EXTENSION, CONTRACTS_DIR, SOLC_COMBINED_JSON, SOLC_COMMAND, SOLIDITY_EXTENSION,
    },
    errors::ScriptError,
    types::ReleaseContract,
};

/// The format tag of a Hardhat compilation artifact
const HARDHAT_ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";

/// Read a text file, reporting the path on failure
pub fn read_file(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))
}

/// Overwrite a text file, reporting the path on failure
pub fn write_file(path: &Path, contents: &str) -> Result<(), ScriptError> {
    fs::write(path, contents)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))
}

/// Sets up a signing client for the given RPC url, from the given private key
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<DynProvider, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    debug!("Deploying from {:#x}", signer.address());

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    Ok(provider.erased())
}

/// Ensure the node behind the client serves the expected chain
pub async fn check_chain_id(provider: &DynProvider, expected: u64) -> Result<(), ScriptError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if chain_id != expected {
        return Err(ScriptError::Config(format!(
            "node serves chain {chain_id}, expected chain {expected}"
        )));
    }

    Ok(())
}

/// A compiled contract, in the layout Hardhat writes its artifacts in
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The artifact format tag
    #[serde(rename = "_format", default)]
    pub format: Option<String>,
    /// The contract name
    pub contract_name: String,
    /// The path of the source the contract was compiled from
    #[serde(default)]
    pub source_name: Option<String>,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The hex-encoded creation bytecode
    pub bytecode: String,
}

impl ContractArtifact {
    /// Decode the creation bytecode, which the deployment is sent with as-is
    pub fn deployment_code(&self) -> Result<Bytes, ScriptError> {
        let code = hex::decode(self.bytecode.trim_start_matches("0x"))
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if code.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has no creation bytecode, is it abstract?",
                self.contract_name
            )));
        }

        Ok(Bytes::from(code))
    }

    /// Ensure the contract can be deployed without constructor arguments
    pub fn check_no_constructor_args(&self) -> Result<(), ScriptError> {
        match &self.abi.constructor {
            Some(constructor) if !constructor.inputs.is_empty() => {
                Err(ScriptError::ArtifactParsing(format!(
                    "{} constructor takes {} argument(s), none are supplied",
                    self.contract_name,
                    constructor.inputs.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// The path of the artifact of the given contract
pub fn artifact_path(artifacts_dir: &Path, contract: ReleaseContract) -> PathBuf {
    let name = contract.contract_name();
    artifacts_dir
        .join(format!("{name}.{SOLIDITY_EXTENSION}"))
        .join(format!("{name}.{ARTIFACT_EXTENSION}"))
}

/// Read the compiled artifact of the given contract
pub fn read_artifact(
    artifacts_dir: &Path,
    contract: ReleaseContract,
) -> Result<ContractArtifact, ScriptError> {
    let path = artifact_path(artifacts_dir, contract);
    debug!("Reading artifact {}", path.display());

    let contents = read_file(&path)?;
    let artifact: ContractArtifact = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    if artifact.contract_name != contract.contract_name() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} holds contract {}, expected {}",
            path.display(),
            artifact.contract_name,
            contract
        )));
    }

    Ok(artifact)
}

/// Run the command, capturing its output, and fail with `err_msg` if it does not succeed
fn command_output_or(mut cmd: Command, err_msg: &str) -> Result<Output, ScriptError> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let output = cmd
        .output()
        .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScriptError::ContractCompilation(format!(
            "{err_msg}: {}",
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Ensure the locally installed `solc` is the configured version
fn check_solc_version(compiler: &CompilerConfig) -> Result<(), ScriptError> {
    let mut version_cmd = Command::new(SOLC_COMMAND);
    version_cmd.arg("--version");
    let output = command_output_or(version_cmd, "Failed to query solc version")?;

    let version = String::from_utf8_lossy(&output.stdout);
    if !solc_version_matches(&version, compiler.version) {
        return Err(ScriptError::ContractCompilation(format!(
            "solc {} is required, found: {}",
            compiler.version,
            version.trim()
        )));
    }

    Ok(())
}

/// Whether `solc --version` output reports the given version
fn solc_version_matches(version_output: &str, version: &str) -> bool {
    version_output
        .lines()
        .filter_map(|line| line.strip_prefix("Version: "))
        .any(|v| v == version || v.starts_with(&format!("{version}+")))
}

/// Extract the given contract from `solc --combined-json abi,bin` output
fn artifact_from_combined_json(
    output: &str,
    contract: ReleaseContract,
    source_name: &str,
) -> Result<ContractArtifact, ScriptError> {
    let parsed: Value =
        serde_json::from_str(output).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let name = contract.contract_name();
    let entry = parsed["contracts"]
        .as_object()
        .and_then(|contracts| {
            contracts
                .iter()
                .find(|(key, _)| key.rsplit(':').next() == Some(name))
        })
        .map(|(_, entry)| entry)
        .ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("{name} not found in compiler output"))
        })?;

    // Older compilers emit the ABI as a JSON-encoded string
    let abi = match &entry["abi"] {
        Value::String(s) => serde_json::from_str(s),
        abi => serde_json::from_value(abi.clone()),
    }
    .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bin = entry["bin"]
        .as_str()
        .ok_or_else(|| ScriptError::ArtifactParsing(format!("{name} has no bytecode")))?;

    Ok(ContractArtifact {
        format: Some(HARDHAT_ARTIFACT_FORMAT.to_string()),
        contract_name: name.to_string(),
        source_name: Some(source_name.to_string()),
        abi,
        bytecode: format!("0x{bin}"),
    })
}

/// Compiles the given contract with `solc` and writes its artifact,
/// returning the path to the artifact.
///
/// Assumes that `solc` is locally available.
pub fn compile_contract(
    contract: ReleaseContract,
    project_root: &Path,
    artifacts_dir: &Path,
    compiler: &CompilerConfig,
) -> Result<PathBuf, ScriptError> {
    check_solc_version(compiler)?;

    let source_name = format!(
        "{CONTRACTS_DIR}/{}.{SOLIDITY_EXTENSION}",
        contract.contract_name()
    );

    let mut build_cmd = Command::new(SOLC_COMMAND);
    // Resolve imports relative to the project root
    build_cmd.current_dir(project_root);
    build_cmd.arg("--base-path").arg(".");
    build_cmd.arg("--combined-json").arg(SOLC_COMBINED_JSON);
    if compiler.optimizer.enabled {
        build_cmd.arg("--optimize");
        build_cmd
            .arg("--optimize-runs")
            .arg(compiler.optimizer.runs.to_string());
    }
    build_cmd.arg(&source_name);

    info!("Compiling {} with solc {}", source_name, compiler.version);
    let output = command_output_or(build_cmd, "Failed to compile contract")?;
    let artifact = artifact_from_combined_json(
        &String::from_utf8_lossy(&output.stdout),
        contract,
        &source_name,
    )?;

    let path = artifact_path(artifacts_dir, contract);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| ScriptError::WriteFile(format!("{}: {}", dir.display(), e)))?;
    }
    let contents = serde_json::to_string_pretty(&artifact)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    write_file(&path, &contents)?;

    Ok(path)
}

/// Deploys the given creation code with no constructor arguments,
/// returning the address of the created contract
pub async fn deploy_contract(
    provider: &DynProvider,
    code: Bytes,
    confirmations: u64,
) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(code);

    let pending_tx = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    info!("Deployment transaction sent: {:#x}", pending_tx.tx_hash());

    let receipt = pending_tx
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("receipt holds no contract address".to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{errors::ScriptError, types::ReleaseContract};

    use super::{artifact_from_combined_json, artifact_path, read_artifact, solc_version_matches};

    const ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "Tickbit",
        "sourceName": "contracts/Tickbit.sol",
        "abi": [
            { "inputs": [], "stateMutability": "nonpayable", "type": "constructor" }
        ],
        "bytecode": "0x6080604052",
        "deployedBytecode": "0x6080",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    #[test]
    fn test_read_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact_path(dir.path(), ReleaseContract::Tickbit);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, ARTIFACT).unwrap();

        let artifact = read_artifact(dir.path(), ReleaseContract::Tickbit).unwrap();
        assert_eq!(artifact.contract_name, "Tickbit");
        artifact.check_no_constructor_args().unwrap();
        assert_eq!(
            artifact.deployment_code().unwrap().to_vec(),
            vec![0x60, 0x80, 0x60, 0x40, 0x52]
        );
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_artifact(dir.path(), ReleaseContract::TickbitTicket);
        assert!(matches!(res, Err(ScriptError::ReadFile(_))));
    }

    #[test]
    fn test_artifact_with_constructor_args() {
        let combined = r#"{
            "contracts": {
                "contracts/TickbitTicket.sol:TickbitTicket": {
                    "abi": [{ "inputs": [{ "name": "tickbit", "type": "address", "internalType": "address" }], "stateMutability": "nonpayable", "type": "constructor" }],
                    "bin": "6080"
                }
            },
            "version": "0.8.4+commit.c7e474f2.Linux.g++"
        }"#;

        let artifact = artifact_from_combined_json(
            combined,
            ReleaseContract::TickbitTicket,
            "contracts/TickbitTicket.sol",
        )
        .unwrap();
        assert_eq!(artifact.bytecode, "0x6080");
        assert!(matches!(
            artifact.check_no_constructor_args(),
            Err(ScriptError::ArtifactParsing(_))
        ));
    }

    #[test]
    fn test_combined_json_with_string_abi() {
        let combined = r#"{
            "contracts": {
                "contracts/Tickbit.sol:Tickbit": { "abi": "[]", "bin": "" }
            }
        }"#;

        let artifact =
            artifact_from_combined_json(combined, ReleaseContract::Tickbit, "contracts/Tickbit.sol")
                .unwrap();
        assert!(artifact.abi.constructor.is_none());
        assert!(matches!(
            artifact.deployment_code(),
            Err(ScriptError::ArtifactParsing(_))
        ));

        let res = artifact_from_combined_json(
            combined,
            ReleaseContract::TickbitTicket,
            "contracts/TickbitTicket.sol",
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_solc_version_matching() {
        let output = "solc, the solidity compiler commandline interface\nVersion: 0.8.4+commit.c7e474f2.Linux.g++\n";
        assert!(solc_version_matches(output, "0.8.4"));
        assert!(!solc_version_matches(output, "0.8.1"));
        assert!(!solc_version_matches("Version: 0.8.40+commit.x\n", "0.8.4"));
    }
}

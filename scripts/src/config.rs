//! Static network and compiler configuration for the Tickbit project

use std::{fs, path::Path};

use tracing::debug;

use crate::{
    constants::{DEFAULT_LOCAL_PKEY, DEFAULT_LOCAL_RPC_URL, PROJECT_ID_PLACEHOLDER},
    errors::ScriptError,
    types::Network,
};

/// The Alchemy RPC URL template for Polygon Mumbai
const MUMBAI_RPC_URL_TEMPLATE: &str = "https://polygon-mumbai.g.alchemy.com/v2/{project_id}";

/// The Infura RPC URL template for Polygon mainnet
const MAINNET_RPC_URL_TEMPLATE: &str = "https://polygon-mainnet.infura.io/v3/{project_id}";

/// The compiler configuration the contracts are built with
pub const COMPILER: CompilerConfig = CompilerConfig {
    version: "0.8.4",
    optimizer: OptimizerConfig {
        enabled: true,
        runs: 200,
    },
};

/// Solidity compiler settings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// The exact `solc` version string
    pub version: &'static str,
    /// The optimizer settings
    pub optimizer: OptimizerConfig,
}

/// Solidity optimizer settings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Whether the optimizer runs at all
    pub enabled: bool,
    /// The number of optimization passes
    pub runs: u32,
}

/// Where the deployer's signing key comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccountSource {
    /// The first pre-funded account of a local development node
    LocalDevAccount,
    /// The private key stored in the secret file
    SecretFile,
}

/// A network definition, templated on the RPC provider project ID
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NetworkDefinition {
    /// The expected chain ID
    chain_id: u64,
    /// The RPC URL template
    url: &'static str,
    /// The RPC URL template of the network a local node forks from
    forking: Option<&'static str>,
    /// The signing key source
    accounts: AccountSource,
}

/// A fully resolved network configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The network this configuration was resolved for
    pub network: Network,
    /// The expected chain ID
    pub chain_id: u64,
    /// The RPC URL
    pub url: String,
    /// The RPC URL of the forked network, if the node is a fork
    pub forking: Option<String>,
    /// The signing key source
    pub accounts: AccountSource,
}

impl Network {
    /// The static definition of this network
    fn definition(&self) -> NetworkDefinition {
        match self {
            Network::Hardhat => NetworkDefinition {
                chain_id: 1337,
                url: DEFAULT_LOCAL_RPC_URL,
                forking: Some(MUMBAI_RPC_URL_TEMPLATE),
                accounts: AccountSource::LocalDevAccount,
            },
            Network::Mumbai => NetworkDefinition {
                chain_id: 80001,
                url: MUMBAI_RPC_URL_TEMPLATE,
                forking: None,
                accounts: AccountSource::SecretFile,
            },
            Network::Mainnet => NetworkDefinition {
                chain_id: 137,
                url: MAINNET_RPC_URL_TEMPLATE,
                forking: None,
                accounts: AccountSource::SecretFile,
            },
        }
    }

    /// Resolve the network configuration.
    ///
    /// `rpc_url` overrides the network's own URL. The project ID is only
    /// required when the URL that is actually used embeds it.
    pub fn config(
        &self,
        project_id: Option<&str>,
        rpc_url: Option<&str>,
    ) -> Result<NetworkConfig, ScriptError> {
        let definition = self.definition();

        let url = match rpc_url {
            Some(url) => url.to_string(),
            None => fill_project_id(definition.url, project_id)?,
        };

        // The fork source is informational, a missing project ID leaves it unresolved
        let forking = definition
            .forking
            .and_then(|template| fill_project_id(template, project_id).ok());

        Ok(NetworkConfig {
            network: *self,
            chain_id: definition.chain_id,
            url,
            forking,
            accounts: definition.accounts,
        })
    }
}

/// Substitute the project ID into an RPC URL template
fn fill_project_id(template: &str, project_id: Option<&str>) -> Result<String, ScriptError> {
    if !template.contains(PROJECT_ID_PLACEHOLDER) {
        return Ok(template.to_string());
    }

    match project_id {
        Some(id) if !id.trim().is_empty() => {
            Ok(template.replace(PROJECT_ID_PLACEHOLDER, id.trim()))
        }
        _ => Err(ScriptError::Config(
            "an RPC provider project ID is required for this network".to_string(),
        )),
    }
}

/// Resolve the private key to sign the deployment with.
///
/// An explicit key always wins; otherwise the key comes from the network's
/// account source.
pub fn resolve_private_key(
    config: &NetworkConfig,
    priv_key: Option<&str>,
    secret_path: &Path,
) -> Result<String, ScriptError> {
    if let Some(key) = priv_key {
        return Ok(key.trim().to_string());
    }

    match config.accounts {
        AccountSource::LocalDevAccount => Ok(DEFAULT_LOCAL_PKEY.to_string()),
        AccountSource::SecretFile => read_secret_key(secret_path),
    }
}

/// Read the deployer's private key from the secret file
pub fn read_secret_key(secret_path: &Path) -> Result<String, ScriptError> {
    debug!("Reading signing key from {}", secret_path.display());
    let key = fs::read_to_string(secret_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", secret_path.display(), e)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ScriptError::Config(format!(
            "secret file {} is empty",
            secret_path.display()
        )));
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{
        constants::{DEFAULT_LOCAL_PKEY, DEFAULT_LOCAL_RPC_URL},
        errors::ScriptError,
        types::Network,
    };

    use super::{resolve_private_key, AccountSource, COMPILER};

    #[test]
    fn test_hardhat_needs_no_project_id() {
        let config = Network::Hardhat.config(None, None).unwrap();
        assert_eq!(config.chain_id, 1337);
        assert_eq!(config.url, DEFAULT_LOCAL_RPC_URL);
        assert_eq!(config.forking, None);
        assert_eq!(config.accounts, AccountSource::LocalDevAccount);
    }

    #[test]
    fn test_fork_source_resolved_with_project_id() {
        let config = Network::Hardhat.config(Some("abc"), None).unwrap();
        assert_eq!(
            config.forking.as_deref(),
            Some("https://polygon-mumbai.g.alchemy.com/v2/abc")
        );
    }

    #[test]
    fn test_remote_networks_fill_project_id() {
        let mumbai = Network::Mumbai.config(Some("abc"), None).unwrap();
        assert_eq!(mumbai.chain_id, 80001);
        assert_eq!(mumbai.url, "https://polygon-mumbai.g.alchemy.com/v2/abc");

        let mainnet = Network::Mainnet.config(Some("abc"), None).unwrap();
        assert_eq!(mainnet.chain_id, 137);
        assert_eq!(mainnet.url, "https://polygon-mainnet.infura.io/v3/abc");
        assert_eq!(mainnet.accounts, AccountSource::SecretFile);
    }

    #[test]
    fn test_remote_network_without_project_id() {
        let res = Network::Mumbai.config(None, None);
        assert!(matches!(res, Err(ScriptError::Config(_))));

        let res = Network::Mainnet.config(Some("  "), None);
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_rpc_url_override() {
        let config = Network::Mainnet
            .config(None, Some("http://127.0.0.1:9545"))
            .unwrap();
        assert_eq!(config.url, "http://127.0.0.1:9545");
        assert_eq!(config.chain_id, 137);
    }

    #[test]
    fn test_private_key_resolution() {
        let hardhat = Network::Hardhat.config(None, None).unwrap();
        let missing = Path::new("/nonexistent/.secret");

        let key = resolve_private_key(&hardhat, None, missing).unwrap();
        assert_eq!(key, DEFAULT_LOCAL_PKEY);

        let key = resolve_private_key(&hardhat, Some(" 0x01 \n"), missing).unwrap();
        assert_eq!(key, "0x01");

        let mumbai = Network::Mumbai.config(Some("abc"), None).unwrap();
        let res = resolve_private_key(&mumbai, None, missing);
        assert!(matches!(res, Err(ScriptError::ReadFile(_))));
    }

    #[test]
    fn test_compiler_settings() {
        assert_eq!(COMPILER.version, "0.8.4");
        assert!(COMPILER.optimizer.enabled);
        assert_eq!(COMPILER.optimizer.runs, 200);
    }
}

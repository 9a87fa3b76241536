//! Definitions of CLI arguments and commands for the release scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, propagate_address},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_BACKOFFICE_ROOT, DEFAULT_PROJECT_ROOT, DEFAULT_SECRET_PATH,
        DEFAULT_WEB_ROOT, NUM_DEPLOY_CONFIRMATIONS,
    },
    errors::ScriptError,
    propagate::ReleasePaths,
    types::{Network, ReleaseContract},
};

/// Deploy the Tickbit contracts and propagate their addresses
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The release scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract from its compiled artifact
    Deploy(DeployArgs),
    /// Propagate a deployed contract's address into the files referencing it
    Propagate(PropagateArgs),
}

impl Command {
    /// Run the script
    pub async fn run(self) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args).await.map(|_| ()),
            Command::Propagate(args) => propagate_address(args).map(|_| ()),
        }
    }
}

/// The locations of the projects the release scripts touch
#[derive(Args, Clone)]
pub struct PathArgs {
    /// Root of the contracts project
    #[arg(long, default_value = DEFAULT_PROJECT_ROOT)]
    pub project_root: PathBuf,

    /// Root of the back-office front-end project
    #[arg(long, default_value = DEFAULT_BACKOFFICE_ROOT)]
    pub backoffice_root: PathBuf,

    /// Root of the public web front-end project
    #[arg(long, default_value = DEFAULT_WEB_ROOT)]
    pub web_root: PathBuf,
}

impl From<PathArgs> for ReleasePaths {
    fn from(args: PathArgs) -> Self {
        ReleasePaths {
            project_root: args.project_root,
            backoffice_root: args.backoffice_root,
            web_root: args.web_root,
        }
    }
}

/// Deploy a contract from its compiled artifact.
///
/// The contract is deployed with no constructor arguments, and its address is
/// printed as `<Name> deployed to: <address>`.
#[derive(Args)]
pub struct DeployArgs {
    /// The contract to deploy
    #[arg(short, long, default_value = "tickbit")]
    pub contract: ReleaseContract,

    /// The network to deploy to
    #[arg(short, long, default_value = "hardhat")]
    pub network: Network,

    /// Network RPC URL, overrides the network's own
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// RPC provider project ID, filled into the network's RPC URL
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Private key of the deployer, overrides the network's account
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// File holding the deployer's private key for remote networks
    #[arg(long, default_value = DEFAULT_SECRET_PATH)]
    pub secret_path: PathBuf,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Compile the contract with `solc` before deploying
    #[arg(long)]
    pub compile: bool,

    /// Number of confirmations to wait for
    #[arg(long, default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Also write the deployer output to the contract's bookkeeping record
    #[arg(long)]
    pub record: bool,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub paths: PathArgs,
}

/// Propagate a deployed contract's address from its bookkeeping record into
/// the Solidity sources and front-end configs
#[derive(Args)]
pub struct PropagateArgs {
    /// The contract whose address to propagate
    #[arg(short, long, default_value = "tickbit")]
    pub contract: ReleaseContract,

    /// Plan the changes and log them without writing any file
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub paths: PathArgs,
}

//! Definitions of errors that can occur during the execution of the release scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the release scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error reading a bookkeeping, source, config, or secret file
    ReadFile(String),
    /// Error writing a bookkeeping, source, config, or artifact file
    WriteFile(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error compiling a Solidity contract
    ContractCompilation(String),
    /// Error resolving the network or signer configuration
    Config(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// The bookkeeping record does not hold a well-formed address
    AddressExtraction(String),
    /// An expected marker, delimiter, or line is missing from a target file
    PatternMismatch(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contract: {}", s),
            ScriptError::Config(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::AddressExtraction(s) => write!(f, "error extracting address: {}", s),
            ScriptError::PatternMismatch(s) => write!(f, "address site not found: {}", s),
        }
    }
}

impl Error for ScriptError {}

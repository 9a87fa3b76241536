//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::{
    SOLIDITY_ADDRESS_MARKER, SOLIDITY_ADDRESS_TERMINATOR, TICKBIT_BOOKKEEPING_FILE,
    TICKBIT_CONFIG_LINE, TICKBIT_TICKET_BOOKKEEPING_FILE, TICKBIT_TICKET_CONFIG_LINE,
};

/// The contracts that are released through these scripts
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReleaseContract {
    /// The Tickbit marketplace contract
    Tickbit,
    /// The TickbitTicket NFT contract, which references the Tickbit contract
    TickbitTicket,
}

impl ReleaseContract {
    /// The Solidity contract name, as used for sources and artifacts
    pub fn contract_name(&self) -> &'static str {
        match self {
            ReleaseContract::Tickbit => "Tickbit",
            ReleaseContract::TickbitTicket => "TickbitTicket",
        }
    }

    /// The file name of the contract's bookkeeping record
    pub fn bookkeeping_file(&self) -> &'static str {
        match self {
            ReleaseContract::Tickbit => TICKBIT_BOOKKEEPING_FILE,
            ReleaseContract::TickbitTicket => TICKBIT_TICKET_BOOKKEEPING_FILE,
        }
    }

    /// The site in `TickbitTicket.sol` referencing this contract, if any
    pub fn solidity_site(&self) -> Option<AddressSite> {
        match self {
            ReleaseContract::Tickbit => Some(AddressSite::SolidityCall {
                marker: SOLIDITY_ADDRESS_MARKER,
                terminator: SOLIDITY_ADDRESS_TERMINATOR,
            }),
            ReleaseContract::TickbitTicket => None,
        }
    }

    /// The site in the front-end config files holding this contract's address
    pub fn config_site(&self) -> AddressSite {
        let line = match self {
            ReleaseContract::Tickbit => TICKBIT_CONFIG_LINE,
            ReleaseContract::TickbitTicket => TICKBIT_TICKET_CONFIG_LINE,
        };

        AddressSite::ConfigLine { line }
    }
}

impl Display for ReleaseContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contract_name())
    }
}

/// A location inside a source or config file where a contract address literal appears
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressSite {
    /// The text between the first `marker` and the following `terminator`
    SolidityCall {
        /// The call-expression prefix preceding the address
        marker: &'static str,
        /// The statement terminator following the address
        terminator: &'static str,
    },
    /// The first address-length run of characters of the first quoted value on
    /// the given zero-based line
    ConfigLine {
        /// The line index
        line: usize,
    },
}

impl Display for AddressSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSite::SolidityCall { marker, terminator } => {
                write!(f, "`{marker}...{terminator}`")
            }
            AddressSite::ConfigLine { line } => write!(f, "quoted value on line {}", line + 1),
        }
    }
}

/// The networks contracts can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Network {
    /// A local development node forked from Polygon Mumbai
    #[default]
    Hardhat,
    /// The Polygon Mumbai testnet
    Mumbai,
    /// Polygon mainnet
    Mainnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Hardhat => write!(f, "hardhat"),
            Network::Mumbai => write!(f, "mumbai"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

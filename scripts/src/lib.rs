//! Scripts for deploying the Tickbit smart contracts and propagating their
//! addresses into the projects that reference them.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod propagate;
pub mod types;
pub mod utils;

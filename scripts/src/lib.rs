//! A command line client for compiling, deploying & interacting with StarkNet
//! contracts, keeping track of deployments and accounts in flat files.

#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod registry;
pub mod signer;
pub mod starknet_cli;
pub mod types;

//! Flat-file registries of the contracts & accounts deployed on each network.
//!
//! Each network gets its own `{network}.deployments.txt` (an append-only log of
//! `address:abi[:alias]` lines) and `{network}.accounts.json` (a JSON object
//! keyed by public key). Writers serialize through a per-file lock.

mod accounts;
mod deployments;
mod lock;

pub use accounts::{AccountRecord, Accounts, AccountsWriter};
pub use deployments::{DeploymentRecord, Deployments, Identifier};

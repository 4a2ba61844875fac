//! Common modules used throughout the project: number normalization, the
//! call-array encoding expected by account contracts, and the types they share

#![deny(missing_docs)]

pub mod call_array;
pub mod constants;
pub mod errors;
pub mod numbers;
pub mod transaction;
pub mod types;

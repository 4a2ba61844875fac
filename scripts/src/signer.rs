//! The account owner's signing key, read from the environment.
//!
//! Public key derivation & ECDSA signing are delegated to the `starknet` crate.

use std::env;

use num_bigint::BigUint;
use sarayu_common::numbers::{from_felt, normalize_number, to_felt};
use starknet::{core::types::FieldElement, signers::SigningKey};

use crate::errors::SarayuError;

/// A private key held in memory for the duration of a command
pub struct Signer {
    /// The underlying signing key
    key: SigningKey,
}

impl Signer {
    /// Reads a decimal or hex private key from the given environment variable,
    /// returning `None` if the variable is unset
    pub fn from_env(var: &str) -> Result<Option<Self>, SarayuError> {
        match env::var(var) {
            Ok(value) => Self::from_secret(&value).map(Some),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(SarayuError::Config(format!("{var}: {e}"))),
        }
    }

    /// Builds a signer from a decimal or hex private key
    pub fn from_secret(secret: &str) -> Result<Self, SarayuError> {
        let scalar = to_felt(&normalize_number(secret.trim())?)?;
        Ok(Signer {
            key: SigningKey::from_secret_scalar(scalar),
        })
    }

    /// The public key matching the private key
    pub fn public_key(&self) -> BigUint {
        from_felt(self.key.verifying_key().scalar())
    }

    /// Signs a transaction hash, returning the `(r, s)` pair
    pub fn sign(&self, hash: &FieldElement) -> Result<(BigUint, BigUint), SarayuError> {
        let signature = self
            .key
            .sign(hash)
            .map_err(|e| SarayuError::Signing(e.to_string()))?;

        Ok((from_felt(signature.r), from_felt(signature.s)))
    }
}

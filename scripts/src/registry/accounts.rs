//! The accounts deployed by `setup`, stored as a JSON object keyed by public key

use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use num_bigint::BigUint;
use sarayu_common::numbers::{hex_address, normalize_number};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::{config::Network, errors::SarayuError};

use super::lock::RegistryLock;

/// An account contract owned by a local private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// The public key the account was deployed with
    pub public_key: BigUint,
    /// The address of the account contract
    pub address: BigUint,
    /// The number of accounts registered before this one
    pub index: u32,
    /// The name of the environment variable holding the private key
    pub alias: String,
}

/// The on-disk shape of an account, keyed by its hex public key
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    address: String,
    index: u32,
    alias: String,
}

type AccountsFile = BTreeMap<String, StoredAccount>;

fn account_key(public_key: &BigUint) -> String {
    format!("{:#x}", public_key)
}

/// The accounts registry of a single network
#[derive(Debug, Clone)]
pub struct Accounts {
    /// The path of the `{network}.accounts.json` file
    path: PathBuf,
}

impl Accounts {
    /// The accounts registry of `network`, stored under `root`
    pub fn new(root: &Path, network: Network) -> Self {
        Accounts {
            path: root.join(format!("{network}.accounts.json")),
        }
    }

    /// The path of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the account deployed for `public_key`, creating an empty registry
    /// file if there is none yet
    pub fn load(&self, public_key: &BigUint) -> Result<Option<AccountRecord>, SarayuError> {
        self.ensure_file()?;

        let Some(stored) = self.read()?.remove(&account_key(public_key)) else {
            return Ok(None);
        };

        Ok(Some(AccountRecord {
            public_key: public_key.clone(),
            address: normalize_number(&stored.address)?,
            index: stored.index,
            alias: stored.alias,
        }))
    }

    /// Whether an account is registered for `public_key`
    pub fn exists(&self, public_key: &BigUint) -> Result<bool, SarayuError> {
        Ok(self.load(public_key)?.is_some())
    }

    /// The number of registered accounts, i.e. the index of the next account
    pub fn current_index(&self) -> Result<u32, SarayuError> {
        self.ensure_file()?;
        count(&self.read()?)
    }

    /// Registers an account, failing if one exists for the public key
    pub fn register(
        &self,
        public_key: &BigUint,
        address: &BigUint,
        index: u32,
        alias: &str,
    ) -> Result<(), SarayuError> {
        self.lock()?.register(public_key, address, index, alias)
    }

    /// Takes the registry lock, so that the next index can be read & claimed
    /// without another process registering in between
    pub fn lock(&self) -> Result<AccountsWriter<'_>, SarayuError> {
        let lock = RegistryLock::acquire(&self.path)?;
        self.ensure_file()?;

        Ok(AccountsWriter {
            accounts: self,
            _lock: lock,
        })
    }

    fn ensure_file(&self) -> Result<(), SarayuError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => file
                .write_all(b"{}")
                .map_err(|e| SarayuError::WriteFile(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(SarayuError::WriteFile(e.to_string())),
        }
    }

    fn read(&self) -> Result<AccountsFile, SarayuError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| SarayuError::ReadFile(e.to_string()))?;
        if contents.trim().is_empty() {
            return Ok(AccountsFile::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            SarayuError::Serde(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write(&self, accounts: &AccountsFile) -> Result<(), SarayuError> {
        let contents =
            serde_json::to_string(accounts).map_err(|e| SarayuError::Serde(e.to_string()))?;

        // Rewrite through a sibling temp file so readers never see a partial file
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| SarayuError::WriteFile(e.to_string()))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| SarayuError::WriteFile(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| SarayuError::WriteFile(e.to_string()))?;

        Ok(())
    }
}

fn count(accounts: &AccountsFile) -> Result<u32, SarayuError> {
    u32::try_from(accounts.len())
        .map_err(|_| SarayuError::InvalidRecord("too many accounts".to_string()))
}

/// Exclusive access to an accounts registry, released when dropped
#[derive(Debug)]
pub struct AccountsWriter<'a> {
    accounts: &'a Accounts,
    _lock: RegistryLock,
}

impl AccountsWriter<'_> {
    /// The number of registered accounts, i.e. the index of the next account
    pub fn current_index(&self) -> Result<u32, SarayuError> {
        count(&self.accounts.read()?)
    }

    /// Whether an account is registered for `public_key`
    pub fn exists(&self, public_key: &BigUint) -> Result<bool, SarayuError> {
        Ok(self.accounts.read()?.contains_key(&account_key(public_key)))
    }

    /// Registers an account, failing if one exists for the public key
    pub fn register(
        &mut self,
        public_key: &BigUint,
        address: &BigUint,
        index: u32,
        alias: &str,
    ) -> Result<(), SarayuError> {
        let path = self.accounts.path();
        let mut accounts = self.accounts.read()?;

        let key = account_key(public_key);
        if accounts.contains_key(&key) {
            return Err(SarayuError::DuplicateAccount(format!(
                "account-{} already exists in {}",
                index,
                path.display()
            )));
        }

        info!("📦 Registering account-{} in {}", index, path.display());
        accounts.insert(
            key,
            StoredAccount {
                address: hex_address(address)?,
                index,
                alias: alias.to_string(),
            },
        );

        self.accounts.write(&accounts)
    }
}

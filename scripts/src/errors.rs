//! Definitions of errors that can occur while running `sarayu` commands

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use sarayu_common::errors::{FormatError, ValidationError};

/// Errors that can occur during the execution of a command
#[derive(Debug)]
pub enum SarayuError {
    /// A number, address or short string was malformed
    Format(FormatError),
    /// A call could not be built or encoded
    Validation(ValidationError),
    /// The alias is already registered in the network's deployments file
    DuplicateAlias(String),
    /// The public key is already registered in the network's accounts file
    DuplicateAccount(String),
    /// A registry entry cannot be represented in the registry file format
    InvalidRecord(String),
    /// The output of an external process did not have the expected shape
    Parse(String),
    /// An external process exited unsuccessfully
    ExternalProcess(String),
    /// An external binary could not be found
    MissingBinary(String),
    /// One or more contracts failed to compile
    ContractCompilation(String),
    /// A required environment variable is missing or malformed
    Config(String),
    /// The network is not one of the supported networks
    UnsupportedNetwork(String),
    /// No deployment matches the given address or alias
    DeploymentNotFound(String),
    /// A field is missing from the response of the external client
    MissingField(String),
    /// Error reading a registry or artifact file
    ReadFile(String),
    /// Error writing a registry or artifact file
    WriteFile(String),
    /// Error de/serializing a JSON document
    Serde(String),
    /// Error signing a transaction
    Signing(String),
    /// Another process holds the registry lock
    RegistryLocked(String),
}

impl Display for SarayuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SarayuError::Format(e) => write!(f, "format error: {}", e),
            SarayuError::Validation(e) => write!(f, "validation error: {}", e),
            SarayuError::DuplicateAlias(s) => write!(f, "duplicate alias: {}", s),
            SarayuError::DuplicateAccount(s) => write!(f, "duplicate account: {}", s),
            SarayuError::InvalidRecord(s) => write!(f, "invalid registry record: {}", s),
            SarayuError::Parse(s) => write!(f, "error parsing output: {}", s),
            SarayuError::ExternalProcess(s) => write!(f, "external process failed: {}", s),
            SarayuError::MissingBinary(s) => write!(f, "could not find binary: {}", s),
            SarayuError::ContractCompilation(s) => write!(f, "error compiling contracts: {}", s),
            SarayuError::Config(s) => write!(f, "configuration error: {}", s),
            SarayuError::UnsupportedNetwork(s) => write!(f, "unsupported network: {}", s),
            SarayuError::DeploymentNotFound(s) => write!(f, "deployment not found: {}", s),
            SarayuError::MissingField(s) => write!(f, "missing field in response: {}", s),
            SarayuError::ReadFile(s) => write!(f, "error reading file: {}", s),
            SarayuError::WriteFile(s) => write!(f, "error writing file: {}", s),
            SarayuError::Serde(s) => write!(f, "error de/serializing JSON: {}", s),
            SarayuError::Signing(s) => write!(f, "error signing transaction: {}", s),
            SarayuError::RegistryLocked(s) => write!(f, "registry is locked: {}", s),
        }
    }
}

impl Error for SarayuError {}

impl From<FormatError> for SarayuError {
    fn from(e: FormatError) -> Self {
        SarayuError::Format(e)
    }
}

impl From<ValidationError> for SarayuError {
    fn from(e: ValidationError) -> Self {
        SarayuError::Validation(e)
    }
}

//! Type definitions shared by the encoder & the command line client

use num_bigint::BigUint;

use crate::{
    errors::ValidationError,
    numbers::{normalize_number, parse_argument},
};

/// A single logical call: a function on a target contract with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The address of the contract being called
    pub target_address: BigUint,
    /// The name of the entrypoint being called
    pub function_name: String,
    /// The calldata of the call
    pub arguments: Vec<BigUint>,
}

impl Call {
    /// Builds a call, rejecting function names no selector can be derived from
    pub fn new(
        target_address: BigUint,
        function_name: impl Into<String>,
        arguments: Vec<BigUint>,
    ) -> Result<Self, ValidationError> {
        let function_name = function_name.into();
        if function_name.is_empty() {
            return Err(ValidationError::EmptyFunctionName);
        }
        if !function_name.is_ascii() {
            return Err(ValidationError::NonAsciiFunctionName(function_name));
        }

        Ok(Call {
            target_address,
            function_name,
            arguments,
        })
    }

    /// Builds a call from raw tokens of the form `target function [args...]`
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ValidationError> {
        let [target, function_name, args @ ..] = tokens else {
            return Err(ValidationError::InvalidCallShape(tokens.len()));
        };

        let arguments = args
            .iter()
            .map(|arg| parse_argument(arg.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Call::new(
            normalize_number(target.as_ref())?,
            function_name.as_ref(),
            arguments,
        )
    }
}

/// An entry of the call array expected by an account's `__execute__` entrypoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArrayEntry {
    /// The address of the contract being called
    pub to: BigUint,
    /// The selector of the entrypoint being called
    pub selector: BigUint,
    /// The offset of this call's arguments in the shared calldata
    pub data_offset: u32,
    /// The number of arguments this call consumes from the shared calldata
    pub data_length: u32,
}

//! Encoding of a batch of calls into the `(call_array, calldata)` layout
//! taken by an account contract's `__execute__` entrypoint.
//!
//! Each call contributes one [`CallArrayEntry`] and a contiguous slice of the
//! shared calldata buffer. The entry's `data_offset` indexes into the
//! concatenation of all calls' arguments, in call order.

use std::iter;

use num_bigint::BigUint;
use starknet::core::utils::get_selector_from_name;

use crate::{
    errors::ValidationError,
    numbers::from_felt,
    types::{Call, CallArrayEntry},
};

/// Derives the entrypoint selector for a function name
pub fn selector_from_name(function_name: &str) -> Result<BigUint, ValidationError> {
    get_selector_from_name(function_name)
        .map(from_felt)
        .map_err(|_| ValidationError::NonAsciiFunctionName(function_name.to_string()))
}

/// Transforms a list of calls into a call array & the shared calldata buffer
pub fn encode(calls: &[Call]) -> Result<(Vec<CallArrayEntry>, Vec<BigUint>), ValidationError> {
    let mut call_array = Vec::with_capacity(calls.len());
    let mut calldata = Vec::new();

    for call in calls {
        let data_offset =
            u32::try_from(calldata.len()).map_err(|_| ValidationError::CalldataTooLong)?;
        let data_length =
            u32::try_from(call.arguments.len()).map_err(|_| ValidationError::CalldataTooLong)?;

        call_array.push(CallArrayEntry {
            to: call.target_address.clone(),
            selector: selector_from_name(&call.function_name)?,
            data_offset,
            data_length,
        });
        calldata.extend(call.arguments.iter().cloned());
    }

    Ok((call_array, calldata))
}

/// Flattens an encoded batch into the inputs of `__execute__`:
/// `[len(call_array), (to, selector, offset, length)*, len(calldata), calldata*]`
pub fn execute_calldata(call_array: &[CallArrayEntry], calldata: &[BigUint]) -> Vec<BigUint> {
    iter::once(BigUint::from(call_array.len()))
        .chain(call_array.iter().flat_map(|entry| {
            [
                entry.to.clone(),
                entry.selector.clone(),
                BigUint::from(entry.data_offset),
                BigUint::from(entry.data_length),
            ]
        }))
        .chain(iter::once(BigUint::from(calldata.len())))
        .chain(calldata.iter().cloned())
        .collect()
}

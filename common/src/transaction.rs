//! Computation of the invoke transaction hash signed by the account owner.
//!
//! The hash itself is the external library's Pedersen hash chain; this module
//! only fixes the order of the fields it commits to.

use num_bigint::BigUint;
use starknet::core::{crypto::compute_hash_on_elements, types::FieldElement};

use crate::{
    constants::{EXECUTE_HASH_SELECTOR, INVOKE_TX_HASH_PREFIX, TRANSACTION_VERSION},
    errors::FormatError,
    numbers::{str_to_felt, to_felt},
};

/// Computes the hash of a v1 invoke transaction sent through an account's
/// `__execute__` entrypoint:
///
/// `h(prefix, version, sender, 0, h(calldata), max_fee, chain_id, nonce)`
pub fn invoke_transaction_hash(
    sender: &BigUint,
    execute_calldata: &[BigUint],
    max_fee: &BigUint,
    chain_id: FieldElement,
    nonce: &BigUint,
) -> Result<FieldElement, FormatError> {
    let calldata = execute_calldata
        .iter()
        .map(to_felt)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(compute_hash_on_elements(&[
        to_felt(&str_to_felt(INVOKE_TX_HASH_PREFIX)?)?,
        FieldElement::from(TRANSACTION_VERSION),
        to_felt(sender)?,
        FieldElement::from(EXECUTE_HASH_SELECTOR),
        compute_hash_on_elements(&calldata),
        to_felt(max_fee)?,
        chain_id,
        to_felt(nonce)?,
    ]))
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use starknet::core::{chain_id, crypto::compute_hash_on_elements, types::FieldElement};

    use super::invoke_transaction_hash;

    #[test]
    fn test_hash_commits_to_nonce_and_chain() {
        let sender = BigUint::from(0x1234u32);
        let calldata = vec![BigUint::from(1u32), BigUint::from(2u32)];
        let max_fee = BigUint::from(1000u32);

        let hash = |nonce: u32, chain: FieldElement| {
            invoke_transaction_hash(&sender, &calldata, &max_fee, chain, &BigUint::from(nonce))
                .unwrap()
        };

        assert_eq!(hash(0, chain_id::TESTNET), hash(0, chain_id::TESTNET));
        assert_ne!(hash(0, chain_id::TESTNET), hash(1, chain_id::TESTNET));
        assert_ne!(hash(0, chain_id::TESTNET), hash(0, chain_id::MAINNET));
    }

    #[test]
    fn test_hash_field_order() {
        let sender = BigUint::from(0x1234u32);
        let calldata = vec![BigUint::from(7u32), BigUint::from(8u32), BigUint::from(9u32)];
        let max_fee = BigUint::from(1000u32);
        let nonce = BigUint::from(5u32);

        let felt = |n: u64| FieldElement::from(n);
        let expected = compute_hash_on_elements(&[
            // "invoke" as a short string
            FieldElement::from_hex_be("0x696e766f6b65").unwrap(),
            felt(1),
            felt(0x1234),
            felt(0),
            compute_hash_on_elements(&[felt(7), felt(8), felt(9)]),
            felt(1000),
            chain_id::TESTNET,
            felt(5),
        ]);

        let hash =
            invoke_transaction_hash(&sender, &calldata, &max_fee, chain_id::TESTNET, &nonce)
                .unwrap();
        assert_eq!(hash, expected);

        // Swapping the sender & max fee gives another hash
        let swapped =
            invoke_transaction_hash(&max_fee, &calldata, &sender, chain_id::TESTNET, &nonce)
                .unwrap();
        assert_ne!(swapped, expected);
    }

    #[test]
    fn test_hash_rejects_oversized_values() {
        let too_big = (BigUint::from(1u32) << 256) - 1u32;
        assert!(invoke_transaction_hash(
            &too_big,
            &[],
            &BigUint::from(0u32),
            chain_id::TESTNET,
            &BigUint::from(0u32),
        )
        .is_err());
    }
}

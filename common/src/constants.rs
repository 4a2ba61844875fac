//! Constants shared by the encoding & normalization logic

/// The prefix marking a hex-encoded number
pub const HEX_PREFIX: &str = "0x";

/// The number of hex digits in a padded StarkNet address
pub const ADDRESS_HEX_DIGITS: usize = 64;

/// The maximum number of ASCII characters that fit in a single felt
pub const MAX_SHORT_STRING_LEN: usize = 31;

/// The name of the account contract entrypoint through which all
/// transactions are executed
pub const EXECUTE_ENTRYPOINT: &str = "__execute__";

/// The invoke transaction version whose hash commits to the account nonce
pub const TRANSACTION_VERSION: u64 = 1;

/// The short string prefixing the invoke transaction hash
pub const INVOKE_TX_HASH_PREFIX: &str = "invoke";

/// The selector used in the transaction hash of an account `__execute__` call
pub const EXECUTE_HASH_SELECTOR: u64 = 0;

/// The max fee attached to invoke transactions when none is given, in wei
pub const DEFAULT_MAX_FEE: u64 = 1_000_000_000_000_000;

//! Constants used by the `sarayu` commands

/// The directory in which compiled contracts are written
pub const OUTPUT_DIR: &str = "artifacts";

/// The directory in which contract ABIs are written
pub const ABIS_DIR: &str = "artifacts/abis";

/// The directory searched for contracts when none are given
pub const CONTRACTS_DIR: &str = "contracts";

/// The extension of Cairo source files
pub const CAIRO_EXTENSION: &str = "cairo";

/// The extension of compiled contracts & ABIs
pub const JSON_EXTENSION: &str = "json";

/// The compiled account contract deployed by `setup`
pub const ACCOUNT_CONTRACT_PATH: &str = "artifacts/Account.json";

/// The ABI of the account contract deployed by `setup`
pub const ACCOUNT_ABI_PATH: &str = "artifacts/abis/Account.json";

/// The prefix of the alias under which account deployments are registered
pub const ACCOUNT_ALIAS_PREFIX: &str = "account";

/// The environment variable holding the private key by default
pub const DEFAULT_PKEY_ENV_VAR: &str = "STARKNET_PRIVATE_KEY";

/// The environment variable selecting the network of the `starknet` CLI
pub const STARKNET_NETWORK_ENV_VAR: &str = "STARKNET_NETWORK";

/// The environment variable forcing the local devnet as default network
pub const STARKNET_LOCAL_NET_ENV_VAR: &str = "STARKNET_LOCAL_NET";

/// The environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "SARAYU_LOG";

/// The gateway of the local devnet
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:5050/";

/// The host the local devnet binds to by default
pub const DEFAULT_DEVNET_HOST: &str = "127.0.0.1";

/// The port the local devnet listens on by default
pub const DEFAULT_DEVNET_PORT: u16 = 5050;

/// The script appended to by `setlocal`
pub const DEFAULT_ACTIVATE_SCRIPT: &str = "bin/activate";

/// The line `setlocal` appends to the activation script
pub const LOCAL_NET_EXPORT: &str = "export STARKNET_LOCAL_NET=1";

/// The name of the StarkNet CLI binary
pub const STARKNET_COMMAND: &str = "starknet";

/// The name of the Cairo compiler binary
pub const STARKNET_COMPILE_COMMAND: &str = "starknet-compile";

/// The name of the local devnet binary
pub const STARKNET_DEVNET_COMMAND: &str = "starknet-devnet";

/// The flag disabling the `starknet` CLI's own account handling
pub const NO_WALLET_FLAG: &str = "--no_wallet";

/// Error emitted by the network when a transaction carries no fee
pub const MAX_FEE_ERROR: &str = "max_fee must be bigger than 0";

/// Error emitted by the network when a transaction bypasses an account
pub const EXECUTE_ENTRYPOINT_ERROR: &str =
    "transactions should go through the __execute__ entrypoint.";

/// The suffix of the lock file guarding a registry file
pub const LOCK_FILE_SUFFIX: &str = ".lock";

/// The number of attempts made to acquire a registry lock
pub const LOCK_ATTEMPTS: usize = 50;

/// The delay between attempts to acquire a registry lock, in milliseconds
pub const LOCK_RETRY_INTERVAL_MS: u64 = 100;

//! Implementations of the `sarayu` commands

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use num_bigint::BigUint;
use sarayu_common::{
    call_array::{encode, execute_calldata},
    numbers::{hex_address, normalize_number, parse_argument},
    transaction::invoke_transaction_hash,
    types::Call,
};
use tracing::{debug, error, info, warn};

use crate::{
    cli::{CallArgs, CompileArgs, DeployArgs, InvokeArgs, NodeArgs, SetLocalArgs, SetupArgs},
    config::{Network, NetworkConfig},
    constants::{
        ABIS_DIR, ACCOUNT_ABI_PATH, ACCOUNT_ALIAS_PREFIX, CAIRO_EXTENSION, CONTRACTS_DIR,
        JSON_EXTENSION, LOCAL_NET_EXPORT, OUTPUT_DIR,
    },
    errors::SarayuError,
    registry::{Accounts, Deployments, Identifier},
    signer::Signer,
    starknet_cli::{
        call_command, compile_command, deploy_command, devnet_command, execute, get_nonce_command,
        invoke_command, known_error_hint, parse_address_and_hash, tx_status_command,
        CommandRunner, ExternalCommand,
    },
    types::{TransactionReceipt, TransactionStatus},
};

/// What every command runs against: the external binaries & the project directory
/// holding the registries and artifacts
pub struct Context<R> {
    /// Runs the external binaries
    pub runner: R,
    /// The project directory, relative paths are resolved against it
    pub root: PathBuf,
}

impl<R: CommandRunner> Context<R> {
    /// A context running commands with `runner` in the project directory `root`
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        Context {
            runner,
            root: root.into(),
        }
    }

    /// The deployments registry of the network
    pub fn deployments(&self, network: Network) -> Deployments {
        Deployments::new(&self.root, network)
    }

    /// The accounts registry of the network
    pub fn accounts(&self, network: Network) -> Accounts {
        Accounts::new(&self.root, network)
    }

    fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

/// Deploys an account contract for the private key held in `args.pkey`,
/// returning its address, or `None` if nothing was deployed
pub fn setup(
    args: SetupArgs,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<Option<BigUint>, SarayuError> {
    let Some(signer) = Signer::from_env(&args.pkey)? else {
        error!(
            "❌ Cannot find {} in env.\nCheck spelling and that it exists.\n\
             Try moving the .env to the root of your project.",
            args.pkey
        );
        return Ok(None);
    };
    let public_key = signer.public_key();

    let accounts = ctx.accounts(network.network);
    if accounts.exists(&public_key)? {
        info!("Account exists...");
        return Ok(None);
    }

    info!("🚀 Deploying Account");
    let command = deploy_command(
        &ctx.path(&args.account_contract),
        &[public_key.to_string()],
        network,
    );
    debug!("{}", command);

    let output = execute(&ctx.runner, &command)?;
    let (address, tx_hash) = parse_address_and_hash(&output)?;
    info!("⏳ Deployment of Account successfully sent at {}", hex_address(&address)?);
    info!("🧾 Transaction hash: {:#x}", tx_hash);

    // Hold the accounts lock so that no other account claims the same index
    let mut writer = accounts.lock()?;
    if writer.exists(&public_key)? {
        return Err(SarayuError::DuplicateAccount(format!(
            "an account for {} was registered during deployment in {}",
            args.pkey,
            accounts.path().display()
        )));
    }
    let index = writer.current_index()?;
    ctx.deployments(network.network).register(
        &address,
        &args.account_abi,
        Some(&format!("{ACCOUNT_ALIAS_PREFIX}-{index}")),
    )?;
    writer.register(&public_key, &address, index, &args.pkey)?;

    Ok(Some(address))
}

/// Compiles the given contracts, or every contract in the contracts directory
pub fn compile(args: CompileArgs, ctx: &Context<impl CommandRunner>) -> Result<(), SarayuError> {
    let contracts_dir = ctx.path(args.directory.unwrap_or_else(|| CONTRACTS_DIR.into()));

    let output_dirs = [
        (OUTPUT_DIR, "output json files"),
        (ABIS_DIR, "compilation artifacts"),
    ];
    for (dir, purpose) in output_dirs {
        let dir = ctx.path(dir);
        if !dir.exists() {
            info!("📁 Creating {} to store {}", dir.display(), purpose);
            fs::create_dir_all(&dir).map_err(|e| SarayuError::WriteFile(e.to_string()))?;
        }
    }

    let contracts = if args.contracts.is_empty() {
        info!(
            "🤖 Compiling all Cairo contracts in the {} directory",
            contracts_dir.display()
        );
        find_contracts(&contracts_dir)?
    } else {
        args.contracts.iter().map(|c| ctx.path(c)).collect()
    };

    let mut failed = Vec::new();
    for contract in contracts {
        if !compile_contract(&contract, &contracts_dir, ctx)? {
            failed.push(contract);
        }
    }

    if failed.is_empty() {
        info!("✅ Done");
        return Ok(());
    }

    let plural = if failed.len() > 1 { "s" } else { "" };
    info!("🛑 Failed to compile the following {} contract{}:", failed.len(), plural);
    for contract in &failed {
        info!("   {}", contract.display());
    }

    Err(SarayuError::ContractCompilation(
        failed.iter().map(|c| c.display()).join(", "),
    ))
}

/// Compiles a single contract, returning whether the compiler succeeded
fn compile_contract(
    contract: &Path,
    contracts_dir: &Path,
    ctx: &Context<impl CommandRunner>,
) -> Result<bool, SarayuError> {
    let name = contract
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SarayuError::ReadFile(format!("invalid contract {}", contract.display())))?;
    info!("🔨 Compiling {}", contract.display());

    let command = compile_command(
        contract,
        contracts_dir,
        &ctx.path(OUTPUT_DIR).join(format!("{name}.{JSON_EXTENSION}")),
        &ctx.path(ABIS_DIR).join(format!("{name}.{JSON_EXTENSION}")),
    );
    debug!("{}", command);

    let output = ctx.runner.output(&command)?;
    if !output.success {
        warn!("{}", output.stderr.trim());
    }

    Ok(output.success)
}

/// Recursively lists the Cairo sources under `dir`, in path order
fn find_contracts(dir: &Path) -> Result<Vec<PathBuf>, SarayuError> {
    let mut contracts = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| SarayuError::ReadFile(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| SarayuError::ReadFile(e.to_string()))?
            .path();
        if path.is_dir() {
            contracts.extend(find_contracts(&path)?);
        } else if path.extension().is_some_and(|ext| ext == CAIRO_EXTENSION) {
            contracts.push(path);
        }
    }

    contracts.sort();
    Ok(contracts)
}

/// Runs the local devnet in the foreground until it exits
pub fn node(args: NodeArgs, ctx: &Context<impl CommandRunner>) -> Result<(), SarayuError> {
    let command = devnet_command(&args.host, args.port, args.seed);
    debug!("{}", command);

    match ctx.runner.status(&command) {
        Ok(true) => Ok(()),
        Ok(false) => Err(SarayuError::ExternalProcess(format!(
            "`{}` exited unsuccessfully",
            command
        ))),
        Err(SarayuError::MissingBinary(_)) => {
            error!(
                "😰 Could not find starknet-devnet. Install it with:\n    \
                 pip install starknet-devnet"
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Deploys a compiled contract and registers it, returning its address
pub fn deploy(
    args: DeployArgs,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<BigUint, SarayuError> {
    let name = args.contract_name;
    info!("🚀 Deploying {}", name);

    let contract = ctx.path(OUTPUT_DIR).join(format!("{name}.{JSON_EXTENSION}"));
    let command = deploy_command(&contract, &[], network);
    debug!("{}", command);

    let output = execute(&ctx.runner, &command)?;
    let (address, tx_hash) = parse_address_and_hash(&output)?;
    info!(
        "⏳ Deployment of {} successfully sent at {}",
        name,
        hex_address(&address)?
    );
    info!("🧾 Transaction hash: {:#x}", tx_hash);

    ctx.deployments(network.network).register(
        &address,
        &format!("{ABIS_DIR}/{name}.{JSON_EXTENSION}"),
        Some(args.alias.as_deref().unwrap_or(&name)),
    )?;

    Ok(address)
}

/// Calls a view function of a registered deployment, returning the client's output
pub fn call(
    args: CallArgs,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<String, SarayuError> {
    let identifier = Identifier::parse(&args.address_or_alias);
    let deployment = ctx
        .deployments(network.network)
        .load_first(&identifier)?
        .ok_or_else(|| SarayuError::DeploymentNotFound(identifier.to_string()))?;

    let inputs = args
        .params
        .iter()
        .map(|param| parse_argument(param).map(|value| value.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    let command = call_command(
        &hex_address(&deployment.address)?,
        &ctx.path(&deployment.abi_path).display().to_string(),
        &args.function,
        &inputs,
        network,
    );
    debug!("{}", command);

    run_with_hints(ctx, &command)
}

/// Invokes a function through the signer's account, returning the status of
/// the transaction, or an empty string if nothing was sent
pub fn invoke(
    args: InvokeArgs,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<String, SarayuError> {
    let Some(signer) = Signer::from_env(&args.pkey)? else {
        error!("❌ Cannot find {} in env.", args.pkey);
        return Ok(String::new());
    };

    let deployments = ctx.deployments(network.network);
    let target = match deployments.load_first(&Identifier::parse(&args.alias))? {
        Some(deployment) => deployment.address,
        None => normalize_number(&args.alias)
            .map_err(|_| SarayuError::DeploymentNotFound(args.alias.clone()))?,
    };

    let Some(account) = ctx.accounts(network.network).load(&signer.public_key())? else {
        error!("Account not deployed.");
        return Ok(String::new());
    };
    debug!("account-{} at {:#x}", account.index, account.address);

    let nonce = get_nonce(&account.address, network, ctx)?;
    debug!("nonce={}", nonce);

    let arguments = args
        .args
        .iter()
        .map(|arg| parse_argument(arg))
        .collect::<Result<Vec<_>, _>>()?;
    let (call_array, calldata) = encode(&[Call::new(target, args.function, arguments)?])?;
    let execute_calldata = execute_calldata(&call_array, &calldata);

    let max_fee = BigUint::from(args.max_fee);
    let tx_hash = invoke_transaction_hash(
        &account.address,
        &execute_calldata,
        &max_fee,
        network.network.chain_id(),
        &nonce,
    )?;
    let (r, s) = signer.sign(&tx_hash)?;

    let account_abi = deployments
        .load_first(&Identifier::Address(account.address.clone()))?
        .map(|deployment| deployment.abi_path)
        .unwrap_or_else(|| ACCOUNT_ABI_PATH.to_string());

    let command = invoke_command(
        &hex_address(&account.address)?,
        &ctx.path(account_abi).display().to_string(),
        &execute_calldata.iter().map(BigUint::to_string).collect_vec(),
        [r.to_string(), s.to_string()],
        &max_fee,
        network,
    );
    debug!("{}", command);

    let output = run_with_hints(ctx, &command)?;
    if output.is_empty() {
        return Ok(output);
    }
    info!("{}", output);

    let (_, tx_hash) = parse_address_and_hash(&output)?;
    Ok(tx_status(&format!("{:#x}", tx_hash), network, ctx)?.to_string())
}

/// Queries the status of a transaction
pub fn tx_status(
    tx_hash: &str,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<TransactionStatus, SarayuError> {
    debug!("⏳ Querying the network to check transaction status...");
    let command = tx_status_command(tx_hash, network);
    debug!("{}", command);

    let output = execute(&ctx.runner, &command)?;
    let receipt: TransactionReceipt =
        serde_json::from_str(&output).map_err(|e| SarayuError::Serde(e.to_string()))?;
    if let Some(block_hash) = &receipt.block_hash {
        debug!("included in block {}", block_hash);
    }

    receipt
        .tx_status
        .map(|status| TransactionStatus::from(status.as_str()))
        .ok_or_else(|| SarayuError::MissingField("tx_status".to_string()))
}

/// Appends the local network export to the virtualenv's activation script
pub fn setlocal(args: SetLocalArgs, ctx: &Context<impl CommandRunner>) -> Result<(), SarayuError> {
    let path = ctx.path(&args.activate_script);
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .map_err(|e| SarayuError::WriteFile(format!("{}: {}", path.display(), e)))?;

    writeln!(file, "{LOCAL_NET_EXPORT}").map_err(|e| SarayuError::WriteFile(e.to_string()))
}

fn get_nonce(
    address: &BigUint,
    network: &NetworkConfig,
    ctx: &Context<impl CommandRunner>,
) -> Result<BigUint, SarayuError> {
    let command = get_nonce_command(address, network);
    debug!("{}", command);

    let output = execute(&ctx.runner, &command)?;
    normalize_number(output.trim())
        .map_err(|_| SarayuError::Parse(format!("unexpected nonce: {}", output.trim())))
}

/// Runs a command, turning the client's known errors into a hint & an empty output
fn run_with_hints(
    ctx: &Context<impl CommandRunner>,
    command: &ExternalCommand,
) -> Result<String, SarayuError> {
    match execute(&ctx.runner, command) {
        Ok(output) => Ok(output.trim().to_string()),
        Err(SarayuError::ExternalProcess(message)) => match known_error_hint(&message) {
            Some(hint) => {
                error!("{}", hint);
                Ok(String::new())
            }
            None => Err(SarayuError::ExternalProcess(message)),
        },
        Err(e) => Err(e),
    }
}

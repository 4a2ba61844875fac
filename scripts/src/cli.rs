//! Definitions of CLI arguments and commands

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand};
use sarayu_common::constants::DEFAULT_MAX_FEE;

use crate::{
    commands::{call, compile, deploy, invoke, node, setlocal, setup, tx_status, Context},
    config::{Network, NetworkConfig},
    constants::{
        ACCOUNT_ABI_PATH, ACCOUNT_CONTRACT_PATH, DEFAULT_ACTIVATE_SCRIPT, DEFAULT_DEVNET_HOST,
        DEFAULT_DEVNET_PORT, DEFAULT_GATEWAY_URL, DEFAULT_PKEY_ENV_VAR,
    },
    errors::SarayuError,
    starknet_cli::CommandRunner,
};

/// Compile, deploy & interact with StarkNet contracts
#[derive(Parser)]
#[command(name = "sarayu", version)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy an account contract for a private key held in the environment
    Setup(SetupArgs),
    /// Compile Cairo contracts into `artifacts/`
    Compile(CompileArgs),
    /// Start a StarkNet local network
    Node(NodeArgs),
    /// Deploy a compiled contract
    Deploy(DeployArgs),
    /// Call a view function of a deployed contract
    Call(CallArgs),
    /// Invoke a function of a deployed contract through the signer's account
    Invoke(InvokeArgs),
    /// Get the status of a transaction
    #[command(name = "txstatus")]
    TxStatus(TxStatusArgs),
    /// Make the local devnet the default network of the virtualenv
    #[command(name = "setlocal")]
    SetLocal(SetLocalArgs),
}

impl Command {
    /// Runs the command, printing its result to stdout
    pub fn run(self, ctx: &Context<impl CommandRunner>) -> Result<(), SarayuError> {
        match self {
            Command::Setup(args) => {
                let network = args.network.resolve()?;
                setup(args, &network, ctx).map(|_| ())
            }
            Command::Compile(args) => compile(args, ctx),
            Command::Node(args) => node(args, ctx),
            Command::Deploy(args) => {
                let network = args.network.resolve()?;
                let address = deploy(args, &network, ctx)?;
                println!("{:#x}", address);
                Ok(())
            }
            Command::Call(args) => {
                let network = args.network.resolve()?;
                println!("{}", call(args, &network, ctx)?);
                Ok(())
            }
            Command::Invoke(args) => {
                let network = args.network.resolve()?;
                println!("{}", invoke(args, &network, ctx)?);
                Ok(())
            }
            Command::TxStatus(args) => {
                let network = args.network.resolve()?;
                println!("{}", tx_status(&args.tx_hash, &network, ctx)?);
                Ok(())
            }
            Command::SetLocal(args) => {
                setlocal(args, ctx)?;
                println!("STARKNET_LOCAL_NET set to 1. Please run a new shell");
                Ok(())
            }
        }
    }
}

/// The network options shared by every command that talks to the network
#[derive(Args, Clone)]
pub struct NetworkArgs {
    /// Select network, one of localhost, goerli, mainnet.
    ///
    /// Defaults to `STARKNET_NETWORK` unless `STARKNET_LOCAL_NET` is set,
    /// then to localhost.
    #[arg(long, value_parser = Network::from_str)]
    pub network: Option<Network>,

    /// The gateway & feeder gateway of the local devnet
    #[arg(long, default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,
}

impl NetworkArgs {
    /// Resolves the network the command targets
    pub fn resolve(&self) -> Result<NetworkConfig, SarayuError> {
        NetworkConfig::resolve(self.network, &self.gateway_url)
    }
}

/// Deploy an account contract for a private key held in the environment
///
///   sarayu setup --pkey STARKNET_PRIVATE_KEY --network localhost
#[derive(Args)]
pub struct SetupArgs {
    /// The environment variable holding the private key
    #[arg(long, default_value = DEFAULT_PKEY_ENV_VAR)]
    pub pkey: String,

    /// The compiled account contract
    #[arg(long, default_value = ACCOUNT_CONTRACT_PATH)]
    pub account_contract: PathBuf,

    /// The ABI of the account contract
    #[arg(long, default_value = ACCOUNT_ABI_PATH)]
    pub account_abi: String,

    /// The network to target
    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Compile Cairo contracts into `artifacts/`
#[derive(Args)]
pub struct CompileArgs {
    /// The contracts to compile, all contracts in the directory if none are given
    pub contracts: Vec<PathBuf>,

    /// The directory holding the contracts, also used as the Cairo path
    #[arg(long)]
    pub directory: Option<PathBuf>,
}

/// Start a StarkNet local network
///
///   sarayu node --host HOST --port 5001 --seed SEED
#[derive(Args)]
pub struct NodeArgs {
    /// The address the devnet binds to
    #[arg(long, default_value = DEFAULT_DEVNET_HOST)]
    pub host: String,

    /// The port the devnet listens on
    #[arg(long, default_value_t = DEFAULT_DEVNET_PORT)]
    pub port: u16,

    /// The seed of the devnet's predeployed accounts
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Deploy a compiled contract
#[derive(Args)]
pub struct DeployArgs {
    /// The name of the contract, as compiled into `artifacts/<name>.json`
    pub contract_name: String,

    /// The alias to register the deployment under, the contract name by default
    #[arg(long)]
    pub alias: Option<String>,

    /// The network to target
    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Call a view function of a deployed contract
#[derive(Args)]
pub struct CallArgs {
    /// The address or alias of the deployment
    pub address_or_alias: String,

    /// The function to call
    pub function: String,

    /// The inputs of the function, numbers or short strings
    pub params: Vec<String>,

    /// The network to target
    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Invoke a function of a deployed contract through the signer's account
#[derive(Args)]
pub struct InvokeArgs {
    /// The alias or address of the target contract
    pub alias: String,

    /// The function to invoke
    pub function: String,

    /// The inputs of the function, numbers or short strings
    pub args: Vec<String>,

    /// The environment variable holding the private key
    #[arg(long, default_value = DEFAULT_PKEY_ENV_VAR)]
    pub pkey: String,

    /// The maximum fee paid for the transaction, in wei
    #[arg(long, default_value_t = DEFAULT_MAX_FEE)]
    pub max_fee: u64,

    /// The network to target
    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Get the status of a transaction
///
///   starknet tx_status --hash <hash> --feeder_gateway_url=http://127.0.0.1:5050/
#[derive(Args)]
pub struct TxStatusArgs {
    /// The transaction hash, beginning with 0x
    pub tx_hash: String,

    /// The network to target
    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Make the local devnet the default network of the virtualenv
#[derive(Args)]
pub struct SetLocalArgs {
    /// The activation script to append to
    #[arg(long, default_value = DEFAULT_ACTIVATE_SCRIPT)]
    pub activate_script: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Parser};

    use crate::config::Network;

    use super::{Cli, Command};

    #[test]
    fn test_parse_invoke() {
        let cli = Cli::try_parse_from([
            "sarayu", "invoke", "balance", "increase_balance", "100", "--max-fee", "5",
        ])
        .unwrap();

        let Command::Invoke(args) = cli.command else {
            panic!("expected invoke");
        };
        assert_eq!(args.alias, "balance");
        assert_eq!(args.function, "increase_balance");
        assert_eq!(args.args, vec!["100".to_string()]);
        assert_eq!(args.max_fee, 5);
        assert_eq!(args.pkey, "STARKNET_PRIVATE_KEY");
        assert!(args.network.network.is_none());
    }

    #[test]
    fn test_parse_network() {
        let Command::Deploy(args) =
            Cli::try_parse_from(["sarayu", "deploy", "Balance", "--network", "alpha-goerli"])
                .unwrap()
                .command
        else {
            panic!("expected deploy");
        };
        assert_eq!(args.network.network, Some(Network::Goerli));

        // An unknown network is a usage error, reported before any command runs
        let err = Cli::try_parse_from(["sarayu", "call", "balance", "get", "--network", "ropsten"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_renamed_subcommands() {
        assert!(matches!(
            Cli::try_parse_from(["sarayu", "txstatus", "0x1"]).unwrap().command,
            Command::TxStatus(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["sarayu", "setlocal"]).unwrap().command,
            Command::SetLocal(_)
        ));
    }

    #[test]
    fn test_parse_node_defaults() {
        let Command::Node(args) = Cli::try_parse_from(["sarayu", "node"]).unwrap().command else {
            panic!("expected node");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 5050);
        assert_eq!(args.seed, None);
    }
}

//! Home-spun wrappers around the `starknet`, `starknet-compile` & `starknet-devnet`
//! binaries. Every network or compiler operation is a blocking subprocess call.
//!
//! Commands are built as plain [`ExternalCommand`] values and executed through a
//! [`CommandRunner`], so that the orchestration logic can be exercised without
//! the binaries installed.

use std::{
    fmt::{self, Display},
    io,
    path::Path,
    process::{Command, Stdio},
};

use itertools::Itertools;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use regex::Regex;
use sarayu_common::{constants::EXECUTE_ENTRYPOINT, numbers::normalize_number};
use tracing::trace;

use crate::{
    config::NetworkConfig,
    constants::{
        EXECUTE_ENTRYPOINT_ERROR, MAX_FEE_ERROR, NO_WALLET_FLAG, STARKNET_COMMAND,
        STARKNET_COMPILE_COMMAND, STARKNET_DEVNET_COMMAND, STARKNET_NETWORK_ENV_VAR,
    },
    errors::SarayuError,
};

/// An invocation of an external binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    /// The binary to run
    pub program: String,
    /// The arguments passed to the binary
    pub args: Vec<String>,
    /// Environment variables set on the child process only
    pub envs: Vec<(String, String)>,
}

impl ExternalCommand {
    /// Creates an invocation of `program` without arguments
    pub fn new(program: &str) -> Self {
        ExternalCommand {
            program: program.to_string(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Appends an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable on the child process
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

#[cfg(test)]
impl ExternalCommand {
    /// Whether the invocation contains the given argument
    pub(crate) fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The arguments following the given flag, up to the next flag
    pub(crate) fn values_after(&self, flag: &str) -> Vec<&str> {
        self.args
            .iter()
            .skip_while(|a| *a != flag)
            .skip(1)
            .take_while(|a| !a.starts_with("--"))
            .map(String::as_str)
            .collect()
    }
}

impl Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.iter().join(" "))
    }
}

/// The captured result of a finished external process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// The process' standard output
    pub stdout: String,
    /// The process' standard error
    pub stderr: String,
}

/// Executes external commands, blocking until they exit
pub trait CommandRunner {
    /// Runs the command, capturing its output
    fn output(&self, command: &ExternalCommand) -> Result<ProcessOutput, SarayuError>;

    /// Runs the command with inherited stdio, returning whether it succeeded
    fn status(&self, command: &ExternalCommand) -> Result<bool, SarayuError>;
}

/// Runs commands as child processes of the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, command: &ExternalCommand) -> Result<ProcessOutput, SarayuError> {
        let output = command
            .to_command()
            .output()
            .map_err(|e| spawn_error(command, e))?;

        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn status(&self, command: &ExternalCommand) -> Result<bool, SarayuError> {
        let mut cmd = command.to_command();
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        Ok(cmd
            .status()
            .map_err(|e| spawn_error(command, e))?
            .success())
    }
}

fn spawn_error(command: &ExternalCommand, e: io::Error) -> SarayuError {
    if e.kind() == io::ErrorKind::NotFound {
        SarayuError::MissingBinary(command.program.clone())
    } else {
        SarayuError::ExternalProcess(format!("failed to execute `{}`: {}", command, e))
    }
}

/// Runs a command, failing with its output if it exits unsuccessfully
pub fn execute(
    runner: &impl CommandRunner,
    command: &ExternalCommand,
) -> Result<String, SarayuError> {
    let output = runner.output(command)?;

    if !output.success {
        return Err(SarayuError::ExternalProcess(format!(
            "`{}` failed:\n{}\n{}",
            command, output.stdout, output.stderr
        )));
    }

    trace!("{}", output.stdout);
    Ok(output.stdout)
}

/// Maps a known error of the external client to a remediation hint
pub fn known_error_hint(message: &str) -> Option<&'static str> {
    if message.contains(MAX_FEE_ERROR) {
        Some("😰 Whoops, looks like max fee is missing. Try with:\n--max_fee=`MAX_FEE`")
    } else if message.contains(EXECUTE_ENTRYPOINT_ERROR) {
        Some(
            "😰 Whoops, looks like you're not using an account. Try with:\n\
             sarayu invoke [OPTIONS] CONTRACT_ALIAS FUNCTION [ARGS]",
        )
    } else {
        None
    }
}

/// Extracts the contract address & transaction hash from the output of a
/// deploy or invoke command
pub fn parse_address_and_hash(output: &str) -> Result<(BigUint, BigUint), SarayuError> {
    lazy_static! {
        static ref HEX_VALUE_REGEX: Regex = Regex::new(r"0x[\da-f]{1,64}").unwrap();
    }

    match HEX_VALUE_REGEX
        .find_iter(output)
        .map(|m| m.as_str())
        .collect_vec()
        .as_slice()
    {
        [address, tx_hash] => Ok((normalize_number(address)?, normalize_number(tx_hash)?)),
        values => Err(SarayuError::Parse(format!(
            "expected an address and a transaction hash, found {} hex values in: {}",
            values.len(),
            output.trim()
        ))),
    }
}

/// Which gateway flags a `starknet` subcommand takes on the local devnet
#[derive(Clone, Copy)]
enum Gateways {
    Gateway,
    FeederGateway,
    Both,
}

fn with_network(
    command: ExternalCommand,
    network: &NetworkConfig,
    gateways: Gateways,
) -> ExternalCommand {
    if let Some(name) = network.network.starknet_network() {
        return command.env(STARKNET_NETWORK_ENV_VAR, name);
    }

    let feeder = format!("--feeder_gateway_url={}", network.gateway_url);
    let gateway = format!("--gateway_url={}", network.gateway_url);
    match gateways {
        Gateways::Gateway => command.arg(gateway),
        Gateways::FeederGateway => command.arg(feeder),
        Gateways::Both => command.arg(feeder).arg(gateway),
    }
}

/// `starknet deploy`, optionally passing constructor inputs
pub fn deploy_command(
    contract: &Path,
    inputs: &[String],
    network: &NetworkConfig,
) -> ExternalCommand {
    let mut command = ExternalCommand::new(STARKNET_COMMAND)
        .arg("deploy")
        .arg("--contract")
        .arg(contract.display().to_string());
    if !inputs.is_empty() {
        command = command.arg("--inputs").args(inputs.iter().cloned());
    }

    with_network(command, network, Gateways::Gateway).arg(NO_WALLET_FLAG)
}

/// `starknet call`, a read-only query of a view function
pub fn call_command(
    address: &str,
    abi: &str,
    function: &str,
    inputs: &[String],
    network: &NetworkConfig,
) -> ExternalCommand {
    let mut command = ExternalCommand::new(STARKNET_COMMAND)
        .args(["call", "--address", address, "--abi", abi, "--function", function]);
    if !inputs.is_empty() {
        command = command.arg("--inputs").args(inputs.iter().cloned());
    }

    with_network(command, network, Gateways::Both).arg(NO_WALLET_FLAG)
}

/// `starknet invoke` of an account's `__execute__` entrypoint with a precomputed signature
pub fn invoke_command(
    account_address: &str,
    account_abi: &str,
    inputs: &[String],
    signature: [String; 2],
    max_fee: &BigUint,
    network: &NetworkConfig,
) -> ExternalCommand {
    let mut command = ExternalCommand::new(STARKNET_COMMAND).args([
        "invoke",
        "--address",
        account_address,
        "--abi",
        account_abi,
        "--function",
        EXECUTE_ENTRYPOINT,
    ]);
    command = with_network(command, network, Gateways::Both);
    if !inputs.is_empty() {
        command = command.arg("--inputs").args(inputs.iter().cloned());
    }

    command
        .arg("--signature")
        .args(signature)
        .arg("--max_fee")
        .arg(max_fee.to_string())
        .arg(NO_WALLET_FLAG)
}

/// `starknet get_nonce`
pub fn get_nonce_command(address: &BigUint, network: &NetworkConfig) -> ExternalCommand {
    let command = ExternalCommand::new(STARKNET_COMMAND)
        .arg("get_nonce")
        .arg("--contract_address")
        .arg(format!("{:#x}", address));

    with_network(command, network, Gateways::FeederGateway)
}

/// `starknet tx_status`
pub fn tx_status_command(tx_hash: &str, network: &NetworkConfig) -> ExternalCommand {
    let command = ExternalCommand::new(STARKNET_COMMAND)
        .arg("tx_status")
        .arg("--hash")
        .arg(tx_hash);

    with_network(command, network, Gateways::FeederGateway)
}

/// `starknet-compile`, writing the compiled contract & its ABI
pub fn compile_command(
    contract: &Path,
    cairo_path: &Path,
    output: &Path,
    abi: &Path,
) -> ExternalCommand {
    ExternalCommand::new(STARKNET_COMPILE_COMMAND)
        .arg(contract.display().to_string())
        .arg(format!("--cairo_path={}", cairo_path.display()))
        .arg("--output")
        .arg(output.display().to_string())
        .arg("--abi")
        .arg(abi.display().to_string())
}

/// `starknet-devnet`
pub fn devnet_command(host: &str, port: u16, seed: Option<u64>) -> ExternalCommand {
    let command = ExternalCommand::new(STARKNET_DEVNET_COMMAND)
        .args(["--host", host])
        .arg("--port")
        .arg(port.to_string());

    match seed {
        Some(seed) => command.arg("--seed").arg(seed.to_string()),
        None => command,
    }
}

//! Network selection, resolved once at the CLI boundary and passed explicitly
//! to every command that talks to the external client

use std::{
    env,
    fmt::{self, Display},
    str::FromStr,
};

use starknet::core::{chain_id, types::FieldElement};

use crate::{
    constants::{DEFAULT_GATEWAY_URL, STARKNET_LOCAL_NET_ENV_VAR, STARKNET_NETWORK_ENV_VAR},
    errors::SarayuError,
};

/// The network names accepted verbatim
pub const NETWORKS: [&str; 4] = ["localhost", "goerli", "mainnet", "alpha-mainnet"];

/// The networks the client can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// A local devnet
    Localhost,
    /// The Goerli testnet
    Goerli,
    /// StarkNet mainnet
    Mainnet,
}

impl Network {
    /// The value of `STARKNET_NETWORK` selecting this network in the `starknet` CLI,
    /// or `None` if the network is addressed through explicit gateway URLs
    pub fn starknet_network(&self) -> Option<&'static str> {
        match self {
            Network::Localhost => None,
            Network::Goerli => Some("alpha-goerli"),
            Network::Mainnet => Some("alpha-mainnet"),
        }
    }

    /// The chain ID transactions on this network are signed for.
    ///
    /// The local devnet mimics the testnet chain ID.
    pub fn chain_id(&self) -> FieldElement {
        match self {
            Network::Mainnet => chain_id::MAINNET,
            Network::Goerli | Network::Localhost => chain_id::TESTNET,
        }
    }
}

impl FromStr for Network {
    type Err = SarayuError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.contains("goerli") || value.contains("testnet") {
            return Ok(Network::Goerli);
        }
        if value.contains("localhost") || value.contains("127.0.0.1") {
            return Ok(Network::Localhost);
        }

        match value {
            "mainnet" | "alpha-mainnet" => Ok(Network::Mainnet),
            _ => Err(SarayuError::UnsupportedNetwork(format!(
                "'{}'. Use one of {:?}",
                value, NETWORKS
            ))),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Localhost => write!(f, "localhost"),
            Network::Goerli => write!(f, "goerli"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// The network a command targets, along with the gateway used for the local devnet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The selected network
    pub network: Network,
    /// The gateway & feeder gateway URL used when the network is the local devnet
    pub gateway_url: String,
}

impl NetworkConfig {
    /// A config targeting the given network through the default local gateway
    pub fn new(network: Network) -> Self {
        NetworkConfig {
            network,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
        }
    }

    /// Resolves the network from the `--network` value or, failing that, the
    /// process environment
    pub fn resolve(network: Option<Network>, gateway_url: &str) -> Result<Self, SarayuError> {
        Self::resolve_with(network, gateway_url, |key| env::var(key).ok())
    }

    /// Resolves the network with an explicit environment lookup.
    ///
    /// `STARKNET_NETWORK` is only consulted when `STARKNET_LOCAL_NET` is unset;
    /// the default is the local devnet.
    pub fn resolve_with<F>(
        network: Option<Network>,
        gateway_url: &str,
        lookup_env: F,
    ) -> Result<Self, SarayuError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = || {
            lookup_env(STARKNET_LOCAL_NET_ENV_VAR)
                .is_none()
                .then(|| lookup_env(STARKNET_NETWORK_ENV_VAR))
                .flatten()
        };

        let network = match network {
            Some(network) => network,
            None => match from_env() {
                Some(value) => value.parse()?,
                None => Network::Localhost,
            },
        };

        Ok(NetworkConfig {
            network,
            gateway_url: gateway_url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{
        constants::{DEFAULT_GATEWAY_URL, STARKNET_LOCAL_NET_ENV_VAR, STARKNET_NETWORK_ENV_VAR},
        errors::SarayuError,
    };

    use super::{Network, NetworkConfig};

    #[test]
    fn test_network_normalization() {
        assert_eq!("goerli".parse::<Network>().unwrap(), Network::Goerli);
        assert_eq!("alpha-goerli".parse::<Network>().unwrap(), Network::Goerli);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Goerli);
        assert_eq!("localhost".parse::<Network>().unwrap(), Network::Localhost);
        assert_eq!(
            "http://127.0.0.1:5050".parse::<Network>().unwrap(),
            Network::Localhost
        );
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("alpha-mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!(matches!(
            "ropsten".parse::<Network>(),
            Err(SarayuError::UnsupportedNetwork(_))
        ));
    }

    #[test]
    fn test_resolve_from_env() {
        let env: HashMap<&str, &str> = [(STARKNET_NETWORK_ENV_VAR, "alpha-goerli")].into();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = NetworkConfig::resolve_with(None, DEFAULT_GATEWAY_URL, lookup).unwrap();
        assert_eq!(config.network, Network::Goerli);

        // An explicit value wins over the environment
        let config =
            NetworkConfig::resolve_with(Some(Network::Localhost), DEFAULT_GATEWAY_URL, lookup)
                .unwrap();
        assert_eq!(config.network, Network::Localhost);
    }

    #[test]
    fn test_local_net_overrides_env() {
        let env: HashMap<&str, &str> = [
            (STARKNET_NETWORK_ENV_VAR, "alpha-goerli"),
            (STARKNET_LOCAL_NET_ENV_VAR, "1"),
        ]
        .into();

        let config = NetworkConfig::resolve_with(None, DEFAULT_GATEWAY_URL, |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config, NetworkConfig::new(Network::Localhost));
    }

    #[test]
    fn test_unsupported_network_in_env() {
        let env: HashMap<&str, &str> = [(STARKNET_NETWORK_ENV_VAR, "ropsten")].into();

        let res = NetworkConfig::resolve_with(None, DEFAULT_GATEWAY_URL, |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert!(matches!(res, Err(SarayuError::UnsupportedNetwork(_))));
    }

    #[test]
    fn test_starknet_network_names() {
        assert_eq!(Network::Localhost.starknet_network(), None);
        assert_eq!(Network::Goerli.starknet_network(), Some("alpha-goerli"));
        assert_eq!(Network::Mainnet.starknet_network(), Some("alpha-mainnet"));
        assert_ne!(Network::Mainnet.chain_id(), Network::Goerli.chain_id());
    }
}

//! The append-only log of contracts deployed on a network

use std::{
    fmt::{self, Display},
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use num_bigint::BigUint;
use sarayu_common::numbers::{hex_address, normalize_number};
use tracing::info;

use crate::{config::Network, errors::SarayuError};

use super::lock::RegistryLock;

/// The separator between the fields of a deployment line
const FIELD_SEPARATOR: char = ':';

/// How a deployment is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Match the deployed address
    Address(BigUint),
    /// Match one of the aliases of the deployment
    Alias(String),
}

impl Identifier {
    /// Numeric tokens are taken as addresses, anything else as an alias
    pub fn parse(token: &str) -> Self {
        normalize_number(token)
            .map(Identifier::Address)
            .unwrap_or_else(|_| Identifier::Alias(token.to_string()))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Address(address) => write!(f, "{:#x}", address),
            Identifier::Alias(alias) => write!(f, "{}", alias),
        }
    }
}

/// A line of the deployments file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// The deployed address
    pub address: BigUint,
    /// The path of the contract's ABI
    pub abi_path: String,
    /// The aliases of the deployment; the file format writes at most one
    pub aliases: Vec<String>,
}

impl DeploymentRecord {
    fn matches(&self, identifier: &Identifier) -> bool {
        match identifier {
            Identifier::Address(address) => &self.address == address,
            Identifier::Alias(alias) => self.aliases.iter().any(|a| a == alias),
        }
    }

    fn parse(line: &str) -> Result<Self, SarayuError> {
        let mut fields = line.split(FIELD_SEPARATOR);
        let (Some(address), Some(abi_path)) = (fields.next(), fields.next()) else {
            return Err(SarayuError::Parse(format!(
                "malformed deployment line: {}",
                line
            )));
        };

        Ok(DeploymentRecord {
            address: normalize_number(address)?,
            abi_path: abi_path.to_string(),
            aliases: fields.map(str::to_string).collect(),
        })
    }
}

/// The deployments registry of a single network
#[derive(Debug, Clone)]
pub struct Deployments {
    /// The path of the `{network}.deployments.txt` file
    path: PathBuf,
}

impl Deployments {
    /// The deployments registry of `network`, stored under `root`
    pub fn new(root: &Path, network: Network) -> Self {
        Deployments {
            path: root.join(format!("{network}.deployments.txt")),
        }
    }

    /// The path of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All deployments matching the identifier, in registration order
    pub fn load(&self, identifier: &Identifier) -> Result<Vec<DeploymentRecord>, SarayuError> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| record.matches(identifier))
            .collect())
    }

    /// The first deployment matching the identifier
    pub fn load_first(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<DeploymentRecord>, SarayuError> {
        Ok(self.load(identifier)?.into_iter().next())
    }

    /// Whether any deployment matches the identifier
    pub fn exists(&self, identifier: &Identifier) -> Result<bool, SarayuError> {
        Ok(!self.load(identifier)?.is_empty())
    }

    /// Appends a deployment, failing if the alias is already taken
    pub fn register(
        &self,
        address: &BigUint,
        abi_path: &str,
        alias: Option<&str>,
    ) -> Result<(), SarayuError> {
        for field in [Some(abi_path), alias].into_iter().flatten() {
            if field.is_empty() || field.contains([FIELD_SEPARATOR, '\n', '\r']) {
                return Err(SarayuError::InvalidRecord(format!(
                    "'{}' cannot be stored in {}",
                    field,
                    self.path.display()
                )));
            }
        }

        let address = hex_address(address)?;
        let _lock = RegistryLock::acquire(&self.path)?;

        let mut line = format!("{address}{FIELD_SEPARATOR}{abi_path}");
        match alias {
            Some(alias) => {
                if self.exists(&Identifier::Alias(alias.to_string()))? {
                    return Err(SarayuError::DuplicateAlias(format!(
                        "alias {} already exists in {}",
                        alias,
                        self.path.display()
                    )));
                }
                info!("📦 Registering deployment as {} in {}", alias, self.path.display());
                line.push(FIELD_SEPARATOR);
                line.push_str(alias);
            }
            None => info!("📦 Registering {} in {}", address, self.path.display()),
        }
        line.push('\n');

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| SarayuError::WriteFile(e.to_string()))?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| SarayuError::WriteFile(e.to_string()))
    }

    fn records(&self) -> Result<Vec<DeploymentRecord>, SarayuError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SarayuError::ReadFile(e.to_string())),
        };

        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(DeploymentRecord::parse)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use num_bigint::BigUint;
    use tempfile::tempdir;

    use crate::{config::Network, errors::SarayuError};

    use super::{DeploymentRecord, Deployments, Identifier};

    #[test]
    fn test_lookup_by_alias_and_address() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);
        let address = BigUint::from(0xabcu32);

        deployments
            .register(&address, "a.json", Some("token"))
            .unwrap();

        let expected = vec![DeploymentRecord {
            address: address.clone(),
            abi_path: "a.json".to_string(),
            aliases: vec!["token".to_string()],
        }];
        assert_eq!(
            deployments.load(&Identifier::Alias("token".to_string())).unwrap(),
            expected
        );
        assert_eq!(
            deployments.load(&Identifier::Address(address)).unwrap(),
            expected
        );
        assert!(!deployments
            .exists(&Identifier::Alias("other".to_string()))
            .unwrap());
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Goerli);

        deployments
            .register(&BigUint::from(0xabcu32), "a.json", Some("token"))
            .unwrap();
        deployments
            .register(&BigUint::from(1u32), "b.json", None)
            .unwrap();

        assert_eq!(
            deployments.path(),
            dir.path().join("goerli.deployments.txt")
        );
        assert_eq!(
            fs::read_to_string(deployments.path()).unwrap(),
            format!(
                "0x{}abc:a.json:token\n0x{}1:b.json\n",
                "0".repeat(61),
                "0".repeat(63)
            )
        );
    }

    #[test]
    fn test_duplicate_alias_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);

        deployments
            .register(&BigUint::from(1u32), "a.json", Some("token"))
            .unwrap();
        let before = fs::read_to_string(deployments.path()).unwrap();

        let res = deployments.register(&BigUint::from(2u32), "b.json", Some("token"));
        assert!(matches!(res, Err(SarayuError::DuplicateAlias(_))));
        assert_eq!(fs::read_to_string(deployments.path()).unwrap(), before);
    }

    #[test]
    fn test_same_address_under_several_aliases() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);
        let address = BigUint::from(7u32);

        deployments.register(&address, "a.json", Some("first")).unwrap();
        deployments.register(&address, "a.json", Some("second")).unwrap();

        let matches = deployments.load(&Identifier::Address(address)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].aliases, vec!["first".to_string()]);
    }

    #[test]
    fn test_missing_file_has_no_deployments() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);

        assert!(deployments
            .load_first(&Identifier::Alias("token".to_string()))
            .unwrap()
            .is_none());
        assert!(!deployments.path().exists());
    }

    #[test]
    fn test_reads_hand_written_lines() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);
        fs::write(deployments.path(), "0x10:abi.json:one:two\n\n").unwrap();

        let record = deployments
            .load_first(&Identifier::Alias("two".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(record.address, BigUint::from(16u32));

        fs::write(deployments.path(), "0x10\n").unwrap();
        assert!(matches!(
            deployments.load(&Identifier::Alias("one".to_string())),
            Err(SarayuError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unrepresentable_alias() {
        let dir = tempdir().unwrap();
        let deployments = Deployments::new(dir.path(), Network::Localhost);

        assert!(matches!(
            deployments.register(&BigUint::from(1u32), "a.json", Some("a:b")),
            Err(SarayuError::InvalidRecord(_))
        ));
        assert!(!deployments.path().exists());
    }

    #[test]
    fn test_identifier_parsing() {
        assert_eq!(
            Identifier::parse("0xabc"),
            Identifier::Address(BigUint::from(0xabcu32))
        );
        assert_eq!(
            Identifier::parse("42"),
            Identifier::Address(BigUint::from(42u32))
        );
        assert_eq!(
            Identifier::parse("token"),
            Identifier::Alias("token".to_string())
        );
    }
}

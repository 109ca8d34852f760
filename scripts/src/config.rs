use std::{env, fmt, str::FromStr};

use serde::Serialize;

use crate::error::ConfigError;

pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
pub const ALCHEMY_API_KEY_ENV_VAR: &str = "ALCHEMY_API_KEY";
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

pub const NO_PRIVATE_KEY: &str = "NO_PRIVATE_KEY";
pub const NO_ALCHEMY_API_KEY: &str = "NO_ALCHEMY_API_KEY";

pub const ALCHEMY_DOMAIN: &str = "alchemyapi.io";

const HARDHAT_RPC_URL: &str = "http://127.0.0.1:8545";
// account #0 of the public "test test ... junk" development mnemonic
const HARDHAT_DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkName {
    Hardhat,
    Mainnet,
    Rinkeby,
}

impl NetworkName {
    pub const ALL: [NetworkName; 3] = [Self::Hardhat, Self::Mainnet, Self::Rinkeby];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hardhat => "hardhat",
            Self::Mainnet => "mainnet",
            Self::Rinkeby => "rinkeby",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Hardhat => 1337,
            Self::Mainnet => 1,
            Self::Rinkeby => 4,
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownNetwork(s.to_owned()))
    }
}

/// Secrets read from the process environment (and `.env`, if present).
#[derive(Clone, Debug, Default)]
pub struct Environment {
    pub private_key: Option<String>,
    pub alchemy_api_key: Option<String>,
    pub etherscan_api_key: Option<String>,
}

impl Environment {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            private_key: env::var(PRIVATE_KEY_ENV_VAR).ok(),
            alchemy_api_key: env::var(ALCHEMY_API_KEY_ENV_VAR).ok(),
            etherscan_api_key: env::var(ETHERSCAN_API_KEY_ENV_VAR).ok(),
        }
    }

    fn private_key_or_sentinel(&self) -> String {
        self.private_key
            .clone()
            .unwrap_or_else(|| NO_PRIVATE_KEY.to_owned())
    }

    fn alchemy_api_key_or_sentinel(&self) -> String {
        self.alchemy_api_key
            .clone()
            .unwrap_or_else(|| NO_ALCHEMY_API_KEY.to_owned())
    }
}

/// Hosted node endpoint of the form `https://eth-<network>.<domain>/v2/<key>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub network: String,
    pub provider_key: String,
}

impl ProviderEndpoint {
    pub fn new(network: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            provider_key: provider_key.into(),
        }
    }
}

impl fmt::Display for ProviderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "https://eth-{}.{}/v2/{}",
            self.network, ALCHEMY_DOMAIN, self.provider_key
        )
    }
}

impl FromStr for ProviderEndpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedEndpoint(s.to_owned());

        let rest = s.strip_prefix("https://eth-").ok_or_else(malformed)?;
        let (host, path) = rest.split_once('/').ok_or_else(malformed)?;
        let network = host
            .strip_suffix(ALCHEMY_DOMAIN)
            .and_then(|h| h.strip_suffix('.'))
            .filter(|n| !n.is_empty())
            .ok_or_else(malformed)?;
        let provider_key = path.strip_prefix("v2/").ok_or_else(malformed)?;

        Ok(Self::new(network, provider_key))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: NetworkName,
    pub chain_id: u64,
    pub rpc_url: String,
    pub accounts: Vec<String>,
    /// Upstream endpoint a local node forks from.
    pub forking: Option<String>,
}

impl NetworkProfile {
    pub fn endpoint(&self) -> Option<ProviderEndpoint> {
        self.rpc_url.parse().ok()
    }

    /// Rejects profiles that still carry a placeholder or empty credential the
    /// runner would send to the node. The fork url of a local node is the node's
    /// concern.
    pub fn ensure_credentials(&self) -> Result<(), ConfigError> {
        if self
            .accounts
            .iter()
            .any(|a| a.is_empty() || a == NO_PRIVATE_KEY)
        {
            return Err(ConfigError::MissingCredential(PRIVATE_KEY_ENV_VAR));
        }
        if self
            .endpoint()
            .is_some_and(|e| e.provider_key.is_empty() || e.provider_key == NO_ALCHEMY_API_KEY)
        {
            return Err(ConfigError::MissingCredential(ALCHEMY_API_KEY_ENV_VAR));
        }
        Ok(())
    }

    fn hosted(name: NetworkName, env: &Environment) -> Self {
        Self {
            name,
            chain_id: name.chain_id(),
            rpc_url: ProviderEndpoint::new(name.as_str(), env.alchemy_api_key_or_sentinel())
                .to_string(),
            accounts: vec![env.private_key_or_sentinel()],
            forking: None,
        }
    }

    fn local_fork(env: &Environment) -> Self {
        let upstream =
            ProviderEndpoint::new(NetworkName::Mainnet.as_str(), env.alchemy_api_key_or_sentinel());
        Self {
            name: NetworkName::Hardhat,
            chain_id: NetworkName::Hardhat.chain_id(),
            rpc_url: HARDHAT_RPC_URL.to_owned(),
            accounts: vec![HARDHAT_DEV_PRIVATE_KEY.to_owned()],
            forking: Some(upstream.to_string()),
        }
    }
}

pub fn resolve(network: &str, env: &Environment) -> Result<NetworkProfile, ConfigError> {
    let name = network.parse::<NetworkName>()?;
    Ok(match name {
        NetworkName::Hardhat => NetworkProfile::local_fork(env),
        NetworkName::Mainnet | NetworkName::Rinkeby => NetworkProfile::hosted(name, env),
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BytecodeHash {
    #[default]
    Ipfs,
    None,
}

impl BytecodeHash {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerProfile {
    pub version: String,
    pub optimizer_enabled: bool,
    pub optimizer_runs: u32,
    pub bytecode_hash: BytecodeHash,
}

#[derive(Serialize)]
struct Optimizer {
    enabled: bool,
    runs: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    bytecode_hash: BytecodeHash,
}

#[derive(Serialize)]
struct Settings {
    optimizer: Optimizer,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl CompilerProfile {
    fn optimized(version: &str) -> Self {
        Self {
            version: version.to_owned(),
            optimizer_enabled: true,
            optimizer_runs: 800,
            bytecode_hash: BytecodeHash::None,
        }
    }

    fn defaults(version: &str) -> Self {
        Self {
            version: version.to_owned(),
            optimizer_enabled: false,
            optimizer_runs: 200,
            bytecode_hash: BytecodeHash::Ipfs,
        }
    }

    /// The solc standard-JSON `settings` object for this compiler.
    pub fn settings_json(&self) -> serde_json::Value {
        let settings = Settings {
            optimizer: Optimizer {
                enabled: self.optimizer_enabled,
                runs: self.optimizer_runs,
            },
            // solc < 0.6 rejects metadata.bytecodeHash
            metadata: (!self.bytecode_hash.is_default()).then_some(Metadata {
                bytecode_hash: self.bytecode_hash,
            }),
        };
        serde_json::json!(settings)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EtherscanConfig {
    pub api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub default_network: NetworkName,
    pub networks: Vec<NetworkProfile>,
    pub compilers: Vec<CompilerProfile>,
    pub etherscan: EtherscanConfig,
}

impl Config {
    pub fn load(env: &Environment) -> Result<Self, ConfigError> {
        let networks = NetworkName::ALL
            .iter()
            .map(|name| resolve(name.as_str(), env))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            default_network: NetworkName::Rinkeby,
            networks,
            compilers: vec![
                CompilerProfile::optimized("0.8.10"),
                CompilerProfile::optimized("0.7.5"),
                CompilerProfile::defaults("0.5.16"),
            ],
            etherscan: EtherscanConfig {
                api_key: env.etherscan_api_key.clone(),
            },
        })
    }

    pub fn network(&self, name: &str) -> Result<&NetworkProfile, ConfigError> {
        let name = name.parse::<NetworkName>()?;
        self.networks
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn default_profile(&self) -> Result<&NetworkProfile, ConfigError> {
        self.network(self.default_network.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_keys() -> Environment {
        Environment {
            private_key: Some("0x01".to_owned()),
            alchemy_api_key: Some("abc123".to_owned()),
            etherscan_api_key: None,
        }
    }

    #[test]
    fn chain_ids_follow_the_table() {
        let env = env_with_keys();
        assert_eq!(resolve("hardhat", &env).unwrap().chain_id, 1337);
        assert_eq!(resolve("mainnet", &env).unwrap().chain_id, 1);
        assert_eq!(resolve("rinkeby", &env).unwrap().chain_id, 4);
    }

    #[test]
    fn unknown_network_is_a_config_error() {
        let err = resolve("ropsten", &env_with_keys()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(ref n) if n == "ropsten"));
    }

    #[test]
    fn hosted_url_is_templated_from_the_provider_key() {
        let profile = resolve("rinkeby", &env_with_keys()).unwrap();
        assert_eq!(profile.rpc_url, "https://eth-rinkeby.alchemyapi.io/v2/abc123");

        let endpoint = profile.endpoint().unwrap();
        assert_eq!(endpoint, ProviderEndpoint::new("rinkeby", "abc123"));
        assert_eq!(endpoint.to_string(), profile.rpc_url);
    }

    #[test]
    fn endpoint_parse_rejects_other_hosts() {
        assert!("https://mainnet.infura.io/v3/key"
            .parse::<ProviderEndpoint>()
            .is_err());
        assert!("https://eth-.alchemyapi.io/v2/key"
            .parse::<ProviderEndpoint>()
            .is_err());
        assert!("http://127.0.0.1:8545".parse::<ProviderEndpoint>().is_err());
    }

    #[test]
    fn missing_credentials_fall_back_to_sentinels() {
        let profile = resolve("mainnet", &Environment::default()).unwrap();
        assert_eq!(profile.accounts, vec![NO_PRIVATE_KEY.to_owned()]);
        assert_eq!(
            profile.rpc_url,
            "https://eth-mainnet.alchemyapi.io/v2/NO_ALCHEMY_API_KEY"
        );
    }

    #[test]
    fn sentinels_are_caught_before_any_round_trip() {
        let profile = resolve("rinkeby", &Environment::default()).unwrap();
        assert!(matches!(
            profile.ensure_credentials(),
            Err(ConfigError::MissingCredential(PRIVATE_KEY_ENV_VAR))
        ));

        let env = Environment {
            private_key: Some("0x01".to_owned()),
            ..Default::default()
        };
        let profile = resolve("rinkeby", &env).unwrap();
        assert!(matches!(
            profile.ensure_credentials(),
            Err(ConfigError::MissingCredential(ALCHEMY_API_KEY_ENV_VAR))
        ));

        assert!(resolve("rinkeby", &env_with_keys())
            .unwrap()
            .ensure_credentials()
            .is_ok());
    }

    #[test]
    fn empty_credentials_are_missing() {
        let env = Environment {
            private_key: Some("0x01".to_owned()),
            alchemy_api_key: Some(String::new()),
            etherscan_api_key: None,
        };
        let profile = resolve("rinkeby", &env).unwrap();
        assert_eq!(profile.rpc_url, "https://eth-rinkeby.alchemyapi.io/v2/");
        assert!(matches!(
            profile.ensure_credentials(),
            Err(ConfigError::MissingCredential(ALCHEMY_API_KEY_ENV_VAR))
        ));

        let env = Environment {
            private_key: Some(String::new()),
            alchemy_api_key: Some("abc123".to_owned()),
            etherscan_api_key: None,
        };
        let profile = resolve("mainnet", &env).unwrap();
        assert!(matches!(
            profile.ensure_credentials(),
            Err(ConfigError::MissingCredential(PRIVATE_KEY_ENV_VAR))
        ));
    }

    #[test]
    fn config_networks_come_from_resolve() {
        let env = env_with_keys();
        let config = Config::load(&env).unwrap();
        for name in NetworkName::ALL {
            assert_eq!(
                config.network(name.as_str()).unwrap(),
                &resolve(name.as_str(), &env).unwrap()
            );
        }
        assert_eq!(config.networks.len(), NetworkName::ALL.len());
    }

    #[test]
    fn hardhat_forks_mainnet_locally() {
        let profile = resolve("hardhat", &Environment::default()).unwrap();
        assert_eq!(profile.rpc_url, HARDHAT_RPC_URL);
        assert_eq!(
            profile.forking.as_deref(),
            Some("https://eth-mainnet.alchemyapi.io/v2/NO_ALCHEMY_API_KEY")
        );
        assert!(profile.endpoint().is_none());
        assert!(profile.ensure_credentials().is_ok());
    }

    #[test]
    fn config_defaults_to_rinkeby() {
        let config = Config::load(&env_with_keys()).unwrap();
        assert_eq!(config.default_profile().unwrap().name, NetworkName::Rinkeby);
        assert_eq!(config.network("mainnet").unwrap().chain_id, 1);
        assert!(config.network("kovan").is_err());
        assert!(config.etherscan.api_key.is_none());
    }

    #[test]
    fn compiler_settings_render_solc_json() {
        let config = Config::load(&Environment::default()).unwrap();
        let versions: Vec<_> = config.compilers.iter().map(|c| c.version.as_str()).collect();
        assert_eq!(versions, ["0.8.10", "0.7.5", "0.5.16"]);

        assert_eq!(
            config.compilers[0].settings_json(),
            serde_json::json!({
                "optimizer": { "enabled": true, "runs": 800 },
                "metadata": { "bytecodeHash": "none" },
            })
        );
        assert_eq!(
            config.compilers[2].settings_json(),
            serde_json::json!({ "optimizer": { "enabled": false, "runs": 200 } })
        );
    }
}

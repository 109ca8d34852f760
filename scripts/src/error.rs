use std::path::PathBuf;

use ethers::{
    contract::ContractError,
    providers::Middleware,
    types::{H160, H256},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown network `{0}`, expected one of: hardhat, mainnet, rinkeby")]
    UnknownNetwork(String),

    #[error("missing credential {0}, set it in the environment or in .env")]
    MissingCredential(&'static str),

    #[error("invalid {label} address `{value}`")]
    InvalidAddress { label: &'static str, value: String },

    #[error("invalid rpc url `{0}`")]
    InvalidRpcUrl(String),

    #[error("malformed provider endpoint `{0}`")]
    MalformedEndpoint(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("artifact {0} has no deployable bytecode")]
    MissingBytecode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("no signer available: {0}")]
    NoSignerAvailable(String),

    #[error("contract at {address:?} does not match the expected interface: {reason}")]
    InterfaceMismatch { address: H160, reason: String },

    #[error("remote call failed: {0}")]
    RemoteCall(String),

    #[error("transaction {0:?} was dropped before a receipt was produced")]
    TransactionDropped(H256),
}

impl ScriptError {
    /// Sorts a failed contract call into the error taxonomy. Input or output that
    /// does not encode against the abi means the code at `address` is something else.
    pub fn from_contract<M: Middleware>(address: H160, err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::InterfaceMismatch {
                address,
                reason: e.to_string(),
            },
            ContractError::AbiError(e) => Self::InterfaceMismatch {
                address,
                reason: e.to_string(),
            },
            ContractError::DetokenizationError(e) => Self::InterfaceMismatch {
                address,
                reason: e.to_string(),
            },
            ContractError::ConstructorError => Self::InterfaceMismatch {
                address,
                reason: "constructor arguments given but the abi has no constructor".to_owned(),
            },
            other => Self::RemoteCall(other.to_string()),
        }
    }
}

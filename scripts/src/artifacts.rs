use std::{
    fs,
    path::{Path, PathBuf},
};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::error::ArtifactError;

/// Compiled contract as written by the Hardhat build under `artifacts/`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn path(dir: &Path, contract_name: &str) -> PathBuf {
        dir.join("contracts")
            .join(format!("{contract_name}.sol"))
            .join(format!("{contract_name}.json"))
    }

    pub fn load(dir: &Path, contract_name: &str) -> Result<Self, ArtifactError> {
        let path = Self::path(dir, contract_name);
        log::debug!("loading artifact {}", path.display());

        let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&path, &raw)
    }

    pub fn from_json(path: &Path, raw: &str) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_str(raw).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if artifact.bytecode.is_empty() {
            return Err(ArtifactError::MissingBytecode(artifact.contract_name));
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ERC20: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "TestERC20",
        "sourceName": "contracts/TestERC20.sol",
        "abi": [
            {
                "inputs": [
                    { "internalType": "string", "name": "name_", "type": "string" },
                    { "internalType": "string", "name": "symbol_", "type": "string" },
                    { "internalType": "uint256", "name": "supply", "type": "uint256" }
                ],
                "stateMutability": "nonpayable",
                "type": "constructor"
            }
        ],
        "bytecode": "0x6080604052",
        "deployedBytecode": "0x6080",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    #[test]
    fn artifact_path_follows_hardhat_layout() {
        assert_eq!(
            Artifact::path(Path::new("artifacts"), "UniswapV2Pair"),
            PathBuf::from("artifacts/contracts/UniswapV2Pair.sol/UniswapV2Pair.json")
        );
    }

    #[test]
    fn parses_hardhat_artifact() {
        let artifact = Artifact::from_json(Path::new("TestERC20.json"), TEST_ERC20).unwrap();
        assert_eq!(artifact.contract_name, "TestERC20");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.abi.constructor().unwrap().inputs.len(), 3);
    }

    #[test]
    fn interface_artifact_is_not_deployable() {
        let raw = r#"{ "contractName": "IUniswapV2Pair", "abi": [], "bytecode": "0x" }"#;
        let err = Artifact::from_json(Path::new("IUniswapV2Pair.json"), raw).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingBytecode(name) if name == "IUniswapV2Pair"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Artifact::load(Path::new("/nonexistent-artifacts"), "TestERC20").unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
    }
}

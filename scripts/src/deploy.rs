use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use ethers::{
    abi::Token,
    contract::ContractFactory,
    providers::Middleware,
    types::{H160, H256, U256},
};

use crate::{
    artifacts::Artifact,
    contracts::UniswapV2Factory,
    error::ScriptError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairCreation {
    pub pair: H160,
    pub transaction_hash: H256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreDeployment {
    pub uniswap_v2_erc20: H160,
    pub uniswap_v2_factory: H160,
    pub uniswap_v2_pair: H160,
}

#[async_trait]
pub trait PairFactory {
    async fn create_pair(&self, token_a: H160, token_b: H160) -> Result<PairCreation, ScriptError>;
}

#[async_trait]
pub trait ContractDeployer {
    async fn deploy(&self, artifact: &Artifact, args: Vec<Token>) -> Result<H160, ScriptError>;
}

#[async_trait]
impl<M: Middleware + 'static> PairFactory for UniswapV2Factory<M> {
    async fn create_pair(&self, token_a: H160, token_b: H160) -> Result<PairCreation, ScriptError> {
        let address = self.address();
        let call = self.create_pair(token_a, token_b).legacy();
        let pending = call
            .send()
            .await
            .map_err(|e| ScriptError::from_contract(address, e))?;
        let transaction_hash = pending.tx_hash();
        log::info!("transaction hash:{:?}", transaction_hash);

        let receipt = pending
            .await
            .map_err(|e| ScriptError::RemoteCall(e.to_string()))?
            .ok_or(ScriptError::TransactionDropped(transaction_hash))?;
        log::debug!("createPair mined in block {:?}", receipt.block_number);

        let pair = self
            .get_pair(token_a, token_b)
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(address, e))?;

        Ok(PairCreation {
            pair,
            transaction_hash,
        })
    }
}

/// Deploys compiled Hardhat artifacts found under `artifacts_dir`.
pub struct Deploy<M> {
    client: Arc<M>,
    artifacts_dir: PathBuf,
}

#[async_trait]
impl<M: Middleware + 'static> ContractDeployer for Deploy<M> {
    async fn deploy(&self, artifact: &Artifact, args: Vec<Token>) -> Result<H160, ScriptError> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.client.clone(),
        );
        // not deployed yet, so there is no address to report
        let (contract, receipt) = factory
            .deploy_tokens(args)
            .map_err(|e| ScriptError::from_contract(H160::zero(), e))?
            .legacy()
            .send_with_receipt()
            .await
            .map_err(|e| ScriptError::RemoteCall(e.to_string()))?;
        log::info!(
            "{} deployed, transaction hash:{:?}",
            artifact.contract_name,
            receipt.transaction_hash
        );
        log::debug!("gas used: {:?}", receipt.gas_used);

        Ok(contract.address())
    }
}

impl<M: Middleware + 'static> Deploy<M> {
    pub fn new(client: Arc<M>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            artifacts_dir: artifacts_dir.into(),
        }
    }

    async fn deploy_named(
        &self,
        contract_name: &str,
        args: Vec<Token>,
    ) -> Result<H160, ScriptError> {
        let artifact = Artifact::load(&self.artifacts_dir, contract_name)?;
        self.deploy(&artifact, args).await
    }

    pub async fn deploy_test_token(
        &self,
        name: &str,
        symbol: &str,
        supply: U256,
    ) -> Result<H160, ScriptError> {
        self.deploy_named(
            "TestERC20",
            vec![
                Token::String(name.to_owned()),
                Token::String(symbol.to_owned()),
                Token::Uint(supply),
            ],
        )
        .await
    }

    pub async fn deploy_core(&self, fee_to_setter: H160) -> Result<CoreDeployment, ScriptError> {
        let uniswap_v2_erc20 = self.deploy_named("UniswapV2ERC20", vec![]).await?;

        let uniswap_v2_factory = self
            .deploy_named("UniswapV2Factory", vec![Token::Address(fee_to_setter)])
            .await?;

        let uniswap_v2_pair = self.deploy_named("UniswapV2Pair", vec![]).await?;

        Ok(CoreDeployment {
            uniswap_v2_erc20,
            uniswap_v2_factory,
            uniswap_v2_pair,
        })
    }
}

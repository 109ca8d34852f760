use std::{fmt, sync::Arc};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{H160, U256},
    utils::{hex, to_checksum},
};

use crate::{
    config::NetworkProfile,
    contracts::{UniswapV2Factory, UniswapV2Pair},
    error::{ConfigError, ScriptError},
    utils::strip_0x,
};

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Takes the first configured account of the profile as the signing identity.
pub fn acquire_signer(profile: &NetworkProfile) -> Result<LocalWallet, ScriptError> {
    let sk = profile.accounts.first().ok_or_else(|| {
        ScriptError::NoSignerAvailable(format!("network {} has no accounts", profile.name))
    })?;
    let bytes = hex::decode(strip_0x(sk))
        .map_err(|e| ScriptError::NoSignerAvailable(format!("malformed private key: {e}")))?;
    let wallet = LocalWallet::from_bytes(&bytes)
        .map_err(|e| ScriptError::NoSignerAvailable(format!("malformed private key: {e}")))?;

    Ok(wallet.with_chain_id(profile.chain_id))
}

/// Builds the http client for the profile. Nothing is sent to the node here.
pub fn connect(profile: &NetworkProfile) -> Result<Arc<Client>, ScriptError> {
    profile.ensure_credentials()?;
    let wallet = acquire_signer(profile)?;
    let provider = Provider::<Http>::try_from(profile.rpc_url.as_str())
        .map_err(|_| ConfigError::InvalidRpcUrl(profile.rpc_url.clone()))?;

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub deployer: H160,
    pub factory: H160,
    pub pair_count: U256,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deploying contracts with the account: {}",
            to_checksum(&self.deployer, None)
        )?;
        writeln!(f, "uniswapV2Factory : {}", to_checksum(&self.factory, None))?;
        write!(f, "{}", self.pair_count)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairInfo {
    pub index: U256,
    pub pair: H160,
    pub token0: H160,
    pub token1: H160,
    pub reserve0: u128,
    pub reserve1: u128,
    pub block_timestamp_last: u32,
}

impl fmt::Display for PairInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pair #{}: {}", self.index, to_checksum(&self.pair, None))?;
        writeln!(
            f,
            "token0: {} reserve: {}",
            to_checksum(&self.token0, None),
            self.reserve0
        )?;
        writeln!(
            f,
            "token1: {} reserve: {}",
            to_checksum(&self.token1, None),
            self.reserve1
        )?;
        write!(f, "last update: {}", self.block_timestamp_last)
    }
}

pub struct Runner<M> {
    client: Arc<M>,
    deployer: H160,
    factory: H160,
}

impl<M: Middleware + 'static> Runner<M> {
    pub fn new(client: Arc<M>, deployer: H160, factory: H160) -> Self {
        Self {
            client,
            deployer,
            factory,
        }
    }

    /// Binds the factory binding locally; the remote code is not checked.
    fn attach(&self) -> UniswapV2Factory<M> {
        UniswapV2Factory::new(self.factory, self.client.clone())
    }

    pub async fn run(&self) -> Result<Report, ScriptError> {
        log::info!("deployer:{:?}", self.deployer);
        let factory = self.attach();
        log::info!("attached UniswapV2Factory at {:?}", self.factory);

        let pair_count = factory
            .all_pairs_length()
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(self.factory, e))?;
        log::info!("allPairsLength:{}", pair_count);

        Ok(Report {
            deployer: self.deployer,
            factory: self.factory,
            pair_count,
        })
    }

    pub async fn pair_info(&self, index: U256) -> Result<PairInfo, ScriptError> {
        let factory = self.attach();
        let pair = factory
            .all_pairs(index)
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(self.factory, e))?;
        log::info!("pair #{} at {:?}", index, pair);

        let contract = UniswapV2Pair::new(pair, self.client.clone());
        let token0 = contract
            .token_0()
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(pair, e))?;
        let token1 = contract
            .token_1()
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(pair, e))?;
        let (reserve0, reserve1, block_timestamp_last) = contract
            .get_reserves()
            .call()
            .await
            .map_err(|e| ScriptError::from_contract(pair, e))?;

        Ok(PairInfo {
            index,
            pair,
            token0,
            token1,
            reserve0,
            reserve1,
            block_timestamp_last,
        })
    }
}

impl Runner<Client> {
    pub fn from_client(client: Arc<Client>, factory: H160) -> Self {
        let deployer = client.address();
        Self::new(client, deployer, factory)
    }
}

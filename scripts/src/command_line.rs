use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ethers::types::{H160, U256};

use crate::{
    config::{Config, Environment, ProviderEndpoint},
    contracts::{AddressBook, UniswapV2Factory},
    deploy::{Deploy, PairFactory},
    runner::{connect, Runner},
};

#[derive(Debug, Parser)]
#[clap(about = "Scripts against the deployed Uniswap V2 contracts")]
pub struct CommandLine {
    /// Network to connect to: hardhat, mainnet or rinkeby.
    #[clap(short, long)]
    network: Option<String>,

    /// UniswapV2Factory address, defaults to the rinkeby deployment.
    #[clap(short, long)]
    factory: Option<H160>,

    /// Directory holding the compiled Hardhat artifacts.
    #[clap(long, default_value = "artifacts")]
    artifacts: PathBuf,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the number of pairs created by the factory.
    Pairs,
    /// Print the tokens and reserves of the pair at `index`.
    Pair {
        #[clap(short, long)]
        index: u64,
    },
    /// Create a pair for two tokens, LINK/TEST by default.
    CreatePair {
        #[clap(long)]
        token_a: Option<H160>,
        #[clap(long)]
        token_b: Option<H160>,
    },
    /// Deploy a TestERC20 token.
    DeployToken {
        #[clap(long, default_value = "Test Token")]
        name: String,
        #[clap(long, default_value = "TTK")]
        symbol: String,
        #[clap(long, default_value_t = 100_000_000)]
        supply: u128,
    },
    /// Deploy UniswapV2ERC20, UniswapV2Factory and UniswapV2Pair.
    DeployCore {
        /// Defaults to the signer.
        #[clap(long)]
        fee_to_setter: Option<H160>,
    },
    /// List the configured networks.
    Networks,
    /// Print the solc settings of each configured compiler.
    Compilers,
}

impl CommandLine {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load(&Environment::from_env())?;
        let book = AddressBook::rinkeby()?;

        let profile = match &self.network {
            Some(name) => config.network(name)?,
            None => config.default_profile()?,
        };
        log::info!("network:{} chain id:{}", profile.name, profile.chain_id);

        match self.command.unwrap_or(Command::Pairs) {
            Command::Pairs => {
                let client = connect(profile)?;
                let runner =
                    Runner::from_client(client, self.factory.unwrap_or(book.uniswap_v2_factory));
                println!("{}", runner.run().await?);
            }
            Command::Pair { index } => {
                let client = connect(profile)?;
                let runner =
                    Runner::from_client(client, self.factory.unwrap_or(book.uniswap_v2_factory));
                println!("{}", runner.pair_info(U256::from(index)).await?);
            }
            Command::CreatePair { token_a, token_b } => {
                let client = connect(profile)?;
                println!("Deploying contracts with the account: {:?}", client.address());
                let factory =
                    UniswapV2Factory::new(self.factory.unwrap_or(book.uniswap_v2_factory), client);
                let created = PairFactory::create_pair(
                    &factory,
                    token_a.unwrap_or(book.link),
                    token_b.unwrap_or(book.test),
                )
                .await?;
                println!("transaction hash: {:?}", created.transaction_hash);
                println!("pair created at {:?}", created.pair);
                println!("completed");
            }
            Command::DeployToken {
                name,
                symbol,
                supply,
            } => {
                let client = connect(profile)?;
                println!("Deploying contracts with the account: {:?}", client.address());
                let token = Deploy::new(client, self.artifacts)
                    .deploy_test_token(&name, &symbol, U256::from(supply))
                    .await?;
                println!("TestERC20 deployed to: {:?}", token);
            }
            Command::DeployCore { fee_to_setter } => {
                let client = connect(profile)?;
                let deployer = client.address();
                println!("Deploying contracts with the account: {:?}", deployer);
                let core = Deploy::new(client, self.artifacts)
                    .deploy_core(fee_to_setter.unwrap_or(deployer))
                    .await?;
                println!("UniswapV2ERC20 deployed to: {:?}", core.uniswap_v2_erc20);
                println!("UniswapV2Factory deployed to: {:?}", core.uniswap_v2_factory);
                println!("UniswapV2Pair deployed to: {:?}", core.uniswap_v2_pair);
            }
            Command::Networks => {
                for network in &config.networks {
                    let default = if network.name == config.default_network {
                        " (default)"
                    } else {
                        ""
                    };
                    let host = match network.endpoint() {
                        Some(endpoint) => format!("eth-{}", endpoint.network),
                        None => network.rpc_url.clone(),
                    };
                    println!(
                        "{}{}: chain id {}, {}",
                        network.name, default, network.chain_id, host
                    );
                    let upstream = network
                        .forking
                        .as_deref()
                        .and_then(|f| f.parse::<ProviderEndpoint>().ok());
                    if let Some(endpoint) = upstream {
                        println!("  forking eth-{}", endpoint.network);
                    }
                }
                let etherscan = if config.etherscan.api_key.is_some() {
                    "configured"
                } else {
                    "not configured"
                };
                println!("etherscan api key: {}", etherscan);
            }
            Command::Compilers => {
                for compiler in &config.compilers {
                    println!("solc {}: {}", compiler.version, compiler.settings_json());
                }
            }
        }

        Ok(())
    }
}

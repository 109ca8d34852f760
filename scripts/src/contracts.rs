use ethers::{contract::abigen, types::H160};

use crate::{error::ConfigError, utils::parse_address};

abigen!(
    UniswapV2Factory,
    r#"[
        function feeTo() external view returns (address)
        function feeToSetter() external view returns (address)
        function getPair(address tokenA, address tokenB) external view returns (address pair)
        function allPairs(uint256) external view returns (address pair)
        function allPairsLength() external view returns (uint256)
        function createPair(address tokenA, address tokenB) external returns (address pair)
    ]"#
);

abigen!(
    UniswapV2Pair,
    r#"[
        function factory() external view returns (address)
        function token0() external view returns (address)
        function token1() external view returns (address)
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
    ]"#
);

const UNISWAP_V2_ERC20: &str = "0x93bA337780F3cDD83Ec2A69Ea8969D9A07B259eC";
const UNISWAP_V2_FACTORY: &str = "0xFc801cF6189C59Da80BaD090565C345355D06Cb6";
const UNISWAP_V2_PAIR: &str = "0x82c3014529E0F3F027E8f46Cd34f6CC1B53f6f8f";

const LINK_TOKEN: &str = "0x01BE23585060835E02B77ef475b0Cc51aA1e0709";
const TEST_TOKEN: &str = "0xea19D1882F776bFa9b8a6B6Ef0e02e560363A066";

/// Contracts already deployed on rinkeby.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressBook {
    pub uniswap_v2_erc20: H160,
    pub uniswap_v2_factory: H160,
    pub uniswap_v2_pair: H160,
    pub link: H160,
    pub test: H160,
}

impl AddressBook {
    pub fn rinkeby() -> Result<Self, ConfigError> {
        Ok(Self {
            uniswap_v2_erc20: parse_address("UniswapV2ERC20", UNISWAP_V2_ERC20)?,
            uniswap_v2_factory: parse_address("UniswapV2Factory", UNISWAP_V2_FACTORY)?,
            uniswap_v2_pair: parse_address("UniswapV2Pair", UNISWAP_V2_PAIR)?,
            link: parse_address("LINK", LINK_TOKEN)?,
            test: parse_address("TEST", TEST_TOKEN)?,
        })
    }
}

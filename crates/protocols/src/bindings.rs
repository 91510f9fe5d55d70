//! Contract bindings for a Uniswap V2 style pair and its ERC-20 tokens.

use ethers::prelude::*;

pub mod pair {
    use ethers::prelude::abigen;

    abigen!(
        IUniswapV2Pair,
        r#"[
            function token0() external view returns (address)
            function token1() external view returns (address)
            function name() external view returns (string)
            function totalSupply() external view returns (uint256)
            function balanceOf(address owner) external view returns (uint256)
            function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        ]"#,
    );
}

pub mod erc20 {
    use ethers::prelude::abigen;

    abigen!(
        IERC20Metadata,
        r#"[
            function decimals() external view returns (uint8)
            function symbol() external view returns (string)
            function name() external view returns (string)
        ]"#,
    );
}

pub use erc20::IERC20Metadata;
pub use pair::IUniswapV2Pair;

/// `Swap(address indexed sender, uint amount0In, uint amount1In, uint amount0Out, uint amount1Out, address indexed to)`
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(name = "Swap")]
pub struct SwapLog {
    #[ethevent(indexed)]
    pub sender: Address,
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
    #[ethevent(indexed)]
    pub to: Address,
}

//! ABI bindings for the contracts under test.

use alloy_sol_types::sol;

sol! {
	/// Pair factory. Pairs are deployed with CREATE2, salted with the sorted token pair.
	interface IUniswapV2Factory {
		event PairCreated(address indexed token0, address indexed token1, address pair, uint256 allPairsLength);

		function feeTo() external view returns (address);
		function feeToSetter() external view returns (address);
		function getPair(address tokenA, address tokenB) external view returns (address pair);
		function allPairs(uint256 index) external view returns (address pair);
		function allPairsLength() external view returns (uint256);
		function pairCodeHash() external pure returns (bytes32);
		function createPair(address tokenA, address tokenB) external returns (address pair);
		function setFeeTo(address _feeTo) external;
		function setFeeToSetter(address _feeToSetter) external;
	}

	interface IUniswapV2Pair {
		function factory() external view returns (address);
		function token0() external view returns (address);
		function token1() external view returns (address);
	}

	/// LP token with EIP-2612 permit.
	interface IUniswapV2ERC20 {
		event Approval(address indexed owner, address indexed spender, uint256 value);
		event Transfer(address indexed from, address indexed to, uint256 value);

		function name() external view returns (string);
		function symbol() external view returns (string);
		function decimals() external view returns (uint8);
		function totalSupply() external view returns (uint256);
		function balanceOf(address owner) external view returns (uint256);
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 value) external returns (bool);
		function transfer(address to, uint256 value) external returns (bool);
		function transferFrom(address from, address to, uint256 value) external returns (bool);
		function DOMAIN_SEPARATOR() external view returns (bytes32);
		function PERMIT_TYPEHASH() external view returns (bytes32);
		function nonces(address owner) external view returns (uint256);
		function permit(address owner, address spender, uint256 value, uint256 deadline, uint8 v, bytes32 r, bytes32 s) external;
	}
}

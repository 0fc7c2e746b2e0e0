//! ERC20 token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// Standard ERC20 token interface, trimmed to what the watcher uses.
    #[sol(rpc)]
    interface IERC20 {
        /// Emitted on every token movement
        event Transfer(
            address indexed from,
            address indexed to,
            uint256 value
        );

        /// Emitted whenever an owner sets a spender allowance
        event Approval(
            address indexed owner,
            address indexed spender,
            uint256 value
        );

        /// Token balance held by an account
        function balanceOf(address account) external view returns (uint256);

        /// Remaining amount `spender` may transfer on behalf of `owner`
        function allowance(address owner, address spender) external view returns (uint256);

        /// Set the allowance granted to `spender`
        function approve(address spender, uint256 amount) external returns (bool);

        /// Total token supply
        function totalSupply() external view returns (uint256);

        /// Fixed-point scale of all raw amounts
        function decimals() external view returns (uint8);

        /// Token name
        function name() external view returns (string memory);

        /// Token symbol
        function symbol() external view returns (string memory);
    }
}

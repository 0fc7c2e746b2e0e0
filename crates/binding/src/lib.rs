//! Contract bindings for the token watcher.
//!
//! Only the standard ERC20 interface is needed here: the view reads the
//! synchronizer polls (balance, allowance, total supply, decimals), the
//! `approve` mutation, and the `Transfer`/`Approval` events that drive
//! push updates.
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod token;

//! # cardmatch-types
//!
//! Shared types, errors, and configuration for the **cardmatch** trade engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Party`], [`ClassId`], [`InstanceId`], [`TypeTag`], [`TradeAttemptId`]
//! - **Inventory model**: [`Item`], [`InventorySnapshot`]
//! - **Request model**: [`CardRequest`], [`MatchedPairs`]
//! - **Trade model**: [`MovedItem`], [`TradeReceipt`]
//! - **Configuration**: [`TradeSettings`], [`CardOrder`], [`AfterTrade`], [`TradeConfig`], [`WaitConfig`]
//! - **Errors**: [`CardmatchError`] with `CM_ERR_` prefix codes
//! - **Constants**: defaults and limits

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod request;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use cardmatch_types::{Item, InventorySnapshot, CardRequest, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use inventory::*;
pub use request::*;
pub use trade::*;

// Constants are accessed via `cardmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).

//! # cardmatch-session
//!
//! **Session Plane**: everything that happens on a trade page for one
//! attempt, around the pure matching core.
//!
//! ## Architecture
//!
//! A [`TradeSession`] runs against a [`TradeEnvironment`] and:
//! 1. Clears the inventory-context cookie ([`InventoryContextGuard`])
//! 2. Waits, bounded, for both inventories ([`wait_for_inventories`])
//! 3. Validates inventories and filters the request (`cardmatch-matchcore`)
//! 4. Selects and moves one instance per matched class
//! 5. Checks the 1:1 type-tag balance
//! 6. Installs the post-trade action and optionally sends the offer
//!
//! Around it:
//! - [`settings_store`]: persisted user settings with per-key validation
//! - [`splitter`]: oversized trade links split into per-window chunks

pub mod cookie;
pub mod environment;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod session;
pub mod settings_store;
pub mod splitter;
pub mod wait;

pub use cookie::InventoryContextGuard;
pub use environment::{Cookie, TradeEnvironment, WindowOpener};
#[cfg(any(test, feature = "test-helpers"))]
pub use memory::{EnvEvent, MemoryEnvironment};
pub use session::{TradeSession, handle_trade_url, run_trade};
pub use settings_store::{JsonFileStore, MemoryStore, SettingsManager, SettingsStore};
pub use splitter::{open_split_trades, split_trade_url};
pub use wait::{InventoryWait, WaitState, wait_for_inventories};

//! Host environment port.
//!
//! The trade page owns the inventories, the trade slots and the cookies.
//! Everything the session needs from it goes through [`TradeEnvironment`],
//! so the engine never touches page globals and can run against the
//! in-memory page (`memory` module, `test-helpers` feature) in tests.
//!
//! The host is single-threaded: all methods take `&self` and
//! implementations use interior mutability where they need state.

use cardmatch_types::{AfterTrade, InventorySnapshot, Item, Party, Result};
use chrono::{DateTime, Utc};
use url::Url;

/// A cookie write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Capabilities the trade page exposes to a session.
pub trait TradeEnvironment {
    /// Current inventory of `party`, `None` if its context is not loaded.
    fn inventory(&self, party: Party) -> Option<InventorySnapshot>;

    /// Inventory loads still running for `party`.
    fn loads_in_flight(&self, party: Party) -> u32;

    /// Start loading the inventory context of `party`.
    fn request_inventory_load(&self, party: Party);

    /// Populate a loaded inventory (builds its display elements).
    fn build_inventory_display(&self, party: Party);

    /// Switch the visible inventory tab.
    fn select_inventory(&self, party: Party);

    /// Fill the trade offer note.
    fn set_trade_note(&self, note: &str);

    /// Place one instance into the trade slots of `party`.
    fn move_item_to_trade(&self, party: Party, item: &Item) -> Result<()>;

    /// Tick or untick the "ready" box.
    fn toggle_ready(&self, ready: bool);

    /// Send the offer.
    fn confirm_trade(&self) -> Result<()>;

    /// Arrange for `action` to run once the offer has been sent.
    fn install_post_trade_action(&self, action: AfterTrade);

    /// Show a modal alert to the user.
    fn show_alert(&self, title: &str, message: &str);

    fn cookie(&self, name: &str) -> Option<String>;

    fn set_cookie(&self, cookie: &Cookie);

    fn clear_cookie(&self, name: &str, path: &str);
}

/// Opens browser windows (used by the trade splitter).
pub trait WindowOpener {
    fn open_window(&self, url: &Url) -> Result<()>;
}

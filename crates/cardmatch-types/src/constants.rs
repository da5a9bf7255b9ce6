//! System-wide constants for the cardmatch trade engine.

/// Steam Community app id that owns trading cards.
pub const STEAM_APP_ID: u32 = 753;

/// Inventory context id for trading cards within the community app.
pub const STEAM_CONTEXT_ID: u32 = 6;

/// Host that serves the matcher website (trade links and settings page).
pub const MATCHER_HOST: &str = "www.steamtradematcher.com";

/// Maximum number of card pairs per trade offer window.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Delay between opening consecutive split trade windows, in milliseconds.
pub const DEFAULT_WINDOW_DELAY_MS: u64 = 1000;

/// Interval between inventory readiness polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Upper bound on the total inventory wait, in milliseconds.
pub const DEFAULT_MAX_WAIT_MS: u64 = 60_000;

/// Upper bound on the number of inventory readiness polls.
pub const DEFAULT_MAX_WAIT_RETRIES: u32 = 120;

/// Cookie that remembers the last inventory context shown on a trade page.
pub const INVENTORY_CONTEXT_COOKIE: &str = "strTradeLastInventoryContext";

/// Path scope of [`INVENTORY_CONTEXT_COOKIE`].
pub const INVENTORY_CONTEXT_COOKIE_PATH: &str = "/tradeoffer/";

/// Lifetime given to a restored inventory context cookie, in days.
pub const INVENTORY_CONTEXT_COOKIE_DAYS: i64 = 15;

/// Maximum length of the trade offer message, in characters.
pub const MAX_TRADE_MESSAGE_CHARS: usize = 128;

/// Default trade offer message.
pub const DEFAULT_TRADE_MESSAGE: &str = "SteamTrade Matcher";

/// Query key carrying the local user's requested classes.
pub const YOU_PARAM: &str = "you[]";

/// Query key carrying the counterparty's requested classes.
pub const THEM_PARAM: &str = "them[]";

/// Legacy single-key form of [`YOU_PARAM`] (`;`-delimited).
pub const LEGACY_YOU_PARAM: &str = "you";

/// Legacy single-key form of [`THEM_PARAM`] (`;`-delimited).
pub const LEGACY_THEM_PARAM: &str = "them";

/// Separator used by the legacy request form.
pub const LEGACY_SEPARATOR: char = ';';

/// Title of the alert raised when a trade attempt fails.
pub const TRADE_ERROR_TITLE: &str = "Trade Error";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "cardmatch";

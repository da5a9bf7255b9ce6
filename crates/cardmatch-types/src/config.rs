//! Settings and configuration types.
//!
//! [`TradeSettings`] are the user-tunable values persisted in a key-value
//! store, one key per field. Each persisted value is validated on its own
//! through [`TradeSettings::apply`]; the store layer decides what to do
//! with rejects (fall back to the default).
//!
//! [`TradeConfig`] holds the fixed knobs of the engine: host ids, chunking
//! and wait bounds.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CardmatchError, Result, constants};

// ---------------------------------------------------------------------------
// CardOrder
// ---------------------------------------------------------------------------

/// Which instance of a requested class gets added to the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardOrder {
    /// Natural inventory order.
    #[default]
    AsIs,
    /// Highest numeric instance id first.
    Sort,
    /// Uniform pick over the remaining candidates, per pick.
    Random,
}

impl fmt::Display for CardOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsIs => write!(f, "AS_IS"),
            Self::Sort => write!(f, "SORT"),
            Self::Random => write!(f, "RANDOM"),
        }
    }
}

impl FromStr for CardOrder {
    type Err = CardmatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AS_IS" => Ok(Self::AsIs),
            "SORT" => Ok(Self::Sort),
            "RANDOM" => Ok(Self::Random),
            other => Err(CardmatchError::InvalidSetting {
                key: SettingKey::Order.to_string(),
                reason: format!("unknown card order {other:?}"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// AfterTrade
// ---------------------------------------------------------------------------

/// What the trade page does once the offer has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfterTrade {
    /// Keep the page's normal behaviour.
    #[default]
    Nothing,
    /// Close the trade window.
    CloseWindow,
    /// Acknowledge the confirmation dialog (goes to the offers recap).
    ClickOk,
}

impl fmt::Display for AfterTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "NOTHING"),
            Self::CloseWindow => write!(f, "CLOSE_WINDOW"),
            Self::ClickOk => write!(f, "CLICK_OK"),
        }
    }
}

impl FromStr for AfterTrade {
    type Err = CardmatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NOTHING" => Ok(Self::Nothing),
            "CLOSE_WINDOW" => Ok(Self::CloseWindow),
            "CLICK_OK" => Ok(Self::ClickOk),
            other => Err(CardmatchError::InvalidSetting {
                key: SettingKey::DoAfterTrade.to_string(),
                reason: format!("unknown post-trade action {other:?}"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SettingKey
// ---------------------------------------------------------------------------

/// Persisted setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Message,
    AutoSend,
    DoAfterTrade,
    Order,
    SideBySide,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Message,
        SettingKey::AutoSend,
        SettingKey::DoAfterTrade,
        SettingKey::Order,
        SettingKey::SideBySide,
    ];

    /// Storage key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "MESSAGE",
            Self::AutoSend => "AUTO_SEND",
            Self::DoAfterTrade => "DO_AFTER_TRADE",
            Self::Order => "ORDER",
            Self::SideBySide => "SIDE_BY_SIDE",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TradeSettings
// ---------------------------------------------------------------------------

/// User settings for trade pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TradeSettings {
    /// Note attached to every trade offer.
    pub message: String,
    /// Mark the offer ready and confirm it without user action.
    pub auto_send: bool,
    /// Post-send behaviour.
    #[serde(rename = "DO_AFTER_TRADE")]
    pub after_trade: AfterTrade,
    /// Instance selection policy.
    pub order: CardOrder,
    /// Side-by-side trade page layout.
    pub side_by_side: bool,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            message: constants::DEFAULT_TRADE_MESSAGE.to_string(),
            auto_send: false,
            after_trade: AfterTrade::Nothing,
            order: CardOrder::AsIs,
            side_by_side: false,
        }
    }
}

impl TradeSettings {
    /// Validate a persisted value and store it in the matching field.
    ///
    /// Messages longer than [`constants::MAX_TRADE_MESSAGE_CHARS`] are
    /// truncated rather than rejected.
    ///
    /// # Errors
    /// [`CardmatchError::InvalidSetting`] if the value has the wrong JSON
    /// type or is outside the key's allowed set. `self` is left untouched.
    pub fn apply(&mut self, key: SettingKey, value: &Value) -> Result<()> {
        match key {
            SettingKey::Message => {
                let text = expect_str(key, value)?;
                self.message = clamp_message(text);
            }
            SettingKey::AutoSend => self.auto_send = expect_bool(key, value)?,
            SettingKey::DoAfterTrade => self.after_trade = expect_str(key, value)?.parse()?,
            SettingKey::Order => self.order = expect_str(key, value)?.parse()?,
            SettingKey::SideBySide => self.side_by_side = expect_bool(key, value)?,
        }
        Ok(())
    }

    /// Persisted representation of one field.
    #[must_use]
    pub fn value_of(&self, key: SettingKey) -> Value {
        match key {
            SettingKey::Message => Value::String(self.message.clone()),
            SettingKey::AutoSend => Value::Bool(self.auto_send),
            SettingKey::DoAfterTrade => Value::String(self.after_trade.to_string()),
            SettingKey::Order => Value::String(self.order.to_string()),
            SettingKey::SideBySide => Value::Bool(self.side_by_side),
        }
    }
}

fn expect_str(key: SettingKey, value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| CardmatchError::InvalidSetting {
        key: key.to_string(),
        reason: format!("expected a string, got {value}"),
    })
}

fn expect_bool(key: SettingKey, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| CardmatchError::InvalidSetting {
        key: key.to_string(),
        reason: format!("expected a boolean, got {value}"),
    })
}

/// Cut a trade message down to the maximum length, on a char boundary.
#[must_use]
pub fn clamp_message(text: &str) -> String {
    text.chars().take(constants::MAX_TRADE_MESSAGE_CHARS).collect()
}

// ---------------------------------------------------------------------------
// WaitConfig / TradeConfig
// ---------------------------------------------------------------------------

/// Bounds for the inventory readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Pause between readiness polls.
    pub poll_interval: Duration,
    /// Give up once this much time has passed.
    pub max_elapsed: Duration,
    /// Give up after this many unsuccessful polls.
    pub max_retries: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(constants::DEFAULT_POLL_INTERVAL_MS),
            max_elapsed: Duration::from_millis(constants::DEFAULT_MAX_WAIT_MS),
            max_retries: constants::DEFAULT_MAX_WAIT_RETRIES,
        }
    }
}

/// Fixed engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// App that owns the tradable items.
    pub app_id: u32,
    /// Inventory context within the app.
    pub context_id: u32,
    /// Maximum request pairs per trade window.
    pub chunk_size: usize,
    /// Pause between opening consecutive split trade windows.
    pub window_delay: Duration,
    /// Hosts of the matcher website.
    pub website_hosts: Vec<String>,
    /// Inventory wait bounds.
    pub wait: WaitConfig,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            app_id: constants::STEAM_APP_ID,
            context_id: constants::STEAM_CONTEXT_ID,
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            window_delay: Duration::from_millis(constants::DEFAULT_WINDOW_DELAY_MS),
            website_hosts: vec![constants::MATCHER_HOST.to_string()],
            wait: WaitConfig::default(),
        }
    }
}

impl TradeConfig {
    /// Whether `host` serves the matcher website.
    #[must_use]
    pub fn is_matcher_host(&self, host: &str) -> bool {
        self.website_hosts.iter().any(|h| h == host)
    }
}

//! Error types for the cardmatch trade engine.
//!
//! All errors use the `CM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Request errors
//! - 2xx: Inventory errors
//! - 3xx: Matching / selection errors
//! - 4xx: Settings errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{ClassId, TypeTag};

/// Central error enum for all cardmatch operations.
///
/// Every variant aborts the current trade attempt. Nothing in the engine
/// retries on its own; the top-level handler surfaces the message.
#[derive(Debug, Error)]
pub enum CardmatchError {
    // =================================================================
    // Request Errors (1xx)
    // =================================================================
    /// One or both request lists are empty.
    #[error("CM_ERR_100: No cards specified in URL parameters")]
    NoCardsRequested,

    /// The trade URL could not be parsed.
    #[error("CM_ERR_101: Invalid trade URL: {reason}")]
    InvalidTradeUrl { reason: String },

    // =================================================================
    // Inventory Errors (2xx)
    // =================================================================
    /// Either party's inventory was empty when validation began.
    #[error("CM_ERR_200: Invalid inventory state")]
    InvalidInventoryState,

    /// Inventories did not become ready within the wait budget.
    #[error("CM_ERR_201: Inventory wait timed out after {elapsed_ms}ms")]
    InventoryTimeout { elapsed_ms: u64 },

    /// Inventories did not become ready within the poll budget.
    #[error("CM_ERR_202: Inventory wait gave up after {attempts} attempts")]
    InventoryRetriesExhausted { attempts: u32 },

    // =================================================================
    // Matching Errors (3xx)
    // =================================================================
    /// No aligned request pair is present in both inventories.
    #[error("CM_ERR_300: No valid matching cards found in both inventories")]
    NoValidCardsFound,

    /// A requested class ran out of instances during selection.
    #[error("CM_ERR_301: Missing cards for class {class_id}")]
    MissingCards { class_id: ClassId },

    /// The selected instances are not balanced by type.
    #[error("CM_ERR_302: Not a 1:1 trade: no counterpart for type {type_tag}")]
    NotOneToOneTrade { type_tag: TypeTag },

    // =================================================================
    // Settings Errors (4xx)
    // =================================================================
    /// A setting value is outside its allowed set.
    #[error("CM_ERR_400: Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// The host environment rejected an action.
    #[error("CM_ERR_900: Environment error: {0}")]
    Environment(String),

    /// Serialization / deserialization error.
    #[error("CM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (settings file).
    #[error("CM_ERR_902: I/O error: {0}")]
    Io(String),

    /// Unrecoverable internal error.
    #[error("CM_ERR_903: Internal error: {0}")]
    Internal(String),
}

impl CardmatchError {
    /// Human-readable message without the `CM_ERR_` code, suitable for an
    /// alert dialog.
    #[must_use]
    pub fn user_message(&self) -> String {
        let full = self.to_string();
        match full.split_once(": ") {
            Some((code, rest)) if code.starts_with("CM_ERR_") => rest.to_string(),
            _ => full,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CardmatchError>;

impl From<std::io::Error> for CardmatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CardmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for CardmatchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidTradeUrl {
            reason: err.to_string(),
        }
    }
}

//! Bounded inventory wait.
//!
//! Inventories are loaded by the host page at its own pace. The session
//! polls until both are ready, but never indefinitely:
//!
//! ```text
//!            ready
//! Waiting ─────────→ Ready
//!    │ elapsed >= max_elapsed
//!    ├──────────────→ TimedOut
//!    │ attempts >= max_retries
//!    └──────────────→ RetriesExhausted
//! ```
//!
//! [`InventoryWait`] is the pure state machine; [`wait_for_inventories`]
//! drives it against a [`TradeEnvironment`] with async sleeps.

use std::{fmt, time::Duration};

use cardmatch_types::{CardmatchError, Party, Result, WaitConfig};
use tokio::time::Instant;

use crate::TradeEnvironment;

/// State of an inventory wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitState {
    /// Not ready yet; poll again.
    Waiting,
    /// Both inventories are usable.
    Ready,
    /// The elapsed-time bound was hit.
    TimedOut,
    /// The poll-count bound was hit.
    RetriesExhausted,
}

impl WaitState {
    /// Whether no further transition can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Ready => write!(f, "READY"),
            Self::TimedOut => write!(f, "TIMED_OUT"),
            Self::RetriesExhausted => write!(f, "RETRIES_EXHAUSTED"),
        }
    }
}

/// Bounded-retry state machine for the inventory wait.
#[derive(Debug, Clone)]
pub struct InventoryWait {
    config: WaitConfig,
    state: WaitState,
    attempts: u32,
    elapsed: Duration,
}

impl InventoryWait {
    #[must_use]
    pub fn new(config: WaitConfig) -> Self {
        Self {
            config,
            state: WaitState::Waiting,
            attempts: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Feed one readiness observation taken `elapsed` after the start.
    ///
    /// Readiness wins over both bounds when observed together. Terminal
    /// states are sticky.
    pub fn observe(&mut self, ready: bool, elapsed: Duration) -> WaitState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.elapsed = elapsed;

        self.state = if ready {
            WaitState::Ready
        } else if elapsed >= self.config.max_elapsed {
            WaitState::TimedOut
        } else if self.attempts >= self.config.max_retries {
            WaitState::RetriesExhausted
        } else {
            self.attempts += 1;
            WaitState::Waiting
        };
        self.state
    }

    #[must_use]
    pub fn state(&self) -> WaitState {
        self.state
    }

    /// Unsuccessful polls so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Map the current state to the session result.
    ///
    /// # Errors
    /// `InventoryTimeout` / `InventoryRetriesExhausted` for the failure
    /// states; `Internal` if called while still waiting.
    pub fn outcome(&self) -> Result<()> {
        match self.state {
            WaitState::Ready => Ok(()),
            WaitState::TimedOut => Err(CardmatchError::InventoryTimeout {
                elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            }),
            WaitState::RetriesExhausted => Err(CardmatchError::InventoryRetriesExhausted {
                attempts: self.attempts,
            }),
            WaitState::Waiting => Err(CardmatchError::Internal(
                "inventory wait has not finished".into(),
            )),
        }
    }
}

/// Whether `party`'s inventory is loaded, non-empty and idle.
pub fn party_ready<E: TradeEnvironment + ?Sized>(env: &E, party: Party) -> bool {
    env.inventory(party).is_some_and(|inv| !inv.is_empty()) && env.loads_in_flight(party) == 0
}

/// Nudge a party that is not ready: request a load when its inventory is
/// absent, or build it when loaded but still empty.
fn nudge<E: TradeEnvironment + ?Sized>(env: &E, party: Party) {
    match env.inventory(party) {
        None => env.request_inventory_load(party),
        Some(inv) if inv.is_empty() => env.build_inventory_display(party),
        Some(_) => {}
    }
}

/// Poll until both inventories are ready or a bound is hit.
///
/// # Errors
/// `InventoryTimeout` or `InventoryRetriesExhausted`.
pub async fn wait_for_inventories<E: TradeEnvironment + ?Sized>(
    env: &E,
    config: &WaitConfig,
) -> Result<()> {
    let started = Instant::now();
    let mut wait = InventoryWait::new(*config);

    loop {
        let ready = Party::BOTH.iter().all(|&party| party_ready(env, party));
        match wait.observe(ready, started.elapsed()) {
            WaitState::Waiting => {
                for party in Party::BOTH {
                    if !party_ready(env, party) {
                        nudge(env, party);
                    }
                }
                tracing::debug!(attempt = wait.attempts(), "Inventories not ready, polling again");
                tokio::time::sleep(config.poll_interval).await;
            }
            WaitState::Ready => {
                tracing::info!(attempts = wait.attempts(), "Inventories ready");
                return Ok(());
            }
            state => {
                tracing::warn!(%state, attempts = wait.attempts(), "Inventory wait gave up");
                return wait.outcome();
            }
        }
    }
}

//! Trade session: one attempt at filling a trade offer.
//!
//! ```text
//! acquire cookie guard
//!   → wait_for_inventories()
//!   → validate_inventories() → find_valid_cards()        (MatchedPairs)
//!   → per party: CardMapping::build() → take() → move_item_to_trade()
//!   → verify_one_to_one()
//!   → post-trade action / auto-send
//! release cookie guard (always)
//! ```
//!
//! Every failure aborts the attempt. Items already moved stay in the
//! offer; the only state rolled back is the inventory-context cookie.

use cardmatch_matchcore::{CardMapping, ExchangeTally, find_valid_cards, validate_inventories};
use cardmatch_types::{
    AfterTrade, CardRequest, MatchedPairs, MovedItem, Party, Result, TradeAttemptId, TradeConfig,
    TradeReceipt, TradeSettings, constants,
};
use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use url::Url;

use crate::{InventoryContextGuard, TradeEnvironment, wait::wait_for_inventories};

/// A single trade attempt against a host environment.
pub struct TradeSession<'a, E: TradeEnvironment + ?Sized, R: Rng = StdRng> {
    env: &'a E,
    settings: &'a TradeSettings,
    config: &'a TradeConfig,
    request: CardRequest,
    attempt: TradeAttemptId,
    rng: R,
}

impl<'a, E: TradeEnvironment + ?Sized> TradeSession<'a, E, StdRng> {
    /// New attempt with an entropy-seeded RNG for the `RANDOM` policy.
    pub fn new(
        env: &'a E,
        settings: &'a TradeSettings,
        config: &'a TradeConfig,
        request: CardRequest,
    ) -> Self {
        Self {
            env,
            settings,
            config,
            request,
            attempt: TradeAttemptId::new(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl<'a, E: TradeEnvironment + ?Sized, R: Rng> TradeSession<'a, E, R> {
    /// Replace the RNG (seeded runs, tests).
    pub fn with_rng<R2: Rng>(self, rng: R2) -> TradeSession<'a, E, R2> {
        TradeSession {
            env: self.env,
            settings: self.settings,
            config: self.config,
            request: self.request,
            attempt: self.attempt,
            rng,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> TradeAttemptId {
        self.attempt
    }

    #[must_use]
    pub fn request(&self) -> &CardRequest {
        &self.request
    }

    /// Run the whole attempt. The inventory-context cookie is restored on
    /// every exit path.
    pub async fn run(&mut self) -> Result<TradeReceipt> {
        let _cookie = InventoryContextGuard::acquire(self.env);

        wait_for_inventories(self.env, &self.config.wait).await?;
        let matched = self.validate()?;

        self.env.select_inventory(Party::You);
        self.env.set_trade_note(&self.settings.message);

        let (moved, tally) = self.process_cards(&matched)?;
        let confirmed = self.complete()?;

        let (your_tally, their_tally) = tally.into_parts();
        let receipt = TradeReceipt {
            attempt: self.attempt,
            moved,
            your_tally,
            their_tally,
            confirmed,
            completed_at: Utc::now(),
        };
        tracing::info!(
            attempt = %self.attempt,
            pairs = receipt.pair_count(),
            confirmed,
            "Trade attempt complete"
        );
        Ok(receipt)
    }

    /// Check both inventories and filter the request to fillable pairs.
    ///
    /// # Errors
    /// `InvalidInventoryState` or `NoValidCardsFound`.
    pub fn validate(&self) -> Result<MatchedPairs> {
        let yours = self.env.inventory(Party::You).unwrap_or_default();
        let theirs = self.env.inventory(Party::Them).unwrap_or_default();

        validate_inventories(&yours, &theirs)?;
        let matched = find_valid_cards(&self.request, &yours, &theirs)?;

        tracing::info!(
            attempt = %self.attempt,
            requested = self.request.aligned_len(),
            matched = matched.len(),
            "Trade validated"
        );
        Ok(matched)
    }

    /// Select and move one instance per matched class, your side first,
    /// then check the 1:1 balance.
    ///
    /// # Errors
    /// `MissingCards` when a class runs out, `NotOneToOneTrade` when the
    /// selected type tags do not balance, or any environment error from a
    /// move.
    pub fn process_cards(
        &mut self,
        matched: &MatchedPairs,
    ) -> Result<(Vec<MovedItem>, ExchangeTally)> {
        let mut moved = Vec::with_capacity(matched.len() * 2);
        let mut tally = ExchangeTally::new();

        for party in Party::BOTH {
            self.env.build_inventory_display(party);
            let snapshot = self.env.inventory(party).unwrap_or_default();
            let classes = matched.side(party);
            let mut mapping = CardMapping::build(&snapshot, classes, self.settings.order);

            for class_id in classes {
                let item = mapping.take(class_id, &mut self.rng)?;
                tally.record(party, &item);
                self.env.move_item_to_trade(party, &item)?;
                tracing::debug!(
                    attempt = %self.attempt,
                    %party,
                    class_id = %item.class_id,
                    instance = %item.id,
                    type_tag = %item.type_tag,
                    "Item moved to trade"
                );
                moved.push(MovedItem::from_item(party, &item));
            }
        }

        tally.verify()?;
        Ok((moved, tally))
    }

    /// Install the post-trade action and, with auto-send on, mark the
    /// offer ready and confirm it. Returns whether it was confirmed.
    pub fn complete(&self) -> Result<bool> {
        if self.settings.after_trade != AfterTrade::Nothing {
            self.env.install_post_trade_action(self.settings.after_trade);
        }
        if !self.settings.auto_send {
            return Ok(false);
        }
        self.env.toggle_ready(true);
        self.env.confirm_trade()?;
        Ok(true)
    }
}

/// Top-level handler for one attempt: runs the session and, on failure,
/// shows the error to the user and logs it. Never retries.
pub async fn run_trade<E: TradeEnvironment + ?Sized>(
    env: &E,
    settings: &TradeSettings,
    config: &TradeConfig,
    request: CardRequest,
) -> Result<TradeReceipt> {
    let mut session = TradeSession::new(env, settings, config, request);
    let attempt = session.attempt();
    let result = session.run().await;
    if let Err(err) = &result {
        env.show_alert(constants::TRADE_ERROR_TITLE, &err.user_message());
        tracing::error!(%attempt, error = %err, "Trade error");
    }
    result
}

/// Parse the request from a trade URL and run it with [`run_trade`].
///
/// A URL without cards is rejected before the page is touched.
pub async fn handle_trade_url<E: TradeEnvironment + ?Sized>(
    env: &E,
    settings: &TradeSettings,
    config: &TradeConfig,
    url: &Url,
) -> Result<TradeReceipt> {
    let request = CardRequest::from_url(url).inspect_err(|err| {
        tracing::error!(error = %err, url = %url, "Trade link carries no cards");
    })?;
    run_trade(env, settings, config, request).await
}

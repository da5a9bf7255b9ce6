//! In-memory trade page.
//!
//! Inventories are staged up front, every call is recorded as an
//! [`EnvEvent`], and failures can be injected at the move, confirm and
//! inventory stages.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use cardmatch_types::{
    AfterTrade, CardmatchError, InstanceId, InventorySnapshot, Item, Party, Result,
};
use url::Url;

use crate::{Cookie, TradeEnvironment, WindowOpener};

/// Something a [`MemoryEnvironment`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvEvent {
    LoadRequested(Party),
    DisplayBuilt(Party),
    InventorySelected(Party),
    NoteSet(String),
    Moved { party: Party, instance: InstanceId },
    Ready(bool),
    Confirmed,
    PostTradeAction(AfterTrade),
    Alert { title: String, message: String },
    CookieSet(Cookie),
    CookieCleared(String),
    WindowOpened(Url),
}

fn slot(party: Party) -> usize {
    match party {
        Party::You => 0,
        Party::Them => 1,
    }
}

/// In-memory host: inventories are staged up front and every call is
/// recorded as an [`EnvEvent`].
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    inventories: RefCell<[Option<InventorySnapshot>; 2]>,
    /// Inventories that appear after this many load requests.
    deferred: RefCell<[Option<(u32, InventorySnapshot)>; 2]>,
    in_flight: [Cell<u32>; 2],
    cookies: RefCell<HashMap<String, String>>,
    events: RefCell<Vec<EnvEvent>>,
    fail_moves_after: Cell<Option<usize>>,
    fail_confirm: Cell<bool>,
    /// Empty the inventory right after it next reports no loads in flight.
    empty_after_idle: [Cell<bool>; 2],
}

impl MemoryEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment with both inventories already loaded.
    #[must_use]
    pub fn with_inventories(yours: InventorySnapshot, theirs: InventorySnapshot) -> Self {
        let env = Self::new();
        env.set_inventory(Party::You, Some(yours));
        env.set_inventory(Party::Them, Some(theirs));
        env
    }

    pub fn set_inventory(&self, party: Party, snapshot: Option<InventorySnapshot>) {
        self.inventories.borrow_mut()[slot(party)] = snapshot;
    }

    /// Make `snapshot` appear after `requests` calls to
    /// [`TradeEnvironment::request_inventory_load`] for `party`.
    pub fn defer_inventory(&self, party: Party, requests: u32, snapshot: InventorySnapshot) {
        self.inventories.borrow_mut()[slot(party)] = None;
        self.deferred.borrow_mut()[slot(party)] = Some((requests, snapshot));
    }

    pub fn set_loads_in_flight(&self, party: Party, loads: u32) {
        self.in_flight[slot(party)].set(loads);
    }

    pub fn set_cookie_value(&self, name: &str, value: &str) {
        self.cookies.borrow_mut().insert(name.to_string(), value.to_string());
    }

    /// Make every move after the first `count` fail.
    pub fn fail_moves_after(&self, count: usize) {
        self.fail_moves_after.set(Some(count));
    }

    pub fn fail_confirm(&self) {
        self.fail_confirm.set(true);
    }

    /// The page drops `party`'s inventory as soon as it has reported idle
    /// once, so the readiness check passes but later reads see it empty.
    pub fn empty_inventory_after_idle(&self, party: Party) {
        self.empty_after_idle[slot(party)].set(true);
    }

    #[must_use]
    pub fn events(&self) -> Vec<EnvEvent> {
        self.events.borrow().clone()
    }

    /// Instances moved for `party`, in move order.
    #[must_use]
    pub fn moved(&self, party: Party) -> Vec<InstanceId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                EnvEvent::Moved { party: p, instance } if *p == party => Some(instance.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&EnvEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    fn record(&self, event: EnvEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl TradeEnvironment for MemoryEnvironment {
    fn inventory(&self, party: Party) -> Option<InventorySnapshot> {
        self.inventories.borrow()[slot(party)].clone()
    }

    fn loads_in_flight(&self, party: Party) -> u32 {
        let loads = self.in_flight[slot(party)].get();
        if loads == 0 && self.empty_after_idle[slot(party)].replace(false) {
            self.inventories.borrow_mut()[slot(party)] = Some(InventorySnapshot::default());
        }
        loads
    }

    fn request_inventory_load(&self, party: Party) {
        self.record(EnvEvent::LoadRequested(party));
        let mut deferred = self.deferred.borrow_mut();
        if let Some((remaining, _)) = deferred[slot(party)].as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                if let Some((_, snapshot)) = deferred[slot(party)].take() {
                    self.inventories.borrow_mut()[slot(party)] = Some(snapshot);
                }
            }
        }
    }

    fn build_inventory_display(&self, party: Party) {
        self.record(EnvEvent::DisplayBuilt(party));
    }

    fn select_inventory(&self, party: Party) {
        self.record(EnvEvent::InventorySelected(party));
    }

    fn set_trade_note(&self, note: &str) {
        self.record(EnvEvent::NoteSet(note.to_string()));
    }

    fn move_item_to_trade(&self, party: Party, item: &Item) -> Result<()> {
        if let Some(limit) = self.fail_moves_after.get() {
            if self.count(|e| matches!(e, EnvEvent::Moved { .. })) >= limit {
                return Err(CardmatchError::Environment(format!(
                    "cannot move item {} into trade",
                    item.id
                )));
            }
        }
        self.record(EnvEvent::Moved {
            party,
            instance: item.id.clone(),
        });
        Ok(())
    }

    fn toggle_ready(&self, ready: bool) {
        self.record(EnvEvent::Ready(ready));
    }

    fn confirm_trade(&self) -> Result<()> {
        if self.fail_confirm.get() {
            return Err(CardmatchError::Environment("trade offer rejected".into()));
        }
        self.record(EnvEvent::Confirmed);
        Ok(())
    }

    fn install_post_trade_action(&self, action: AfterTrade) {
        self.record(EnvEvent::PostTradeAction(action));
    }

    fn show_alert(&self, title: &str, message: &str) {
        self.record(EnvEvent::Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).cloned()
    }

    fn set_cookie(&self, cookie: &Cookie) {
        self.cookies
            .borrow_mut()
            .insert(cookie.name.clone(), cookie.value.clone());
        self.record(EnvEvent::CookieSet(cookie.clone()));
    }

    fn clear_cookie(&self, name: &str, _path: &str) {
        self.cookies.borrow_mut().remove(name);
        self.record(EnvEvent::CookieCleared(name.to_string()));
    }
}

impl WindowOpener for MemoryEnvironment {
    fn open_window(&self, url: &Url) -> Result<()> {
        self.record(EnvEvent::WindowOpened(url.clone()));
        Ok(())
    }
}

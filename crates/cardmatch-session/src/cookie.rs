//! Scoped inventory-context cookie.
//!
//! The trade page remembers the last inventory tab in a cookie and would
//! reopen it instead of the card inventory. A session clears that cookie
//! for its duration and puts the previous value back when it ends, on
//! every exit path. [`InventoryContextGuard`] does the restore in `Drop`.

use cardmatch_types::constants;
use chrono::{Duration, Utc};

use crate::{Cookie, TradeEnvironment};

/// Clears the inventory-context cookie while alive and restores it on drop.
#[must_use = "dropping the guard immediately restores the cookie"]
pub struct InventoryContextGuard<'a, E: TradeEnvironment + ?Sized> {
    env: &'a E,
    saved: Option<String>,
}

impl<'a, E: TradeEnvironment + ?Sized> InventoryContextGuard<'a, E> {
    /// Remember the current cookie value and clear it.
    pub fn acquire(env: &'a E) -> Self {
        let saved = env.cookie(constants::INVENTORY_CONTEXT_COOKIE);
        env.clear_cookie(
            constants::INVENTORY_CONTEXT_COOKIE,
            constants::INVENTORY_CONTEXT_COOKIE_PATH,
        );
        tracing::debug!(had_value = saved.is_some(), "Inventory context cookie cleared");
        Self { env, saved }
    }

    /// The value that will be restored, if any.
    #[must_use]
    pub fn saved(&self) -> Option<&str> {
        self.saved.as_deref()
    }
}

impl<E: TradeEnvironment + ?Sized> Drop for InventoryContextGuard<'_, E> {
    fn drop(&mut self) {
        let Some(value) = self.saved.take() else {
            return;
        };
        let cookie = Cookie {
            name: constants::INVENTORY_CONTEXT_COOKIE.to_string(),
            value,
            path: constants::INVENTORY_CONTEXT_COOKIE_PATH.to_string(),
            expires: Some(Utc::now() + Duration::days(constants::INVENTORY_CONTEXT_COOKIE_DAYS)),
        };
        self.env.set_cookie(&cookie);
        tracing::debug!("Inventory context cookie restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnvEvent, MemoryEnvironment};

    const NAME: &str = constants::INVENTORY_CONTEXT_COOKIE;

    #[test]
    fn clears_then_restores() {
        let env = MemoryEnvironment::new();
        env.set_cookie_value(NAME, "440_2");
        {
            let guard = InventoryContextGuard::acquire(&env);
            assert_eq!(guard.saved(), Some("440_2"));
            assert!(env.cookie(NAME).is_none());
        }
        assert_eq!(env.cookie(NAME).as_deref(), Some("440_2"));
    }

    #[test]
    fn restored_cookie_lives_fifteen_days() {
        let env = MemoryEnvironment::new();
        env.set_cookie_value(NAME, "753_6");
        drop(InventoryContextGuard::acquire(&env));

        let restored: Vec<Cookie> = env
            .events()
            .into_iter()
            .filter_map(|e| match e {
                EnvEvent::CookieSet(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(restored.len(), 1);
        let cookie = &restored[0];
        assert_eq!(cookie.path, "/tradeoffer/");
        let expires = cookie.expires.unwrap();
        let hours = (expires - Utc::now()).num_hours();
        assert!((14 * 24..=15 * 24).contains(&hours), "got {hours}h");
    }

    #[test]
    fn nothing_restored_without_previous_value() {
        let env = MemoryEnvironment::new();
        drop(InventoryContextGuard::acquire(&env));
        assert_eq!(env.count(|e| matches!(e, EnvEvent::CookieSet(_))), 0);
        assert_eq!(env.count(|e| matches!(e, EnvEvent::CookieCleared(_))), 1);
    }

    #[test]
    fn restores_on_panic() {
        let env = MemoryEnvironment::new();
        env.set_cookie_value(NAME, "753_6");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = InventoryContextGuard::acquire(&env);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(env.cookie(NAME).as_deref(), Some("753_6"));
    }
}

//! End-to-end tests of a full trade attempt against an in-memory page.
//!
//! These tests drive the whole session:
//! cookie guard -> inventory wait -> validation -> selection -> 1:1 check
//! -> completion
//!
//! and verify the observable effects on the page: what got moved, what
//! got confirmed, which alert was shown, and that the inventory-context
//! cookie always comes back exactly once.

use std::{collections::HashSet, time::Duration};

use cardmatch_session::{
    EnvEvent, MemoryEnvironment, TradeEnvironment, TradeSession, run_trade,
};
use cardmatch_types::{
    AfterTrade, CardOrder, CardRequest, CardmatchError, ClassId, InstanceId, InventorySnapshot,
    Item, Party, TradeConfig, TradeSettings, WaitConfig, constants,
};
use rand::{SeedableRng, rngs::StdRng};

const SAVED_CONTEXT: &str = "440_2";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn fast_config() -> TradeConfig {
    TradeConfig {
        wait: WaitConfig {
            poll_interval: Duration::from_millis(1),
            max_elapsed: Duration::from_secs(5),
            max_retries: 3,
        },
        ..TradeConfig::default()
    }
}

fn request(yours: &[&str], theirs: &[&str]) -> CardRequest {
    CardRequest::new(
        yours.iter().copied().map(ClassId::from).collect(),
        theirs.iter().copied().map(ClassId::from).collect(),
    )
}

fn card(id: &str, class: &str) -> Item {
    Item::new(id, class, "Portal Trading Card")
}

fn foil(id: &str, class: &str) -> Item {
    Item::new(id, class, "Portal Foil Trading Card")
}

/// Page with both inventories loaded and a remembered inventory tab.
fn page(yours: Vec<Item>, theirs: Vec<Item>) -> MemoryEnvironment {
    let env = MemoryEnvironment::with_inventories(
        InventorySnapshot::new(yours),
        InventorySnapshot::new(theirs),
    );
    env.set_cookie_value(constants::INVENTORY_CONTEXT_COOKIE, SAVED_CONTEXT);
    env
}

fn assert_cookie_restored_once(env: &MemoryEnvironment) {
    assert_eq!(
        env.count(|e| matches!(e, EnvEvent::CookieCleared(_))),
        1,
        "cookie cleared once"
    );
    assert_eq!(
        env.count(|e| matches!(e, EnvEvent::CookieSet(_))),
        1,
        "cookie restored once"
    );
    assert_eq!(
        env.cookie(constants::INVENTORY_CONTEXT_COOKIE).as_deref(),
        Some(SAVED_CONTEXT)
    );
}

fn alerts(env: &MemoryEnvironment) -> Vec<(String, String)> {
    env.events()
        .into_iter()
        .filter_map(|e| match e {
            EnvEvent::Alert { title, message } => Some((title, message)),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Successful attempts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_attempt_with_auto_send() {
    init_tracing();
    let env = page(
        vec![card("1", "a"), card("2", "c")],
        vec![card("3", "b"), card("4", "d")],
    );
    let settings = TradeSettings {
        message: "thanks".into(),
        auto_send: true,
        after_trade: AfterTrade::ClickOk,
        ..TradeSettings::default()
    };
    let config = fast_config();

    let receipt = run_trade(&env, &settings, &config, request(&["a", "c"], &["b", "d"]))
        .await
        .unwrap();

    assert_eq!(receipt.pair_count(), 2);
    assert!(receipt.confirmed);
    assert_eq!(receipt.your_tally, receipt.their_tally);
    assert_eq!(
        env.moved(Party::You),
        vec![InstanceId::from("1"), InstanceId::from("2")]
    );
    assert_eq!(
        env.moved(Party::Them),
        vec![InstanceId::from("3"), InstanceId::from("4")]
    );

    let events = env.events();
    let pos = |target: &EnvEvent| events.iter().position(|e| e == target).unwrap();
    assert!(pos(&EnvEvent::InventorySelected(Party::You)) < pos(&EnvEvent::NoteSet("thanks".into())));
    assert!(pos(&EnvEvent::PostTradeAction(AfterTrade::ClickOk)) < pos(&EnvEvent::Ready(true)));
    assert!(pos(&EnvEvent::Ready(true)) < pos(&EnvEvent::Confirmed));
    assert!(alerts(&env).is_empty());
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn manual_send_leaves_offer_open() {
    let env = page(vec![card("1", "a")], vec![card("2", "b")]);
    let settings = TradeSettings::default();
    let receipt = run_trade(&env, &settings, &fast_config(), request(&["a"], &["b"]))
        .await
        .unwrap();
    assert!(!receipt.confirmed);
    assert_eq!(env.count(|e| matches!(e, EnvEvent::Confirmed)), 0);
    assert_eq!(env.count(|e| matches!(e, EnvEvent::PostTradeAction(_))), 0);
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn waits_for_late_inventory() {
    let env = MemoryEnvironment::new();
    env.set_inventory(Party::You, Some(InventorySnapshot::new(vec![card("1", "a")])));
    env.defer_inventory(Party::Them, 2, InventorySnapshot::new(vec![card("2", "b")]));

    let receipt = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap();
    assert_eq!(receipt.pair_count(), 1);
    assert_eq!(env.count(|e| matches!(e, EnvEvent::LoadRequested(Party::Them))), 2);
}

// ---------------------------------------------------------------------------
// Balanced multiset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mixed_tags_balance_in_any_order() {
    let env = page(
        vec![foil("1", "a"), card("2", "c")],
        vec![card("3", "b"), foil("4", "d")],
    );
    let receipt = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a", "c"], &["b", "d"]),
    )
    .await
    .unwrap();

    let mut yours = receipt.your_tally.clone();
    let mut theirs = receipt.their_tally.clone();
    yours.sort();
    theirs.sort();
    assert_eq!(yours, theirs);
}

#[tokio::test]
async fn foil_for_normal_is_not_one_to_one() {
    let env = page(vec![foil("1", "a")], vec![card("2", "b")]);
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CardmatchError::NotOneToOneTrade { .. }));
    let shown = alerts(&env);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, "Trade Error");
    assert!(shown[0].1.starts_with("Not a 1:1 trade"));
    assert_cookie_restored_once(&env);
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_valid_cards_when_every_pair_is_broken() {
    let env = page(vec![card("1", "x")], vec![card("2", "z")]);
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["x", "y"], &["y", "z"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CardmatchError::NoValidCardsFound));
    assert_eq!(env.count(|e| matches!(e, EnvEvent::Moved { .. })), 0);
    assert_eq!(alerts(&env).len(), 1);
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn broken_pairs_are_dropped_not_fatal() {
    // You hold {x, y}, they hold {z}: only the (y, z) pair survives.
    let env = page(vec![card("1", "x"), card("2", "y")], vec![card("3", "z")]);
    let receipt = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["x", "y"], &["y", "z"]),
    )
    .await
    .unwrap();
    assert_eq!(receipt.pair_count(), 1);
    assert_eq!(env.moved(Party::You), vec![InstanceId::from("2")]);
    assert_eq!(env.moved(Party::Them), vec![InstanceId::from("3")]);
}

#[tokio::test]
async fn duplicate_request_with_single_instance_is_missing_cards() {
    let env = page(
        vec![card("1", "a")],
        vec![card("2", "b"), card("3", "b")],
    );
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a", "a"], &["b", "b"]),
    )
    .await
    .unwrap_err();
    assert!(
        matches!(err, CardmatchError::MissingCards { ref class_id } if class_id.as_str() == "a")
    );
    assert_eq!(
        alerts(&env),
        vec![("Trade Error".to_string(), "Missing cards for class a".to_string())]
    );
    // The first instance was already in the offer when the shortage hit.
    assert_eq!(env.moved(Party::You), vec![InstanceId::from("1")]);
    assert_cookie_restored_once(&env);
}

// ---------------------------------------------------------------------------
// Selection policies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sort_takes_highest_instance_ids() {
    let env = page(
        vec![card("10", "a"), card("3", "a"), card("21", "a")],
        vec![card("5", "b"), card("6", "b")],
    );
    let settings = TradeSettings {
        order: CardOrder::Sort,
        ..TradeSettings::default()
    };
    run_trade(&env, &settings, &fast_config(), request(&["a", "a"], &["b", "b"]))
        .await
        .unwrap();
    assert_eq!(
        env.moved(Party::You),
        vec![InstanceId::from("21"), InstanceId::from("10")]
    );
}

#[tokio::test]
async fn random_reaches_every_candidate_without_repeats() {
    let settings = TradeSettings {
        order: CardOrder::Random,
        ..TradeSettings::default()
    };
    let config = fast_config();
    let mut first_picks = HashSet::new();

    for seed in 0..64 {
        let env = page(
            vec![card("1", "a"), card("2", "a"), card("3", "a")],
            vec![card("7", "b"), card("8", "b"), card("9", "b")],
        );
        let mut session = TradeSession::new(
            &env,
            &settings,
            &config,
            request(&["a", "a", "a"], &["b", "b", "b"]),
        )
        .with_rng(StdRng::seed_from_u64(seed));
        session.run().await.unwrap();

        let moved = env.moved(Party::You);
        let distinct: HashSet<_> = moved.iter().collect();
        assert_eq!(distinct.len(), 3, "seed {seed} selected an instance twice");
        first_picks.insert(moved[0].clone());
    }
    assert_eq!(first_picks.len(), 3);
}

// ---------------------------------------------------------------------------
// Failure at every stage restores the cookie exactly once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wait_exhaustion_restores_cookie() {
    let env = MemoryEnvironment::new();
    env.set_cookie_value(constants::INVENTORY_CONTEXT_COOKIE, SAVED_CONTEXT);
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CardmatchError::InventoryRetriesExhausted { attempts: 3 }));
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn wait_timeout_restores_cookie() {
    let env = MemoryEnvironment::new();
    env.set_cookie_value(constants::INVENTORY_CONTEXT_COOKIE, SAVED_CONTEXT);
    let config = TradeConfig {
        wait: WaitConfig {
            poll_interval: Duration::from_millis(5),
            max_elapsed: Duration::from_millis(20),
            max_retries: u32::MAX,
        },
        ..TradeConfig::default()
    };
    let err = run_trade(&env, &TradeSettings::default(), &config, request(&["a"], &["b"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CardmatchError::InventoryTimeout { .. }));
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn inventory_lost_after_wait_restores_cookie() {
    let env = page(vec![card("1", "a")], vec![card("2", "b")]);
    env.empty_inventory_after_idle(Party::Them);
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CardmatchError::InvalidInventoryState));
    assert_eq!(
        alerts(&env),
        vec![("Trade Error".to_string(), "Invalid inventory state".to_string())]
    );
    assert_eq!(env.count(|e| matches!(e, EnvEvent::Moved { .. })), 0);
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn move_failure_restores_cookie() {
    let env = page(vec![card("1", "a")], vec![card("2", "b")]);
    env.fail_moves_after(1);
    let err = run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CardmatchError::Environment(_)));
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn confirm_failure_restores_cookie() {
    let env = page(vec![card("1", "a")], vec![card("2", "b")]);
    env.fail_confirm();
    let settings = TradeSettings {
        auto_send: true,
        ..TradeSettings::default()
    };
    let err = run_trade(&env, &settings, &fast_config(), request(&["a"], &["b"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CardmatchError::Environment(_)));
    assert_eq!(env.count(|e| matches!(e, EnvEvent::Ready(true))), 1);
    assert_cookie_restored_once(&env);
}

#[tokio::test]
async fn missing_cookie_is_not_invented() {
    let env = MemoryEnvironment::with_inventories(
        InventorySnapshot::new(vec![card("1", "a")]),
        InventorySnapshot::new(vec![card("2", "b")]),
    );
    run_trade(
        &env,
        &TradeSettings::default(),
        &fast_config(),
        request(&["a"], &["b"]),
    )
    .await
    .unwrap();
    assert_eq!(env.count(|e| matches!(e, EnvEvent::CookieSet(_))), 0);
    assert!(env.cookie(constants::INVENTORY_CONTEXT_COOKIE).is_none());
}

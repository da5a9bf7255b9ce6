//! # cardmatch-matchcore
//!
//! **Pure card matching for cardmatch.**
//!
//! MatchCore is the compute plane -- it takes two request lists and two
//! inventory snapshots and decides what goes into the trade. It has:
//!
//! - **Zero side effects**: no page access, no cookies, no settings I/O
//! - **Presence matching**: aligned request pairs both parties can fill
//! - **Policy-driven selection**: `AS_IS`, `SORT` or `RANDOM` instance picks
//! - **1:1 guarantee**: selected type tags must balance as multisets

pub mod mapping;
pub mod matcher;
pub mod tally;

pub use mapping::CardMapping;
pub use matcher::{find_valid_cards, validate_inventories};
pub use tally::{ExchangeTally, verify_one_to_one};

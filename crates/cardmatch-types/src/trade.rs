//! Trade outcome types.
//!
//! A [`TradeReceipt`] is the record of one successful trade attempt: every
//! instance moved into the offer plus the per-party type tallies that
//! passed the 1:1 check. Receipts are derived and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClassId, InstanceId, Item, Party, TradeAttemptId, TypeTag};

/// One instance placed into a trade slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedItem {
    pub party: Party,
    pub class_id: ClassId,
    pub instance_id: InstanceId,
    pub type_tag: TypeTag,
}

impl MovedItem {
    #[must_use]
    pub fn from_item(party: Party, item: &Item) -> Self {
        Self {
            party,
            class_id: item.class_id.clone(),
            instance_id: item.id.clone(),
            type_tag: item.type_tag.clone(),
        }
    }
}

/// Result of a completed trade attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// The attempt that produced this receipt.
    pub attempt: TradeAttemptId,
    /// Items moved into the offer, in move order (all of yours, then theirs).
    pub moved: Vec<MovedItem>,
    /// Type tags selected from your inventory.
    pub your_tally: Vec<TypeTag>,
    /// Type tags selected from their inventory.
    pub their_tally: Vec<TypeTag>,
    /// Whether the offer was marked ready and confirmed.
    pub confirmed: bool,
    /// When the attempt finished.
    pub completed_at: DateTime<Utc>,
}

impl TradeReceipt {
    /// Number of card pairs in the offer.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.your_tally.len()
    }

    /// Items moved on behalf of one party.
    pub fn moved_by(&self, party: Party) -> impl Iterator<Item = &MovedItem> {
        self.moved.iter().filter(move |m| m.party == party)
    }
}

impl std::fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] pairs={} confirmed={}",
            self.attempt,
            self.pair_count(),
            self.confirmed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_receipt() -> TradeReceipt {
        let mine = Item::dummy("1", "x");
        let theirs = Item::dummy("2", "y");
        TradeReceipt {
            attempt: TradeAttemptId::from_bytes([7; 16]),
            moved: vec![
                MovedItem::from_item(Party::You, &mine),
                MovedItem::from_item(Party::Them, &theirs),
            ],
            your_tally: vec![mine.type_tag.clone()],
            their_tally: vec![theirs.type_tag.clone()],
            confirmed: false,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn moved_by_filters_party() {
        let receipt = make_receipt();
        let yours: Vec<_> = receipt.moved_by(Party::You).collect();
        assert_eq!(yours.len(), 1);
        assert_eq!(yours[0].instance_id, InstanceId::from("1"));
    }

    #[test]
    fn receipt_display() {
        let receipt = make_receipt();
        let s = format!("{receipt}");
        assert!(s.contains("pairs=1"));
        assert!(s.contains("confirmed=false"));
    }
}

//! Candidate mapping and instance selection.
//!
//! For one party, [`CardMapping`] groups the inventory instances of every
//! matched class into a candidate pool and hands them out one at a time
//! according to the configured [`CardOrder`]. A picked instance leaves its
//! pool, so no instance can be selected twice within one trade.

use std::{cmp::Ordering, collections::HashMap};

use cardmatch_types::{CardOrder, CardmatchError, ClassId, InventorySnapshot, Item, Result};
use rand::Rng;

/// Per-class candidate pools for one party.
#[derive(Debug, Clone)]
pub struct CardMapping {
    order: CardOrder,
    pools: HashMap<ClassId, Vec<Item>>,
}

impl CardMapping {
    /// Build pools for the classes in `matched` from `snapshot`.
    ///
    /// Pools start in enumeration order. `SORT` reorders each pool by
    /// descending numeric instance id (ids that are not numbers go last,
    /// keeping their relative order). `AS_IS` and `RANDOM` leave it alone.
    #[must_use]
    pub fn build(snapshot: &InventorySnapshot, matched: &[ClassId], order: CardOrder) -> Self {
        let mut pools: HashMap<ClassId, Vec<Item>> = HashMap::new();
        for item in snapshot.items() {
            if matched.contains(&item.class_id) {
                pools.entry(item.class_id.clone()).or_default().push(item.clone());
            }
        }

        if order == CardOrder::Sort {
            for pool in pools.values_mut() {
                pool.sort_by(descending_numeric);
            }
        }

        Self { order, pools }
    }

    /// Pick one instance of `class_id` and remove it from its pool.
    ///
    /// `AS_IS` and `SORT` take the head of the pool; `RANDOM` draws a
    /// uniform index over whatever is left at the time of the call.
    ///
    /// # Errors
    /// [`CardmatchError::MissingCards`] if the class has no instance left.
    pub fn take<R: Rng + ?Sized>(&mut self, class_id: &ClassId, rng: &mut R) -> Result<Item> {
        let pool = self
            .pools
            .get_mut(class_id)
            .filter(|pool| !pool.is_empty())
            .ok_or_else(|| CardmatchError::MissingCards {
                class_id: class_id.clone(),
            })?;

        let index = match self.order {
            CardOrder::Random => rng.gen_range(0..pool.len()),
            CardOrder::AsIs | CardOrder::Sort => 0,
        };
        Ok(pool.remove(index))
    }

    /// Instances still available for a class.
    #[must_use]
    pub fn remaining(&self, class_id: &ClassId) -> usize {
        self.pools.get(class_id).map_or(0, Vec::len)
    }

    /// Current pool of a class, in pick order for `AS_IS`/`SORT`.
    #[must_use]
    pub fn candidates(&self, class_id: &ClassId) -> &[Item] {
        self.pools.get(class_id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn order(&self) -> CardOrder {
        self.order
    }
}

fn descending_numeric(a: &Item, b: &Item) -> Ordering {
    match (a.id.numeric(), b.id.numeric()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

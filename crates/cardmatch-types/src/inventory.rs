//! Inventory model.
//!
//! An [`InventorySnapshot`] is an externally supplied, read-only view of
//! one party's tradable items. Enumeration order is preserved because the
//! `AS_IS` selection policy picks candidates in exactly that order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ClassId, InstanceId, TypeTag};

/// One physical inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance id (consumable once per trade).
    pub id: InstanceId,
    /// Coarse card-type identifier requests refer to.
    pub class_id: ClassId,
    /// Fine-grained type the 1:1 check balances on.
    pub type_tag: TypeTag,
}

impl Item {
    #[must_use]
    pub fn new(
        id: impl Into<InstanceId>,
        class_id: impl Into<ClassId>,
        type_tag: impl Into<TypeTag>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            type_tag: type_tag.into(),
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item[{}] class={} type={}", self.id, self.class_id, self.type_tag)
    }
}

/// Read-only snapshot of one party's inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    items: Vec<Item>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// All items in natural enumeration order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Classes this party holds at least one instance of.
    #[must_use]
    pub fn possessed_classes(&self) -> BTreeSet<&ClassId> {
        self.items.iter().map(|item| &item.class_id).collect()
    }

    #[must_use]
    pub fn contains_class(&self, class_id: &ClassId) -> bool {
        self.items.iter().any(|item| &item.class_id == class_id)
    }

    /// Instances of a class, in enumeration order.
    pub fn instances_of<'a>(&'a self, class_id: &'a ClassId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| &item.class_id == class_id)
    }
}

impl FromIterator<Item> for InventorySnapshot {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Item {
    /// Item whose type tag is derived from its class (`"type:<class>"`).
    pub fn dummy(id: &str, class_id: &str) -> Self {
        Self::new(id, class_id, format!("type:{class_id}"))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl InventorySnapshot {
    /// Build a snapshot from `(instance_id, class_id)` pairs using
    /// [`Item::dummy`] type tags.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .map(|(id, class_id)| Item::dummy(id, class_id))
            .collect()
    }
}

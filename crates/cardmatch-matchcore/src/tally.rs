//! Exchange tally and the 1:1 trade check.
//!
//! Matching works on coarse class ids, but the trade must balance on the
//! fine-grained type tag of every selected instance:
//!
//! ```text
//! multiset(your_tally) == multiset(their_tally)
//! ```
//!
//! Each of their tags consumes exactly one equal tag of yours, so repeated
//! tags are counted correctly.

use cardmatch_types::{CardmatchError, Item, Party, Result, TypeTag};

/// Type tags recorded per party while instances are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeTally {
    yours: Vec<TypeTag>,
    theirs: Vec<TypeTag>,
}

impl ExchangeTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type tag of an instance selected for `party`.
    pub fn record(&mut self, party: Party, item: &Item) {
        match party {
            Party::You => self.yours.push(item.type_tag.clone()),
            Party::Them => self.theirs.push(item.type_tag.clone()),
        }
    }

    #[must_use]
    pub fn side(&self, party: Party) -> &[TypeTag] {
        match party {
            Party::You => &self.yours,
            Party::Them => &self.theirs,
        }
    }

    /// Check the recorded tallies with [`verify_one_to_one`].
    pub fn verify(&self) -> Result<()> {
        verify_one_to_one(&self.yours, &self.theirs)
    }

    /// Split into `(yours, theirs)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TypeTag>, Vec<TypeTag>) {
        (self.yours, self.theirs)
    }
}

/// Require the two tallies to be equal as multisets.
///
/// # Errors
/// [`CardmatchError::NotOneToOneTrade`] naming the first of their tags
/// without a remaining counterpart in yours, or else the first of your
/// tags left unconsumed.
pub fn verify_one_to_one(yours: &[TypeTag], theirs: &[TypeTag]) -> Result<()> {
    let mut remaining: Vec<&TypeTag> = yours.iter().collect();

    for tag in theirs {
        let Some(pos) = remaining.iter().position(|t| *t == tag) else {
            tracing::warn!(type_tag = %tag, "Unbalanced trade: their tag has no counterpart");
            return Err(CardmatchError::NotOneToOneTrade {
                type_tag: tag.clone(),
            });
        };
        remaining.remove(pos);
    }

    if let Some(leftover) = remaining.first() {
        tracing::warn!(type_tag = %leftover, "Unbalanced trade: your tag has no counterpart");
        return Err(CardmatchError::NotOneToOneTrade {
            type_tag: (*leftover).clone(),
        });
    }
    Ok(())
}

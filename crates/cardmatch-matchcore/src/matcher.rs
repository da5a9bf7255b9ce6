//! Presence matcher.
//!
//! Filters the request lists down to the aligned pairs both parties can
//! actually fill. This only looks at *whether* a class is present, never at
//! how many instances exist: a class requested twice with one instance in
//! stock passes here and fails later during selection with
//! `MissingCards`.
//!
//! ```text
//! find_valid_cards(CardRequest, yours, theirs) -> MatchedPairs
//! ```

use cardmatch_types::{CardRequest, CardmatchError, InventorySnapshot, MatchedPairs, Result};

/// Reject the attempt if either inventory is empty.
///
/// # Errors
/// [`CardmatchError::InvalidInventoryState`] if either snapshot has no items.
pub fn validate_inventories(yours: &InventorySnapshot, theirs: &InventorySnapshot) -> Result<()> {
    if yours.is_empty() || theirs.is_empty() {
        return Err(CardmatchError::InvalidInventoryState);
    }
    Ok(())
}

/// Keep the request indices whose classes both parties possess.
///
/// ## Algorithm
///
/// 1. Collect the classes each party holds at least one instance of
/// 2. Walk the aligned indices of both request lists in lockstep
/// 3. Keep index *i* iff your class is in your set **and** their class is
///    in their set; nothing is consumed from either inventory
/// 4. Fail if no index survives
///
/// Indices beyond the shorter list have no counterpart and are dropped.
///
/// # Errors
/// [`CardmatchError::NoValidCardsFound`] if the filtered lists are empty.
pub fn find_valid_cards(
    request: &CardRequest,
    yours: &InventorySnapshot,
    theirs: &InventorySnapshot,
) -> Result<MatchedPairs> {
    let your_classes = yours.possessed_classes();
    let their_classes = theirs.possessed_classes();

    let mut matched = MatchedPairs::default();
    for (mine, other) in request.yours.iter().zip(&request.theirs) {
        if your_classes.contains(mine) && their_classes.contains(other) {
            matched.yours.push(mine.clone());
            matched.theirs.push(other.clone());
        } else {
            tracing::debug!(
                yours = %mine,
                theirs = %other,
                your_has = your_classes.contains(mine),
                their_has = their_classes.contains(other),
                "Request pair dropped"
            );
        }
    }

    if matched.is_empty() {
        return Err(CardmatchError::NoValidCardsFound);
    }

    tracing::info!(
        requested = request.aligned_len(),
        matched = matched.len(),
        "Presence matching complete"
    );
    Ok(matched)
}

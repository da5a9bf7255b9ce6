//! Card requests and matched pairs.
//!
//! A trade link carries two aligned class lists: index *i* of `yours` is
//! offered for index *i* of `theirs`. Two query encodings exist:
//!
//! ```text
//! ?you[]=a&you[]=b&them[]=c&them[]=d     (repeated keys, preferred)
//! ?you=a;b&them=c;d                      (legacy, `;`-delimited)
//! ```

use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

use crate::{CardmatchError, ClassId, Result, constants};

/// Two aligned request lists, one per party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequest {
    /// Classes the local user gives.
    pub yours: Vec<ClassId>,
    /// Classes the counterparty gives.
    pub theirs: Vec<ClassId>,
}

impl CardRequest {
    #[must_use]
    pub fn new(yours: Vec<ClassId>, theirs: Vec<ClassId>) -> Self {
        Self { yours, theirs }
    }

    /// Parse the request carried by a trade URL.
    ///
    /// # Errors
    /// [`CardmatchError::NoCardsRequested`] if either list ends up empty.
    pub fn from_url(url: &Url) -> Result<Self> {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Repeated `you[]`/`them[]` keys win whenever at least one of them is
    /// present; otherwise the legacy `you`/`them` keys are split on `;`.
    pub fn from_query(query: &str) -> Result<Self> {
        let mut yours = Vec::new();
        let mut theirs = Vec::new();
        let mut legacy_yours = None;
        let mut legacy_theirs = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                constants::YOU_PARAM => yours.push(ClassId::from(value.into_owned())),
                constants::THEM_PARAM => theirs.push(ClassId::from(value.into_owned())),
                // Last occurrence wins.
                constants::LEGACY_YOU_PARAM => legacy_yours = Some(value.into_owned()),
                constants::LEGACY_THEM_PARAM => legacy_theirs = Some(value.into_owned()),
                _ => {}
            }
        }

        let request = if yours.is_empty() && theirs.is_empty() {
            Self {
                yours: split_legacy(legacy_yours.as_deref()),
                theirs: split_legacy(legacy_theirs.as_deref()),
            }
        } else {
            Self { yours, theirs }
        };

        if request.yours.is_empty() || request.theirs.is_empty() {
            return Err(CardmatchError::NoCardsRequested);
        }
        Ok(request)
    }

    /// Number of index-aligned pairs (the shorter list's length).
    #[must_use]
    pub fn aligned_len(&self) -> usize {
        self.yours.len().min(self.theirs.len())
    }

    /// Request list of one party.
    #[must_use]
    pub fn side(&self, party: crate::Party) -> &[ClassId] {
        match party {
            crate::Party::You => &self.yours,
            crate::Party::Them => &self.theirs,
        }
    }
}

/// Split a legacy `;`-delimited list.
///
/// Interior empty segments stay in place as empty classes so index *i*
/// keeps its counterpart; they never match an inventory. Only trailing
/// empties (`a;b;`) are dropped.
fn split_legacy(value: Option<&str>) -> Vec<ClassId> {
    let Some(raw) = value else {
        return Vec::new();
    };
    let mut segments: Vec<&str> = raw.split(constants::LEGACY_SEPARATOR).collect();
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    segments.into_iter().map(ClassId::from).collect()
}

/// Request pairs whose classes are present in both inventories.
///
/// Produced by the matcher; `yours.len() == theirs.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPairs {
    pub yours: Vec<ClassId>,
    pub theirs: Vec<ClassId>,
}

impl MatchedPairs {
    #[must_use]
    pub fn len(&self) -> usize {
        self.yours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yours.is_empty()
    }

    /// Matched classes of one party, in request order.
    #[must_use]
    pub fn side(&self, party: crate::Party) -> &[ClassId] {
        match party {
            crate::Party::You => &self.yours,
            crate::Party::Them => &self.theirs,
        }
    }
}

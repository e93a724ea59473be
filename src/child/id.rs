//! # Child identifiers.
//!
//! A [`ChildId`] renders as `<prefix><seq>` (e.g. `hostvisorChild-3`) but compares by
//! its sequence number, so ids issued by one coordinator are strictly increasing in
//! issuance order even once the decimal width changes (`-9` < `-10`).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Unique identifier of a managed child.
///
/// Cheap to clone (the prefix is shared).
#[derive(Clone)]
pub struct ChildId {
    prefix: Arc<str>,
    seq: u64,
}

impl ChildId {
    pub(crate) fn new(prefix: Arc<str>, seq: u64) -> Self {
        Self { prefix, seq }
    }

    /// Monotonic counter part of the id (1-based).
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Prefix part of the id.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.seq)
    }
}

impl fmt::Debug for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildId({self})")
    }
}

impl PartialEq for ChildId {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.prefix == other.prefix
    }
}

impl Eq for ChildId {}

impl Hash for ChildId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.seq.hash(state);
    }
}

impl PartialOrd for ChildId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChildId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seq
            .cmp(&other.seq)
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_prefix_and_seq() {
        let id = ChildId::new("worker-".into(), 7);
        assert_eq!(id.to_string(), "worker-7");
        assert_eq!(id.seq(), 7);
        assert_eq!(id.prefix(), "worker-");
    }

    #[test]
    fn test_ordering_is_numeric_not_lexical() {
        let prefix: Arc<str> = "worker-".into();
        let nine = ChildId::new(prefix.clone(), 9);
        let ten = ChildId::new(prefix, 10);
        assert!(nine < ten);
        assert!(nine.to_string() > ten.to_string());
    }
}

//! Pending operation tracking.

use crate::OpKey;
use std::collections::BTreeMap;

/// Keys of mutations with an outstanding round trip.
///
/// Membership is counted: starting the same key twice (a double edit of one
/// cell) needs two releases before the key leaves the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    keys: BTreeMap<OpKey, usize>,
}

impl PendingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a mutation as in flight.
    pub fn insert(&mut self, key: OpKey) {
        *self.keys.entry(key).or_insert(0) += 1;
    }

    /// Release one in-flight entry for `key`.
    ///
    /// Returns false if the key was not pending.
    pub fn release(&mut self, key: &OpKey) -> bool {
        match self.keys.get_mut(key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.keys.remove(key);
                true
            }
            None => false,
        }
    }

    /// Check if a key is in flight.
    pub fn contains(&self, key: &OpKey) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of outstanding round trips, duplicates included.
    pub fn len(&self) -> usize {
        self.keys.values().sum()
    }

    /// True when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Distinct pending keys in deterministic order.
    pub fn keys(&self) -> impl Iterator<Item = &OpKey> {
        self.keys.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserField;

    fn age_of(id: i64) -> OpKey {
        OpKey::Edit {
            id,
            field: UserField::Age,
        }
    }

    #[test]
    fn insert_and_release() {
        let mut set = PendingSet::new();
        assert!(set.is_empty());

        set.insert(age_of(1));
        set.insert(OpKey::Delete(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&age_of(1)));

        assert!(set.release(&age_of(1)));
        assert!(!set.contains(&age_of(1)));
        assert!(set.release(&OpKey::Delete(2)));
        assert!(set.is_empty());
    }

    #[test]
    fn release_unknown_key() {
        let mut set = PendingSet::new();
        assert!(!set.release(&OpKey::Create(-1)));
    }

    #[test]
    fn duplicate_keys_are_counted() {
        let mut set = PendingSet::new();
        set.insert(age_of(1));
        set.insert(age_of(1));
        assert_eq!(set.len(), 2);
        assert_eq!(set.keys().count(), 1);

        set.release(&age_of(1));
        assert!(set.contains(&age_of(1)));
        assert!(!set.is_empty());

        set.release(&age_of(1));
        assert!(set.is_empty());
    }
}

//! # Collection Store Module
//!
//! A generic, thread-safe, in-memory record collection used by the user and
//! product services. Records live in a `Vec` guarded by a `parking_lot`
//! read-write lock, so stored order is insertion order and reads hand out
//! clones that can never observe a half-applied mutation.
//!
//! ## Key Features
//! - Insertion-ordered storage; removal shifts later records up
//! - Snapshot reads (`list`, `get`) that clone under a short read lock
//! - Closure-based updates applied under a single write lock
//! - `try_update` drafts on a copy and commits only on success, so a
//!   rejected mutation leaves the stored record untouched
//! - `insert_unique` / `update_unique` evaluate a uniqueness predicate and
//!   the write under one lock acquisition, so the check cannot race
//!
//! ## Rust Concepts Used
//! - **Interior mutability**: the store is shared as `Arc<CollectionStore<T>>`
//!   across handler tasks and mutated through `&self`; the `RwLock` provides
//!   the synchronization that makes this sound
//! - **Closure parameters** (`FnOnce(&mut T)`) let callers express arbitrary
//!   merges while the store owns the locking discipline

use parking_lot::RwLock;

/// Minimal interface the store needs from a stored record type
pub trait Record: Clone {
    /// Stable unique identifier of this record
    fn id(&self) -> &str;
}

/// Returned when an insert or update would break the caller's uniqueness
/// predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueViolation;

/// Thread-safe, insertion-ordered collection of records
pub struct CollectionStore<T: Record> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> CollectionStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with seed records
    pub fn seeded(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Snapshot of all records in stored order
    pub fn list(&self) -> Vec<T> {
        self.records.read().clone()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Append a record and return it
    pub fn insert(&self, record: T) -> T {
        self.records.write().push(record.clone());
        record
    }

    /// Append a record unless an existing record matches the conflict
    /// predicate
    ///
    /// The scan and the push happen under one write lock, so two concurrent
    /// inserts cannot both pass the check.
    pub fn insert_unique<P>(&self, record: T, conflicts_with: P) -> Result<T, UniqueViolation>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.records.write();
        if records.iter().any(|existing| conflicts_with(existing)) {
            return Err(UniqueViolation);
        }
        records.push(record.clone());
        Ok(record)
    }

    /// Apply an infallible merge to the record with the given id
    ///
    /// Returns the updated record, or `None` if the id is unknown.
    pub fn update<F>(&self, id: &str, apply: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|record| record.id() == id)?;
        apply(record);
        Some(record.clone())
    }

    /// Apply a fallible mutation to a draft copy of the record
    ///
    /// The closure works on a clone; the stored record is replaced only when
    /// the closure returns `Ok`, so a rejected mutation leaves it exactly as
    /// it was. Returns `Ok(None)` when the id is unknown.
    pub fn try_update<F, E>(&self, id: &str, apply: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut records = self.records.write();
        let record = match records.iter_mut().find(|record| record.id() == id) {
            Some(record) => record,
            None => return Ok(None),
        };

        let mut draft = record.clone();
        apply(&mut draft)?;
        *record = draft.clone();
        Ok(Some(draft))
    }

    /// Apply an infallible merge unless another record matches the conflict
    /// predicate
    ///
    /// The record being updated is excluded from the conflict scan, so a
    /// merge that keeps a unique field at its current value always passes.
    /// An unknown id reports `Ok(None)` before the predicate is consulted.
    pub fn update_unique<P, F>(
        &self,
        id: &str,
        conflicts_with: P,
        apply: F,
    ) -> Result<Option<T>, UniqueViolation>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write();
        let position = match records.iter().position(|record| record.id() == id) {
            Some(position) => position,
            None => return Ok(None),
        };

        if records
            .iter()
            .any(|other| other.id() != id && conflicts_with(other))
        {
            return Err(UniqueViolation);
        }

        let record = &mut records[position];
        apply(record);
        Ok(Some(record.clone()))
    }

    /// Remove the record with the given id and return it
    pub fn remove(&self, id: &str) -> Option<T> {
        let mut records = self.records.write();
        let position = records.iter().position(|record| record.id() == id)?;
        Some(records.remove(position))
    }
}

impl<T: Record> Default for CollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: String,
        value: i64,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, label: &str, value: i64) -> Item {
        Item {
            id: id.to_string(),
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_insert_get_and_len() {
        let store = CollectionStore::new();
        assert!(store.is_empty());

        store.insert(item("a", "alpha", 1));
        store.insert(item("b", "beta", 2));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().label, "alpha");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = CollectionStore::new();
        store.insert(item("z", "last letter", 3));
        store.insert(item("a", "first letter", 1));
        store.insert(item("m", "middle letter", 2));

        let ids: Vec<_> = store.list().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_reads_hand_out_clones() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1)]);

        let mut copy = store.get("a").unwrap();
        copy.label = "mutated".to_string();

        assert_eq!(store.get("a").unwrap().label, "alpha");
    }

    #[test]
    fn test_update_applies_merge_and_returns_result() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1)]);

        let updated = store.update("a", |record| record.value = 10).unwrap();
        assert_eq!(updated.value, 10);
        assert_eq!(store.get("a").unwrap().value, 10);

        assert!(store.update("missing", |record| record.value = 0).is_none());
    }

    #[test]
    fn test_try_update_rolls_back_on_rejection() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 5)]);

        let result: Result<Option<Item>, &str> = store.try_update("a", |record| {
            record.value = -100;
            record.label.clear();
            Err("rejected")
        });

        assert_eq!(result, Err("rejected"));
        let stored = store.get("a").unwrap();
        assert_eq!(stored.value, 5);
        assert_eq!(stored.label, "alpha");
    }

    #[test]
    fn test_try_update_commits_on_success() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 5)]);

        let result: Result<Option<Item>, &str> = store.try_update("a", |record| {
            record.value = 7;
            Ok(())
        });

        assert_eq!(result.unwrap().unwrap().value, 7);
        assert_eq!(store.get("a").unwrap().value, 7);
    }

    #[test]
    fn test_try_update_unknown_id() {
        let store = CollectionStore::<Item>::new();
        let result: Result<Option<Item>, &str> = store.try_update("missing", |_| Ok(()));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_insert_unique_rejects_conflicts() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1)]);

        let duplicate = store.insert_unique(item("b", "alpha", 2), |other| other.label == "alpha");
        assert_eq!(duplicate, Err(UniqueViolation));
        assert_eq!(store.len(), 1);

        let accepted = store.insert_unique(item("b", "beta", 2), |other| other.label == "beta");
        assert!(accepted.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_unique_excludes_the_record_itself() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1), item("b", "beta", 2)]);

        // Keeping the label at its current value conflicts with nobody.
        let kept = store.update_unique("a", |other| other.label == "alpha", |record| {
            record.value = 9;
        });
        assert_eq!(kept.unwrap().unwrap().value, 9);

        // Taking another record's label is a conflict.
        let stolen = store.update_unique("a", |other| other.label == "beta", |record| {
            record.label = "beta".to_string();
        });
        assert_eq!(stolen, Err(UniqueViolation));
        assert_eq!(store.get("a").unwrap().label, "alpha");
    }

    #[test]
    fn test_update_unique_unknown_id_wins_over_conflict() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1)]);

        // The id check comes first; the predicate would match but is never
        // allowed to turn a missing record into a conflict.
        let result = store.update_unique("missing", |other| other.label == "alpha", |_| {});
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_remove() {
        let store = CollectionStore::seeded(vec![item("a", "alpha", 1), item("b", "beta", 2)]);

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.label, "alpha");
        assert_eq!(store.len(), 1);
        assert!(store.remove("a").is_none());

        let ids: Vec<_> = store.list().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["b"]);
    }
}

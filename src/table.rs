//! Table: the slot array and the insert / search / delete probing logic.

use crate::error::TableError;
use crate::hash::{DoubleHash, KeyBytes};
use crate::resize::{load_percent, ResizePolicy, INITIAL_BASE_SIZE};
use crate::slot::{alloc_slots, empty_slots, slot_count, Entry, Slot};
use core::borrow::Borrow;
use log::error;

/// Open-addressing hash table with double hashing.
///
/// `size` (the slot count) is always `next_prime(base_size)`, and `base_size`
/// never drops below the policy floor. Keys are unique: inserting an existing
/// key overwrites its value.
#[derive(Debug)]
pub struct Table<K = String, V = String> {
    pub(crate) slots: Vec<Slot<K, V>>,
    pub(crate) base_size: usize,
    pub(crate) count: usize,
    pub(crate) tombstones: usize,
    pub(crate) hasher: DoubleHash,
    pub(crate) policy: ResizePolicy,
}

impl<K, V> Table<K, V>
where
    K: KeyBytes + Eq,
{
    /// Empty table at the minimum capacity with the standard multipliers and
    /// thresholds.
    pub fn new() -> Self {
        // INITIAL_BASE_SIZE is prime, so it is its own slot count.
        Self::from_slots(
            empty_slots(INITIAL_BASE_SIZE),
            INITIAL_BASE_SIZE,
            DoubleHash::default(),
            ResizePolicy::default(),
        )
    }

    fn from_slots(
        slots: Vec<Slot<K, V>>,
        base_size: usize,
        hasher: DoubleHash,
        policy: ResizePolicy,
    ) -> Self {
        Self {
            slots,
            base_size,
            count: 0,
            tombstones: 0,
            hasher,
            policy,
        }
    }
}

impl<K, V> Default for Table<K, V>
where
    K: KeyBytes + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Table<K, V>
where
    K: KeyBytes + Eq,
{
    pub fn with_config(hasher: DoubleHash, policy: ResizePolicy) -> Result<Self, TableError> {
        let base_size = policy.min_base_size();
        let slots = alloc_slots(slot_count::<K, V>(base_size)?)?;
        Ok(Self::from_slots(slots, base_size, hasher, policy))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots; always prime.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Capacity requested by the resize policy before prime rounding.
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// `len * 100 / size`, rounded down.
    pub fn load_percent(&self) -> usize {
        load_percent(self.count, self.slots.len())
    }

    pub fn hasher(&self) -> &DoubleHash {
        &self.hasher
    }

    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Index of the live entry for `key`. Tombstones are skipped; an empty slot
    /// or a full cycle of probes means the key is absent.
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyBytes + Eq,
    {
        for idx in self.hasher.probe_seq(key, self.slots.len()) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(e) if e.key.borrow() == key => return Some(idx),
                Slot::Occupied(_) => {}
            }
        }
        None
    }

    /// Slot an insert of `key` should write: the entry already holding `key`,
    /// else the first tombstone on the way to an empty slot, else that empty
    /// slot. The scan continues past tombstones so a live copy further along
    /// the chain is found rather than duplicated.
    fn insert_index(&self, key: &K) -> Result<usize, TableError> {
        let size = self.slots.len();
        let mut reusable = None;
        for idx in self.hasher.probe_seq(key, size) {
            match &self.slots[idx] {
                Slot::Empty => return Ok(reusable.unwrap_or(idx)),
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(idx);
                    }
                }
                Slot::Occupied(e) if e.key == *key => return Ok(idx),
                Slot::Occupied(_) => {}
            }
        }
        reusable.ok_or_else(|| {
            error!("probe bound exceeded: {} attempts without a free slot", size);
            TableError::ProbeExhausted { size }
        })
    }

    /// Insert `key -> value`, returning the previous value if `key` was present.
    ///
    /// The resize policy runs first and may rebuild the table. On error the
    /// table is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let size = self.slots.len();
        let grow = self
            .policy
            .before_insert(self.count, self.tombstones, size, self.base_size);
        if let Some(target) = grow {
            self.resize(target)?;
        }

        let idx = self.insert_index(&key)?;
        match &mut self.slots[idx] {
            Slot::Occupied(e) => Ok(Some(core::mem::replace(&mut e.value, value))),
            slot => {
                if matches!(slot, Slot::Tombstone) {
                    self.tombstones -= 1;
                }
                *slot = Slot::Occupied(Entry { key, value });
                self.count += 1;
                Ok(None)
            }
        }
    }

    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyBytes + Eq,
    {
        let idx = self.find_index(key)?;
        let Slot::Occupied(e) = &self.slots[idx] else {
            unreachable!("find_index only returns occupied slots");
        };
        Some(&e.value)
    }

    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyBytes + Eq,
    {
        let idx = self.find_index(key)?;
        let Slot::Occupied(e) = &mut self.slots[idx] else {
            unreachable!("find_index only returns occupied slots");
        };
        Some(&mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyBytes + Eq,
    {
        self.find_index(key).is_some()
    }

    /// Remove `key`, leaving a tombstone in its slot, and return its value.
    /// Removing an absent key is a no-op returning `Ok(None)`.
    ///
    /// The resize policy runs first, so the table may shrink even when the key
    /// is absent.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<V>, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyBytes + Eq,
    {
        let size = self.slots.len();
        if let Some(target) = self.policy.before_delete(self.count, size, self.base_size) {
            self.resize(target)?;
        }

        let Some(idx) = self.find_index(key) else {
            return Ok(None);
        };
        let Slot::Occupied(e) = core::mem::replace(&mut self.slots[idx], Slot::Tombstone) else {
            unreachable!("find_index only returns occupied slots");
        };
        self.count -= 1;
        self.tombstones += 1;
        Ok(Some(e.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a fresh table has 53 empty slots and nothing in it.
    #[test]
    fn new_table_is_empty_at_floor() {
        let t: Table = Table::new();
        assert_eq!(t.size(), 53);
        assert_eq!(t.base_size(), 53);
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert_eq!(t.tombstones(), 0);
        assert!(t.slots.iter().all(|s| matches!(s, Slot::Empty)));
    }

    /// Invariant: `new` and `with_config` with the default configuration build
    /// identical tables; the floor is prime so `new` can skip the search.
    #[test]
    fn new_matches_default_config() {
        assert!(crate::prime::is_prime(INITIAL_BASE_SIZE));
        let a: Table = Table::new();
        let b: Table =
            Table::with_config(DoubleHash::default(), ResizePolicy::default()).unwrap();
        assert_eq!(a.size(), b.size());
        assert_eq!(a.base_size(), b.base_size());
        assert_eq!(a.hasher(), b.hasher());
        assert_eq!(a.policy(), b.policy());
    }

    /// Invariant: deleting turns exactly the key's slot into a tombstone and
    /// updates both counters; a second delete of the same key is a no-op.
    #[test]
    fn delete_leaves_one_tombstone() {
        let mut t: Table<String, u32> = Table::new();
        t.insert("a".into(), 1).unwrap();
        t.insert("b".into(), 2).unwrap();
        assert_eq!(t.delete("a").unwrap(), Some(1));
        assert_eq!((t.len(), t.tombstones()), (1, 1));
        assert_eq!(t.delete("a").unwrap(), None);
        assert_eq!((t.len(), t.tombstones()), (1, 1));
        let tombs = t.slots.iter().filter(|s| matches!(s, Slot::Tombstone)).count();
        assert_eq!(tombs, 1);
        assert_eq!(t.search("b"), Some(&2));
    }

    /// Invariant: overwriting keeps a single live slot for the key and returns
    /// the displaced value.
    #[test]
    fn overwrite_keeps_one_slot() {
        let mut t: Table = Table::new();
        assert_eq!(t.insert("k".into(), "v1".into()).unwrap(), None);
        assert_eq!(
            t.insert("k".into(), "v2".into()).unwrap(),
            Some("v1".to_string())
        );
        assert_eq!(t.len(), 1);
        let live = t
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied(e) if e.key == "k"))
            .count();
        assert_eq!(live, 1);
        assert_eq!(t.search("k").map(String::as_str), Some("v2"));
    }

    /// Invariant: a tombstone earlier in a key's chain does not cause a duplicate
    /// when that key is inserted again while still live further along.
    #[test]
    fn tombstone_before_live_key_does_not_duplicate() {
        let mut t: Table<String, u32> = Table::new();
        let size = t.size();
        let hasher = *t.hasher();

        // Find two keys with the same first probe slot.
        let mut first: Option<(usize, String)> = None;
        let mut pair = None;
        for i in 0..10_000 {
            let k = format!("key{}", i);
            let slot0 = hasher.probe(k.as_str(), size, 0);
            match &first {
                None => first = Some((slot0, k)),
                Some((s, k0)) if *s == slot0 => {
                    pair = Some((k0.clone(), k));
                    break;
                }
                Some(_) => {}
            }
        }
        let (a, b) = pair.expect("a first-probe collision within 10k keys");

        t.insert(a.clone(), 1).unwrap();
        t.insert(b.clone(), 2).unwrap();
        // `a` sits at the shared slot, `b` further along its own chain.
        t.delete(a.as_str()).unwrap();
        assert_eq!(t.tombstones(), 1);

        assert_eq!(t.insert(b.clone(), 3).unwrap(), Some(2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.search(b.as_str()), Some(&3));
        let copies = t
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied(e) if e.key == b))
            .count();
        assert_eq!(copies, 1);
    }

    /// Invariant: inserting a new key reuses the first tombstone on its chain.
    #[test]
    fn insert_reuses_tombstone() {
        let mut t: Table<String, u32> = Table::new();
        t.insert("a".into(), 1).unwrap();
        t.delete("a").unwrap();
        assert_eq!(t.tombstones(), 1);
        t.insert("a".into(), 2).unwrap();
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn search_mut_updates_in_place() {
        let mut t: Table<String, u32> = Table::new();
        t.insert("n".into(), 1).unwrap();
        *t.search_mut("n").unwrap() += 41;
        assert_eq!(t.search("n"), Some(&42));
        assert!(t.search_mut("missing").is_none());
    }

    /// Invariant: a table whose every slot is occupied by other keys reports
    /// `ProbeExhausted` on insert, and `None` (not an error) on search.
    #[test]
    fn full_table_reports_probe_exhaustion() {
        let policy = ResizePolicy::new(5, 0, 99).unwrap();
        let mut t: Table<String, u32> =
            Table::with_config(DoubleHash::default(), policy).unwrap();
        assert_eq!(t.size(), 5);
        // Fill the array directly; the policy would otherwise grow first.
        for (i, slot) in t.slots.iter_mut().enumerate() {
            *slot = Slot::Occupied(Entry {
                key: format!("f{}", i),
                value: i as u32,
            });
        }
        t.count = 5;
        assert_eq!(
            t.insert_index(&"new".to_string()),
            Err(TableError::ProbeExhausted { size: 5 })
        );
        assert_eq!(t.search("new"), None);
        assert_eq!(t.search("f3"), Some(&3));
    }
}

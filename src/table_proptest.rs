#![cfg(test)]

// Property tests for Table kept inside the crate so they can inspect the slot
// array directly.

use crate::prime::{is_prime, next_prime};
use crate::resize::ResizePolicy;
use crate::slot::Slot;
use crate::table::Table;
use crate::DoubleHash;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, u32),
    Delete(usize),
    Search(usize),
    SearchOther(String),
}

fn arb_scenario(max_pool: usize) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=max_pool).prop_flat_map(|pool| {
        let n = pool.len();
        let op = prop_oneof![
            4 => (0..n, any::<u32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => (0..n).prop_map(OpI::Delete),
            2 => (0..n).prop_map(OpI::Search),
            1 => "[a-z]{0,6}".prop_map(OpI::SearchOther),
        ];
        proptest::collection::vec(op, 1..300).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural invariants checked after every operation:
// - `size` is prime, equals `next_prime(base_size)`, and `base_size` respects the floor.
// - `count` and `tombstones` match the slot array.
// - No key occupies more than one slot.
// - At least one slot is empty, so searches for absent keys terminate early.
fn check_structure(t: &Table<String, u32>) -> Result<(), TestCaseError> {
    prop_assert!(is_prime(t.size()));
    prop_assert_eq!(Some(t.size()), next_prime(t.base_size()));
    prop_assert!(t.base_size() >= t.policy().min_base_size());

    let mut keys = BTreeSet::new();
    let mut occupied = 0;
    let mut tombstones = 0;
    let mut empty = 0;
    for slot in &t.slots {
        match slot {
            Slot::Empty => empty += 1,
            Slot::Tombstone => tombstones += 1,
            Slot::Occupied(e) => {
                occupied += 1;
                prop_assert!(keys.insert(e.key.clone()), "duplicate live key {:?}", e.key);
            }
        }
    }
    prop_assert_eq!(occupied, t.len());
    prop_assert_eq!(tombstones, t.tombstones());
    prop_assert!(empty > 0);
    Ok(())
}

fn run_scenario(
    mut sut: Table<String, u32>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, u32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut.insert(k.clone(), v).expect("insert succeeds");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let removed = sut.delete(k.as_str()).expect("delete succeeds");
                prop_assert_eq!(removed, model.remove(k));
                prop_assert!(sut.search(k.as_str()).is_none());
            }
            OpI::Search(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.search(k.as_str()), model.get(k));
            }
            OpI::SearchOther(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.search(k.as_str()), Some(v));
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap with
// the default policy. Pools of up to 120 keys push the table through several
// grow and shrink cycles.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(120)) {
        run_scenario(Table::new(), &pool, ops)?;
    }
}

// Property: Same invariants on a tiny table (7 slots) where nearly every key
// collides and tombstone purges happen constantly.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario(12)) {
        let policy = ResizePolicy::new(7, 10, 70).unwrap();
        let sut = Table::with_config(DoubleHash::default(), policy).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Property: Custom multipliers change the layout but not the observable
// behavior.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_custom_multipliers((pool, ops) in arb_scenario(60)) {
        let hasher = DoubleHash::new(31, 37).unwrap();
        let sut = Table::with_config(hasher, ResizePolicy::default()).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

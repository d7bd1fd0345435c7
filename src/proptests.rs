use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Panics unless the tree satisfies every red-black invariant, the parent
/// links agree with the child links, keys are strictly increasing in order,
/// the arena accounting matches `len`, and the height is within
/// `2 * log2(n + 1)`.
pub(crate) fn validate_tree<K: Ord + Debug, V>(t: &RbMap<K, V>) {
    assert_eq!(
        t.nodes.slots.len(),
        t.len + t.nodes.free.len(),
        "every slot is either live or on the free list"
    );
    for id in &t.nodes.free {
        assert!(t.nodes.slots[id.index()].is_none(), "free slot {id:?} still occupied");
    }
    assert_eq!(t.nodes.live().count(), t.len, "live slot count must match len");

    if t.root.is_nil() {
        assert_eq!(t.len, 0, "empty tree must report len 0");
        return;
    }
    assert_eq!(t.color(t.root), Color::Black, "root must be black");

    black_height(t, t.root, NodeId::NIL);

    let keys: Vec<&K> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.len(), t.len, "reachable node count must match len");
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "keys out of order: {:?} >= {:?}", pair[0], pair[1]);
    }

    let bound = 2.0 * ((t.len + 1) as f64).log2();
    assert!(
        t.height() as f64 <= bound,
        "height {} exceeds bound {bound} for {} keys",
        t.height(),
        t.len
    );
}

/// Black-height of the subtree at `id`, counting the NIL leaf.
fn black_height<K: Ord + Debug, V>(t: &RbMap<K, V>, id: NodeId, parent: NodeId) -> usize {
    if id.is_nil() {
        return 1;
    }
    let node = t.node(id);
    assert_eq!(node.parent, parent, "parent link of {:?} is stale", node.key);
    if node.color == Color::Red {
        assert_eq!(t.color(node.left), Color::Black, "red {:?} has a red left child", node.key);
        assert_eq!(t.color(node.right), Color::Black, "red {:?} has a red right child", node.key);
    }

    let left = black_height(t, node.left, id);
    let right = black_height(t, node.right, id);
    assert_eq!(left, right, "black-height differs below {:?}", node.key);
    left + usize::from(node.color == Color::Black)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "0u16..256")] u16, u32),
    #[proptest(weight = 30)]
    Remove(#[proptest(strategy = "0u16..256")] u16),
    #[proptest(weight = 18)]
    Get(#[proptest(strategy = "0u16..256")] u16),
    #[proptest(weight = 2)]
    Compact,
}

fn distinct_keys_and_removal_order() -> impl Strategy<Value = (Vec<i32>, Vec<i32>)> {
    prop::collection::btree_set(any::<i32>(), 0..300).prop_flat_map(|keys| {
        let keys: Vec<i32> = keys.into_iter().collect();
        (Just(keys.clone()), Just(keys).prop_shuffle())
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        let mut t: RbMap<u16, u32> = RbMap::new();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(key, value), m.insert(key, value));
                    prop_assert_eq!(t.get(&key), Some(&value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                    prop_assert_eq!(t.get(&key), None);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                    prop_assert_eq!(t.contains_key(&key), m.contains_key(&key));
                }
                Op::Compact => {
                    t.compact();
                }
            }

            prop_assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }

        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insert_all_then_remove_all((keys, order) in distinct_keys_and_removal_order()) {
        let mut t: RbMap<i32, i32> = RbMap::new();
        for &k in &keys {
            prop_assert_eq!(t.insert(k, k.wrapping_mul(3)), None);
        }
        prop_assert_eq!(t.len(), keys.len());
        validate_tree(&t);

        for (removed, k) in order.iter().enumerate() {
            prop_assert_eq!(t.remove(k), Some(k.wrapping_mul(3)));
            prop_assert_eq!(t.get(k), None);
            prop_assert_eq!(t.len(), keys.len() - removed - 1);
            validate_tree(&t);
        }

        prop_assert!(t.is_empty());
        prop_assert!(t.root.is_nil());
    }

    #[test]
    fn prop_traversals_visit_same_entries(keys in prop::collection::vec(any::<u8>(), 0..200)) {
        let t: RbMap<u8, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let distinct: Vec<u8> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        let in_order: Vec<u8> = t.traverse(Traversal::InOrder).map(|(k, _)| *k).collect();
        let mut pre_order: Vec<u8> = t.traverse(Traversal::PreOrder).map(|(k, _)| *k).collect();
        prop_assert_eq!(&in_order, &distinct);

        if let Some(first) = pre_order.first() {
            prop_assert_eq!(*first, t.node(t.root).key);
        }
        pre_order.sort_unstable();
        prop_assert_eq!(pre_order, in_order);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(&[T])) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(&[T])) {
        if out.len() == items.len() {
            f(out);
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = ["a", "b", "c", "d", "e", "f", "g"];

    for_each_permutation(&keys, |perm| {
        let mut t: RbMap<&str, usize> = RbMap::new();
        for (i, k) in perm.iter().enumerate() {
            assert_eq!(t.insert(*k, i), None);
            validate_tree(&t);
        }
        assert_eq!(t.keys(), keys.to_vec());
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = ["a", "b", "c", "d", "e", "f", "g"];

    // Insert in a fixed order, then remove in all permutations.
    let base: RbMap<&str, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut m: BTreeMap<&str, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        for k in perm {
            assert_eq!(t.remove(k), m.remove(k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }
        assert_eq!(t.len(), 0);
        assert!(t.root.is_nil());
    });
}

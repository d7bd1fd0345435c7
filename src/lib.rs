//! # rbmap
//!
//! An ordered map backed by a red-black tree whose nodes live in an arena.
//!
//! Nodes are addressed by 32-bit handles into a slot vector instead of by
//! pointers. Parent links are plain handles used only to navigate during
//! rotations and fixups; the arena is the sole owner of every node.
//!
//! ## Example
//!
//! ```rust
//! use rbmap::{RbMap, Traversal};
//!
//! let mut map = RbMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//! map.insert("c", 3);
//!
//! assert_eq!(map.get("a"), Some(&1));
//! assert_eq!(map.keys(), vec!["a", "b", "c"]);
//!
//! // Root first, then the left subtree, then the right subtree.
//! let pre: Vec<_> = map.traverse(Traversal::PreOrder).map(|(k, _)| *k).collect();
//! assert_eq!(pre, vec!["b", "a", "c"]);
//!
//! assert_eq!(map.remove("b"), Some(2));
//! assert_eq!(map.len(), 2);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

// =============================================================================
// Handles and colors
// =============================================================================

/// Slot index into the node arena.
///
/// `NIL` stands in for every absent child and for the root's parent. It is
/// never dereferenced and always reads as a black leaf.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(u32);

impl NodeId {
    const NIL: NodeId = NodeId(u32::MAX);

    #[inline]
    fn is_nil(self) -> bool {
        self == Self::NIL
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_nil());
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

/// Child side. Every fixup case exists in two mirrored forms; they are
/// written once in terms of a side and its opposite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

impl<K, V> Node<K, V> {
    /// Fresh nodes are red and childless.
    fn new(key: K, value: V, parent: NodeId) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: NodeId::NIL,
            right: NodeId::NIL,
        }
    }

    #[inline]
    fn child(&self, dir: Dir) -> NodeId {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, dir: Dir) -> &mut NodeId {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }
}

// =============================================================================
// Node arena
// =============================================================================

/// Slot storage for tree nodes. Vacated slots go on a free list and are
/// handed out again before the slot vector grows.
#[derive(Clone)]
struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.index()].is_none());
            self.slots[id.index()] = Some(node);
            return id;
        }
        assert!(
            self.slots.len() < NodeId::NIL.0 as usize,
            "node arena exhausted the 32-bit handle space"
        );
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.index()]
            .take()
            .expect("released node slot must be occupied");
        self.free.push(id);
        node
    }

    #[inline]
    fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.index()]
            .as_ref()
            .expect("live handle must point at an occupied slot")
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.index()]
            .as_mut()
            .expect("live handle must point at an occupied slot")
    }

    /// Mutable access to two distinct nodes at once.
    fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
        debug_assert_ne!(a, b);
        let (lo, hi, swapped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut().expect("live handle must point at an occupied slot");
        let second = tail[0].as_mut().expect("live handle must point at an occupied slot");
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    fn live(&self) -> impl Iterator<Item = &Node<K, V>> {
        self.slots.iter().flatten()
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    /// Move every live node to the front of the slot vector, rewriting all
    /// links. Returns the root's new handle.
    fn compact(&mut self, root: NodeId) -> NodeId {
        let old = mem::take(&mut self.slots);
        let mut remap = vec![NodeId::NIL; old.len()];
        let mut slots = Vec::with_capacity(old.len() - self.free.len());
        for (i, slot) in old.into_iter().enumerate() {
            if let Some(node) = slot {
                remap[i] = NodeId(slots.len() as u32);
                slots.push(Some(node));
            }
        }

        let relink = |id: NodeId| if id.is_nil() { id } else { remap[id.index()] };
        for node in slots.iter_mut().flatten() {
            node.parent = relink(node.parent);
            node.left = relink(node.left);
            node.right = relink(node.right);
        }

        self.slots = slots;
        self.free.clear();
        relink(root)
    }
}

// =============================================================================
// RbMap
// =============================================================================

/// Enumeration order for [`RbMap::traverse`] and [`RbMap::entries`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Left subtree, node, right subtree: ascending key order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
}

/// An ordered map implemented as a red-black tree.
///
/// Inserting an existing key overwrites its value in place and returns the
/// previous one; the entry count only grows for new keys.
///
/// Point operations are `O(log n)`. [`contains_value`](Self::contains_value)
/// and the snapshot accessors are `O(n)`.
///
/// There is no internal locking. A map shared between threads has to be
/// guarded as a whole, since a rotation rewrites several nodes' links.
#[derive(Clone)]
pub struct RbMap<K, V> {
    nodes: NodeArena<K, V>,
    root: NodeId,
    len: usize,
}

impl<K, V> RbMap<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: NodeId::NIL,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
        self.len = 0;
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Compact the node arena so that live nodes occupy a contiguous prefix.
    ///
    /// Removals leave vacant slots behind, which later inserts reuse. After a
    /// burst of removals this returns that space. Returns the number of
    /// vacant slots dropped.
    pub fn compact(&mut self) -> usize {
        let vacant = self.nodes.free.len();
        if vacant == 0 {
            return 0;
        }
        self.root = self.nodes.compact(self.root);
        vacant
    }

    /// Number of nodes on the longest root-to-leaf path. Never exceeds
    /// `2 * log2(len + 1)`.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push((self.root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.node(id);
            for child in [node.left, node.right] {
                if !child.is_nil() {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    /// In-order iterator over borrowed entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self, Traversal::InOrder)
    }

    /// Iterator over borrowed entries in the given order.
    pub fn traverse(&self, order: Traversal) -> Iter<'_, K, V> {
        Iter::new(self, order)
    }

    /// Linear scan over every stored value using `==`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.nodes.live().any(|node| node.value == *value)
    }

    /// Cloned keys in ascending order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Cloned values in ascending key order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Cloned entries in the given order. The result is detached from the
    /// map and unaffected by later mutation.
    pub fn entries(&self, order: Traversal) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.traverse(order)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // === Structure helpers ===

    #[inline]
    fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes.get(id)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes.get_mut(id)
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self.node(id).color
        }
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            self.node_mut(id).color = color;
        }
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    #[inline]
    fn child(&self, id: NodeId, dir: Dir) -> NodeId {
        self.node(id).child(dir)
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, dir: Dir, child: NodeId) {
        *self.node_mut(id).child_mut(dir) = child;
    }

    /// Which side of its parent `id` hangs on. `id` must not be the root.
    #[inline]
    fn side_of(&self, id: NodeId) -> Dir {
        if self.node(self.parent(id)).left == id {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Point whatever referenced `old` (a parent's child slot, or the root)
    /// at `new`. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_nil() {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            debug_assert_eq!(self.node(parent).right, old);
            self.node_mut(parent).right = new;
        }
    }

    fn extreme(&self, mut id: NodeId, dir: Dir) -> NodeId {
        loop {
            let next = self.child(id, dir);
            if next.is_nil() {
                return id;
            }
            id = next;
        }
    }

    /// Rotate `x` down toward `dir`, promoting its child on the opposite
    /// side. `Dir::Left` is a left rotation (the right child rises) and
    /// `Dir::Right` a right rotation. In-order key sequence is preserved;
    /// colors are left alone.
    fn rotate(&mut self, x: NodeId, dir: Dir) {
        let y = self.child(x, dir.opposite());
        debug_assert!(!y.is_nil(), "rotation needs a child to promote");

        let inner = self.child(y, dir);
        self.set_child(x, dir.opposite(), inner);
        if !inner.is_nil() {
            self.node_mut(inner).parent = x;
        }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, y);

        self.set_child(y, dir, x);
        self.node_mut(x).parent = y;
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = self.parent(node);
            // Also covers the root, whose parent is NIL.
            if self.color(parent) == Color::Black {
                break;
            }

            // A red parent is never the root, so the grandparent exists.
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node) != side {
                node = parent;
                self.rotate(node, side);
            }
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Unlink `target` and return its node. If `target` has two children,
    /// its entry is swapped with its in-order successor's and the
    /// successor's slot is the one unlinked.
    fn delete(&mut self, target: NodeId) -> Node<K, V> {
        let target_node = self.node(target);
        let (left, right) = (target_node.left, target_node.right);

        let doomed = if !left.is_nil() && !right.is_nil() {
            let successor = self.extreme(right, Dir::Left);
            let (t, s) = self.nodes.pair_mut(target, successor);
            mem::swap(&mut t.key, &mut s.key);
            mem::swap(&mut t.value, &mut s.value);
            successor
        } else {
            target
        };

        // `doomed` has at most one child.
        let doomed_node = self.node(doomed);
        let child = if doomed_node.left.is_nil() {
            doomed_node.right
        } else {
            doomed_node.left
        };
        let parent = doomed_node.parent;

        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, doomed, child);

        let removed = self.nodes.release(doomed);
        self.len -= 1;
        if removed.color == Color::Black {
            self.remove_fixup(child, parent);
        }
        removed
    }

    /// `node` carries an extra black. It may be NIL, so its parent is
    /// tracked alongside it.
    fn remove_fixup(&mut self, mut node: NodeId, mut parent: NodeId) {
        while node != self.root && self.color(node) == Color::Black {
            let side = if self.child(parent, Dir::Left) == node {
                Dir::Left
            } else {
                Dir::Right
            };
            let far = side.opposite();

            // The sibling subtree has black-height >= 1, so it is never NIL.
            let mut sibling = self.child(parent, far);
            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, far);
            }

            if self.color(self.child(sibling, Dir::Left)) == Color::Black
                && self.color(self.child(sibling, Dir::Right)) == Color::Black
            {
                self.set_color(sibling, Color::Red);
                node = parent;
                parent = self.parent(node);
                continue;
            }

            if self.color(self.child(sibling, far)) == Color::Black {
                let near = self.child(sibling, side);
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.child(parent, far);
            }

            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far_child = self.child(sibling, far);
            self.set_color(far_child, Color::Black);
            self.rotate(parent, side);
            node = self.root;
            break;
        }

        self.set_color(node, Color::Black);
    }
}

impl<K: Ord, V> RbMap<K, V> {
    /// Insert `key`, or overwrite its value if it is already present.
    ///
    /// Returns the previous value on overwrite. Overwriting allocates no
    /// node and leaves the tree shape and [`len`](Self::len) unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = NodeId::NIL;
        let mut dir = Dir::Left;
        let mut cur = self.root;
        while !cur.is_nil() {
            dir = match key.cmp(&self.node(cur).key) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.node_mut(cur).value, value));
                }
            };
            parent = cur;
            cur = self.child(cur, dir);
        }

        let id = self.nodes.alloc(Node::new(key, value, parent));
        if parent.is_nil() {
            self.root = id;
        } else {
            self.set_child(parent, dir, id);
        }
        self.len += 1;
        self.insert_fixup(id);
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node(id).value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| {
            let node = self.node(id);
            (&node.key, &node.value)
        })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.node_mut(id).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Remove `key` and return its value. Absent keys leave the map as is.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        let node = self.delete(id);
        Some((node.key, node.value))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.edge_entry(Dir::Left)
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.edge_entry(Dir::Right)
    }

    fn edge_entry(&self, dir: Dir) -> Option<(&K, &V)> {
        if self.root.is_nil() {
            return None;
        }
        let node = self.node(self.extreme(self.root, dir));
        Some((&node.key, &node.value))
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            cur = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(cur),
            };
        }
        None
    }
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RbMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Borrowing iterator produced by [`RbMap::iter`] and [`RbMap::traverse`].
pub struct Iter<'a, K, V> {
    map: &'a RbMap<K, V>,
    stack: Vec<NodeId>,
    order: Traversal,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(map: &'a RbMap<K, V>, order: Traversal) -> Self {
        let mut iter = Self {
            map,
            stack: Vec::new(),
            order,
            remaining: map.len,
        };
        match order {
            Traversal::InOrder => iter.push_left_spine(map.root),
            Traversal::PreOrder => {
                if !map.root.is_nil() {
                    iter.stack.push(map.root);
                }
            }
        }
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        while !id.is_nil() {
            self.stack.push(id);
            id = self.map.node(id).left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let map = self.map;
        let node = map.node(id);
        match self.order {
            Traversal::InOrder => self.push_left_spine(node.right),
            Traversal::PreOrder => {
                // Right goes first so that left pops first.
                for child in [node.right, node.left] {
                    if !child.is_nil() {
                        self.stack.push(child);
                    }
                }
            }
        }
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}


#[cfg(test)]
mod proptests;

//! An ordered map/multimap balanced as an AVL tree.
//!
//! The map never owns its nodes. The caller keeps them in a slice (usually a
//! `Vec`), hands the map a [`NodeId`] to link on insert and gets the same node
//! back, detached, on delete.

pub mod set;

use std::cmp::Ordering;
use std::fmt;
use std::iter::{FusedIterator, Rev};
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};

use crate::error::InvariantError;
use crate::link::{Balance, Linked, NodeId, NodeLink};
use crate::order::{KeyOrder, Keyed, Natural};
use crate::tree::{self, Direction, Order, Walk};

pub use set::{Intersection, Subtraction, SymmetricDifference, Union};

/// An ordered map (or multimap, when duplicates are allowed) over caller-owned nodes.
///
/// ```
/// use ucl::{AvlMap, Node, NodeId};
///
/// let mut nodes: Vec<Node<i32, &str>> =
///     vec![Node::new(2, "two"), Node::new(1, "one"), Node::new(3, "three")];
/// let mut map = AvlMap::new();
/// for index in 0..nodes.len() {
///     assert!(map.insert(&mut nodes, NodeId::from_index(index)));
/// }
///
/// let one = map.find(&nodes, &1).unwrap();
/// assert_eq!(nodes[one.to_index()].value, "one");
///
/// map.delete(&mut nodes, one);
/// assert!(map.find(&nodes, &1).is_none());
///
/// let keys: Vec<i32> = map.iter(&nodes).map(|(_, node)| node.key).collect();
/// assert_eq!(keys, [2, 3]);
/// ```
pub struct AvlMap<N, O = Natural> {
    root: Option<NodeId>,
    num_nodes: usize,
    multi: bool,
    order: O,
    _nodes: PhantomData<fn() -> N>,
}

/// A ready-made node: a key, a value and the link header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node<K, V = ()> {
    link: NodeLink,
    pub key: K,
    pub value: V,
}

impl<K, V> Node<K, V> {
    /// Creates a detached node.
    pub fn new(key: K, value: V) -> Self {
        Self {
            link: NodeLink::new(),
            key,
            value,
        }
    }
}

impl<K, V> Linked for Node<K, V> {
    fn link(&self) -> &NodeLink {
        &self.link
    }

    fn link_mut(&mut self) -> &mut NodeLink {
        &mut self.link
    }
}

impl<K: Ord, V> Keyed for Node<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }
}

/// An inorder iterator over map nodes, front to back.
///
/// This `struct` is created by [`AvlMap::iter`] and by the bound and range
/// queries, which start or stop it at a given node.
pub struct Iter<'a, N, O> {
    nodes: &'a [N],
    order: &'a O,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<N> AvlMap<N, Natural> {
    /// Creates an empty map that rejects duplicate keys.
    pub fn new() -> Self {
        Self::with_order(Natural)
    }

    /// Creates an empty multimap.
    pub fn multimap() -> Self {
        Self::multimap_with_order(Natural)
    }
}

impl<N, O> AvlMap<N, O> {
    /// Creates an empty map with a custom ordering that rejects duplicate keys.
    pub fn with_order(order: O) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            multi: false,
            order,
            _nodes: PhantomData,
        }
    }

    /// Creates an empty multimap with a custom ordering.
    pub fn multimap_with_order(order: O) -> Self {
        Self {
            multi: true,
            ..Self::with_order(order)
        }
    }

    /// Returns true if the map contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of nodes in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns true if the map accepts duplicate keys.
    pub fn is_multimap(&self) -> bool {
        self.multi
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn order(&self) -> &O {
        &self.order
    }
}

impl<N, O> AvlMap<N, O>
where
    N: Linked,
    O: KeyOrder<N>,
{
    /// Links the detached node `id` into the map.
    ///
    /// Returns false, leaving the node untouched, if the map rejects duplicates
    /// and already holds an equal key. A duplicate accepted by a multimap sorts
    /// after every node with an equal key.
    pub fn insert(&mut self, nodes: &mut [N], id: NodeId) -> bool {
        debug_assert!(
            tree::link(nodes, id).is_detached() && self.root != Some(id),
            "`AvlMap::insert()` - node {id} is still linked!"
        );
        let Some(mut current) = self.root else {
            self.root = Some(id);
            self.num_nodes += 1;
            return true;
        };

        let as_son = loop {
            let ordering =
                self.order.compare_nodes(&nodes[id.to_index()], &nodes[current.to_index()]);
            if ordering == Ordering::Equal && !self.multi {
                return false;
            }
            let next = if ordering == Ordering::Less {
                tree::son(nodes, current)
            } else {
                tree::bro(nodes, current)
            };
            match next {
                Some(next) => current = next,
                None => break ordering == Ordering::Less,
            }
        };

        if as_son {
            tree::attach_son(nodes, current, id);
        } else {
            tree::attach_bro(nodes, current, id);
        }
        self.num_nodes += 1;
        self.rebalance_after_insert(nodes, id);
        true
    }

    /// Unlinks member `id` from the map and resets its link header.
    ///
    /// `id` must be a node of this map; this is only checked in debug builds.
    pub fn delete(&mut self, nodes: &mut [N], id: NodeId) {
        debug_assert!(
            self.is_member(nodes, id),
            "`AvlMap::delete()` - node {id} is not a member of this map!"
        );

        // Push the node down to a leaf, trading places with its inorder neighbour.
        loop {
            let l = tree::link(nodes, id);
            let other = match (l.son(), l.bro()) {
                (None, None) => break,
                (Some(s), None) => tree::rightmost(nodes, s),
                (None, Some(b)) => tree::leftmost(nodes, b),
                (Some(s), Some(b)) => {
                    if l.balance() == Balance::BroDeeper {
                        tree::leftmost(nodes, b)
                    } else {
                        tree::rightmost(nodes, s)
                    }
                }
            };
            tree::swap_no_meta(nodes, id, other);
            if self.root == Some(id) {
                self.root = Some(other);
            }
        }

        match tree::dad(nodes, id) {
            None => self.root = None,
            Some(d) => {
                let from_son = tree::son(nodes, d) == Some(id);
                tree::replace_child(nodes, d, id, None);
                self.rebalance_after_delete(nodes, d, from_son);
            }
        }
        tree::link_mut(nodes, id).reset();
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
    }

    /// Finds a node with `key` and deletes it. Returns the detached node.
    pub fn remove(&mut self, nodes: &mut [N], key: &O::Key) -> Option<NodeId> {
        let id = self.find(nodes, key)?;
        self.delete(nodes, id);
        Some(id)
    }

    /// Detaches every node and empties the map.
    pub fn clear(&mut self, nodes: &mut [N]) {
        let mut next = self.root.map(|root| tree::deepest_son(nodes, root));
        while let Some(current) = next {
            // Step before resetting: the step reads the links of `current`.
            next = tree::postorder_next(nodes, current);
            tree::link_mut(nodes, current).reset();
        }
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns true if `id` is linked into this map.
    pub fn is_member(&self, nodes: &[N], id: NodeId) -> bool {
        self.root == Some(tree::find_root(nodes, id))
    }

    /// Returns the node holding `key`. Among equal keys of a multimap this is the
    /// last one in inorder.
    pub fn find(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.last_not_after(nodes, key).filter(|&id| self.holds(nodes, id, key))
    }

    /// Returns true if the map holds a node with `key`.
    pub fn contains(&self, nodes: &[N], key: &O::Key) -> bool {
        self.find(nodes, key).is_some()
    }

    /// Returns the node holding `key`, else the first node after it.
    pub fn find_or_next(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.find(nodes, key).or_else(|| self.first_after(nodes, key))
    }

    /// Returns the node holding `key`, else the last node before it.
    pub fn find_or_prev(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.find(nodes, key).or_else(|| self.last_before(nodes, key))
    }

    /// Number of nodes whose key equals `key`.
    pub fn count(&self, nodes: &[N], key: &O::Key) -> usize {
        let Some(found) = self.find(nodes, key) else {
            return 0;
        };
        let is_tie = |id: &NodeId| self.holds(nodes, *id, key);
        let prev = tree::inorder_prev(nodes, found);
        let before = Walk::from_node(nodes, prev, Order::Inorder, Direction::Backward)
            .take_while(is_tie)
            .count();
        let next = tree::inorder_next(nodes, found);
        let after = Walk::from_node(nodes, next, Order::Inorder, Direction::Forward)
            .take_while(is_tie)
            .count();
        before + 1 + after
    }

    /// First node in inorder.
    pub fn first(&self, nodes: &[N]) -> Option<NodeId> {
        self.root.map(|root| tree::leftmost(nodes, root))
    }

    /// Last node in inorder.
    pub fn last(&self, nodes: &[N]) -> Option<NodeId> {
        self.root.map(|root| tree::rightmost(nodes, root))
    }

    /// Height of the tree in nodes.
    pub fn height(&self, nodes: &[N]) -> usize {
        tree::avl_depth(nodes, self.root)
    }

    /// Gets an iterator over the nodes in key order.
    pub fn iter<'a>(&'a self, nodes: &'a [N]) -> Iter<'a, N, O> {
        Iter::new(nodes, &self.order, self.first(nodes), self.last(nodes))
    }

    /// Walks the whole map in any of the traversal orders.
    pub fn walk<'a>(&self, nodes: &'a [N], order: Order, direction: Direction) -> Walk<'a, N> {
        Walk::subtree(nodes, self.root, order, direction)
    }

    /// Resumes a walk at `start`, a node previously yielded by a walk of this map.
    pub fn walk_from<'a>(
        &self,
        nodes: &'a [N],
        start: NodeId,
        order: Order,
        direction: Direction,
    ) -> Walk<'a, N> {
        debug_assert!(self.is_member(nodes, start));
        Walk::from_node(nodes, Some(start), order, direction)
    }

    /// Scans forward from the first node holding `key` while keys stay equal.
    ///
    /// Yields every tie once, in inorder, and nothing if `key` is absent. Use
    /// [`range`](Self::range) to keep going past the ties.
    pub fn lower_bound<'a>(&'a self, nodes: &'a [N], key: &O::Key) -> Iter<'a, N, O> {
        let first = self.first_not_before(nodes, key).filter(|&id| self.holds(nodes, id, key));
        Iter::new(nodes, &self.order, first, self.find(nodes, key))
    }

    /// Scans backward from the last node holding `key` (the one [`find`](Self::find)
    /// returns) while keys stay equal.
    pub fn upper_bound<'a>(&'a self, nodes: &'a [N], key: &O::Key) -> Rev<Iter<'a, N, O>> {
        self.lower_bound(nodes, key).rev()
    }

    /// Iterates over exactly the nodes whose key equals `key`, in inorder.
    pub fn equal_range<'a>(&'a self, nodes: &'a [N], key: &O::Key) -> Iter<'a, N, O> {
        self.range(nodes, (Bound::Included(key), Bound::Included(key)))
    }

    /// Iterates in key order over the nodes whose keys fall into `range`.
    /// An empty or inverted range yields nothing.
    pub fn range<'a, R>(&'a self, nodes: &'a [N], range: R) -> Iter<'a, N, O>
    where
        R: RangeBounds<O::Key>,
    {
        let front = match range.start_bound() {
            Bound::Included(key) => self.first_not_before(nodes, key),
            Bound::Excluded(key) => self.first_after(nodes, key),
            Bound::Unbounded => self.first(nodes),
        };
        let back = match range.end_bound() {
            Bound::Included(key) => self.last_not_after(nodes, key),
            Bound::Excluded(key) => self.last_before(nodes, key),
            Bound::Unbounded => self.last(nodes),
        };
        let empty = match (front, back) {
            (Some(f), Some(b)) => {
                let (first, last) = (self.key_of(nodes, f), self.key_of(nodes, b));
                self.order.compare(first, last) == Ordering::Greater
            }
            _ => true,
        };
        if empty {
            return Iter::new(nodes, &self.order, None, None);
        }
        Iter::new(nodes, &self.order, front, back)
    }

    /// Merges this map with `other`, keeping every node of both.
    pub fn union<'a>(
        &'a self,
        nodes: &'a [N],
        other: &'a Self,
        other_nodes: &'a [N],
    ) -> Union<'a, N, O> {
        Union::new(self.iter(nodes), other.iter(other_nodes))
    }

    /// Nodes of this map matched one-for-one by an equal key in `other`.
    pub fn intersection<'a>(
        &'a self,
        nodes: &'a [N],
        other: &'a Self,
        other_nodes: &'a [N],
    ) -> Intersection<'a, N, O> {
        Intersection::new(self.iter(nodes), other.iter(other_nodes))
    }

    /// Nodes of this map left over after cancelling equal keys of `other` one-for-one.
    pub fn subtraction<'a>(
        &'a self,
        nodes: &'a [N],
        other: &'a Self,
        other_nodes: &'a [N],
    ) -> Subtraction<'a, N, O> {
        Subtraction::new(self.iter(nodes), other.iter(other_nodes))
    }

    /// Nodes of either map left over after cancelling equal keys one-for-one.
    pub fn symmetric_difference<'a>(
        &'a self,
        nodes: &'a [N],
        other: &'a Self,
        other_nodes: &'a [N],
    ) -> SymmetricDifference<'a, N, O> {
        SymmetricDifference::new(self.iter(nodes), other.iter(other_nodes))
    }

    /// Checks links, balance, key order and node count.
    pub fn check(&self, nodes: &[N]) -> Result<(), InvariantError> {
        if let Some(root) = self.root {
            if tree::dad(nodes, root).is_some() {
                return Err(InvariantError::RootHasDad(root));
            }
        }
        tree::check_avl(nodes, self.root)?;

        let mut counted = 0;
        let mut prev: Option<(NodeId, &N)> = None;
        for (id, node) in self.iter(nodes) {
            if let Some((prev_id, prev_node)) = prev {
                match self.order.compare_nodes(prev_node, node) {
                    Ordering::Greater => {
                        return Err(InvariantError::OutOfOrder { prev: prev_id, node: id })
                    }
                    Ordering::Equal if !self.multi => {
                        return Err(InvariantError::DuplicateKey { prev: prev_id, node: id })
                    }
                    _ => {}
                }
            }
            prev = Some((id, node));
            counted += 1;
        }
        if counted != self.num_nodes {
            return Err(InvariantError::LenMismatch {
                recorded: self.num_nodes,
                counted,
            });
        }
        Ok(())
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self, nodes: &[N]) {
        if let Err(err) = self.check(nodes) {
            panic!("inconsistent map: {err}");
        }
    }

    fn key_of<'n>(&self, nodes: &'n [N], id: NodeId) -> &'n O::Key {
        self.order.key(&nodes[id.to_index()])
    }

    fn holds(&self, nodes: &[N], id: NodeId, key: &O::Key) -> bool {
        self.order.compare(self.key_of(nodes, id), key) == Ordering::Equal
    }

    // The four descents below only rely on the inorder sequence being sorted,
    // so they stay exact when rotations have moved equal keys to either side.

    fn first_not_before(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.descend(nodes, key, |ordering| ordering != Ordering::Less, true)
    }

    fn first_after(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.descend(nodes, key, |ordering| ordering == Ordering::Greater, true)
    }

    fn last_not_after(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.descend(nodes, key, |ordering| ordering != Ordering::Greater, false)
    }

    fn last_before(&self, nodes: &[N], key: &O::Key) -> Option<NodeId> {
        self.descend(nodes, key, |ordering| ordering == Ordering::Less, false)
    }

    // Records every node whose comparison against `key` is accepted and moves
    // towards the son side (`leftward`) or bro side from it; the last recorded
    // node is the answer.
    fn descend<F>(&self, nodes: &[N], key: &O::Key, accept: F, leftward: bool) -> Option<NodeId>
    where
        F: Fn(Ordering) -> bool,
    {
        let mut found = None;
        let mut current = self.root;
        while let Some(id) = current {
            let accepted = accept(self.order.compare(self.key_of(nodes, id), key));
            if accepted {
                found = Some(id);
            }
            current = if accepted == leftward {
                tree::son(nodes, id)
            } else {
                tree::bro(nodes, id)
            };
        }
        found
    }

    fn relink(&mut self, nodes: &mut [N], old: NodeId, new: NodeId) {
        match tree::dad(nodes, new) {
            None => self.root = Some(new),
            Some(up) => tree::replace_child(nodes, up, old, Some(new)),
        }
    }

    // Growth stops at the first ancestor that absorbs it; one rotation always
    // restores the height the subtree had before the insert.
    fn rebalance_after_insert(&mut self, nodes: &mut [N], mut child: NodeId) {
        while let Some(d) = tree::dad(nodes, child) {
            let grew_son = tree::son(nodes, d) == Some(child);
            match (tree::balance(nodes, d), grew_son) {
                (Balance::Equal, true) => tree::set_balance(nodes, d, Balance::SonDeeper),
                (Balance::Equal, false) => tree::set_balance(nodes, d, Balance::BroDeeper),
                (Balance::SonDeeper, false) | (Balance::BroDeeper, true) => {
                    tree::set_balance(nodes, d, Balance::Equal);
                    return;
                }
                (Balance::SonDeeper, true) => {
                    let top = if tree::balance(nodes, child) == Balance::SonDeeper {
                        tree::rot_right(nodes, d)
                    } else {
                        tree::rot_left_right(nodes, d)
                    };
                    self.relink(nodes, d, top);
                    return;
                }
                (Balance::BroDeeper, false) => {
                    let top = if tree::balance(nodes, child) == Balance::BroDeeper {
                        tree::rot_left(nodes, d)
                    } else {
                        tree::rot_right_left(nodes, d)
                    };
                    self.relink(nodes, d, top);
                    return;
                }
            }
            child = d;
        }
    }

    // Shrinking keeps climbing through rotations that shrink the subtree too;
    // it stops at the first subtree whose height did not change.
    fn rebalance_after_delete(&mut self, nodes: &mut [N], mut d: NodeId, mut from_son: bool) {
        loop {
            let top = match (tree::balance(nodes, d), from_son) {
                (Balance::Equal, true) => {
                    tree::set_balance(nodes, d, Balance::BroDeeper);
                    return;
                }
                (Balance::Equal, false) => {
                    tree::set_balance(nodes, d, Balance::SonDeeper);
                    return;
                }
                (Balance::SonDeeper, true) | (Balance::BroDeeper, false) => {
                    tree::set_balance(nodes, d, Balance::Equal);
                    d
                }
                (Balance::BroDeeper, true) => {
                    let inner = tree::bro(nodes, d).map(|b| tree::balance(nodes, b));
                    let inner_deeper = inner == Some(Balance::SonDeeper);
                    let top = if inner_deeper {
                        tree::rot_right_left(nodes, d)
                    } else {
                        tree::rot_left(nodes, d)
                    };
                    self.relink(nodes, d, top);
                    if tree::balance(nodes, top) != Balance::Equal {
                        return;
                    }
                    top
                }
                (Balance::SonDeeper, false) => {
                    let inner = tree::son(nodes, d).map(|s| tree::balance(nodes, s));
                    let inner_deeper = inner == Some(Balance::BroDeeper);
                    let top = if inner_deeper {
                        tree::rot_left_right(nodes, d)
                    } else {
                        tree::rot_right(nodes, d)
                    };
                    self.relink(nodes, d, top);
                    if tree::balance(nodes, top) != Balance::Equal {
                        return;
                    }
                    top
                }
            };
            let Some(up) = tree::dad(nodes, top) else {
                return;
            };
            from_son = tree::son(nodes, up) == Some(top);
            d = up;
        }
    }
}

impl<N> Default for AvlMap<N, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, O: fmt::Debug> fmt::Debug for AvlMap<N, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlMap")
            .field("root", &self.root)
            .field("len", &self.num_nodes)
            .field("multimap", &self.multi)
            .field("order", &self.order)
            .finish()
    }
}

impl<'a, N, O> Iter<'a, N, O> {
    fn new(nodes: &'a [N], order: &'a O, front: Option<NodeId>, back: Option<NodeId>) -> Self {
        let (front, back) = match (front, back) {
            (Some(_), Some(_)) => (front, back),
            _ => (None, None),
        };
        Self {
            nodes,
            order,
            front,
            back,
        }
    }

    /// The ordering of the map being iterated.
    pub fn order(&self) -> &'a O {
        self.order
    }
}

impl<'a, N: Linked, O> Iter<'a, N, O> {
    /// The node the next call to `next` yields, without advancing.
    pub fn peek(&self) -> Option<(NodeId, &'a N)> {
        self.front.map(|id| (id, &self.nodes[id.to_index()]))
    }
}

// Auto derived clone seems to have an invalid type bound of N: Clone
impl<'a, N, O> Clone for Iter<'a, N, O> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            order: self.order,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, N, O> fmt::Debug for Iter<'a, N, O>
where
    N: Linked,
    O: KeyOrder<N>,
    O::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.clone().map(|(_, node)| self.order.key(node)))
            .finish()
    }
}

impl<'a, N: Linked, O> Iterator for Iter<'a, N, O> {
    type Item = (NodeId, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = tree::inorder_next(self.nodes, current);
        }
        Some((current, &self.nodes[current.to_index()]))
    }
}

impl<'a, N: Linked, O> DoubleEndedIterator for Iter<'a, N, O> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = tree::inorder_prev(self.nodes, current);
        }
        Some((current, &self.nodes[current.to_index()]))
    }
}

impl<'a, N: Linked, O> FusedIterator for Iter<'a, N, O> {}

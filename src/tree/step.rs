//! Traversal stepping: one call moves one node along an order, without any
//! cursor state besides the node handle itself.

use std::iter::FusedIterator;

use super::{bro, dad, deepest_bro, deepest_son, find_root, height, leftmost, link, rightmost, son};
use crate::link::{Linked, NodeId};

/// Traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    Inorder,
    Preorder,
    Postorder,
    Levelorder,
}

/// Traversal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

pub fn inorder_next<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    if let Some(b) = bro(nodes, id) {
        return Some(leftmost(nodes, b));
    }
    let mut current = id;
    while let Some(d) = dad(nodes, current) {
        if son(nodes, d) == Some(current) {
            return Some(d);
        }
        current = d;
    }
    None
}

pub fn inorder_prev<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    if let Some(s) = son(nodes, id) {
        return Some(rightmost(nodes, s));
    }
    let mut current = id;
    while let Some(d) = dad(nodes, current) {
        if bro(nodes, d) == Some(current) {
            return Some(d);
        }
        current = d;
    }
    None
}

pub fn preorder_next<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    let l = link(nodes, id);
    if let Some(child) = l.son().or(l.bro()) {
        return Some(child);
    }
    let mut current = id;
    while let Some(d) = dad(nodes, current) {
        if son(nodes, d) == Some(current) {
            if let Some(b) = bro(nodes, d) {
                return Some(b);
            }
        }
        current = d;
    }
    None
}

pub fn preorder_prev<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    let d = dad(nodes, id)?;
    match son(nodes, d) {
        Some(s) if s != id => Some(deepest_bro(nodes, s)),
        _ => Some(d),
    }
}

pub fn postorder_next<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    let d = dad(nodes, id)?;
    match bro(nodes, d) {
        Some(b) if b != id => Some(deepest_son(nodes, b)),
        _ => Some(d),
    }
}

pub fn postorder_prev<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    let l = link(nodes, id);
    if let Some(child) = l.bro().or(l.son()) {
        return Some(child);
    }
    let mut current = id;
    while let Some(d) = dad(nodes, current) {
        if bro(nodes, d) == Some(current) {
            if let Some(s) = son(nodes, d) {
                return Some(s);
            }
        }
        current = d;
    }
    None
}

/// Next node in level order over the whole tree holding `id`.
pub fn levelorder_next<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    levelorder_next_within(nodes, find_root(nodes, id), id)
}

/// Previous node in level order over the whole tree holding `id`.
pub fn levelorder_prev<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    levelorder_prev_within(nodes, find_root(nodes, id), id)
}

/// Next node in level order over the subtree rooted at `top`, which must contain `id`.
///
/// Looks for the next node on the same level first, then for the first node of
/// the level below.
pub fn levelorder_next_within<N: Linked>(nodes: &[N], top: NodeId, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    let mut up = 0;
    while current != top {
        let d = dad(nodes, current)?;
        up += 1;
        if son(nodes, d) == Some(current) {
            let found = bro(nodes, d).and_then(|b| descend(nodes, b, up - 1, Direction::Forward));
            if found.is_some() {
                return found;
            }
        }
        current = d;
    }
    descend(nodes, top, up + 1, Direction::Forward)
}

/// Previous node in level order over the subtree rooted at `top`, which must contain `id`.
pub fn levelorder_prev_within<N: Linked>(nodes: &[N], top: NodeId, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    let mut up = 0;
    while current != top {
        let d = dad(nodes, current)?;
        up += 1;
        if bro(nodes, d) == Some(current) {
            let found = son(nodes, d).and_then(|s| descend(nodes, s, up - 1, Direction::Backward));
            if found.is_some() {
                return found;
            }
        }
        current = d;
    }
    if up == 0 {
        return None;
    }
    descend(nodes, top, up - 1, Direction::Backward)
}

// First node exactly `levels` below `from`, scanning the level left to right
// (forward) or right to left (backward).
fn descend<N: Linked>(
    nodes: &[N],
    from: NodeId,
    levels: usize,
    direction: Direction,
) -> Option<NodeId> {
    if levels == 0 {
        return Some(from);
    }
    let l = link(nodes, from);
    let (near, far) = match direction {
        Direction::Forward => (l.son(), l.bro()),
        Direction::Backward => (l.bro(), l.son()),
    };
    near.and_then(|c| descend(nodes, c, levels - 1, direction))
        .or_else(|| far.and_then(|c| descend(nodes, c, levels - 1, direction)))
}

/// Steps once along `order` in `direction` over the whole tree holding `id`.
pub fn step<N: Linked>(
    nodes: &[N],
    order: Order,
    direction: Direction,
    id: NodeId,
) -> Option<NodeId> {
    match (order, direction) {
        (Order::Inorder, Direction::Forward) => inorder_next(nodes, id),
        (Order::Inorder, Direction::Backward) => inorder_prev(nodes, id),
        (Order::Preorder, Direction::Forward) => preorder_next(nodes, id),
        (Order::Preorder, Direction::Backward) => preorder_prev(nodes, id),
        (Order::Postorder, Direction::Forward) => postorder_next(nodes, id),
        (Order::Postorder, Direction::Backward) => postorder_prev(nodes, id),
        (Order::Levelorder, Direction::Forward) => levelorder_next(nodes, id),
        (Order::Levelorder, Direction::Backward) => levelorder_prev(nodes, id),
    }
}

/// First node of the subtree rooted at `top` along `order` in `direction`.
pub fn first_in<N: Linked>(nodes: &[N], top: NodeId, order: Order, direction: Direction) -> NodeId {
    match direction {
        Direction::Forward => front(nodes, top, order),
        Direction::Backward => back(nodes, top, order),
    }
}

/// Final node of the subtree rooted at `top` along `order` in `direction`.
pub fn last_in<N: Linked>(nodes: &[N], top: NodeId, order: Order, direction: Direction) -> NodeId {
    match direction {
        Direction::Forward => back(nodes, top, order),
        Direction::Backward => front(nodes, top, order),
    }
}

fn front<N: Linked>(nodes: &[N], top: NodeId, order: Order) -> NodeId {
    match order {
        Order::Inorder => leftmost(nodes, top),
        Order::Preorder | Order::Levelorder => top,
        Order::Postorder => deepest_son(nodes, top),
    }
}

fn back<N: Linked>(nodes: &[N], top: NodeId, order: Order) -> NodeId {
    match order {
        Order::Inorder => rightmost(nodes, top),
        Order::Preorder => deepest_bro(nodes, top),
        Order::Postorder => top,
        Order::Levelorder => {
            let levels = height(nodes, Some(top)).saturating_sub(1);
            descend(nodes, top, levels, Direction::Backward).unwrap_or(top)
        }
    }
}

/// A lazy walk along one order and direction, yielding node handles.
///
/// A walk started with [`Walk::from_node`] covers the rest of the whole tree,
/// climbing past any subtree it starts in. A walk built with [`Walk::subtree`]
/// stops at the final node of that subtree.
pub struct Walk<'a, N> {
    nodes: &'a [N],
    next: Option<NodeId>,
    last: Option<NodeId>,
    top: Option<NodeId>,
    order: Order,
    direction: Direction,
}

impl<'a, N: Linked> Walk<'a, N> {
    /// Walks the whole tree holding `start`, beginning at `start` itself.
    pub fn from_node(
        nodes: &'a [N],
        start: Option<NodeId>,
        order: Order,
        direction: Direction,
    ) -> Self {
        Self {
            nodes,
            next: start,
            last: None,
            top: start.map(|s| find_root(nodes, s)),
            order,
            direction,
        }
    }

    /// Walks exactly the subtree rooted at `top`.
    pub fn subtree(
        nodes: &'a [N],
        top: Option<NodeId>,
        order: Order,
        direction: Direction,
    ) -> Self {
        Self {
            nodes,
            next: top.map(|t| first_in(nodes, t, order, direction)),
            last: top.map(|t| last_in(nodes, t, order, direction)),
            top,
            order,
            direction,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The node the next call to `next` yields, if any. Saving it lets a later
    /// walk resume from the same place.
    pub fn peek(&self) -> Option<NodeId> {
        self.next
    }

    fn advance(&self, current: NodeId) -> Option<NodeId> {
        if self.last == Some(current) {
            return None;
        }
        match (self.order, self.top) {
            (Order::Levelorder, Some(top)) => match self.direction {
                Direction::Forward => levelorder_next_within(self.nodes, top, current),
                Direction::Backward => levelorder_prev_within(self.nodes, top, current),
            },
            _ => step(self.nodes, self.order, self.direction, current),
        }
    }
}

// Auto derived clone seems to have an invalid type bound of N: Clone
impl<'a, N> Clone for Walk<'a, N> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
            last: self.last,
            top: self.top,
            order: self.order,
            direction: self.direction,
        }
    }
}

impl<'a, N: Linked> Iterator for Walk<'a, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.advance(current);
        Some(current)
    }
}

impl<'a, N: Linked> FusedIterator for Walk<'a, N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{id, sample};
    use pretty_assertions::assert_eq;

    const ORDERS: [(Order, [usize; 8]); 4] = [
        (Order::Inorder, [3, 1, 6, 4, 0, 2, 7, 5]),
        (Order::Preorder, [0, 1, 3, 4, 6, 2, 5, 7]),
        (Order::Postorder, [3, 6, 4, 1, 7, 5, 2, 0]),
        (Order::Levelorder, [0, 1, 2, 3, 4, 5, 6, 7]),
    ];

    fn indices(walk: Walk<'_, impl Linked>) -> Vec<usize> {
        walk.map(NodeId::to_index).collect()
    }

    #[test]
    fn whole_tree_walks() {
        let nodes = sample();
        for (order, expected) in ORDERS {
            let forward = Walk::subtree(&nodes, Some(id(0)), order, Direction::Forward);
            assert_eq!(indices(forward), expected.to_vec(), "{order:?} forward");

            let mut reversed = expected.to_vec();
            reversed.reverse();
            let backward = Walk::subtree(&nodes, Some(id(0)), order, Direction::Backward);
            assert_eq!(indices(backward), reversed, "{order:?} backward");
        }
    }

    #[test]
    fn stepping_runs_off_both_ends() {
        let nodes = sample();
        for (order, expected) in ORDERS {
            let first = id(expected[0]);
            let last = id(expected[7]);
            assert_eq!(step(&nodes, order, Direction::Forward, last), None, "{order:?}");
            assert_eq!(step(&nodes, order, Direction::Backward, first), None, "{order:?}");
            for pair in expected.windows(2) {
                assert_eq!(step(&nodes, order, Direction::Forward, id(pair[0])), Some(id(pair[1])));
                let back = step(&nodes, order, Direction::Backward, id(pair[1]));
                assert_eq!(back, Some(id(pair[0])));
            }
        }
    }

    #[test]
    fn subtree_walks_stop_at_final_node() {
        let nodes = sample();
        let top = Some(id(1));
        let expected = [
            (Order::Inorder, vec![3, 1, 6, 4]),
            (Order::Preorder, vec![1, 3, 4, 6]),
            (Order::Postorder, vec![3, 6, 4, 1]),
            (Order::Levelorder, vec![1, 3, 4, 6]),
        ];
        for (order, forward) in expected {
            assert_eq!(indices(Walk::subtree(&nodes, top, order, Direction::Forward)), forward);
            let mut backward = forward.clone();
            backward.reverse();
            assert_eq!(indices(Walk::subtree(&nodes, top, order, Direction::Backward)), backward);
        }
        assert_eq!(last_in(&nodes, id(2), Order::Levelorder, Direction::Forward), id(7));
    }

    #[test]
    fn whole_tree_walk_restarts_from_any_node() {
        let nodes = sample();
        let walk = Walk::from_node(&nodes, Some(id(4)), Order::Preorder, Direction::Forward);
        assert_eq!(indices(walk), vec![4, 6, 2, 5, 7]);

        let walk = Walk::from_node(&nodes, Some(id(6)), Order::Inorder, Direction::Backward);
        assert_eq!(indices(walk), vec![6, 1, 3]);

        let mut walk = Walk::from_node(&nodes, Some(id(4)), Order::Levelorder, Direction::Forward);
        assert_eq!(walk.next(), Some(id(4)));
        let saved = walk.peek();
        assert_eq!(saved, Some(id(5)));
        let resumed = Walk::from_node(&nodes, saved, Order::Levelorder, Direction::Forward);
        assert_eq!(indices(resumed), vec![5, 6, 7]);

        assert_eq!(Walk::from_node(&nodes, None, Order::Postorder, Direction::Forward).count(), 0);
        assert_eq!(Walk::subtree(&nodes, None, Order::Postorder, Direction::Backward).count(), 0);
    }
}

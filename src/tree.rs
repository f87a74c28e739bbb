//! Binary-tree node algebra.
//!
//! Every function works on a caller-owned node slice and [`NodeId`] handles into
//! it. Nothing here knows about keys: ordering lives in [`crate::map`], which
//! builds the AVL map on top of these primitives. Other tree-shaped containers
//! can reuse the same stepping and rotation calls on their own nodes.

mod avl;
mod step;

pub use avl::{
    avl_depth, avl_factor, avl_is_balanced, avl_is_correct, check_avl, rot_left, rot_left_right,
    rot_right, rot_right_left,
};
pub use step::{
    first_in, inorder_next, inorder_prev, last_in, levelorder_next, levelorder_next_within,
    levelorder_prev, levelorder_prev_within, postorder_next, postorder_prev, preorder_next,
    preorder_prev, step, Direction, Order, Walk,
};

use crate::link::{Balance, Linked, NodeId, NodeLink};

#[inline]
pub(crate) fn link<N: Linked>(nodes: &[N], id: NodeId) -> &NodeLink {
    nodes[id.to_index()].link()
}

#[inline]
pub(crate) fn link_mut<N: Linked>(nodes: &mut [N], id: NodeId) -> &mut NodeLink {
    nodes[id.to_index()].link_mut()
}

#[inline]
pub(crate) fn dad<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    link(nodes, id).dad()
}

#[inline]
pub(crate) fn son<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    link(nodes, id).son()
}

#[inline]
pub(crate) fn bro<N: Linked>(nodes: &[N], id: NodeId) -> Option<NodeId> {
    link(nodes, id).bro()
}

#[inline]
pub(crate) fn balance<N: Linked>(nodes: &[N], id: NodeId) -> Balance {
    link(nodes, id).balance()
}

#[inline]
pub(crate) fn set_balance<N: Linked>(nodes: &mut [N], id: NodeId, balance: Balance) {
    link_mut(nodes, id).set_balance(balance);
}

/// Links the detached node `child` as the son of `dad`.
pub fn attach_son<N: Linked>(nodes: &mut [N], dad: NodeId, child: NodeId) {
    debug_assert!(son(nodes, dad).is_none());
    debug_assert!(self::dad(nodes, child).is_none());
    link_mut(nodes, dad).set_son(Some(child));
    link_mut(nodes, child).set_dad(Some(dad));
}

/// Links the detached node `child` as the bro of `dad`.
pub fn attach_bro<N: Linked>(nodes: &mut [N], dad: NodeId, child: NodeId) {
    debug_assert!(bro(nodes, dad).is_none());
    debug_assert!(self::dad(nodes, child).is_none());
    link_mut(nodes, dad).set_bro(Some(child));
    link_mut(nodes, child).set_dad(Some(dad));
}

/// Re-points whichever child slot of `dad` holds `old` to `new`.
/// Does not touch the dad link of either child.
pub fn replace_child<N: Linked>(nodes: &mut [N], dad: NodeId, old: NodeId, new: Option<NodeId>) {
    let dad_link = link_mut(nodes, dad);
    if dad_link.son() == Some(old) {
        dad_link.set_son(new);
    } else {
        debug_assert_eq!(dad_link.bro(), Some(old));
        dad_link.set_bro(new);
    }
}

/// Returns true if `id` hangs in the son slot of its dad.
pub fn is_son<N: Linked>(nodes: &[N], id: NodeId) -> bool {
    match dad(nodes, id) {
        Some(d) => son(nodes, d) == Some(id),
        None => false,
    }
}

/// Returns true if `id` hangs in the bro slot of its dad.
pub fn is_bro<N: Linked>(nodes: &[N], id: NodeId) -> bool {
    match dad(nodes, id) {
        Some(d) => bro(nodes, d) == Some(id),
        None => false,
    }
}

/// First node of the subtree in inorder.
pub fn leftmost<N: Linked>(nodes: &[N], mut id: NodeId) -> NodeId {
    while let Some(s) = son(nodes, id) {
        id = s;
    }
    id
}

/// Last node of the subtree in inorder.
pub fn rightmost<N: Linked>(nodes: &[N], mut id: NodeId) -> NodeId {
    while let Some(b) = bro(nodes, id) {
        id = b;
    }
    id
}

/// Leaf reached by preferring sons over bros: the first node of the subtree in postorder.
pub fn deepest_son<N: Linked>(nodes: &[N], mut id: NodeId) -> NodeId {
    loop {
        let l = link(nodes, id);
        match l.son().or(l.bro()) {
            Some(next) => id = next,
            None => return id,
        }
    }
}

/// Leaf reached by preferring bros over sons: the last node of the subtree in preorder.
pub fn deepest_bro<N: Linked>(nodes: &[N], mut id: NodeId) -> NodeId {
    loop {
        let l = link(nodes, id);
        match l.bro().or(l.son()) {
            Some(next) => id = next,
            None => return id,
        }
    }
}

/// Follows dad links up to the node that has none.
pub fn find_root<N: Linked>(nodes: &[N], mut id: NodeId) -> NodeId {
    while let Some(d) = dad(nodes, id) {
        id = d;
    }
    id
}

/// Number of dad links between `id` and its root.
pub fn depth_of<N: Linked>(nodes: &[N], mut id: NodeId) -> usize {
    let mut depth = 0;
    while let Some(d) = dad(nodes, id) {
        depth += 1;
        id = d;
    }
    depth
}

/// Height of the subtree counted in nodes, by full recursion. An empty subtree has height 0.
pub fn height<N: Linked>(nodes: &[N], id: Option<NodeId>) -> usize {
    match id {
        None => 0,
        Some(id) => 1 + height(nodes, son(nodes, id)).max(height(nodes, bro(nodes, id))),
    }
}

/// Exchanges the tree positions of `a` and `b`. Each node keeps its own balance status.
///
/// Works for any pair, including a dad with its own child and two children
/// of the same dad. If either node was a root, the other one is the root now.
pub fn swap<N: Linked>(nodes: &mut [N], a: NodeId, b: NodeId) {
    exchange_links(nodes, a, b);
}

/// Exchanges the tree positions of `a` and `b`, leaving the balance status with
/// the position: whichever node lands in a slot takes over the status that slot had.
pub fn swap_no_meta<N: Linked>(nodes: &mut [N], a: NodeId, b: NodeId) {
    exchange_links(nodes, a, b);
    let balance_a = balance(nodes, a);
    let balance_b = balance(nodes, b);
    set_balance(nodes, a, balance_b);
    set_balance(nodes, b, balance_a);
}

// Relabels `a` and `b` everywhere in the graph at once, so adjacent pairs need no special case.
fn exchange_links<N: Linked>(nodes: &mut [N], a: NodeId, b: NodeId) {
    if a == b {
        return;
    }
    let relabel = |x: Option<NodeId>| match x {
        Some(x) if x == a => Some(b),
        Some(x) if x == b => Some(a),
        other => other,
    };

    let old_a = link(nodes, a).clone();
    let old_b = link(nodes, b).clone();

    // Relabelling swaps `a` and `b`, so a neighbour seen twice must be skipped.
    let around = [old_a.dad(), old_a.son(), old_a.bro(), old_b.dad(), old_b.son(), old_b.bro()];
    for (i, &n) in around.iter().enumerate() {
        let Some(n) = n.filter(|&n| n != a && n != b) else {
            continue;
        };
        if around[..i].contains(&Some(n)) {
            continue;
        }
        let l = link_mut(nodes, n);
        let (d, s, r) = (relabel(l.dad()), relabel(l.son()), relabel(l.bro()));
        l.set_dad(d);
        l.set_son(s);
        l.set_bro(r);
    }

    let la = link_mut(nodes, a);
    la.set_dad(relabel(old_b.dad()));
    la.set_son(relabel(old_b.son()));
    la.set_bro(relabel(old_b.bro()));

    let lb = link_mut(nodes, b);
    lb.set_dad(relabel(old_a.dad()));
    lb.set_son(relabel(old_a.son()));
    lb.set_bro(relabel(old_a.bro()));
}

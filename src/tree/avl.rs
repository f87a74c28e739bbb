//! AVL balance queries and the four rotation primitives.
//!
//! A node's status says which of its subtrees is deeper. While the map
//! rebalances, a node whose factor has reached +-2 still carries the status
//! naming the too-deep side; the rotations read it that way.

use super::{balance, bro, dad, link, link_mut, set_balance, son};
use crate::error::InvariantError;
use crate::link::{Balance, Linked, NodeId};

/// Height of the subtree in nodes, found by following the deeper branch.
/// Only meaningful while the statuses are correct.
pub fn avl_depth<N: Linked>(nodes: &[N], mut id: Option<NodeId>) -> usize {
    let mut depth = 0;
    while let Some(current) = id {
        depth += 1;
        let l = link(nodes, current);
        id = match l.balance() {
            Balance::BroDeeper => l.bro(),
            Balance::SonDeeper | Balance::Equal => l.son(),
        };
    }
    depth
}

/// `depth(bro) - depth(son)`, computed by full recursion.
pub fn avl_factor<N: Linked>(nodes: &[N], id: NodeId) -> isize {
    let l = link(nodes, id);
    super::height(nodes, l.bro()) as isize - super::height(nodes, l.son()) as isize
}

/// Returns true if no node of the subtree has a factor outside `-1..=1`.
/// Stored statuses are not looked at.
pub fn avl_is_balanced<N: Linked>(nodes: &[N], id: Option<NodeId>) -> bool {
    fn balanced_height<N: Linked>(nodes: &[N], id: Option<NodeId>) -> Option<usize> {
        let Some(id) = id else {
            return Some(0);
        };
        let son_height = balanced_height(nodes, son(nodes, id))?;
        let bro_height = balanced_height(nodes, bro(nodes, id))?;
        if son_height.abs_diff(bro_height) > 1 {
            return None;
        }
        Some(1 + son_height.max(bro_height))
    }
    balanced_height(nodes, id).is_some()
}

/// Returns true if the subtree is balanced, every status is exact and every
/// child points back to its dad.
pub fn avl_is_correct<N: Linked>(nodes: &[N], id: Option<NodeId>) -> bool {
    check_avl(nodes, id).is_ok()
}

/// Validates the subtree like [`avl_is_correct`] and returns its height, or the
/// first violation found.
pub fn check_avl<N: Linked>(nodes: &[N], id: Option<NodeId>) -> Result<usize, InvariantError> {
    let Some(id) = id else {
        return Ok(0);
    };
    let l = link(nodes, id);
    for child in [l.son(), l.bro()].into_iter().flatten() {
        if dad(nodes, child) != Some(id) {
            return Err(InvariantError::BrokenDadLink { dad: id, child });
        }
    }
    let son_height = check_avl(nodes, l.son())?;
    let bro_height = check_avl(nodes, l.bro())?;
    let factor = bro_height as isize - son_height as isize;
    if !(-1..=1).contains(&factor) {
        return Err(InvariantError::Unbalanced { node: id, factor });
    }
    if Balance::from_factor(factor) != l.balance() {
        return Err(InvariantError::StatusMismatch {
            node: id,
            stored: l.balance(),
            factor,
        });
    }
    Ok(1 + son_height.max(bro_height))
}

fn set_dad<N: Linked>(nodes: &mut [N], id: Option<NodeId>, dad: NodeId) {
    if let Some(id) = id {
        link_mut(nodes, id).set_dad(Some(dad));
    }
}

/// Lifts the bro of `id` into its place. `id` must be too deep on the bro side
/// by two and its bro must not be deeper on the son side.
///
/// Returns the new local root, whose dad link now names the old dad of `id`.
/// The old dad's child slot still names `id`; the caller re-points it. The new
/// root is `Equal` if the subtree got shorter, otherwise the height is unchanged.
pub fn rot_left<N: Linked>(nodes: &mut [N], id: NodeId) -> NodeId {
    debug_assert_eq!(balance(nodes, id), Balance::BroDeeper);
    debug_assert!(bro(nodes, id).is_some(), "`rot_left()` - node {id} has no bro!");
    let Some(top) = bro(nodes, id) else {
        return id;
    };
    debug_assert_ne!(balance(nodes, top), Balance::SonDeeper);

    let up = dad(nodes, id);
    let inner = son(nodes, top);

    link_mut(nodes, id).set_bro(inner);
    set_dad(nodes, inner, id);
    link_mut(nodes, top).set_son(Some(id));
    link_mut(nodes, id).set_dad(Some(top));
    link_mut(nodes, top).set_dad(up);

    if balance(nodes, top) == Balance::BroDeeper {
        set_balance(nodes, id, Balance::Equal);
        set_balance(nodes, top, Balance::Equal);
    } else {
        set_balance(nodes, id, Balance::BroDeeper);
        set_balance(nodes, top, Balance::SonDeeper);
    }
    top
}

/// Mirror image of [`rot_left`]: lifts the son of `id`.
pub fn rot_right<N: Linked>(nodes: &mut [N], id: NodeId) -> NodeId {
    debug_assert_eq!(balance(nodes, id), Balance::SonDeeper);
    debug_assert!(son(nodes, id).is_some(), "`rot_right()` - node {id} has no son!");
    let Some(top) = son(nodes, id) else {
        return id;
    };
    debug_assert_ne!(balance(nodes, top), Balance::BroDeeper);

    let up = dad(nodes, id);
    let inner = bro(nodes, top);

    link_mut(nodes, id).set_son(inner);
    set_dad(nodes, inner, id);
    link_mut(nodes, top).set_bro(Some(id));
    link_mut(nodes, id).set_dad(Some(top));
    link_mut(nodes, top).set_dad(up);

    if balance(nodes, top) == Balance::SonDeeper {
        set_balance(nodes, id, Balance::Equal);
        set_balance(nodes, top, Balance::Equal);
    } else {
        set_balance(nodes, id, Balance::SonDeeper);
        set_balance(nodes, top, Balance::BroDeeper);
    }
    top
}

/// Double rotation for a node too deep on the son side whose son is deeper on
/// the bro side: the son's bro becomes the local root. The subtree always gets
/// one level shorter.
pub fn rot_left_right<N: Linked>(nodes: &mut [N], id: NodeId) -> NodeId {
    debug_assert_eq!(balance(nodes, id), Balance::SonDeeper);
    debug_assert!(son(nodes, id).is_some(), "`rot_left_right()` - node {id} has no son!");
    let Some(lower) = son(nodes, id) else {
        return id;
    };
    debug_assert_eq!(balance(nodes, lower), Balance::BroDeeper);
    debug_assert!(bro(nodes, lower).is_some(), "`rot_left_right()` - node {lower} has no bro!");
    let Some(top) = bro(nodes, lower) else {
        return id;
    };

    let up = dad(nodes, id);
    let (top_son, top_bro) = (son(nodes, top), bro(nodes, top));

    link_mut(nodes, lower).set_bro(top_son);
    set_dad(nodes, top_son, lower);
    link_mut(nodes, id).set_son(top_bro);
    set_dad(nodes, top_bro, id);

    let top_link = link_mut(nodes, top);
    top_link.set_son(Some(lower));
    top_link.set_bro(Some(id));
    top_link.set_dad(up);
    link_mut(nodes, lower).set_dad(Some(top));
    link_mut(nodes, id).set_dad(Some(top));

    let (lower_balance, id_balance) = match balance(nodes, top) {
        Balance::BroDeeper => (Balance::SonDeeper, Balance::Equal),
        Balance::SonDeeper => (Balance::Equal, Balance::BroDeeper),
        Balance::Equal => (Balance::Equal, Balance::Equal),
    };
    set_balance(nodes, lower, lower_balance);
    set_balance(nodes, id, id_balance);
    set_balance(nodes, top, Balance::Equal);
    top
}

/// Mirror image of [`rot_left_right`]: the bro's son becomes the local root.
pub fn rot_right_left<N: Linked>(nodes: &mut [N], id: NodeId) -> NodeId {
    debug_assert_eq!(balance(nodes, id), Balance::BroDeeper);
    debug_assert!(bro(nodes, id).is_some(), "`rot_right_left()` - node {id} has no bro!");
    let Some(lower) = bro(nodes, id) else {
        return id;
    };
    debug_assert_eq!(balance(nodes, lower), Balance::SonDeeper);
    debug_assert!(son(nodes, lower).is_some(), "`rot_right_left()` - node {lower} has no son!");
    let Some(top) = son(nodes, lower) else {
        return id;
    };

    let up = dad(nodes, id);
    let (top_son, top_bro) = (son(nodes, top), bro(nodes, top));

    link_mut(nodes, id).set_bro(top_son);
    set_dad(nodes, top_son, id);
    link_mut(nodes, lower).set_son(top_bro);
    set_dad(nodes, top_bro, lower);

    let top_link = link_mut(nodes, top);
    top_link.set_son(Some(id));
    top_link.set_bro(Some(lower));
    top_link.set_dad(up);
    link_mut(nodes, lower).set_dad(Some(top));
    link_mut(nodes, id).set_dad(Some(top));

    let (id_balance, lower_balance) = match balance(nodes, top) {
        Balance::BroDeeper => (Balance::SonDeeper, Balance::Equal),
        Balance::SonDeeper => (Balance::Equal, Balance::BroDeeper),
        Balance::Equal => (Balance::Equal, Balance::Equal),
    };
    set_balance(nodes, id, id_balance);
    set_balance(nodes, lower, lower_balance);
    set_balance(nodes, top, Balance::Equal);
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::NodeLink;
    use crate::tree::tests::{build, id, sample};
    use crate::tree::{find_root, inorder_next, leftmost};

    fn with_status(mut nodes: Vec<NodeLink>, status: &[(usize, Balance)]) -> Vec<NodeLink> {
        for &(i, b) in status {
            set_balance(&mut nodes, id(i), b);
        }
        nodes
    }

    fn inorder(nodes: &[NodeLink], root: NodeId) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = Some(leftmost(nodes, root));
        while let Some(c) = current {
            out.push(c.to_index());
            current = inorder_next(nodes, c);
        }
        out
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "`rot_left()` - node #0 has no bro!")]
    fn rotating_without_a_child_panics() {
        let mut nodes = with_status(build(2, &[(0, 1, true)]), &[(0, Balance::BroDeeper)]);
        rot_left(&mut nodes, id(0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "`rot_right_left()` - node #1 has no son!")]
    fn double_rotating_without_a_grandchild_panics() {
        let mut nodes = with_status(
            build(3, &[(0, 1, false), (1, 2, false)]),
            &[(0, Balance::BroDeeper), (1, Balance::SonDeeper)],
        );
        rot_right_left(&mut nodes, id(0));
    }

    #[test]
    fn validators() {
        // 1 - 0 - 2, perfectly balanced.
        let nodes = build(3, &[(1, 0, true), (1, 2, false)]);
        assert!(avl_is_correct(&nodes, Some(id(1))));
        assert_eq!(check_avl(&nodes, Some(id(1))), Ok(2));
        assert_eq!(avl_depth(&nodes, Some(id(1))), 2);
        assert_eq!(avl_factor(&nodes, id(1)), 0);
        assert!(avl_is_correct(&nodes, None));

        // The sample tree is too deep under node 2.
        let nodes = sample();
        assert!(!avl_is_balanced(&nodes, Some(id(0))));
        assert_eq!(avl_factor(&nodes, id(2)), 2);
        assert_eq!(
            check_avl(&nodes, Some(id(1))),
            Err(InvariantError::StatusMismatch {
                node: id(4),
                stored: Balance::Equal,
                factor: -1,
            })
        );

        let nodes = with_status(
            build(3, &[(0, 1, false), (1, 2, false)]),
            &[(0, Balance::BroDeeper), (1, Balance::BroDeeper)],
        );
        assert_eq!(
            check_avl(&nodes, Some(id(0))),
            Err(InvariantError::Unbalanced { node: id(0), factor: 2 })
        );
    }

    #[test]
    fn broken_dad_link_is_reported() {
        let mut nodes = build(2, &[(0, 1, true)]);
        set_balance(&mut nodes, id(0), Balance::SonDeeper);
        link_mut(&mut nodes, id(1)).set_dad(None);
        assert_eq!(
            check_avl(&nodes, Some(id(0))),
            Err(InvariantError::BrokenDadLink { dad: id(0), child: id(1) })
        );
    }

    #[test]
    fn single_rotations_that_shrink() {
        // 0 -> 1 -> 2 along bros.
        let mut nodes = with_status(
            build(3, &[(0, 1, false), (1, 2, false)]),
            &[(0, Balance::BroDeeper), (1, Balance::BroDeeper)],
        );
        let top = rot_left(&mut nodes, id(0));
        assert_eq!(top, id(1));
        assert_eq!(dad(&nodes, top), None);
        assert!(avl_is_correct(&nodes, Some(top)));
        assert_eq!(balance(&nodes, top), Balance::Equal);
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2]);

        // 2 -> 1 -> 0 along sons.
        let mut nodes = with_status(
            build(3, &[(2, 1, true), (1, 0, true)]),
            &[(2, Balance::SonDeeper), (1, Balance::SonDeeper)],
        );
        let top = rot_right(&mut nodes, id(2));
        assert_eq!(top, id(1));
        assert!(avl_is_correct(&nodes, Some(top)));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2]);
    }

    #[test]
    fn single_rotations_that_keep_height() {
        //   0
        //    \
        //     2
        //    / \
        //   1   3
        let mut nodes = with_status(
            build(4, &[(0, 2, false), (2, 1, true), (2, 3, false)]),
            &[(0, Balance::BroDeeper)],
        );
        let top = rot_left(&mut nodes, id(0));
        assert_eq!(top, id(2));
        assert_eq!(balance(&nodes, top), Balance::SonDeeper);
        assert_eq!(balance(&nodes, id(0)), Balance::BroDeeper);
        assert_eq!(check_avl(&nodes, Some(top)), Ok(3));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2, 3]);

        let mut nodes = with_status(
            build(4, &[(3, 1, true), (1, 0, true), (1, 2, false)]),
            &[(3, Balance::SonDeeper)],
        );
        let top = rot_right(&mut nodes, id(3));
        assert_eq!(top, id(1));
        assert_eq!(balance(&nodes, top), Balance::BroDeeper);
        assert_eq!(check_avl(&nodes, Some(top)), Ok(3));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2, 3]);
    }

    #[test]
    fn double_rotations() {
        // 0 -> bro 2 -> son 1
        let mut nodes = with_status(
            build(3, &[(0, 2, false), (2, 1, true)]),
            &[(0, Balance::BroDeeper), (2, Balance::SonDeeper)],
        );
        let top = rot_right_left(&mut nodes, id(0));
        assert_eq!(top, id(1));
        assert!(avl_is_correct(&nodes, Some(top)));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2]);

        // 2 -> son 0 -> bro 1
        let mut nodes = with_status(
            build(3, &[(2, 0, true), (0, 1, false)]),
            &[(2, Balance::SonDeeper), (0, Balance::BroDeeper)],
        );
        let top = rot_left_right(&mut nodes, id(2));
        assert_eq!(top, id(1));
        assert!(avl_is_correct(&nodes, Some(top)));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2]);
    }

    #[test]
    fn double_rotation_moves_inner_subtrees() {
        //       4
        //      / \
        //     1   5
        //    / \
        //   0   2
        //        \
        //         3
        let mut nodes = with_status(
            build(6, &[(4, 1, true), (4, 5, false), (1, 0, true), (1, 2, false), (2, 3, false)]),
            &[(4, Balance::SonDeeper), (1, Balance::BroDeeper), (2, Balance::BroDeeper)],
        );
        let top = rot_left_right(&mut nodes, id(4));
        assert_eq!(top, id(2));
        assert_eq!(find_root(&nodes, id(3)), id(2));
        assert_eq!(son(&nodes, id(2)), Some(id(1)));
        assert_eq!(bro(&nodes, id(2)), Some(id(4)));
        assert_eq!(bro(&nodes, id(1)), None);
        assert_eq!(son(&nodes, id(4)), Some(id(3)));
        assert_eq!(balance(&nodes, id(1)), Balance::SonDeeper);
        assert_eq!(balance(&nodes, id(4)), Balance::Equal);
        assert!(avl_is_correct(&nodes, Some(top)));
        assert_eq!(inorder(&nodes, top), vec![0, 1, 2, 3, 4, 5]);
    }
}

//! Merge-joins over the inorder sequences of two maps sharing one ordering.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use crate::link::Linked;
use crate::map::Iter;
use crate::order::KeyOrder;

/// A lazy iterator over the nodes of both maps, merged in key order.
///
/// Equal keys are not merged: every node of both maps is yielded once, those
/// from the left map ahead of their equals from the right.
///
/// This `struct` is created by the [`union`] method on [`AvlMap`].
///
/// [`AvlMap`]: crate::AvlMap
/// [`union`]: crate::AvlMap::union
pub struct Union<'a, N, O> {
    lhs_peek: Option<&'a N>,
    rhs_peek: Option<&'a N>,
    lhs_iter: Iter<'a, N, O>,
    rhs_iter: Iter<'a, N, O>,
}

/// A lazy iterator over the left-map nodes matched by an equal key on the right.
///
/// This `struct` is created by the [`intersection`] method on [`AvlMap`].
///
/// [`AvlMap`]: crate::AvlMap
/// [`intersection`]: crate::AvlMap::intersection
pub struct Intersection<'a, N, O> {
    lhs_peek: Option<&'a N>,
    rhs_peek: Option<&'a N>,
    lhs_iter: Iter<'a, N, O>,
    rhs_iter: Iter<'a, N, O>,
}

/// A lazy iterator over the left-map nodes that are not cancelled by an equal
/// key on the right. Each right node cancels at most one left node.
///
/// This `struct` is created by the [`subtraction`] method on [`AvlMap`].
///
/// [`AvlMap`]: crate::AvlMap
/// [`subtraction`]: crate::AvlMap::subtraction
pub struct Subtraction<'a, N, O> {
    lhs_peek: Option<&'a N>,
    rhs_peek: Option<&'a N>,
    lhs_iter: Iter<'a, N, O>,
    rhs_iter: Iter<'a, N, O>,
}

/// A lazy iterator over the nodes of either map left after equal keys cancel
/// one-for-one.
///
/// This `struct` is created by the [`symmetric_difference`] method on [`AvlMap`].
///
/// [`AvlMap`]: crate::AvlMap
/// [`symmetric_difference`]: crate::AvlMap::symmetric_difference
pub struct SymmetricDifference<'a, N, O> {
    lhs_peek: Option<&'a N>,
    rhs_peek: Option<&'a N>,
    lhs_iter: Iter<'a, N, O>,
    rhs_iter: Iter<'a, N, O>,
}

macro_rules! merge_join_common {
    ($name:ident, $label:literal) => {
        impl<'a, N: Linked, O> $name<'a, N, O> {
            pub(crate) fn new(mut lhs_iter: Iter<'a, N, O>, mut rhs_iter: Iter<'a, N, O>) -> Self {
                Self {
                    lhs_peek: lhs_iter.next().map(|(_, node)| node),
                    rhs_peek: rhs_iter.next().map(|(_, node)| node),
                    lhs_iter,
                    rhs_iter,
                }
            }

            fn advance_lhs(&mut self) {
                self.lhs_peek = self.lhs_iter.next().map(|(_, node)| node);
            }

            fn advance_rhs(&mut self) {
                self.rhs_peek = self.rhs_iter.next().map(|(_, node)| node);
            }
        }

        impl<'a, N, O> Clone for $name<'a, N, O> {
            fn clone(&self) -> Self {
                Self {
                    lhs_peek: self.lhs_peek,
                    rhs_peek: self.rhs_peek,
                    lhs_iter: self.lhs_iter.clone(),
                    rhs_iter: self.rhs_iter.clone(),
                }
            }
        }

        impl<'a, N, O> fmt::Debug for $name<'a, N, O>
        where
            N: Linked,
            O: KeyOrder<N>,
            O::Key: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let order = self.lhs_iter.order();
                write!(f, $label)?;
                f.debug_list()
                    .entries(self.clone().map(|node| order.key(node)))
                    .finish()
            }
        }

        impl<'a, N: Linked, O: KeyOrder<N>> FusedIterator for $name<'a, N, O> {}
    };
}

merge_join_common!(Union, "Union");
merge_join_common!(Intersection, "Intersection");
merge_join_common!(Subtraction, "Subtraction");
merge_join_common!(SymmetricDifference, "SymmetricDifference");

impl<'a, N: Linked, O: KeyOrder<N>> Iterator for Union<'a, N, O> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.lhs_peek, self.rhs_peek) {
            (None, None) => None,
            (Some(lhs), None) => {
                self.advance_lhs();
                Some(lhs)
            }
            (None, Some(rhs)) => {
                self.advance_rhs();
                Some(rhs)
            }
            (Some(lhs), Some(rhs)) => match self.lhs_iter.order().compare_nodes(lhs, rhs) {
                Ordering::Less | Ordering::Equal => {
                    self.advance_lhs();
                    Some(lhs)
                }
                Ordering::Greater => {
                    self.advance_rhs();
                    Some(rhs)
                }
            },
        }
    }
}

impl<'a, N: Linked, O: KeyOrder<N>> Iterator for Intersection<'a, N, O> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.lhs_peek, self.rhs_peek) {
                (None, _) | (_, None) => return None,
                (Some(lhs), Some(rhs)) => match self.lhs_iter.order().compare_nodes(lhs, rhs) {
                    Ordering::Equal => {
                        self.advance_lhs();
                        self.advance_rhs();
                        return Some(lhs);
                    }
                    Ordering::Less => self.advance_lhs(),
                    Ordering::Greater => self.advance_rhs(),
                },
            }
        }
    }
}

impl<'a, N: Linked, O: KeyOrder<N>> Iterator for Subtraction<'a, N, O> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.lhs_peek, self.rhs_peek) {
                (None, _) => return None,
                (Some(lhs), None) => {
                    self.advance_lhs();
                    return Some(lhs);
                }
                (Some(lhs), Some(rhs)) => match self.lhs_iter.order().compare_nodes(lhs, rhs) {
                    Ordering::Less => {
                        self.advance_lhs();
                        return Some(lhs);
                    }
                    Ordering::Equal => {
                        self.advance_lhs();
                        self.advance_rhs();
                    }
                    Ordering::Greater => self.advance_rhs(),
                },
            }
        }
    }
}

impl<'a, N: Linked, O: KeyOrder<N>> Iterator for SymmetricDifference<'a, N, O> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.lhs_peek, self.rhs_peek) {
                (None, None) => return None,
                (Some(lhs), None) => {
                    self.advance_lhs();
                    return Some(lhs);
                }
                (None, Some(rhs)) => {
                    self.advance_rhs();
                    return Some(rhs);
                }
                (Some(lhs), Some(rhs)) => match self.lhs_iter.order().compare_nodes(lhs, rhs) {
                    Ordering::Less => {
                        self.advance_lhs();
                        return Some(lhs);
                    }
                    Ordering::Equal => {
                        self.advance_lhs();
                        self.advance_rhs();
                    }
                    Ordering::Greater => {
                        self.advance_rhs();
                        return Some(rhs);
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::map::{AvlMap, Node};
    use crate::NodeId;
    use pretty_assertions::assert_eq;

    fn map_of(keys: &[i32], multi: bool) -> (AvlMap<Node<i32>>, Vec<Node<i32>>) {
        let mut nodes: Vec<Node<i32>> = keys.iter().map(|&k| Node::new(k, ())).collect();
        let mut map = if multi { AvlMap::multimap() } else { AvlMap::new() };
        for index in 0..nodes.len() {
            assert!(map.insert(&mut nodes, NodeId::from_index(index)));
        }
        (map, nodes)
    }

    fn keys<'a>(iter: impl Iterator<Item = &'a Node<i32>>) -> Vec<i32> {
        iter.map(|node| node.key).collect()
    }

    #[test]
    fn duplicates_cancel_one_for_one() {
        let (a, a_nodes) = map_of(&[1, 2, 2, 2, 5], true);
        let (b, b_nodes) = map_of(&[2, 3, 5, 5], true);

        assert_eq!(keys(a.intersection(&a_nodes, &b, &b_nodes)), [2, 5]);
        assert_eq!(keys(a.subtraction(&a_nodes, &b, &b_nodes)), [1, 2, 2]);
        assert_eq!(keys(b.subtraction(&b_nodes, &a, &a_nodes)), [3, 5]);
        assert_eq!(keys(a.symmetric_difference(&a_nodes, &b, &b_nodes)), [1, 2, 2, 3, 5]);
        assert_eq!(keys(a.union(&a_nodes, &b, &b_nodes)), [1, 2, 2, 2, 2, 3, 5, 5, 5]);
    }

    #[test]
    fn union_yields_left_ties_first() {
        let (a, a_nodes) = map_of(&[7], false);
        let (b, b_nodes) = map_of(&[7], false);
        let mut union = a.union(&a_nodes, &b, &b_nodes);
        assert!(std::ptr::eq(union.next().unwrap(), &a_nodes[0]));
        assert!(std::ptr::eq(union.next().unwrap(), &b_nodes[0]));
        assert!(union.next().is_none());
        assert!(union.next().is_none());
    }

    #[test]
    fn empty_sides() {
        let (a, a_nodes) = map_of(&[1, 2], false);
        let (e, e_nodes) = map_of(&[], false);
        assert_eq!(a.union(&a_nodes, &e, &e_nodes).count(), 2);
        assert_eq!(e.union(&e_nodes, &a, &a_nodes).count(), 2);
        assert_eq!(a.intersection(&a_nodes, &e, &e_nodes).count(), 0);
        assert_eq!(a.subtraction(&a_nodes, &e, &e_nodes).count(), 2);
        assert_eq!(e.subtraction(&e_nodes, &a, &a_nodes).count(), 0);
        assert_eq!(e.symmetric_difference(&e_nodes, &a, &a_nodes).count(), 2);
    }

    #[test]
    fn debug_lists_keys() {
        let (a, a_nodes) = map_of(&[1, 3], false);
        let (b, b_nodes) = map_of(&[2, 3], false);
        assert_eq!(format!("{:?}", a.intersection(&a_nodes, &b, &b_nodes)), "Intersection[3]");
        assert_eq!(format!("{:?}", a.union(&a_nodes, &b, &b_nodes)), "Union[1, 2, 3, 3]");
    }
}

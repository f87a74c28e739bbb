//! How a map reads and compares the keys of its nodes.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Key extraction and comparison for nodes of type `N`.
///
/// Both methods must be pure, and `compare` must be a total order that stays
/// the same for as long as any map uses it. A map cannot detect a violation;
/// it silently breaks the tree's ordering.
pub trait KeyOrder<N> {
    type Key: ?Sized;

    fn key<'n>(&self, node: &'n N) -> &'n Self::Key;

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    /// Compares the keys of two nodes.
    fn compare_nodes(&self, a: &N, b: &N) -> Ordering {
        self.compare(self.key(a), self.key(b))
    }
}

/// A node that carries its own totally ordered key.
pub trait Keyed {
    type Key: Ord + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// Orders [`Keyed`] nodes by `Ord` on their keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<N: Keyed> KeyOrder<N> for Natural {
    type Key = N::Key;

    fn key<'n>(&self, node: &'n N) -> &'n N::Key {
        node.key()
    }

    fn compare(&self, a: &N::Key, b: &N::Key) -> Ordering {
        a.cmp(b)
    }
}

/// An ordering assembled from a key-extraction closure and a comparison closure.
///
/// ```
/// use std::cmp::Ordering;
/// use ucl::OrderBy;
///
/// struct Entry {
///     name: String,
/// }
///
/// // Case-insensitive order on names.
/// let order = OrderBy::new(
///     |entry: &Entry| entry.name.as_str(),
///     |a: &str, b: &str| a.to_lowercase().cmp(&b.to_lowercase()),
/// );
/// # let _ = order;
/// ```
pub struct OrderBy<K: ?Sized, G, C> {
    get_key: G,
    compare: C,
    _key: PhantomData<fn(&K)>,
}

impl<K: ?Sized, G, C> OrderBy<K, G, C> {
    pub fn new<N>(get_key: G, compare: C) -> Self
    where
        G: for<'n> Fn(&'n N) -> &'n K,
        C: Fn(&K, &K) -> Ordering,
    {
        Self {
            get_key,
            compare,
            _key: PhantomData,
        }
    }
}

impl<N, K: ?Sized, G, C> KeyOrder<N> for OrderBy<K, G, C>
where
    G: for<'n> Fn(&'n N) -> &'n K,
    C: Fn(&K, &K) -> Ordering,
{
    type Key = K;

    fn key<'n>(&self, node: &'n N) -> &'n K {
        (self.get_key)(node)
    }

    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<K: ?Sized, G: Clone, C: Clone> Clone for OrderBy<K, G, C> {
    fn clone(&self) -> Self {
        Self {
            get_key: self.get_key.clone(),
            compare: self.compare.clone(),
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, G, C> fmt::Debug for OrderBy<K, G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy").finish_non_exhaustive()
    }
}

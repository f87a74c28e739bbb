//! The tri-pointer node header shared by every tree-shaped container.

use std::fmt;
use std::num::NonZeroU32;

/// A handle naming one node slot of a caller-owned node slice.
///
/// Handles are stable for as long as the slot is: relinking never moves a node,
/// it only rewrites the handles stored in the headers around it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Largest slot index a handle can name.
    pub const MAX: usize = (u32::MAX - 1) as usize;

    /// Creates the handle for slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > NodeId::MAX`.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeId::from_index()` - `index` > `NodeId::MAX`!");
        match NonZeroU32::new((index + 1) as u32) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    /// Returns the slot index this handle names.
    #[inline]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_index())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_index())
    }
}

/// Sign of `depth(bro) - depth(son)` for one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Balance {
    #[default]
    Equal,
    SonDeeper,
    BroDeeper,
}

impl Balance {
    /// Returns `-1`, `0` or `1`.
    pub const fn sign(self) -> isize {
        match self {
            Balance::SonDeeper => -1,
            Balance::Equal => 0,
            Balance::BroDeeper => 1,
        }
    }

    /// Returns the status encoding the sign of `factor`.
    pub const fn from_factor(factor: isize) -> Self {
        if factor < 0 {
            Balance::SonDeeper
        } else if factor > 0 {
            Balance::BroDeeper
        } else {
            Balance::Equal
        }
    }
}

/// Node header: `dad` is the upward back-reference, `son` holds the lesser
/// keys and `bro` the greater-or-equal ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeLink {
    dad: Option<NodeId>,
    son: Option<NodeId>,
    bro: Option<NodeId>,
    balance: Balance,
}

impl NodeLink {
    /// Creates a detached header.
    pub const fn new() -> Self {
        Self {
            dad: None,
            son: None,
            bro: None,
            balance: Balance::Equal,
        }
    }

    pub fn dad(&self) -> Option<NodeId> {
        self.dad
    }

    pub fn son(&self) -> Option<NodeId> {
        self.son
    }

    pub fn bro(&self) -> Option<NodeId> {
        self.bro
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn set_dad(&mut self, dad: Option<NodeId>) {
        self.dad = dad;
    }

    pub fn set_son(&mut self, son: Option<NodeId>) {
        self.son = son;
    }

    pub fn set_bro(&mut self, bro: Option<NodeId>) {
        self.bro = bro;
    }

    pub fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }

    /// Returns true if the header is linked to nothing and carries no status.
    pub fn is_detached(&self) -> bool {
        *self == Self::new()
    }

    /// Puts the header back into the detached state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns true if the node has neither a son nor a bro.
    pub fn is_leaf(&self) -> bool {
        self.son.is_none() && self.bro.is_none()
    }
}

/// Implemented by node types that embed a [`NodeLink`].
pub trait Linked {
    fn link(&self) -> &NodeLink;
    fn link_mut(&mut self) -> &mut NodeLink;
}

impl Linked for NodeLink {
    fn link(&self) -> &NodeLink {
        self
    }

    fn link_mut(&mut self) -> &mut NodeLink {
        self
    }
}

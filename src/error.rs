use thiserror::Error;

use crate::link::{Balance, NodeId};

/// A broken structural invariant, as reported by the validators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("root {0} has a dad link")]
    RootHasDad(NodeId),
    #[error("node {child} does not point back to its dad {dad}")]
    BrokenDadLink { dad: NodeId, child: NodeId },
    #[error("node {node} is out of balance: depth(bro) - depth(son) = {factor}")]
    Unbalanced { node: NodeId, factor: isize },
    #[error("node {node} stores {stored:?} but depth(bro) - depth(son) = {factor}")]
    StatusMismatch {
        node: NodeId,
        stored: Balance,
        factor: isize,
    },
    #[error("node {node} sorts before its inorder predecessor {prev}")]
    OutOfOrder { prev: NodeId, node: NodeId },
    #[error("nodes {prev} and {node} hold equal keys in a unique-key map")]
    DuplicateKey { prev: NodeId, node: NodeId },
    #[error("map records {recorded} nodes but {counted} are linked")]
    LenMismatch { recorded: usize, counted: usize },
}

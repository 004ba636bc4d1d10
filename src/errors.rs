/// Failure taxonomy for sorting and placement
use crate::service::ServiceError;
use crate::tab_data::{GroupId, TabId, WindowId};
use std::fmt;
use thiserror::Error;

/// A failure that aborts a whole sort
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("Failed to enumerate window {window_id}: {source}")]
    Enumerate {
        window_id: WindowId,
        #[source]
        source: ServiceError,
    },
}

/// The service call an absorbed failure came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Remove(Vec<TabId>),
    Move { tab_id: TabId, index: usize },
    CreateGroup,
    Ungroup(Vec<TabId>),
    UpdateGroup { group_id: GroupId },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Remove(ids) => write!(f, "remove tabs {:?}", ids),
            Operation::Move { tab_id, index } => write!(f, "move tab {} to {}", tab_id, index),
            Operation::CreateGroup => write!(f, "create replacement group"),
            Operation::Ungroup(ids) => write!(f, "ungroup tabs {:?}", ids),
            Operation::UpdateGroup { group_id } => write!(f, "update group {}", group_id),
        }
    }
}

/// A failure that was absorbed so the rest of the sort could carry on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// A single call was rejected, e.g. its tab was closed underneath us
    #[error("Failed to {op}: {error}")]
    Operation { op: Operation, error: ServiceError },

    /// A group vanished before membership could be re-applied
    #[error("Group {group_id} is gone: {error}")]
    Structural { group_id: GroupId, error: ServiceError },
}

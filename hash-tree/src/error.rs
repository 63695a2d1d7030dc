use thiserror::Error;

use crate::ItemKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Contract violations reported by trees and the miner. None of these are
/// recoverable mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cannot mix {expected} and {found} items in one mining run")]
    TypeMismatch { expected: ItemKind, found: ItemKind },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

//! World-level errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world is closed")]
    Closed,

    #[error("chunk loader is closed")]
    LoaderClosed,
}

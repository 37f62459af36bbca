pub use anyhow::Result;

use fnv::FnvHashMap as Map;

/// Lookup failures of the dataset layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown instance {0}")]
    UnknownInstanceName(String),
    #[error("instance index {index} out of range, dataset has {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub mod dataset;
pub mod modify;
pub mod raw;

mod parsers;
pub use parsers::{ParseInstance, ParseError, SolomonFmt, SolomonStr};

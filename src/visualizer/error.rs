// src/visualizer/error.rs

use thiserror::Error;

/// A name passed to a setter that does not match any known selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("unknown {kind}: {name:?}")]
    Unknown { kind: &'static str, name: String },
}

impl SelectorError {
    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        Self::Unknown {
            kind,
            name: name.to_string(),
        }
    }
}

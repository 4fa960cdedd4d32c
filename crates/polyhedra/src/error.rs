//! Error type shared by the polyhedron core, the operators and the formes.
//!
//! Every variant is fatal for the request that produced it: inputs are
//! immutable, so a failed operation leaves the caller's polyhedron untouched.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A facet or edge face lookup matched nothing: geometry and specs disagree.
    #[error("classification failed: {message}")]
    Classification { message: String },

    /// `main_facet`/`minor_facet` on specs that declare no facet.
    #[error("polyhedron has no main facet")]
    NoMainFacet,

    /// The surface does not have the local structure an algorithm relies on.
    #[error("invalid topology: {message}")]
    Topology { message: String },

    /// The options do not single out one target.
    #[error("ambiguous options: {message}")]
    Ambiguous { message: String },

    /// An option key the operation does not take.
    #[error("`{operation}` does not accept option `{key}`")]
    UnrecognizedOption {
        operation: &'static str,
        key: &'static str,
    },

    /// A recognised option with a value the operation cannot use.
    #[error("invalid option for `{operation}`: {message}")]
    InvalidOption {
        operation: &'static str,
        message: String,
    },

    /// A numeric construction had no usable solution.
    #[error("degenerate geometry: {message}")]
    Degenerate { message: String },
}

impl Error {
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
        }
    }

    pub fn topology(message: impl Into<String>) -> Self {
        Self::Topology {
            message: message.into(),
        }
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous {
            message: message.into(),
        }
    }

    pub fn invalid_option(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            operation,
            message: message.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

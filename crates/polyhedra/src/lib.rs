//! Geometric operators on convex polyhedra.
//!
//! A `Polyhedron` is an immutable list of vertex coordinates plus faces given
//! as cyclic vertex-index lists. Operators (`truncate`, `expand`, `augment`,
//! ...) are pure functions returning a new polyhedron together with the
//! start/end vertex data an animator interpolates between.
//!
//! Layout
//! - `geom`: vector/plane/rotation helpers over `nalgebra`.
//! - `polyhedron`: the value type and its `Face`/`Edge` views.
//! - `operations`: the operators, their shared utilities and the dispatch layer.
//! - `formes`: classification of faces into facet/edge roles for a symbolic
//!   family descriptor.
//!
//! Seed geometry and the named-solid relation table live outside this crate;
//! callers supply polyhedra and specs as plain values.

pub mod cfg;
pub mod error;
pub mod formes;
pub mod geom;
pub mod operations;
pub mod polyhedron;

#[cfg(test)]
pub(crate) mod test_support;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom::Vec3;
pub use operations::{operate, operate_named, AnimationData, OpOptions, Operation, OperationResult};
pub use polyhedron::{Edge, FIndex, Face, Polyhedron, VIndex};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::formes::{Classical, ClassicalForme, ClassicalOp, Facet, Family};
    pub use crate::operations::{
        operate, operate_named, Direction, Gyrate, OpOptions, Operation, OperationResult, Twist,
        Using,
    };
    pub use crate::polyhedron::{Edge, Face, Polyhedron};
    pub use crate::Vec3;
}

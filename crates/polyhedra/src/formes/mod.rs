//! Formes: a polyhedron read through the specs of the solid it claims to be.
//!
//! A forme answers which faces descend from a vertex or a face of the seed
//! (its facets) and which the operation introduced (edge faces).

mod classical;
mod specs;


pub use classical::ClassicalForme;
pub use specs::{Classical, ClassicalOp, Facet, Family};

use crate::error::Result;
use crate::operations::Twist;
use crate::polyhedron::{Edge, Face};

/// The face reached by crossing the face on the other side of `edge`.
///
/// Without a twist that face is taken to be a square and the hop goes to its
/// far side. With a twist the hop follows the snub's triangles round in that
/// direction.
pub fn opposite_face<'a>(edge: &Edge<'a>, twist: Option<Twist>) -> Result<Face<'a>> {
    match twist {
        Some(Twist::Left) => edge.twin()?.next().twin()?.prev().twin_face(),
        Some(Twist::Right) => edge.twin()?.prev().twin()?.next().twin_face(),
        None => edge.twin()?.next().next().twin_face(),
    }
}

use crate::error::{Error, Result};
use crate::geom::{midpoint, Vec3};

use super::{FIndex, Face, Polyhedron, VIndex};

/// Directed edge of a face, identified by its source vertex and the face.
///
/// The target is the vertex after `source` in the face's cyclic order.
#[derive(Clone, Copy, Debug)]
pub struct Edge<'a> {
    polyhedron: &'a Polyhedron,
    source: VIndex,
    face: FIndex,
}

impl<'a> Edge<'a> {
    #[inline]
    pub(crate) fn new(polyhedron: &'a Polyhedron, source: VIndex, face: FIndex) -> Self {
        Self {
            polyhedron,
            source,
            face,
        }
    }

    fn position(&self) -> usize {
        // `source` is on `face` by construction
        self.polyhedron.faces[self.face]
            .iter()
            .position(|&v| v == self.source)
            .unwrap_or(0)
    }

    fn at_offset(&self, offset: isize) -> VIndex {
        let face = &self.polyhedron.faces[self.face];
        let k = face.len() as isize;
        face[((self.position() as isize + offset).rem_euclid(k)) as usize]
    }

    #[inline]
    pub fn source(&self) -> VIndex {
        self.source
    }

    #[inline]
    pub fn target(&self) -> VIndex {
        self.at_offset(1)
    }

    #[inline]
    pub fn face_index(&self) -> FIndex {
        self.face
    }

    #[inline]
    pub fn face(&self) -> Face<'a> {
        Face::new(self.polyhedron, self.face)
    }

    /// Following edge in the same face.
    pub fn next(&self) -> Edge<'a> {
        Edge::new(self.polyhedron, self.target(), self.face)
    }

    /// Preceding edge in the same face.
    pub fn prev(&self) -> Edge<'a> {
        Edge::new(self.polyhedron, self.at_offset(-1), self.face)
    }

    /// The same edge run backwards by the neighbouring face.
    pub fn twin(&self) -> Result<Edge<'a>> {
        let (u, v) = (self.source, self.target());
        let f = self.polyhedron.face_of_edge(v, u).ok_or_else(|| {
            Error::topology(format!("edge {u}→{v} of face {} has no twin", self.face))
        })?;
        Ok(Edge::new(self.polyhedron, v, f))
    }

    pub fn twin_face(&self) -> Result<Face<'a>> {
        Ok(self.twin()?.face())
    }

    pub fn endpoints(&self) -> (Vec3, Vec3) {
        (
            self.polyhedron.vertex(self.source),
            self.polyhedron.vertex(self.target()),
        )
    }

    pub fn midpoint(&self) -> Vec3 {
        let (a, b) = self.endpoints();
        midpoint(a, b)
    }

    pub fn length(&self) -> f64 {
        let (a, b) = self.endpoints();
        (b - a).norm()
    }
}

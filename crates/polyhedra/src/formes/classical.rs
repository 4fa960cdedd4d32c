use tracing::trace;

use super::opposite_face;
use super::specs::{Classical, ClassicalOp, Facet};
use crate::error::{Error, Result};
use crate::operations::Twist;
use crate::polyhedron::{Face, Polyhedron};

/// `f0` and the face opposite each of its sides.
fn walked_from(f0: Face<'_>, twist: Option<Twist>) -> Result<Vec<Face<'_>>> {
    let mut faces = vec![f0];
    for e in f0.edges() {
        faces.push(opposite_face(&e, twist)?);
    }
    Ok(faces)
}

/// Face rules of one classical operation. Each variant overrides the plain
/// side-count rule only where its faces need it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Regular,
    Truncated,
    Rectified,
    Bevelled,
    Cantellated,
    Snub,
}

impl From<ClassicalOp> for Strategy {
    fn from(op: ClassicalOp) -> Self {
        match op {
            ClassicalOp::Regular => Strategy::Regular,
            ClassicalOp::Truncate => Strategy::Truncated,
            ClassicalOp::Rectify => Strategy::Rectified,
            ClassicalOp::Bevel => Strategy::Bevelled,
            ClassicalOp::Cantellate => Strategy::Cantellated,
            ClassicalOp::Snub => Strategy::Snub,
        }
    }
}

/// A classical solid's geometry bound to its specs.
///
/// Formes are replaced, never updated: a new geometry means a new forme
/// (see [`ClassicalForme::with_geom`]).
#[derive(Clone, Debug)]
pub struct ClassicalForme<'s> {
    specs: &'s Classical,
    geom: Polyhedron,
    strategy: Strategy,
}

impl<'s> ClassicalForme<'s> {
    pub fn create(specs: &'s Classical, geom: Polyhedron) -> Self {
        let strategy = Strategy::from(specs.operation);
        trace!(?strategy, family = specs.family.size(), "classical forme");
        Self {
            specs,
            geom,
            strategy,
        }
    }

    pub fn specs(&self) -> &'s Classical {
        self.specs
    }

    pub fn geom(&self) -> &Polyhedron {
        &self.geom
    }

    /// Same specs, new geometry.
    pub fn with_geom(&self, geom: Polyhedron) -> Self {
        Self::create(self.specs, geom)
    }

    /// Side count of the faces playing `facet`.
    pub fn face_type(&self, facet: Facet) -> usize {
        let base = match facet {
            Facet::Vertex => 3,
            Facet::Face => self.specs.family.size(),
        };
        match self.strategy {
            Strategy::Bevelled => 2 * base,
            _ => base,
        }
    }

    fn matches_face_type(&self, face: Face<'_>, facet: Facet) -> bool {
        face.num_sides() == self.face_type(facet)
    }

    pub fn is_facet_face(&self, face: Face<'_>, facet: Facet) -> bool {
        match self.strategy {
            Strategy::Regular => self.specs.facet == Some(facet),
            // the polygons grown by truncation are the only ones above 5 sides
            Strategy::Truncated => {
                if self.specs.facet == Some(facet) {
                    face.num_sides() > 5
                } else {
                    face.num_sides() <= 5
                }
            }
            Strategy::Rectified | Strategy::Bevelled => self.matches_face_type(face, facet),
            Strategy::Cantellated => {
                self.matches_face_type(face, facet)
                    && face.adjacent_faces().iter().all(|f| f.num_sides() == 4)
            }
            Strategy::Snub => {
                self.matches_face_type(face, facet)
                    && face.adjacent_faces().iter().all(|f| f.num_sides() == 3)
            }
        }
    }

    pub fn get_facet(&self, face: Face<'_>) -> Option<Facet> {
        [Facet::Vertex, Facet::Face]
            .into_iter()
            .find(|&facet| self.is_facet_face(face, facet))
    }

    /// First face playing `facet`.
    pub fn facet_face(&self, facet: Facet) -> Result<Face<'_>> {
        self.geom
            .faces_iter()
            .find(|&f| self.is_facet_face(f, facet))
            .ok_or_else(|| Error::classification(format!("no {facet} facet face")))
    }

    /// Every face playing `facet`.
    ///
    /// In the tetrahedral family both facets have the same shape, so the set
    /// is walked out from one reference face instead of filtered by shape.
    pub fn facet_faces(&self, facet: Facet) -> Result<Vec<Face<'_>>> {
        if !self.specs.is_tetrahedral() {
            return self.filter_facet_faces(facet);
        }
        match self.strategy {
            Strategy::Bevelled => {
                let f0 = self.geom.face_with_num_sides(6)?;
                let mut faces = vec![f0];
                for e in f0.edges() {
                    if e.twin_face()?.num_sides() == 4 {
                        faces.push(opposite_face(&e, None)?);
                    }
                }
                Ok(faces)
            }
            Strategy::Cantellated => {
                let mut f0 = self.geom.face_with_num_sides(3)?;
                if facet == Facet::Vertex {
                    // a triangle meeting f0 only at a corner
                    let edge = f0
                        .edges()
                        .first()
                        .copied()
                        .ok_or_else(|| Error::topology("face has no edges"))?;
                    f0 = edge.twin()?.next().twin_face()?;
                }
                walked_from(f0, None)
            }
            Strategy::Snub => {
                let f0 = self.geom.face_with_num_sides(3)?;
                walked_from(f0, self.specs.twist)
            }
            _ => self.filter_facet_faces(facet),
        }
    }

    fn filter_facet_faces(&self, facet: Facet) -> Result<Vec<Face<'_>>> {
        let faces: Vec<Face<'_>> = self
            .geom
            .faces_iter()
            .filter(|&f| self.is_facet_face(f, facet))
            .collect();
        if faces.is_empty() {
            return Err(Error::classification(format!("no {facet} facet faces")));
        }
        Ok(faces)
    }

    pub fn main_facet(&self) -> Result<Facet> {
        self.specs.facet.ok_or(Error::NoMainFacet)
    }

    pub fn minor_facet(&self) -> Result<Facet> {
        self.main_facet().map(Facet::other)
    }

    pub fn main_facet_face(&self) -> Result<Face<'_>> {
        self.facet_face(self.main_facet()?)
    }

    pub fn main_facet_faces(&self) -> Result<Vec<Face<'_>>> {
        self.facet_faces(self.main_facet()?)
    }

    pub fn minor_facet_face(&self) -> Result<Face<'_>> {
        self.facet_face(self.minor_facet()?)
    }

    pub fn minor_facet_faces(&self) -> Result<Vec<Face<'_>>> {
        self.facet_faces(self.minor_facet()?)
    }

    /// A face the operation introduced rather than inherited from the seed.
    /// Only cantellated solids single these out.
    pub fn is_edge_face(&self, face: Face<'_>) -> bool {
        match self.strategy {
            Strategy::Cantellated => {
                face.num_sides() == 4 && face.adjacent_faces().iter().any(|f| f.num_sides() != 4)
            }
            _ => false,
        }
    }

    pub fn edge_face(&self) -> Result<Face<'_>> {
        self.geom
            .faces_iter()
            .find(|&f| self.is_edge_face(f))
            .ok_or_else(|| Error::classification("no edge face"))
    }
}

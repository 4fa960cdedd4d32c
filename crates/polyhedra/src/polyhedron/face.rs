use crate::cfg::PRECISION;
use crate::geom::{centroid, midpoint, newell_normal, Plane, Ray, Vec3};

use super::{Edge, FIndex, Polyhedron, VIndex};

/// Read-only view of one face of a polyhedron.
#[derive(Clone, Copy, Debug)]
pub struct Face<'a> {
    polyhedron: &'a Polyhedron,
    index: FIndex,
}

impl<'a> Face<'a> {
    #[inline]
    pub(crate) fn new(polyhedron: &'a Polyhedron, index: FIndex) -> Self {
        Self { polyhedron, index }
    }

    #[inline]
    pub fn index(&self) -> FIndex {
        self.index
    }

    #[inline]
    pub fn polyhedron(&self) -> &'a Polyhedron {
        self.polyhedron
    }

    #[inline]
    pub fn vertex_indices(&self) -> &'a [VIndex] {
        &self.polyhedron.faces[self.index]
    }

    pub fn vertices(&self) -> Vec<Vec3> {
        self.vertex_indices()
            .iter()
            .map(|&v| self.polyhedron.vertex(v))
            .collect()
    }

    #[inline]
    pub fn num_sides(&self) -> usize {
        self.vertex_indices().len()
    }

    pub fn centroid(&self) -> Vec3 {
        centroid(&self.vertices())
    }

    /// Outward unit normal; the zero vector for a face with no area
    /// (e.g. a collapsed face of an animation start state).
    pub fn normal(&self) -> Vec3 {
        newell_normal(&self.vertices()).unwrap_or_else(Vec3::zeros)
    }

    pub fn plane(&self) -> Plane {
        Plane::from_normal_and_point(self.normal(), self.centroid())
    }

    /// Axis through the centroid along the normal.
    pub fn normal_ray(&self) -> Ray {
        Ray::new(self.centroid(), self.normal())
    }

    /// Distance from the face centroid to the polyhedron centroid.
    pub fn distance_to_center(&self) -> f64 {
        (self.centroid() - self.polyhedron.centroid()).norm()
    }

    /// Length of the first side.
    pub fn edge_length(&self) -> f64 {
        self.edges()[0].length()
    }

    /// Distance from the centroid to the midpoint of the first side.
    pub fn apothem(&self) -> f64 {
        let vs = self.vertices();
        (midpoint(vs[0], vs[1]) - self.centroid()).norm()
    }

    pub fn edges(&self) -> Vec<Edge<'a>> {
        self.vertex_indices()
            .iter()
            .map(|&v| Edge::new(self.polyhedron, v, self.index))
            .collect()
    }

    /// Faces across each side, in side order. Sides without a twin are skipped.
    pub fn adjacent_faces(&self) -> Vec<Face<'a>> {
        self.edges()
            .iter()
            .filter_map(|e| e.twin_face().ok())
            .collect()
    }

    /// All sides have the same length (within `PRECISION`).
    pub fn is_valid(&self) -> bool {
        let len = self.edge_length();
        self.edges()
            .iter()
            .all(|e| (e.length() - len).abs() < PRECISION)
    }
}

//! Polyhedra as vertex coordinates plus face-vertex incidence.
//!
//! Purpose
//! - One immutable value type, `Polyhedron`, shared by every operator and by
//!   the forme classification layer.
//! - `Face` and `Edge` are borrowed views computed on demand; nothing about
//!   them is stored except a directed-edge lookup table built at construction.
//!
//! Assumptions and conventions
//! - Faces list their vertices counterclockwise when seen from outside, so
//!   the Newell normal points outward.
//! - The surface is expected to be closed, orientable and manifold: every
//!   directed edge `u→v` has exactly one twin `v→u`. This is relied upon, not
//!   enforced; a missing twin surfaces as `Error::Topology` where it matters.
//! - Transforms (`with_vertices`, `map_faces`, ...) never touch the receiver
//!   and do not compact; only `Polyhedron::of` normalizes its input.

mod edge;
mod face;

pub use edge::Edge;
pub use face::Face;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geom::{centroid, Vec3};

pub type VIndex = usize;
pub type FIndex = usize;

/// Immutable polyhedron: ordered vertex coordinates and ordered faces.
///
/// Invariants (after `of` and after every public operator):
/// - every face index is `< vertices.len()`;
/// - every face has at least three distinct vertices;
/// - every vertex is referenced by some face (dense index space).
#[derive(Clone, Debug, Default)]
pub struct Polyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<VIndex>>,
    /// Directed edge `(u, v)` → the face that traverses it.
    edge_faces: HashMap<(VIndex, VIndex), FIndex>,
}

impl Polyhedron {
    /// Validating constructor.
    ///
    /// Repeated indices inside a face are collapsed, faces left with fewer than
    /// three vertices are dropped and unreferenced vertices are compacted away.
    /// Already-valid input comes back unchanged.
    pub fn of(vertices: Vec<Vec3>, faces: Vec<Vec<VIndex>>) -> Result<Self> {
        let n = vertices.len();
        if let Some(bad) = faces.iter().flatten().find(|&&v| v >= n) {
            return Err(Error::topology(format!(
                "face references vertex {bad} but there are only {n} vertices"
            )));
        }
        let faces: Vec<Vec<VIndex>> = faces
            .into_iter()
            .map(uniq)
            .filter(|f| f.len() >= 3)
            .collect();
        let (vertices, faces) = compact_indices(vertices, faces);
        Ok(Self::from_parts(vertices, faces))
    }

    /// Unchecked constructor used by the transforms.
    pub(crate) fn from_parts(vertices: Vec<Vec3>, faces: Vec<Vec<VIndex>>) -> Self {
        debug_assert!(faces.iter().flatten().all(|&v| v < vertices.len()));
        let mut edge_faces = HashMap::new();
        for (fi, face) in faces.iter().enumerate() {
            let k = face.len();
            for i in 0..k {
                edge_faces.entry((face[i], face[(i + 1) % k])).or_insert(fi);
            }
        }
        Self {
            vertices,
            faces,
            edge_faces,
        }
    }

    // ---- accessors -------------------------------------------------------

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
    #[inline]
    pub fn faces(&self) -> &[Vec<VIndex>] {
        &self.faces
    }
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
    #[inline]
    pub fn vertex(&self, v: VIndex) -> Vec3 {
        self.vertices[v]
    }
    #[inline]
    pub fn num_sides(&self, f: FIndex) -> usize {
        self.faces[f].len()
    }
    #[inline]
    pub fn face(&self, f: FIndex) -> Face<'_> {
        Face::new(self, f)
    }

    pub fn faces_iter(&self) -> impl Iterator<Item = Face<'_>> + '_ {
        (0..self.faces.len()).map(move |f| Face::new(self, f))
    }

    /// One edge per undirected edge, taken from the face that runs it `u→v` with `u < v`.
    pub fn edges(&self) -> Vec<Edge<'_>> {
        let mut out = Vec::new();
        for (fi, face) in self.faces.iter().enumerate() {
            let k = face.len();
            for i in 0..k {
                let (u, v) = (face[i], face[(i + 1) % k]);
                if u < v {
                    out.push(Edge::new(self, u, fi));
                }
            }
        }
        out
    }

    /// Face traversing the directed edge `u→v`, if any.
    #[inline]
    pub fn face_of_edge(&self, u: VIndex, v: VIndex) -> Option<FIndex> {
        self.edge_faces.get(&(u, v)).copied()
    }

    /// Mean of all vertex positions.
    pub fn centroid(&self) -> Vec3 {
        centroid(&self.vertices)
    }

    /// Length of the first edge of the first face.
    pub fn edge_length(&self) -> f64 {
        self.face(0).edge_length()
    }

    pub fn face_with_num_sides(&self, n: usize) -> Result<Face<'_>> {
        self.faces_iter()
            .find(|f| f.num_sides() == n)
            .ok_or_else(|| Error::classification(format!("no face with {n} sides")))
    }

    /// First face with the fewest sides.
    pub fn smallest_face(&self) -> Option<Face<'_>> {
        self.faces_iter().min_by_key(|f| f.num_sides())
    }

    /// First face with the most sides.
    pub fn largest_face(&self) -> Option<Face<'_>> {
        // max_by_key keeps the last maximum; scan by hand to keep the first.
        let mut best: Option<Face<'_>> = None;
        for f in self.faces_iter() {
            if best.map_or(true, |b| f.num_sides() > b.num_sides()) {
                best = Some(f);
            }
        }
        best
    }

    /// Sorted distinct side counts present.
    pub fn face_types(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.faces.iter().map(Vec::len).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    // ---- adjacency -------------------------------------------------------

    /// Faces containing `v`, in index order.
    pub fn adjacent_face_indices(&self, v: VIndex) -> Vec<FIndex> {
        (0..self.faces.len())
            .filter(|&f| self.faces[f].contains(&v))
            .collect()
    }

    /// Faces around `v` in cyclic order, walking from each face across the
    /// edge that enters `v`.
    ///
    /// For a vertex whose faces are `f_0, .., f_{k-1}` in this order, the polygon
    /// formed by points taken from each face in the same order is outward-facing.
    pub fn vertex_face_cycle(&self, v: VIndex) -> Result<Vec<FIndex>> {
        let start = self
            .faces
            .iter()
            .position(|f| f.contains(&v))
            .ok_or_else(|| Error::topology(format!("vertex {v} is on no face")))?;
        let mut cycle = vec![start];
        let mut current = start;
        loop {
            let prev = Edge::new(self, v, current).prev();
            // prev runs p→v; the twin runs v→p in the next face around v
            let next = prev.twin()?.face_index();
            if next == start {
                break;
            }
            if cycle.len() > self.faces.len() {
                return Err(Error::topology(format!("faces around vertex {v} do not close")));
            }
            cycle.push(next);
            current = next;
        }
        Ok(cycle)
    }

    /// Vertices joined to `v` by an edge.
    pub fn adjacent_vertex_indices(&self, v: VIndex) -> Vec<VIndex> {
        let mut out = Vec::new();
        for face in &self.faces {
            if let Some(i) = face.iter().position(|&x| x == v) {
                let next = face[(i + 1) % face.len()];
                if !out.contains(&next) {
                    out.push(next);
                }
            }
        }
        out
    }

    /// Index of the face whose plane passes closest to `point`.
    ///
    /// Used to resolve an interaction point (e.g. a picked position on the
    /// rendered surface) into a face.
    pub fn hit_face_index(&self, point: &Vec3) -> Option<FIndex> {
        self.faces_iter()
            .map(|f| (f.index(), f.plane().distance_to_point(point)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(f, _)| f)
    }

    // ---- measurements ----------------------------------------------------

    #[inline]
    pub fn face_normal(&self, f: FIndex) -> Vec3 {
        self.face(f).normal()
    }
    #[inline]
    pub fn face_centroid(&self, f: FIndex) -> Vec3 {
        self.face(f).centroid()
    }
    #[inline]
    pub fn apothem(&self, f: FIndex) -> f64 {
        self.face(f).apothem()
    }

    /// Interior angle between the two faces sharing the edge `{v0, v1}`.
    ///
    /// Computed as `π − atan2(|n1 × n2|, n1 · n2)` from the outward normals,
    /// accurate for nearly flat and nearly folded edges alike.
    pub fn dihedral_angle(&self, v0: VIndex, v1: VIndex) -> Result<f64> {
        let missing = || Error::topology(format!("no pair of faces shares edge {v0}-{v1}"));
        let f1 = self.face_of_edge(v0, v1).ok_or_else(missing)?;
        let f2 = self.face_of_edge(v1, v0).ok_or_else(missing)?;
        let n1 = self.face_normal(f1);
        let n2 = self.face_normal(f2);
        let between = n1.cross(&n2).norm().atan2(n1.dot(&n2));
        Ok(std::f64::consts::PI - between)
    }

    // ---- transforms ------------------------------------------------------

    /// Same faces, new coordinates.
    pub fn with_vertices(&self, vertices: Vec<Vec3>) -> Self {
        Self::from_parts(vertices, self.faces.clone())
    }

    /// Same coordinates, new faces.
    pub fn with_faces(&self, faces: Vec<Vec<VIndex>>) -> Self {
        Self::from_parts(self.vertices.clone(), faces)
    }

    /// Append vertices (unreferenced until a face uses them).
    pub fn add_vertices(&self, extra: &[Vec3]) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.extend_from_slice(extra);
        Self::from_parts(vertices, self.faces.clone())
    }

    pub fn map_vertices(&self, f: impl FnMut((VIndex, &Vec3)) -> Vec3) -> Self {
        let vertices = self.vertices.iter().enumerate().map(f).collect();
        self.with_vertices(vertices)
    }

    pub fn map_faces(&self, mut f: impl FnMut(&[VIndex], FIndex) -> Vec<VIndex>) -> Self {
        let faces = self
            .faces
            .iter()
            .enumerate()
            .map(|(i, face)| f(face, i))
            .collect();
        self.with_faces(faces)
    }

    /// `map_faces` with a fallible closure; the first error wins.
    pub fn try_map_faces(
        &self,
        mut f: impl FnMut(&[VIndex], FIndex) -> Result<Vec<VIndex>>,
    ) -> Result<Self> {
        let faces = self
            .faces
            .iter()
            .enumerate()
            .map(|(i, face)| f(face, i))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.with_faces(faces))
    }

    /// Check the public invariants: indices in range, ≥ 3 distinct vertices
    /// per face, every vertex referenced.
    pub fn check_invariants(&self) -> Result<()> {
        let n = self.vertices.len();
        let mut used = vec![false; n];
        for (fi, face) in self.faces.iter().enumerate() {
            if uniq(face.clone()).len() < 3 {
                return Err(Error::topology(format!("face {fi} has fewer than 3 vertices")));
            }
            for &v in face {
                if v >= n {
                    return Err(Error::topology(format!("face {fi} references vertex {v}")));
                }
                used[v] = true;
            }
        }
        match used.iter().position(|u| !u) {
            Some(v) => Err(Error::topology(format!("vertex {v} is not on any face"))),
            None => Ok(()),
        }
    }
}

/// Drop repeated indices, keeping first occurrences in order.
pub(crate) fn uniq(face: Vec<VIndex>) -> Vec<VIndex> {
    let mut out = Vec::with_capacity(face.len());
    for v in face {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// Remove unreferenced vertices and renumber densely.
///
/// Each removed slot below the new length is refilled by one of the
/// highest-numbered referenced vertices, so untouched low indices keep their
/// numbers. Returns the inputs unchanged when every vertex is referenced.
pub(crate) fn compact_indices(
    vertices: Vec<Vec3>,
    faces: Vec<Vec<VIndex>>,
) -> (Vec<Vec3>, Vec<Vec<VIndex>>) {
    let n = vertices.len();
    let mut used = vec![false; n];
    for &v in faces.iter().flatten() {
        used[v] = true;
    }
    let removed: Vec<VIndex> = (0..n).filter(|&v| !used[v]).collect();
    if removed.is_empty() {
        return (vertices, faces);
    }
    let keep = n - removed.len();
    // referenced vertices in the tail, each moved into a removed slot in the head
    let movers: HashMap<VIndex, VIndex> = (keep..n)
        .filter(|&v| used[v])
        .zip(removed.iter().copied())
        .collect();
    let mut new_vertices = vertices;
    for (&old, &new) in &movers {
        new_vertices[new] = new_vertices[old];
    }
    new_vertices.truncate(keep);
    let new_faces = faces
        .into_iter()
        .map(|face| {
            face.into_iter()
                .map(|v| movers.get(&v).copied().unwrap_or(v))
                .collect()
        })
        .collect();
    (new_vertices, new_faces)
}

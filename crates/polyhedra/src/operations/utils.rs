//! Helpers shared by the operators: vertex merging, index compaction, face
//! resizing and the cantellate/snub classification of expanded solids.

use tracing::trace;

use crate::error::{Error, Result};
use crate::geom::{angle_between, approx_eq, midpoint, rotate_around, Plane, Vec3};
use crate::polyhedron::{compact_indices, uniq, FIndex, Face, Polyhedron, VIndex};

/// Merge vertices closer than `PRECISION`, then drop degenerate faces and
/// unreferenced vertices.
///
/// Clusters are found greedily against the representatives found so far; the
/// representative is the lowest index of its cluster. Idempotent.
pub fn deduplicate_vertices(polyhedron: &Polyhedron) -> Polyhedron {
    let vertices = polyhedron.vertices();
    let mut representatives: Vec<VIndex> = Vec::new();
    let mut representative_of: Vec<VIndex> = Vec::with_capacity(vertices.len());
    for (i, v) in vertices.iter().enumerate() {
        match representatives
            .iter()
            .find(|&&r| approx_eq(v, &vertices[r]))
        {
            Some(&r) => representative_of.push(r),
            None => {
                representatives.push(i);
                representative_of.push(i);
            }
        }
    }
    trace!(
        vertices = vertices.len(),
        clusters = representatives.len(),
        "deduplicate_vertices"
    );
    let faces = polyhedron
        .faces()
        .iter()
        .map(|face| uniq(face.iter().map(|&v| representative_of[v]).collect()))
        .filter(|face| face.len() >= 3)
        .collect();
    remove_extraneous_vertices(&polyhedron.with_faces(faces))
}

/// Drop vertices referenced by no face and renumber densely.
///
/// Removed slots are refilled by the highest-numbered referenced vertices;
/// every other vertex keeps its index.
pub fn remove_extraneous_vertices(polyhedron: &Polyhedron) -> Polyhedron {
    let (vertices, faces) =
        compact_indices(polyhedron.vertices().to_vec(), polyhedron.faces().to_vec());
    Polyhedron::from_parts(vertices, faces)
}

/// New coordinates after pushing each listed face along its normal until its
/// distance to the center, in units of the side length, equals
/// `resized_length`, optionally rotating it about its own normal first.
///
/// The current ratio and side length are read off the first listed face, so
/// every listed face is expected to be congruent. Vertices on no listed face
/// keep their position.
pub fn get_resized_vertices(
    polyhedron: &Polyhedron,
    faces: &[FIndex],
    resized_length: f64,
    angle: f64,
) -> Vec<Vec3> {
    let mut result = polyhedron.vertices().to_vec();
    let Some(&f0) = faces.first() else {
        return result;
    };
    let f0 = polyhedron.face(f0);
    let side = f0.edge_length();
    let base = f0.distance_to_center() / side;
    let push = (resized_length - base) * side;
    for &fi in faces {
        let face = polyhedron.face(fi);
        let normal = face.normal();
        let axis = face.normal_ray();
        for &v in face.vertex_indices() {
            let rotated = rotate_around(polyhedron.vertex(v), &axis, angle);
            result[v] = rotated + normal * push;
        }
    }
    result
}

/// How the faces of an expanded solid are joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionType {
    /// Square connectors (rhombicuboctahedron, rhombicosidodecahedron).
    Cantellate,
    /// Triangle connectors (snub solids; the icosahedron as snub tetrahedron).
    Snub,
}

impl ExpansionType {
    /// Side count of the connector faces.
    pub fn edge_shape(self) -> usize {
        match self {
            Self::Cantellate => 4,
            Self::Snub => 3,
        }
    }
}

/// Face counts of the snub tetrahedron, snub cube and snub dodecahedron.
const SNUB_FACE_COUNTS: [usize; 3] = [20, 38, 92];

pub fn expansion_type(polyhedron: &Polyhedron) -> ExpansionType {
    if SNUB_FACE_COUNTS.contains(&polyhedron.num_faces()) {
        ExpansionType::Snub
    } else {
        ExpansionType::Cantellate
    }
}

/// A regular face (optionally with `num_sides` sides) whose neighbours are all
/// connector faces.
pub fn is_expanded_face(polyhedron: &Polyhedron, face: Face<'_>, num_sides: Option<usize>) -> bool {
    if num_sides.is_some_and(|n| face.num_sides() != n) {
        return false;
    }
    if !face.is_valid() {
        return false;
    }
    let shape = expansion_type(polyhedron).edge_shape();
    face.adjacent_faces()
        .iter()
        .all(|f| f.num_sides() == shape)
}

/// Rotation of the `num_sides`-gons of a snub solid relative to their
/// cantellated position.
///
/// Measured on the first expanded face about its normal, between its first
/// edge midpoint and that midpoint projected onto the plane through the
/// face, its nearest non-touching expanded neighbour and the solid's center.
/// The sign is flipped for non-triangles so that one sign means one chirality
/// across all face types.
pub fn get_snub_angle(polyhedron: &Polyhedron, num_sides: usize) -> Result<f64> {
    let face0 = polyhedron
        .faces_iter()
        .find(|&f| is_expanded_face(polyhedron, f, Some(num_sides)))
        .unwrap_or_else(|| polyhedron.face(0));
    let touching: Vec<FIndex> = face0
        .vertex_indices()
        .iter()
        .flat_map(|&v| polyhedron.adjacent_face_indices(v))
        .collect();
    let vs = face0.vertices();
    let mid = midpoint(vs[0], vs[1]);
    let face1 = polyhedron
        .faces_iter()
        .filter(|&f| {
            !touching.contains(&f.index()) && is_expanded_face(polyhedron, f, Some(num_sides))
        })
        .min_by(|a, b| {
            let da = (mid - a.centroid()).norm();
            let db = (mid - b.centroid()).norm();
            da.total_cmp(&db)
        })
        .ok_or_else(|| {
            Error::classification(format!("no second expanded {num_sides}-gon to measure against"))
        })?;
    let center = face0.centroid();
    let plane = Plane::from_points(center, face1.centroid(), polyhedron.centroid())
        .ok_or_else(|| Error::degenerate("snub angle reference plane is undefined"))?;
    let projected = plane.project(&mid);
    let angle = angle_between(&(mid - center), &(projected - center), Some(&face0.normal()));
    Ok(if num_sides == 3 { angle } else { -angle })
}

//! Raise faces into pyramidal points.

use std::f64::consts::PI;

use tracing::debug;

use super::utils::deduplicate_vertices;
use super::OperationResult;
use crate::error::{Error, Result};
use crate::geom::Vec3;
use crate::polyhedron::{FIndex, Polyhedron, VIndex};

/// Side count of the face under `point`, if it is small enough to cumulate.
pub fn cumulate_polygon(polyhedron: &Polyhedron, point: &Vec3) -> Option<usize> {
    let hit = polyhedron.hit_face_index(point)?;
    let n = polyhedron.num_sides(hit);
    (n <= 5).then_some(n)
}

/// Every vertex touches four faces (checked on vertex 0).
fn is_rectified(polyhedron: &Polyhedron) -> bool {
    polyhedron.num_vertices() > 0 && polyhedron.adjacent_face_indices(0).len() == 4
}

fn cumulate_face_indices(polyhedron: &Polyhedron, face_type: usize) -> Vec<FIndex> {
    let faces = polyhedron.faces();
    if faces.len() == 8 && faces.iter().all(|f| f.len() == 3) {
        // octahedron: raise one of the two alternating sets of four
        debug!("cumulate: octahedron special case");
        let reference = &faces[0];
        return (0..faces.len())
            .filter(|&f| faces[f].iter().filter(|v| reference.contains(v)).count() % 2 == 0)
            .collect();
    }
    (0..faces.len())
        .filter(|&f| faces[f].len() == face_type)
        .collect()
}

fn replace(face: &[VIndex], at: usize, with: &[VIndex]) -> Vec<VIndex> {
    let mut out = Vec::with_capacity(face.len() + with.len());
    out.extend_from_slice(&face[..at]);
    out.extend_from_slice(with);
    out.extend_from_slice(&face[at + 1..]);
    out
}

fn neighbours_in(face: &[VIndex], v: VIndex) -> Option<(VIndex, VIndex)> {
    let k = face.len();
    let i = face.iter().position(|&x| x == v)?;
    Some((face[(i + k - 1) % k], face[(i + 1) % k]))
}

/// Split `v` in two so that the raised faces around it stop sharing it.
///
/// The first raised face at `v` (the pivot) keeps `v`, other raised faces
/// get the copy, and the faces between them take both in the order that
/// keeps the surface oriented.
fn duplicate_vertex(
    acc: Polyhedron,
    original: &Polyhedron,
    raised: &[FIndex],
    v: VIndex,
) -> Result<Polyhedron> {
    let adjacent = original.adjacent_face_indices(v);
    let Some(pivot) = adjacent.iter().copied().find(|f| raised.contains(f)) else {
        return Ok(acc);
    };
    let (prev, next) = neighbours_in(&original.faces()[pivot], v)
        .ok_or_else(|| Error::topology(format!("vertex {v} missing from its face {pivot}")))?;
    let copy = acc.num_vertices();
    let acc = acc.add_vertices(&[acc.vertex(v)]);
    acc.try_map_faces(|face, f| {
        if f == pivot || !adjacent.contains(&f) {
            return Ok(face.to_vec());
        }
        let at = face
            .iter()
            .position(|&x| x == v)
            .ok_or_else(|| Error::topology(format!("vertex {v} missing from face {f}")))?;
        let around = &original.faces()[f];
        if raised.contains(&f) {
            Ok(replace(face, at, &[copy]))
        } else if around.contains(&next) {
            Ok(replace(face, at, &[v, copy]))
        } else if around.contains(&prev) {
            Ok(replace(face, at, &[copy, v]))
        } else {
            Err(Error::topology(format!(
                "cannot place face {f} relative to pivot face {pivot} at vertex {v}"
            )))
        }
    })
}

fn duplicate_vertices(polyhedron: &Polyhedron, raised: &[FIndex]) -> Result<Polyhedron> {
    let split = (0..polyhedron.num_vertices()).try_fold(polyhedron.clone(), |acc, v| {
        duplicate_vertex(acc, polyhedron, raised, v)
    })?;
    Polyhedron::of(split.vertices().to_vec(), split.faces().to_vec())
}

/// Raise every face with `face_type` sides (default: the fewest present) to
/// the point where its neighbours' planes meet.
///
/// On a rectified solid the raised faces share vertices, so those vertices
/// are split first and each raised face moves its own copy.
pub fn cumulate(polyhedron: &Polyhedron, face_type: Option<usize>) -> Result<OperationResult> {
    let n = match face_type {
        Some(n) => n,
        None => polyhedron
            .smallest_face()
            .map(|f| f.num_sides())
            .ok_or_else(|| Error::classification("cannot cumulate a polyhedron without faces"))?,
    };
    let raised = cumulate_face_indices(polyhedron, n);
    if raised.is_empty() {
        return Err(Error::classification(format!("no {n}-sided face to cumulate")));
    }

    // apex per raised face: where the planes of its neighbours meet
    let apexes = raised
        .iter()
        .map(|&f| {
            let face = &polyhedron.faces()[f];
            let theta = PI - polyhedron.dihedral_angle(face[0], face[1])?;
            let rise = polyhedron.apothem(f) * theta.tan();
            Ok(polyhedron.face_centroid(f) + polyhedron.face_normal(f) * rise)
        })
        .collect::<Result<Vec<Vec3>>>()?;

    let start = if is_rectified(polyhedron) {
        debug!(raised = raised.len(), "cumulate: splitting shared vertices");
        duplicate_vertices(polyhedron, &raised)?
    } else {
        polyhedron.clone()
    };

    // later faces win for vertices on several raised faces
    let mut end_vertices = start.vertices().to_vec();
    for (&f, apex) in raised.iter().zip(&apexes) {
        for &v in &start.faces()[f] {
            end_vertices[v] = *apex;
        }
    }
    let result = deduplicate_vertices(&start.with_vertices(end_vertices.clone()));
    Ok(OperationResult::new(result, start, end_vertices))
}

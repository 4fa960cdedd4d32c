//! Prism and antiprism bands: inserting one under the largest face, or
//! removing one.

use std::f64::consts::PI;

use tracing::debug;

use super::utils::deduplicate_vertices;
use super::{OperationResult, Twist};
use crate::error::{Error, Result};
use crate::geom::{angle_between, rotate_around, Ray, Vec3};
use crate::polyhedron::{FIndex, Face, Polyhedron, VIndex};

#[derive(Clone, Copy)]
enum Band {
    Prism,
    Antiprism(Twist),
}

fn largest_face(polyhedron: &Polyhedron) -> Result<Face<'_>> {
    polyhedron
        .largest_face()
        .ok_or_else(|| Error::classification("polyhedron has no faces"))
}

/// Lift a copy of the largest face off the body and join the two with `band`.
fn insert_band(polyhedron: &Polyhedron, band: Band) -> Result<OperationResult> {
    let base = largest_face(polyhedron)?;
    let n = base.num_sides();
    let side = base.edge_length();
    let normal = base.normal();
    let axis = base.normal_ray();
    let radius = (polyhedron.vertex(base.vertex_indices()[0]) - base.centroid()).norm();
    let (height, turn) = match band {
        Band::Prism => (side, 0.0),
        Band::Antiprism(twist) => {
            let chord = 2.0 * radius * (PI / (2.0 * n as f64)).sin();
            let h2 = side * side - chord * chord;
            if h2 <= 0.0 {
                return Err(Error::degenerate(format!("no antiprism band fits a {n}-gon")));
            }
            (h2.sqrt(), twist.sign() * PI / n as f64)
        }
    };
    debug!(n, height, turn, "insert band");

    let bottom: Vec<VIndex> = base.vertex_indices().to_vec();
    let first = polyhedron.num_vertices();
    let top: Vec<VIndex> = (first..first + n).collect();
    let top_coords: Vec<Vec3> = bottom
        .iter()
        .map(|&v| rotate_around(polyhedron.vertex(v), &axis, turn) + normal * height)
        .collect();

    let mut faces: Vec<Vec<VIndex>> = polyhedron.faces().to_vec();
    faces[base.index()] = top.clone();
    for i in 0..n {
        let j = (i + 1) % n;
        let (b0, b1, t0, t1) = (bottom[i], bottom[j], top[i], top[j]);
        match band {
            Band::Prism => faces.push(vec![b0, b1, t1, t0]),
            // t_i sits over edge b_i b_{i+1}
            Band::Antiprism(Twist::Left) => {
                faces.push(vec![b0, b1, t0]);
                faces.push(vec![b1, t1, t0]);
            }
            // t_{i+1} sits over edge b_i b_{i+1}
            Band::Antiprism(Twist::Right) => {
                faces.push(vec![b0, b1, t1]);
                faces.push(vec![b0, t1, t0]);
            }
        }
    }

    let collapsed: Vec<Vec3> = bottom.iter().map(|&v| polyhedron.vertex(v)).collect();
    let start = polyhedron.add_vertices(&collapsed).with_faces(faces);
    let mut end_vertices = polyhedron.vertices().to_vec();
    end_vertices.extend(top_coords);
    let result = Polyhedron::of(end_vertices.clone(), start.faces().to_vec())?;
    Ok(OperationResult::new(result, start, end_vertices))
}

/// Insert a prism band under the largest face.
pub fn elongate(polyhedron: &Polyhedron) -> Result<OperationResult> {
    insert_band(polyhedron, Band::Prism)
}

/// Insert an antiprism band under the largest face, turned by `twist`
/// (default left).
pub fn gyroelongate(polyhedron: &Polyhedron, twist: Option<Twist>) -> Result<OperationResult> {
    insert_band(polyhedron, Band::Antiprism(twist.unwrap_or_default()))
}

/// Faces across every side of `face` are all squares or all triangles.
fn is_band_end(face: Face<'_>) -> bool {
    let sides: Vec<usize> = face.adjacent_faces().iter().map(|f| f.num_sides()).collect();
    sides.len() == face.num_sides() && (sides.iter().all(|&s| s == 4) || sides.iter().all(|&s| s == 3))
}

/// Far ring of the band under `end`, if `end` really caps a prism or
/// antiprism band sitting on more of the solid.
///
/// The faces touching `end` must be exactly the band (`n` squares or `2n`
/// triangles) and their other vertices must form an `n`-ring that is not
/// itself a face, otherwise the band is the whole solid.
fn band_ring(end: Face<'_>) -> Option<Vec<VIndex>> {
    if !is_band_end(end) {
        return None;
    }
    let polyhedron = end.polyhedron();
    let n = end.num_sides();
    let own = end.vertex_indices();
    let mut band: Vec<FIndex> = own
        .iter()
        .flat_map(|&v| polyhedron.adjacent_face_indices(v))
        .filter(|&f| f != end.index())
        .collect();
    band.sort_unstable();
    band.dedup();
    let sides = end.adjacent_faces()[0].num_sides();
    let per_side = if sides == 4 { 1 } else { 2 };
    if band.len() != per_side * n || band.iter().any(|&f| polyhedron.num_sides(f) != sides) {
        return None;
    }

    let mut ring: Vec<VIndex> = Vec::with_capacity(n);
    for &f in &band {
        for &v in &polyhedron.faces()[f] {
            if !own.contains(&v) && !ring.contains(&v) {
                ring.push(v);
            }
        }
    }
    let closes_solid = polyhedron
        .faces()
        .iter()
        .any(|face| face.len() == ring.len() && face.iter().all(|v| ring.contains(v)));
    (ring.len() == n && !closes_solid).then_some(ring)
}

/// Remove a prism or antiprism band by sliding the face at its end onto the
/// far ring.
pub fn shorten(polyhedron: &Polyhedron) -> Result<OperationResult> {
    let mut found: Option<(Face<'_>, Vec<VIndex>)> = None;
    for f in polyhedron.faces_iter() {
        if found.as_ref().is_some_and(|(e, _)| f.num_sides() <= e.num_sides()) {
            continue;
        }
        if let Some(ring) = band_ring(f) {
            found = Some((f, ring));
        }
    }
    let (end, ring) =
        found.ok_or_else(|| Error::classification("no face sits on a prism or antiprism band"))?;

    let own = end.vertex_indices();
    let plane = end.plane();
    let height = ring
        .iter()
        .map(|&v| -plane.signed_distance(&polyhedron.vertex(v)))
        .sum::<f64>()
        / ring.len() as f64;
    if height <= 0.0 {
        return Err(Error::degenerate("band has no height"));
    }

    let normal = end.normal();
    let center = end.centroid() - normal * height;
    let lowered0 = polyhedron.vertex(own[0]) - normal * height;
    let target = ring
        .iter()
        .map(|&v| polyhedron.vertex(v))
        .min_by(|a, b| (a - lowered0).norm().total_cmp(&(b - lowered0).norm()))
        .ok_or_else(|| Error::topology("band has no far ring"))?;
    let turn = angle_between(&(lowered0 - center), &(target - center), Some(&normal));
    debug!(n = end.num_sides(), height, turn, "shorten");

    let axis = Ray::new(center, normal);
    let end_vertices: Vec<Vec3> = polyhedron
        .vertices()
        .iter()
        .enumerate()
        .map(|(v, p)| {
            if own.contains(&v) {
                rotate_around(p - normal * height, &axis, turn)
            } else {
                *p
            }
        })
        .collect();
    let result = deduplicate_vertices(&polyhedron.with_vertices(end_vertices.clone()));
    if result.num_faces() < 4 {
        return Err(Error::degenerate("shortening left no solid"));
    }
    Ok(OperationResult::from_moved(polyhedron, end_vertices, result))
}

//! Truncation and rectification.
//!
//! Both cut every vertex off along its edges. Each vertex `v` of degree `k` is
//! replaced by `k` copies, one per outgoing edge `v→w`; an `n`-gon becomes a
//! `2n`-gon over those copies and each vertex gains a `k`-gon. The copies start
//! on `v` and slide a fraction `t` of the way along their edge.

use std::collections::HashMap;
use std::f64::consts::PI;

use tracing::debug;

use super::utils::deduplicate_vertices;
use super::OperationResult;
use crate::error::{Error, Result};
use crate::geom::Vec3;
use crate::polyhedron::{Polyhedron, VIndex};

struct TruncateLayout {
    start: Polyhedron,
    /// Directed edge `(v, w)` of each copy, by copy index.
    edges: Vec<(VIndex, VIndex)>,
}

fn truncate_layout(polyhedron: &Polyhedron) -> Result<TruncateLayout> {
    let mut edges = Vec::new();
    let mut copy_of: HashMap<(VIndex, VIndex), VIndex> = HashMap::new();
    for face in polyhedron.faces() {
        let k = face.len();
        for i in 0..k {
            let e = (face[i], face[(i + 1) % k]);
            copy_of.insert(e, edges.len());
            edges.push(e);
        }
    }
    let copy = |v: VIndex, w: VIndex| {
        copy_of
            .get(&(v, w))
            .copied()
            .ok_or_else(|| Error::topology(format!("edge {v}→{w} has no twin")))
    };

    let mut faces = Vec::with_capacity(polyhedron.num_faces() + polyhedron.num_vertices());
    for face in polyhedron.faces() {
        let k = face.len();
        let mut new_face = Vec::with_capacity(2 * k);
        for i in 0..k {
            let (prev, v, next) = (face[(i + k - 1) % k], face[i], face[(i + 1) % k]);
            new_face.push(copy(v, prev)?);
            new_face.push(copy(v, next)?);
        }
        faces.push(new_face);
    }
    for v in 0..polyhedron.num_vertices() {
        let vertex_face = polyhedron
            .vertex_face_cycle(v)?
            .into_iter()
            .map(|f| {
                let face = polyhedron.face(f);
                let next = face.edges().into_iter().find(|e| e.source() == v).map(|e| e.target());
                next.map_or_else(
                    || Err(Error::topology(format!("vertex {v} missing from face {f}"))),
                    |w| copy(v, w),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        faces.push(vertex_face);
    }

    let vertices = edges.iter().map(|&(v, _)| polyhedron.vertex(v)).collect();
    Ok(TruncateLayout {
        start: Polyhedron::from_parts(vertices, faces),
        edges,
    })
}

fn cut(polyhedron: &Polyhedron, t: f64) -> Result<OperationResult> {
    let layout = truncate_layout(polyhedron)?;
    let end_vertices: Vec<Vec3> = layout
        .edges
        .iter()
        .map(|&(v, w)| {
            let (a, b) = (polyhedron.vertex(v), polyhedron.vertex(w));
            a + (b - a) * t
        })
        .collect();
    let result = deduplicate_vertices(&layout.start.with_vertices(end_vertices.clone()));
    Ok(OperationResult::new(result, layout.start, end_vertices))
}

/// Cut each vertex so that the faces become regular `2n`-gons, `n` being the
/// fewest sides present. Solids with several face types get the same cut
/// everywhere.
pub fn truncate(polyhedron: &Polyhedron) -> Result<OperationResult> {
    let n = polyhedron
        .smallest_face()
        .map(|f| f.num_sides())
        .ok_or_else(|| Error::classification("cannot truncate a polyhedron without faces"))?;
    let t = 1.0 / (2.0 + 2.0 * (PI / n as f64).cos());
    debug!(n, t, "truncate");
    cut(polyhedron, t)
}

/// Cut each vertex down to the edge midpoints.
pub fn rectify(polyhedron: &Polyhedron) -> Result<OperationResult> {
    cut(polyhedron, 0.5)
}

//! Contraction: the inverse of expand and snub.

use std::f64::consts::PI;

use tracing::debug;

use super::utils::{
    deduplicate_vertices, expansion_type, get_resized_vertices, get_snub_angle, is_expanded_face,
    ExpansionType,
};
use super::{OperationResult, Twist};
use crate::cfg::PRECISION;
use crate::error::{Error, Result};
use crate::formes::opposite_face;
use crate::geom::angle_between;
use crate::polyhedron::{FIndex, Polyhedron};

fn shares_vertex(polyhedron: &Polyhedron, a: FIndex, b: FIndex) -> bool {
    let fb = &polyhedron.faces()[b];
    polyhedron.faces()[a].iter().any(|v| fb.contains(v))
}

/// Expanded `n`-gons reachable from `f0` by hopping to the face opposite each
/// edge. Errors if a hop lands on an `n`-gon touching one already taken.
fn walk_opposite(
    polyhedron: &Polyhedron,
    f0: FIndex,
    n: usize,
    twist: Option<Twist>,
) -> Result<Vec<FIndex>> {
    let mut chosen = vec![f0];
    let mut queue = vec![f0];
    while let Some(f) = queue.pop() {
        for e in polyhedron.face(f).edges() {
            let g = opposite_face(&e, twist)?;
            if chosen.contains(&g.index()) || !is_expanded_face(polyhedron, g, Some(n)) {
                continue;
            }
            if let Some(&other) = chosen.iter().find(|&&c| shares_vertex(polyhedron, c, g.index())) {
                return Err(Error::topology(format!(
                    "faces {other} and {} overlap; cannot contract both",
                    g.index()
                )));
            }
            chosen.push(g.index());
            queue.push(g.index());
        }
    }
    Ok(chosen)
}

fn contract_faces(
    polyhedron: &Polyhedron,
    f0: FIndex,
    n: usize,
    kind: ExpansionType,
    twist: Option<Twist>,
) -> Result<Vec<FIndex>> {
    let mut chosen = match (kind, twist) {
        (ExpansionType::Cantellate, _) => walk_opposite(polyhedron, f0, n, None)?,
        (ExpansionType::Snub, Some(t)) => walk_opposite(polyhedron, f0, n, Some(t))?,
        (ExpansionType::Snub, None) => walk_opposite(polyhedron, f0, n, Some(Twist::Left))
            .or_else(|_| walk_opposite(polyhedron, f0, n, Some(Twist::Right)))?,
    };
    // faces the walk did not reach, as long as they stay clear of the rest
    for face in polyhedron.faces_iter() {
        let f = face.index();
        if chosen.contains(&f) || !is_expanded_face(polyhedron, face, Some(n)) {
            continue;
        }
        if chosen.iter().all(|&c| !shares_vertex(polyhedron, c, f)) {
            chosen.push(f);
        }
    }
    chosen.sort_unstable();
    Ok(chosen)
}

/// Shrink an expanded or snub solid back onto the faces with `face_type`
/// sides (default: the fewest among expanded faces), collapsing the rest
/// (rhombicuboctahedron → cube or octahedron, snub cube → cube).
pub fn contract(
    polyhedron: &Polyhedron,
    face_type: Option<usize>,
    twist: Option<Twist>,
) -> Result<OperationResult> {
    let kind = expansion_type(polyhedron);
    let n = match face_type {
        Some(n) => n,
        None => polyhedron
            .faces_iter()
            .filter(|&f| is_expanded_face(polyhedron, f, None))
            .map(|f| f.num_sides())
            .min()
            .ok_or_else(|| Error::classification("no expanded face to contract onto"))?,
    };
    let f0 = polyhedron
        .faces_iter()
        .find(|&f| is_expanded_face(polyhedron, f, Some(n)))
        .ok_or_else(|| Error::classification(format!("no expanded {n}-gon to contract onto")))?;
    let chosen = contract_faces(polyhedron, f0.index(), n, kind, twist)?;
    debug!(n, ?kind, faces = chosen.len(), "contract");

    // the contracted solid has the chosen faces adjacent with their current
    // normals; α is read off f0 and its nearest chosen neighbour
    let c0 = f0.centroid();
    let nearest = chosen
        .iter()
        .copied()
        .filter(|&f| f != f0.index())
        .min_by(|&a, &b| {
            let da = (polyhedron.face_centroid(a) - c0).norm();
            let db = (polyhedron.face_centroid(b) - c0).norm();
            da.total_cmp(&db)
        })
        .ok_or_else(|| Error::classification("contract needs at least two faces"))?;
    let alpha = angle_between(&f0.normal(), &polyhedron.face_normal(nearest), None);
    if alpha >= PI - PRECISION {
        return Err(Error::degenerate("faces to contract onto are parallel"));
    }
    let resized_length = 1.0 / (2.0 * (PI / n as f64).tan() * (alpha / 2.0).tan());

    let end_vertices = match kind {
        ExpansionType::Cantellate => get_resized_vertices(polyhedron, &chosen, resized_length, 0.0),
        ExpansionType::Snub => {
            let magnitude = get_snub_angle(polyhedron, n)?.abs();
            // undo the turn in whichever direction closes the gaps
            let candidates = [magnitude, -magnitude].map(|angle| {
                let moved = get_resized_vertices(polyhedron, &chosen, resized_length, angle);
                let merged = deduplicate_vertices(&polyhedron.with_vertices(moved.clone())).num_vertices();
                (moved, merged)
            });
            let [(a, merged_a), (b, merged_b)] = candidates;
            debug!(angle = magnitude, merged_a, merged_b, "contract: snub turn");
            if merged_a <= merged_b {
                a
            } else {
                b
            }
        }
    };
    let result = deduplicate_vertices(&polyhedron.with_vertices(end_vertices.clone()));
    if result.num_faces() == polyhedron.num_faces() {
        return Err(Error::degenerate("contracting merged no vertices"));
    }
    if result.num_faces() < 4 {
        return Err(Error::degenerate("contracting left no solid"));
    }
    Ok(OperationResult::from_moved(polyhedron, end_vertices, result))
}

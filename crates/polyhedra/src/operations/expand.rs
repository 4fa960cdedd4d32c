//! Expansion, snubbing and duals.
//!
//! All three pull the faces apart: every face gets private copies of its
//! vertices, every edge gains a quad between the two faces' copies and every
//! vertex gains a face over its copies. Expansion pushes the faces outwards
//! until those quads are squares; snubbing also turns each face and splits the
//! quads into triangles; the dual moves each face's copies to its pole, which
//! collapses everything but the vertex faces.

use tracing::debug;

use super::utils::{deduplicate_vertices, get_resized_vertices};
use super::{OperationResult, Twist};
use crate::cfg::{SOLVER_ITERATIONS, SOLVER_SCAN_STEPS};
use crate::error::{Error, Result};
use crate::geom::{rotate_around, Ray, Vec3};
use crate::polyhedron::{FIndex, Polyhedron, VIndex};

struct ExpandLayout {
    /// Original faces over the copies, then edge quads, then vertex faces.
    faces: Vec<Vec<VIndex>>,
    vertices: Vec<Vec3>,
    /// Copy index of `faces[f][0]`; copies of a face are contiguous.
    offsets: Vec<VIndex>,
    /// Range of `faces` holding the edge quads.
    quads: std::ops::Range<usize>,
}

impl ExpandLayout {
    fn new(polyhedron: &Polyhedron) -> Result<Self> {
        let mut offsets = Vec::with_capacity(polyhedron.num_faces());
        let mut vertices = Vec::new();
        for face in polyhedron.faces() {
            offsets.push(vertices.len());
            vertices.extend(face.iter().map(|&v| polyhedron.vertex(v)));
        }
        let copy = |f: FIndex, v: VIndex| -> Result<VIndex> {
            polyhedron.faces()[f]
                .iter()
                .position(|&x| x == v)
                .map(|i| offsets[f] + i)
                .ok_or_else(|| Error::topology(format!("vertex {v} missing from face {f}")))
        };

        let mut faces: Vec<Vec<VIndex>> = (0..polyhedron.num_faces())
            .map(|f| (0..polyhedron.num_sides(f)).map(|i| offsets[f] + i).collect())
            .collect();
        let quads_start = faces.len();
        for e in polyhedron.edges() {
            let (u, v, f) = (e.source(), e.target(), e.face_index());
            let g = e.twin()?.face_index();
            faces.push(vec![copy(f, v)?, copy(f, u)?, copy(g, u)?, copy(g, v)?]);
        }
        let quads = quads_start..faces.len();
        for v in 0..polyhedron.num_vertices() {
            let vertex_face = polyhedron
                .vertex_face_cycle(v)?
                .into_iter()
                .map(|f| copy(f, v))
                .collect::<Result<Vec<_>>>()?;
            faces.push(vertex_face);
        }
        Ok(Self {
            faces,
            vertices,
            offsets,
            quads,
        })
    }

    fn start(&self) -> Polyhedron {
        Polyhedron::from_parts(self.vertices.clone(), self.faces.clone())
    }

    /// Copies after turning every original face by `angle` and pushing it
    /// out by `push`.
    fn moved(&self, push: f64, angle: f64) -> Vec<Vec3> {
        let start = self.start();
        let f0 = start.face(0);
        let side = f0.edge_length();
        let resized_length = (f0.distance_to_center() + push) / side;
        let faces: Vec<FIndex> = (0..self.offsets.len()).collect();
        get_resized_vertices(&start, &faces, resized_length, angle)
    }
}

/// Angle between the normals of the two faces on the first edge of face 0.
fn normal_angle(polyhedron: &Polyhedron) -> Result<f64> {
    let face = &polyhedron.faces()[0];
    Ok(std::f64::consts::PI - polyhedron.dihedral_angle(face[0], face[1])?)
}

fn require_single_face_type(polyhedron: &Polyhedron, operation: &str) -> Result<usize> {
    match polyhedron.face_types().as_slice() {
        [n] => Ok(*n),
        [] => Err(Error::classification(format!("cannot {operation} a polyhedron without faces"))),
        types => Err(Error::classification(format!(
            "{operation} needs a single face type, found {types:?}"
        ))),
    }
}

/// How far each face moves out so that the copies of a vertex on two
/// adjacent faces end one side length apart.
fn expanded_push(polyhedron: &Polyhedron) -> Result<f64> {
    let alpha = normal_angle(polyhedron)?;
    Ok(polyhedron.edge_length() / (2.0 * (alpha / 2.0).sin()))
}

/// Push all faces apart until the gaps across edges and around vertices are
/// regular (cube → rhombicuboctahedron).
pub fn expand(polyhedron: &Polyhedron) -> Result<OperationResult> {
    require_single_face_type(polyhedron, "expand")?;
    let layout = ExpandLayout::new(polyhedron)?;
    let end_vertices = layout.moved(expanded_push(polyhedron)?, 0.0);
    let start = layout.start();
    let result = deduplicate_vertices(&start.with_vertices(end_vertices.clone()));
    Ok(OperationResult::new(result, start, end_vertices))
}

/// One edge `u→v` of face `f` with its twin face `g`, as used by the solver.
struct SnubProbe {
    u: Vec3,
    v: Vec3,
    ray_f: Ray,
    ray_g: Ray,
    side: f64,
}

impl SnubProbe {
    fn new(polyhedron: &Polyhedron) -> Result<Self> {
        let face = polyhedron.face(0);
        let e = face.edges()[0];
        let g = e.twin_face()?;
        let (u, v) = e.endpoints();
        Ok(Self {
            u,
            v,
            ray_f: face.normal_ray(),
            ray_g: g.normal_ray(),
            side: e.length(),
        })
    }

    fn place(p: Vec3, ray: &Ray, theta: f64, push: f64) -> Vec3 {
        rotate_around(p, ray, theta) + ray.direction * push
    }

    /// Copies of `u` and `v` on both faces after turning by `theta` and
    /// pushing out by `push`.
    fn moved(&self, theta: f64, push: f64) -> [Vec3; 4] {
        [
            Self::place(self.u, &self.ray_f, theta, push),
            Self::place(self.v, &self.ray_f, theta, push),
            Self::place(self.u, &self.ray_g, theta, push),
            Self::place(self.v, &self.ray_g, theta, push),
        ]
    }

    /// Length of the quad side joining the two copies of `u`.
    fn gap(&self, theta: f64, push: f64) -> f64 {
        let [fu, _, gu, _] = self.moved(theta, push);
        (fu - gu).norm()
    }

    /// Shorter quad diagonal.
    fn diagonal(&self, theta: f64, push: f64) -> f64 {
        let [fu, fv, gu, gv] = self.moved(theta, push);
        (fu - gv).norm().min((fv - gu).norm())
    }

    /// Push at which the gap equals the side length, by bisection.
    fn push_for(&self, theta: f64) -> Option<f64> {
        let (mut lo, mut hi) = (0.0, 4.0 * self.side);
        if self.gap(theta, lo) > self.side || self.gap(theta, hi) < self.side {
            return None;
        }
        for _ in 0..SOLVER_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.gap(theta, mid) < self.side {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }

    fn excess(&self, theta: f64) -> Option<f64> {
        let push = self.push_for(theta)?;
        Some(self.diagonal(theta, push) - self.side)
    }

    /// Turn angle in `(0, π/n)` and push for which the gap and the shorter
    /// diagonal both equal the side length.
    fn solve(&self, n: usize) -> Option<(f64, f64)> {
        let max = std::f64::consts::PI / n as f64;
        let step = max / SOLVER_SCAN_STEPS as f64;
        let mut prev: Option<(f64, f64)> = None;
        for k in 1..SOLVER_SCAN_STEPS {
            let theta = step * k as f64;
            let Some(excess) = self.excess(theta) else {
                prev = None;
                continue;
            };
            if let Some((lo, lo_excess)) = prev {
                if lo_excess > 0.0 && excess <= 0.0 {
                    let theta = self.bisect(lo, theta)?;
                    return Some((theta, self.push_for(theta)?));
                }
            }
            prev = Some((theta, excess));
        }
        None
    }

    fn bisect(&self, mut lo: f64, mut hi: f64) -> Option<f64> {
        for _ in 0..SOLVER_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.excess(mid)? > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }
}

/// Expand while turning every face by the same angle, splitting each edge
/// quad along its shorter diagonal (cube → snub cube).
pub fn snub(polyhedron: &Polyhedron, twist: Option<Twist>) -> Result<OperationResult> {
    let n = require_single_face_type(polyhedron, "snub")?;
    let twist = twist.unwrap_or_default();
    let layout = ExpandLayout::new(polyhedron)?;
    let probe = SnubProbe::new(polyhedron)?;
    let (theta, push) = probe
        .solve(n)
        .ok_or_else(|| Error::degenerate("no snub rotation makes all edges equal"))?;
    let angle = twist.sign() * theta;
    debug!(theta, push, ?twist, "snub: solved rotation");

    let end_vertices = layout.moved(push, angle);

    let mut faces = Vec::with_capacity(layout.faces.len() + layout.quads.len());
    for (i, face) in layout.faces.iter().enumerate() {
        if !layout.quads.contains(&i) {
            faces.push(face.clone());
            continue;
        }
        let [a, b, c, d] = [face[0], face[1], face[2], face[3]];
        let ac = (end_vertices[a] - end_vertices[c]).norm();
        let bd = (end_vertices[b] - end_vertices[d]).norm();
        if ac < bd {
            faces.push(vec![a, b, c]);
            faces.push(vec![a, c, d]);
        } else {
            faces.push(vec![a, b, d]);
            faces.push(vec![b, c, d]);
        }
    }
    let start = Polyhedron::from_parts(layout.vertices.clone(), faces);
    let result = deduplicate_vertices(&start.with_vertices(end_vertices.clone()));
    Ok(OperationResult::new(result, start, end_vertices))
}

/// Polar reciprocal about the midsphere: faces become vertices and vertices
/// faces (cube ↔ octahedron).
pub fn dual(polyhedron: &Polyhedron) -> Result<OperationResult> {
    let layout = ExpandLayout::new(polyhedron)?;
    let center = polyhedron.centroid();
    let edges = polyhedron.edges();
    if edges.is_empty() {
        return Err(Error::classification("cannot take the dual of a polyhedron without edges"));
    }
    let radius2 = {
        let r = edges.iter().map(|e| (e.midpoint() - center).norm()).sum::<f64>() / edges.len() as f64;
        r * r
    };
    let mut end_vertices = layout.vertices.clone();
    for face in polyhedron.faces_iter() {
        let normal = face.normal();
        let distance = normal.dot(&(face.centroid() - center));
        if distance <= 0.0 {
            return Err(Error::degenerate(format!(
                "face {} does not face away from the center",
                face.index()
            )));
        }
        let pole = center + normal * (radius2 / distance);
        let offset = layout.offsets[face.index()];
        for i in 0..face.num_sides() {
            end_vertices[offset + i] = pole;
        }
    }
    let start = layout.start();
    let result = deduplicate_vertices(&start.with_vertices(end_vertices.clone()));
    Ok(OperationResult::new(result, start, end_vertices))
}

//! Seed solids for tests and benches.
//!
//! Seeds are built from coordinates only: faces come from a brute-force
//! convex hull (every plane through three points with all others on one
//! side), ordered counterclockwise about the outward normal. Fine for the
//! few dozen vertices used here.

use std::collections::BTreeSet;

use nalgebra::vector;

use crate::geom::{centroid, Plane, Vec3};
use crate::polyhedron::Polyhedron;

const HULL_EPS: f64 = 1e-6;

pub const PHI: f64 = 1.618_033_988_749_895;

pub fn hull(points: Vec<Vec3>) -> Polyhedron {
    let c = centroid(&points);
    let n = points.len();
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut faces = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let Some(plane) = Plane::from_points(points[i], points[j], points[k]) else {
                    continue;
                };
                let side: Vec<f64> = points.iter().map(|p| plane.signed_distance(p)).collect();
                let above = side.iter().any(|&d| d > HULL_EPS);
                let below = side.iter().any(|&d| d < -HULL_EPS);
                if above && below {
                    continue;
                }
                let members: Vec<usize> = (0..n).filter(|&m| side[m].abs() <= HULL_EPS).collect();
                if !seen.insert(members.clone()) {
                    continue;
                }
                let mut normal = plane.normal;
                if normal.dot(&(points[i] - c)) < 0.0 {
                    normal = -normal;
                }
                let pts: Vec<Vec3> = members.iter().map(|&m| points[m]).collect();
                let fc = centroid(&pts);
                let u = (points[members[0]] - fc).normalize();
                let w = normal.cross(&u);
                let mut ordered = members;
                ordered.sort_by(|&a, &b| {
                    let pa = points[a] - fc;
                    let pb = points[b] - fc;
                    let ta = pa.dot(&w).atan2(pa.dot(&u));
                    let tb = pb.dot(&w).atan2(pb.dot(&u));
                    ta.partial_cmp(&tb).unwrap()
                });
                faces.push(ordered);
            }
        }
    }
    Polyhedron::of(points, faces).unwrap()
}

/// All sign combinations of a coordinate triple (zeros are not doubled).
fn signs(p: [f64; 3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::new();
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                let q = vector![p[0] * sx, p[1] * sy, p[2] * sz];
                if !out.iter().any(|o| (o - q).norm() < 1e-9) {
                    out.push(q);
                }
            }
        }
    }
    out
}

fn cyclic(p: [f64; 3]) -> Vec<Vec3> {
    [[p[0], p[1], p[2]], [p[1], p[2], p[0]], [p[2], p[0], p[1]]]
        .into_iter()
        .flat_map(signs)
        .collect()
}

fn all_perms(p: [f64; 3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::new();
    let perms = [
        [p[0], p[1], p[2]],
        [p[0], p[2], p[1]],
        [p[1], p[0], p[2]],
        [p[1], p[2], p[0]],
        [p[2], p[0], p[1]],
        [p[2], p[1], p[0]],
    ];
    for q in perms.into_iter().flat_map(signs) {
        if !out.iter().any(|o| (o - q).norm() < 1e-9) {
            out.push(q);
        }
    }
    out
}

pub fn tetrahedron() -> Polyhedron {
    hull(vec![
        vector![1.0, 1.0, 1.0],
        vector![1.0, -1.0, -1.0],
        vector![-1.0, 1.0, -1.0],
        vector![-1.0, -1.0, 1.0],
    ])
}

pub fn cube() -> Polyhedron {
    hull(signs([1.0, 1.0, 1.0]))
}

pub fn octahedron() -> Polyhedron {
    hull(cyclic([1.0, 0.0, 0.0]))
}

pub fn cuboctahedron() -> Polyhedron {
    hull(cyclic([1.0, 1.0, 0.0]))
}

pub fn icosahedron() -> Polyhedron {
    hull(cyclic([0.0, 1.0, PHI]))
}

pub fn dodecahedron() -> Polyhedron {
    let mut pts = signs([1.0, 1.0, 1.0]);
    pts.extend(cyclic([0.0, 1.0 / PHI, PHI]));
    hull(pts)
}

pub fn rhombicuboctahedron() -> Polyhedron {
    hull(all_perms([1.0, 1.0, 1.0 + std::f64::consts::SQRT_2]))
}

pub fn icosidodecahedron() -> Polyhedron {
    let mut pts = cyclic([0.0, 0.0, PHI]);
    pts.extend(cyclic([0.5, PHI / 2.0, PHI * PHI / 2.0]));
    hull(pts)
}

/// Square pyramid with edge 2, base on z = 0.
pub fn square_pyramid() -> Polyhedron {
    let mut pts: Vec<Vec3> = signs([1.0, 1.0, 0.0]);
    pts.push(vector![0.0, 0.0, std::f64::consts::SQRT_2]);
    hull(pts)
}

/// Regular n-gonal prism with unit edge.
pub fn prism(n: usize) -> Polyhedron {
    let r = 0.5 / (std::f64::consts::PI / n as f64).sin();
    let mut pts = Vec::new();
    for z in [-0.5, 0.5] {
        for k in 0..n {
            let t = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
            pts.push(vector![r * t.cos(), r * t.sin(), z]);
        }
    }
    hull(pts)
}

/// Count faces by side count: `(sides, count)` sorted by sides.
pub fn face_census(p: &Polyhedron) -> Vec<(usize, usize)> {
    p.face_types()
        .into_iter()
        .map(|n| (n, p.faces().iter().filter(|f| f.len() == n).count()))
        .collect()
}

/// Every edge length equals the first one.
pub fn all_edges_equal(p: &Polyhedron, tol: f64) -> bool {
    let edges = p.edges();
    let len = edges[0].length();
    edges.iter().all(|e| (e.length() - len).abs() < tol)
}

/// Every face is planar and every vertex sits on or behind every face plane.
pub fn is_convex(p: &Polyhedron, tol: f64) -> bool {
    p.faces_iter().all(|f| {
        let plane = f.plane();
        p.vertices().iter().all(|v| plane.signed_distance(v) < tol)
    })
}

/// Euler characteristic V − E + F.
pub fn euler_characteristic(p: &Polyhedron) -> i64 {
    p.num_vertices() as i64 - p.edges().len() as i64 + p.num_faces() as i64
}

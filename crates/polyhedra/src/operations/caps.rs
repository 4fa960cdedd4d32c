//! Caps: pyramids, cupolae and the pentagonal rotunda, built onto a base
//! face or found on an existing solid.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::cfg::PRECISION;
use crate::error::{Error, Result};
use crate::geom::{centroid, newell_normal, Plane, Vec3};
use crate::polyhedron::{FIndex, Face, Polyhedron, VIndex};

/// Pentagonal rotunda with unit edge: (radius, height) of the middle ring
/// and of the top pentagon.
const ROTUNDA_MIDDLE: (f64, f64) = (1.376_381_920_471_173_5, 0.850_650_808_352_039_9);
const ROTUNDA_TOP: (f64, f64) = (0.850_650_808_352_039_9, 1.376_381_920_471_173_5);

/// Cap shape, spelled `Y3`..`Y5`, `U2`..`U5`, `R5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Using {
    /// Pyramid over an `n`-gon.
    Pyramid(usize),
    /// Cupola with an `n`-gon top over a `2n`-gon.
    Cupola(usize),
    /// Pentagonal rotunda over a decagon.
    Rotunda,
}

impl Using {
    /// Side count of the face the cap stands on.
    pub fn base_sides(self) -> usize {
        match self {
            Using::Pyramid(n) => n,
            Using::Cupola(n) => 2 * n,
            Using::Rotunda => 10,
        }
    }

    /// The cap that fits a base with `sides` sides, when only one does.
    pub fn infer(sides: usize) -> Result<Self> {
        match sides {
            3..=5 => Ok(Using::Pyramid(sides)),
            6 | 8 => Ok(Using::Cupola(sides / 2)),
            10 => Err(Error::ambiguous("a decagon takes a cupola or a rotunda; pass `using`")),
            _ => Err(Error::invalid_option("augment", format!("no cap fits a {sides}-gon"))),
        }
    }

    /// Cupolae and rotundae can be turned on their base.
    pub fn can_gyrate(self) -> bool {
        !matches!(self, Using::Pyramid(_))
    }
}

impl fmt::Display for Using {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Using::Pyramid(n) => write!(f, "Y{n}"),
            Using::Cupola(n) => write!(f, "U{n}"),
            Using::Rotunda => f.write_str("R5"),
        }
    }
}

impl FromStr for Using {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Y3" => Ok(Using::Pyramid(3)),
            "Y4" => Ok(Using::Pyramid(4)),
            "Y5" => Ok(Using::Pyramid(5)),
            "U2" => Ok(Using::Cupola(2)),
            "U3" => Ok(Using::Cupola(3)),
            "U4" => Ok(Using::Cupola(4)),
            "U5" => Ok(Using::Cupola(5)),
            "R5" => Ok(Using::Rotunda),
            _ => Err(Error::invalid_option("using", format!("unknown cap `{s}`"))),
        }
    }
}

/// New vertices and faces of a cap standing on `base`.
///
/// `offset` (0 or 1) picks which alternate base edges carry the cap's
/// triangles; pyramids ignore it. New vertices are numbered from
/// `base.polyhedron().num_vertices()`.
pub(crate) struct CapBuild {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Vec<VIndex>>,
}

pub(crate) fn build_cap(base: Face<'_>, using: Using, offset: usize) -> CapBuild {
    let b = base.vertex_indices();
    let m = b.len();
    let side = base.edge_length();
    let center = base.centroid();
    let normal = base.normal();
    let first = base.polyhedron().vertex(b[0]) - center;
    let radius = first.norm();
    let e1 = first / radius;
    let e2 = normal.cross(&e1);
    // point at `angle` (in base steps from b_0), distance `r` from the axis, height `h`
    let at = |steps: f64, r: f64, h: f64| {
        let t = 2.0 * PI * steps / m as f64;
        center + e1 * (r * t.cos()) + e2 * (r * t.sin()) + normal * h
    };
    let next = base.polyhedron().num_vertices();
    let bi = |k: usize| b[k % m];

    match using {
        Using::Pyramid(_) => {
            let apex = center + normal * (side * side - radius * radius).max(0.0).sqrt();
            let faces = (0..m).map(|i| vec![bi(i), bi(i + 1), next]).collect();
            CapBuild {
                vertices: vec![apex],
                faces,
            }
        }
        Using::Cupola(n) => {
            let r = side / (2.0 * (PI / n as f64).sin());
            let apothem = side / (2.0 * (PI / m as f64).tan());
            let h = (0.75 * side * side - (apothem - r).powi(2)).max(0.0).sqrt();
            let vertices = (0..n)
                .map(|j| at((2 * j + offset) as f64 + 0.5, r, h))
                .collect();
            let t = |j: usize| next + j % n;
            let mut faces = Vec::new();
            for j in 0..n {
                let k = 2 * j + offset;
                faces.push(vec![bi(k), bi(k + 1), t(j)]);
                faces.push(vec![bi(k + 1), bi(k + 2), t(j + 1), t(j)]);
            }
            if n >= 3 {
                faces.push((0..n).map(t).collect());
            }
            CapBuild { vertices, faces }
        }
        Using::Rotunda => {
            let (rm, hm) = ROTUNDA_MIDDLE;
            let (rt, ht) = ROTUNDA_TOP;
            let mut vertices: Vec<Vec3> = (0..5)
                .map(|j| at((2 * j + offset) as f64 + 0.5, rm * side, hm * side))
                .collect();
            vertices.extend((0..5).map(|j| at((2 * j + offset) as f64 + 1.5, rt * side, ht * side)));
            let mid = |j: usize| next + j % 5;
            let top = |j: usize| next + 5 + j % 5;
            let mut faces = Vec::new();
            for j in 0..5 {
                let k = 2 * j + offset;
                faces.push(vec![bi(k), bi(k + 1), mid(j)]);
                faces.push(vec![bi(k + 1), bi(k + 2), mid(j + 1), top(j), mid(j)]);
                faces.push(vec![top(j), top(j + 4), mid(j)]);
            }
            faces.push((0..5).map(top).collect());
            CapBuild { vertices, faces }
        }
    }
}

/// A cap found on a solid.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cap {
    pub kind: Using,
    /// Vertices above the base.
    pub inner: Vec<VIndex>,
    /// Faces of the cap, in index order.
    pub faces: Vec<FIndex>,
    /// Base ring, oriented like the cap faces run it (counterclockwise about
    /// the outward normal of the cap).
    pub boundary: Vec<VIndex>,
}

impl Cap {
    /// Collect the cap over `inner` and check that its base is a planar
    /// ring of `kind.base_sides()` vertices.
    fn around(polyhedron: &Polyhedron, kind: Using, mut inner: Vec<VIndex>) -> Option<Self> {
        inner.sort_unstable();
        let faces: Vec<FIndex> = (0..polyhedron.num_faces())
            .filter(|&f| polyhedron.faces()[f].iter().any(|v| inner.contains(v)))
            .collect();
        // directed edges of cap faces between two base vertices
        let mut step: Vec<(VIndex, VIndex)> = Vec::new();
        for &f in &faces {
            let face = &polyhedron.faces()[f];
            let k = face.len();
            for i in 0..k {
                let (u, v) = (face[i], face[(i + 1) % k]);
                if !inner.contains(&u) && !inner.contains(&v) {
                    step.push((u, v));
                }
            }
        }
        let &(start, _) = step.first()?;
        let mut boundary = vec![start];
        let mut current = start;
        loop {
            let &(_, next) = step.iter().find(|(u, _)| *u == current)?;
            if next == start {
                break;
            }
            if boundary.len() > step.len() {
                return None;
            }
            boundary.push(next);
            current = next;
        }
        if boundary.len() != kind.base_sides() || boundary.len() != step.len() {
            return None;
        }
        let points: Vec<Vec3> = boundary.iter().map(|&v| polyhedron.vertex(v)).collect();
        let plane = Plane::from_normal_and_point(newell_normal(&points)?, centroid(&points));
        if points.iter().any(|p| plane.distance_to_point(p) > PRECISION) {
            return None;
        }
        Some(Self {
            kind,
            inner,
            faces,
            boundary,
        })
    }

    /// Outward normal of the base ring (pointing into the cap).
    pub fn axis_normal(&self, polyhedron: &Polyhedron) -> Vec3 {
        let points: Vec<Vec3> = self.boundary.iter().map(|&v| polyhedron.vertex(v)).collect();
        newell_normal(&points).unwrap_or_else(Vec3::zeros)
    }

    pub fn base_center(&self, polyhedron: &Polyhedron) -> Vec3 {
        let points: Vec<Vec3> = self.boundary.iter().map(|&v| polyhedron.vertex(v)).collect();
        centroid(&points)
    }
}

fn faces_around(polyhedron: &Polyhedron, v: VIndex) -> Vec<usize> {
    polyhedron
        .adjacent_face_indices(v)
        .into_iter()
        .map(|f| polyhedron.num_sides(f))
        .collect()
}

fn pyramid_at(polyhedron: &Polyhedron, apex: VIndex) -> Option<Cap> {
    let around = faces_around(polyhedron, apex);
    let k = around.len();
    if !(3..=5).contains(&k) || around.iter().any(|&s| s != 3) {
        return None;
    }
    Cap::around(polyhedron, Using::Pyramid(k), vec![apex])
}

/// Every side of `top` borders a face with `edge_sides` sides and every
/// vertex of `top` touches exactly four faces.
fn is_cap_top(top: Face<'_>, edge_sides: usize) -> bool {
    let neighbours = top.adjacent_faces();
    neighbours.len() == top.num_sides()
        && neighbours.iter().all(|f| f.num_sides() == edge_sides)
        && top
            .vertex_indices()
            .iter()
            .all(|&v| top.polyhedron().adjacent_face_indices(v).len() == 4)
}

fn cupola_at(polyhedron: &Polyhedron, top: Face<'_>) -> Option<Cap> {
    let n = top.num_sides();
    if !(3..=5).contains(&n) || !is_cap_top(top, 4) {
        return None;
    }
    // besides the top, each top vertex touches two squares and one triangle
    let one_triangle_each = top.vertex_indices().iter().all(|&v| {
        polyhedron
            .adjacent_face_indices(v)
            .into_iter()
            .filter(|&f| f != top.index() && polyhedron.num_sides(f) == 3)
            .count()
            == 1
    });
    if !one_triangle_each {
        return None;
    }
    Cap::around(polyhedron, Using::Cupola(n), top.vertex_indices().to_vec())
}

fn rotunda_at(polyhedron: &Polyhedron, top: Face<'_>) -> Option<Cap> {
    if top.num_sides() != 5 || !is_cap_top(top, 3) {
        return None;
    }
    let own = top.vertex_indices();
    let mut inner = own.to_vec();
    for f in top.adjacent_faces() {
        inner.extend(f.vertex_indices().iter().filter(|v| !own.contains(v)));
    }
    Cap::around(polyhedron, Using::Rotunda, inner)
}

/// Every cap on the solid. Pyramids come first (by apex), then cupolae and
/// rotundae (by top face).
pub(crate) fn find_caps(polyhedron: &Polyhedron) -> Vec<Cap> {
    let mut caps: Vec<Cap> = (0..polyhedron.num_vertices())
        .filter_map(|v| pyramid_at(polyhedron, v))
        .collect();
    for top in polyhedron.faces_iter() {
        if let Some(cap) = cupola_at(polyhedron, top).or_else(|| rotunda_at(polyhedron, top)) {
            caps.push(cap);
        }
    }
    caps
}

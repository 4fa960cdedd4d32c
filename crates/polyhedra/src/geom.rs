//! Small 3D helpers on top of `nalgebra`.
//!
//! Pure functions only. Angles are radians; rotations follow the right-hand
//! rule about the given axis.

use nalgebra::{Rotation3, Unit, Vector3};

use crate::cfg::{PRECISION, ZERO_EPS};

pub type Vec3 = Vector3<f64>;

#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Arithmetic mean of the points; the origin for an empty slice.
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::zeros();
    }
    points.iter().fold(Vec3::zeros(), |acc, p| acc + p) / points.len() as f64
}

/// Coordinate equality up to `PRECISION` (Euclidean).
#[inline]
pub fn approx_eq(a: &Vec3, b: &Vec3) -> bool {
    (a - b).norm() < PRECISION
}

/// Newell normal of a (possibly slightly non-planar) polygon, normalized.
///
/// Counterclockwise order (seen from the tip) gives a normal pointing at the viewer.
/// Returns `None` for polygons with zero area.
pub fn newell_normal(points: &[Vec3]) -> Option<Vec3> {
    let n = points.len();
    let mut acc = Vec3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a.cross(&b);
    }
    let norm = acc.norm();
    if norm <= ZERO_EPS {
        return None;
    }
    Some(acc / norm)
}

/// Plane `normal · x = offset` with unit `normal`.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f64,
}

impl Plane {
    /// Plane through three points; `None` if they are collinear.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        let norm = n.norm();
        if norm <= ZERO_EPS {
            return None;
        }
        let normal = n / norm;
        Some(Self {
            normal,
            offset: normal.dot(&a),
        })
    }

    #[inline]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal,
            offset: normal.dot(&point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        self.normal.dot(p) - self.offset
    }

    #[inline]
    pub fn distance_to_point(&self, p: &Vec3) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Orthogonal projection of `p` onto the plane.
    #[inline]
    pub fn project(&self, p: &Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }
}

/// Half-line `origin + t·direction`, used as a rotation axis.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Rotate `p` about the axis `ray` by `angle`.
///
/// A zero-length axis leaves the point where it is.
pub fn rotate_around(p: Vec3, ray: &Ray, angle: f64) -> Vec3 {
    if ray.direction.norm() <= ZERO_EPS || angle == 0.0 {
        return p;
    }
    let rot = Rotation3::from_axis_angle(&Unit::new_normalize(ray.direction), angle);
    ray.origin + rot * (p - ray.origin)
}

/// Angle between `a` and `b` in `[0, π]`, or signed in `(-π, π]` when an
/// orientation `axis` is given (positive when `a × b` points along `axis`).
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate near 0 and π.
pub fn angle_between(a: &Vec3, b: &Vec3, axis: Option<&Vec3>) -> f64 {
    let cross = a.cross(b);
    let angle = cross.norm().atan2(a.dot(b));
    match axis {
        Some(axis) if cross.dot(axis) < 0.0 => -angle,
        _ => angle,
    }
}

//! Attaching, removing and turning caps.

use std::collections::HashMap;
use std::f64::consts::PI;

use tracing::debug;

use super::caps::{build_cap, find_caps, Cap, Using};
use super::utils::remove_extraneous_vertices;
use super::{Direction, Gyrate, OpOptions, OperationResult};
use crate::error::{Error, Result};
use crate::geom::{rotate_around, Plane, Ray, Vec3};
use crate::polyhedron::{FIndex, Face, Polyhedron, VIndex};

fn face_at<'a>(polyhedron: &'a Polyhedron, f: FIndex, operation: &'static str) -> Result<Face<'a>> {
    if f >= polyhedron.num_faces() {
        return Err(Error::invalid_option(
            operation,
            format!("face {f} out of range ({} faces)", polyhedron.num_faces()),
        ));
    }
    Ok(polyhedron.face(f))
}

/// Base face and cap for `augment`.
fn choose_base<'a>(polyhedron: &'a Polyhedron, options: &OpOptions) -> Result<(Face<'a>, Using)> {
    let by_sides = |n: usize| {
        polyhedron
            .face_with_num_sides(n)
            .map_err(|_| Error::invalid_option("augment", format!("no {n}-sided face to augment")))
    };
    let base = match (options.face, options.using, options.face_type) {
        (Some(f), _, _) => face_at(polyhedron, f, "augment")?,
        (None, Some(using), _) => by_sides(using.base_sides())?,
        (None, None, Some(n)) => by_sides(n)?,
        (None, None, None) => polyhedron
            .smallest_face()
            .ok_or_else(|| Error::classification("polyhedron has no faces"))?,
    };
    let n = base.num_sides();
    if let Some(t) = options.face_type.filter(|&t| t != n) {
        return Err(Error::invalid_option(
            "augment",
            format!("face {} has {n} sides, not {t}", base.index()),
        ));
    }
    let using = match options.using {
        Some(using) if using.base_sides() != n => {
            return Err(Error::invalid_option(
                "augment",
                format!("{using} stands on a {}-gon, face {} has {n} sides", using.base_sides(), base.index()),
            ))
        }
        Some(using) => using,
        None => Using::infer(n)?,
    };
    Ok((base, using))
}

/// Base edges that would carry a cap triangle for `offset` and already have
/// a triangle on the other side.
fn triangle_matches(base: Face<'_>, offset: usize) -> usize {
    base.edges()
        .iter()
        .enumerate()
        .filter(|(k, e)| k % 2 == offset && e.twin_face().is_ok_and(|f| f.num_sides() == 3))
        .count()
}

/// Attach a cap to a face (`face`, else the first face the cap fits).
///
/// `gyrate` decides whether the cap's triangles meet triangles below its
/// base (ortho) or not (gyro); ties go to offset 0 for ortho.
pub fn augment(polyhedron: &Polyhedron, options: &OpOptions) -> Result<OperationResult> {
    let (base, using) = choose_base(polyhedron, options)?;
    let gyrate = options.gyrate.unwrap_or_default();
    let offset = if using.can_gyrate() {
        let ortho = if triangle_matches(base, 1) > triangle_matches(base, 0) { 1 } else { 0 };
        match gyrate {
            Gyrate::Ortho => ortho,
            Gyrate::Gyro => 1 - ortho,
        }
    } else {
        0
    };
    debug!(face = base.index(), %using, offset, "augment");

    let cap = build_cap(base, using, offset);
    let mut faces: Vec<Vec<VIndex>> = polyhedron.faces().to_vec();
    faces.remove(base.index());
    faces.extend(cap.faces);

    let plane = base.plane();
    let flattened: Vec<Vec3> = cap.vertices.iter().map(|p| plane.project(p)).collect();
    let start = polyhedron.add_vertices(&flattened).with_faces(faces);
    let mut end_vertices = polyhedron.vertices().to_vec();
    end_vertices.extend(cap.vertices);
    let result = Polyhedron::of(end_vertices.clone(), start.faces().to_vec())?;
    Ok(OperationResult::new(result, start, end_vertices))
}

/// Cap picked by `face` (a face of the cap), else by kind.
fn choose_cap(
    polyhedron: &Polyhedron,
    face: Option<FIndex>,
    using: Option<Using>,
    operation: &'static str,
    keep: impl Fn(&Cap) -> bool,
) -> Result<Cap> {
    let caps: Vec<Cap> = find_caps(polyhedron)
        .into_iter()
        .filter(|c| keep(c) && using.map_or(true, |u| c.kind == u))
        .collect();
    if let Some(f) = face {
        face_at(polyhedron, f, operation)?;
        return caps
            .into_iter()
            .find(|c| c.faces.contains(&f))
            .ok_or_else(|| Error::classification(format!("face {f} is not on a cap")));
    }
    let mut kinds: Vec<Using> = Vec::new();
    for cap in &caps {
        if !kinds.contains(&cap.kind) {
            kinds.push(cap.kind);
        }
    }
    match kinds.len() {
        0 => Err(Error::classification(format!("no cap to {operation}"))),
        1 => caps
            .into_iter()
            .next()
            .ok_or_else(|| Error::classification(format!("no cap to {operation}"))),
        _ => Err(Error::ambiguous(format!(
            "several kinds of cap ({}); pass `face`",
            kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Remove a cap, closing the hole with its base polygon.
pub fn diminish(
    polyhedron: &Polyhedron,
    face: Option<FIndex>,
    using: Option<Using>,
) -> Result<OperationResult> {
    let cap = choose_cap(polyhedron, face, using, "diminish", |_| true)?;
    debug!(kind = %cap.kind, faces = cap.faces.len(), "diminish");

    let mut faces: Vec<Vec<VIndex>> = polyhedron
        .faces()
        .iter()
        .enumerate()
        .filter(|(f, _)| !cap.faces.contains(f))
        .map(|(_, face)| face.clone())
        .collect();
    faces.push(cap.boundary.clone());

    // the cap sinks into its base
    let plane = Plane::from_normal_and_point(cap.axis_normal(polyhedron), cap.base_center(polyhedron));
    let end_vertices: Vec<Vec3> = polyhedron
        .vertices()
        .iter()
        .enumerate()
        .map(|(v, p)| if cap.inner.contains(&v) { plane.project(p) } else { *p })
        .collect();
    let result = remove_extraneous_vertices(&polyhedron.with_faces(faces));
    Ok(OperationResult::from_moved(polyhedron, end_vertices, result))
}

/// Turn a cupola or rotunda by one base step and reattach it.
pub fn gyrate(
    polyhedron: &Polyhedron,
    face: Option<FIndex>,
    direction: Option<Direction>,
) -> Result<OperationResult> {
    let cap = choose_cap(polyhedron, face, None, "gyrate", |c| c.kind.can_gyrate())?;
    let m = cap.boundary.len();
    let step: isize = match direction.unwrap_or_default() {
        Direction::Forward => 1,
        Direction::Back => -1,
    };
    debug!(kind = %cap.kind, step, "gyrate");

    let axis = Ray::new(cap.base_center(polyhedron), cap.axis_normal(polyhedron));
    let angle = step as f64 * 2.0 * PI / m as f64;
    let end_vertices: Vec<Vec3> = polyhedron
        .vertices()
        .iter()
        .enumerate()
        .map(|(v, p)| {
            if cap.inner.contains(&v) {
                rotate_around(*p, &axis, angle)
            } else {
                *p
            }
        })
        .collect();

    // cap faces now stand one base vertex further round
    let shift: HashMap<VIndex, VIndex> = (0..m)
        .map(|k| {
            let to = (k as isize + step).rem_euclid(m as isize) as usize;
            (cap.boundary[k], cap.boundary[to])
        })
        .collect();
    let faces: Vec<Vec<VIndex>> = polyhedron
        .faces()
        .iter()
        .enumerate()
        .map(|(f, face)| {
            if cap.faces.contains(&f) {
                face.iter().map(|v| shift.get(v).copied().unwrap_or(*v)).collect()
            } else {
                face.clone()
            }
        })
        .collect();
    let start = polyhedron.with_faces(faces);
    let result = Polyhedron::of(end_vertices.clone(), start.faces().to_vec())?;
    Ok(OperationResult::new(result, start, end_vertices))
}

//! Operators and their uniform calling contract.
//!
//! Purpose
//! - Every operator is a pure function from a `Polyhedron` and options to an
//!   `OperationResult`: the new polyhedron plus the start/end vertex data an
//!   animator interpolates between.
//! - `operate` is the single entry point: it checks that the options only use
//!   keys the operator understands, runs it and checks the result invariants.
//!
//! Conventions
//! - `AnimationData::start` has the same vertex count and order as
//!   `end_vertices`; its faces are the faces the animation should draw. The end
//!   positions need not form a valid polyhedron on their own.
//! - Operators that can create coincident vertices finish with
//!   `utils::deduplicate_vertices`.

pub mod utils;

mod augment;
mod caps;
mod contract;
mod cumulate;
mod elongate;
mod expand;
mod truncate;

pub use augment::{augment, diminish, gyrate};
pub use caps::Using;
pub use contract::contract;
pub use cumulate::{cumulate, cumulate_polygon};
pub use elongate::{elongate, gyroelongate, shorten};
pub use expand::{dual, expand, snub};
pub use truncate::{rectify, truncate};

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geom::Vec3;
use crate::polyhedron::{FIndex, Polyhedron};

/// The fixed set of operator identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Dual,
    Truncate,
    Rectify,
    Cumulate,
    Expand,
    Snub,
    Contract,
    Augment,
    Elongate,
    Gyroelongate,
    Diminish,
    Shorten,
    Gyrate,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::Dual,
        Operation::Truncate,
        Operation::Rectify,
        Operation::Cumulate,
        Operation::Expand,
        Operation::Snub,
        Operation::Contract,
        Operation::Augment,
        Operation::Elongate,
        Operation::Gyroelongate,
        Operation::Diminish,
        Operation::Shorten,
        Operation::Gyrate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Dual => "dual",
            Operation::Truncate => "truncate",
            Operation::Rectify => "rectify",
            Operation::Cumulate => "cumulate",
            Operation::Expand => "expand",
            Operation::Snub => "snub",
            Operation::Contract => "contract",
            Operation::Augment => "augment",
            Operation::Elongate => "elongate",
            Operation::Gyroelongate => "gyroelongate",
            Operation::Diminish => "diminish",
            Operation::Shorten => "shorten",
            Operation::Gyrate => "gyrate",
        }
    }

    /// Option keys the operator takes, in the relation table's spelling.
    pub fn accepted_keys(self) -> &'static [&'static str] {
        match self {
            Operation::Dual
            | Operation::Truncate
            | Operation::Rectify
            | Operation::Expand
            | Operation::Elongate
            | Operation::Shorten => &[],
            Operation::Cumulate => &["faceType"],
            Operation::Contract => &["faceType", "twist"],
            Operation::Snub | Operation::Gyroelongate => &["twist"],
            Operation::Augment => &["face", "faceType", "using", "gyrate", "align"],
            Operation::Diminish => &["face", "using"],
            Operation::Gyrate => &["face", "direction", "align"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::invalid_option("operate", format!("unknown operation `{s}`")))
    }
}

/// Chirality of snub-type results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Twist {
    #[default]
    Left,
    Right,
}

impl Twist {
    /// `+1` for left, `-1` for right.
    pub fn sign(self) -> f64 {
        match self {
            Twist::Left => 1.0,
            Twist::Right => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Twist::Left => Twist::Right,
            Twist::Right => Twist::Left,
        }
    }
}

/// Relative placement of a cap against the faces below its base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gyrate {
    /// Cap triangles sit over triangles of the body.
    #[default]
    Ortho,
    Gyro,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Forward,
    Back,
}

/// Which of two symmetric attachment sites; site selection itself is by face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    Para,
    Meta,
}

macro_rules! parse_keyword {
    ($ty:ty, $key:literal, { $($text:literal => $value:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($value),)+
                    _ => Err(Error::invalid_option($key, format!("unknown value `{s}`"))),
                }
            }
        }
    };
}

parse_keyword!(Twist, "twist", { "left" => Twist::Left, "right" => Twist::Right });
parse_keyword!(Gyrate, "gyrate", { "ortho" => Gyrate::Ortho, "gyro" => Gyrate::Gyro });
parse_keyword!(Direction, "direction", { "forward" => Direction::Forward, "back" => Direction::Back });
parse_keyword!(Align, "align", { "para" => Align::Para, "meta" => Align::Meta });

/// Operator options. Unset keys are `None`; `operate` rejects set keys the
/// chosen operator does not take.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpOptions {
    pub face_type: Option<usize>,
    pub using: Option<Using>,
    pub align: Option<Align>,
    pub gyrate: Option<Gyrate>,
    pub direction: Option<Direction>,
    pub twist: Option<Twist>,
    pub face: Option<FIndex>,
}

impl OpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face_type(mut self, n: usize) -> Self {
        self.face_type = Some(n);
        self
    }

    pub fn using(mut self, using: Using) -> Self {
        self.using = Some(using);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn gyrate(mut self, gyrate: Gyrate) -> Self {
        self.gyrate = Some(gyrate);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn twist(mut self, twist: Twist) -> Self {
        self.twist = Some(twist);
        self
    }

    pub fn face(mut self, face: FIndex) -> Self {
        self.face = Some(face);
        self
    }

    /// Keys that are set, in the relation table's spelling.
    pub fn keys(&self) -> Vec<&'static str> {
        [
            ("faceType", self.face_type.is_some()),
            ("using", self.using.is_some()),
            ("align", self.align.is_some()),
            ("gyrate", self.gyrate.is_some()),
            ("direction", self.direction.is_some()),
            ("twist", self.twist.is_some()),
            ("face", self.face.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, set)| set.then_some(key))
        .collect()
    }

    fn validate(&self, op: Operation) -> Result<()> {
        let accepted = op.accepted_keys();
        match self.keys().into_iter().find(|key| !accepted.contains(key)) {
            Some(key) => Err(Error::UnrecognizedOption {
                operation: op.name(),
                key,
            }),
            None => Ok(()),
        }
    }
}

/// Interpolation data: `start` drawn with `end_vertices` as per-vertex targets.
#[derive(Clone, Debug)]
pub struct AnimationData {
    pub start: Polyhedron,
    pub end_vertices: Vec<Vec3>,
}

#[derive(Clone, Debug)]
pub struct OperationResult {
    pub result: Polyhedron,
    pub animation_data: AnimationData,
}

impl OperationResult {
    pub(crate) fn new(result: Polyhedron, start: Polyhedron, end_vertices: Vec<Vec3>) -> Self {
        debug_assert_eq!(start.num_vertices(), end_vertices.len());
        Self {
            result,
            animation_data: AnimationData { start, end_vertices },
        }
    }

    /// Animation that moves the vertices of `start` in place.
    pub(crate) fn from_moved(start: &Polyhedron, end_vertices: Vec<Vec3>, result: Polyhedron) -> Self {
        Self::new(result, start.clone(), end_vertices)
    }
}

/// Apply `op` to `polyhedron`.
///
/// Fails without touching the input when the options use a key the operator
/// does not take, when the operator's preconditions do not hold, or when the
/// result would break the polyhedron invariants.
pub fn operate(op: Operation, polyhedron: &Polyhedron, options: &OpOptions) -> Result<OperationResult> {
    options.validate(op)?;
    debug!(
        operation = op.name(),
        vertices = polyhedron.num_vertices(),
        faces = polyhedron.num_faces(),
        "operate"
    );
    let out = match op {
        Operation::Dual => dual(polyhedron)?,
        Operation::Truncate => truncate(polyhedron)?,
        Operation::Rectify => rectify(polyhedron)?,
        Operation::Cumulate => cumulate(polyhedron, options.face_type)?,
        Operation::Expand => expand(polyhedron)?,
        Operation::Snub => snub(polyhedron, options.twist)?,
        Operation::Contract => contract(polyhedron, options.face_type, options.twist)?,
        Operation::Augment => augment(polyhedron, options)?,
        Operation::Elongate => elongate(polyhedron)?,
        Operation::Gyroelongate => gyroelongate(polyhedron, options.twist)?,
        Operation::Diminish => diminish(polyhedron, options.face, options.using)?,
        Operation::Shorten => shorten(polyhedron)?,
        Operation::Gyrate => gyrate(polyhedron, options.face, options.direction)?,
    };
    out.result.check_invariants()?;
    debug!(
        operation = op.name(),
        vertices = out.result.num_vertices(),
        faces = out.result.num_faces(),
        "operate done"
    );
    Ok(out)
}

/// `operate` with the operator given by name.
pub fn operate_named(name: &str, polyhedron: &Polyhedron, options: &OpOptions) -> Result<OperationResult> {
    operate(name.parse()?, polyhedron, options)
}

#[cfg(test)]
mod tests;

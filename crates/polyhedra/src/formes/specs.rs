//! Symbolic description of a classical (Platonic/Archimedean) solid.
//!
//! These values come from the caller's name lookup; this crate reads them
//! but never derives them from geometry.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::operations::Twist;

/// Symmetry family, identified by the side count of its seed's faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Tetrahedral,
    Octahedral,
    Icosahedral,
}

impl Family {
    /// 3, 4 or 5.
    pub fn size(self) -> usize {
        match self {
            Family::Tetrahedral => 3,
            Family::Octahedral => 4,
            Family::Icosahedral => 5,
        }
    }
}

impl TryFrom<usize> for Family {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            3 => Ok(Family::Tetrahedral),
            4 => Ok(Family::Octahedral),
            5 => Ok(Family::Icosahedral),
            _ => Err(Error::classification(format!("no classical family of size {size}"))),
        }
    }
}

/// How the solid is derived from its family's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassicalOp {
    Regular,
    Truncate,
    Rectify,
    /// Truncated rectification.
    Bevel,
    Cantellate,
    Snub,
}

impl ClassicalOp {
    pub fn name(self) -> &'static str {
        match self {
            ClassicalOp::Regular => "regular",
            ClassicalOp::Truncate => "truncate",
            ClassicalOp::Rectify => "rectify",
            ClassicalOp::Bevel => "bevel",
            ClassicalOp::Cantellate => "cantellate",
            ClassicalOp::Snub => "snub",
        }
    }
}

impl FromStr for ClassicalOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            ClassicalOp::Regular,
            ClassicalOp::Truncate,
            ClassicalOp::Rectify,
            ClassicalOp::Bevel,
            ClassicalOp::Cantellate,
            ClassicalOp::Snub,
        ]
        .into_iter()
        .find(|op| op.name() == s)
        .ok_or_else(|| Error::classification(format!("unknown classical operation `{s}`")))
    }
}

/// Which part of the seed a face descends from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    Vertex,
    Face,
}

impl Facet {
    pub fn other(self) -> Self {
        match self {
            Facet::Vertex => Facet::Face,
            Facet::Face => Facet::Vertex,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Facet::Vertex => "vertex",
            Facet::Face => "face",
        })
    }
}

impl FromStr for Facet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertex" => Ok(Facet::Vertex),
            "face" => Ok(Facet::Face),
            _ => Err(Error::classification(format!("unknown facet `{s}`"))),
        }
    }
}

/// Specs of a classical solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Classical {
    pub family: Family,
    pub operation: ClassicalOp,
    /// The seed part the solid's defining polygon comes from, if it has one.
    pub facet: Option<Facet>,
    /// Chirality of snub solids.
    pub twist: Option<Twist>,
}

impl Classical {
    pub fn new(family: Family, operation: ClassicalOp) -> Self {
        Self {
            family,
            operation,
            facet: None,
            twist: None,
        }
    }

    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facet = Some(facet);
        self
    }

    pub fn with_twist(mut self, twist: Twist) -> Self {
        self.twist = Some(twist);
        self
    }

    pub fn is_tetrahedral(&self) -> bool {
        self.family == Family::Tetrahedral
    }
}

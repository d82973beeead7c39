//! Starting seeds: where the first segment sits and which way it points.
//!
//! Every cell of a cube is equivalent, under the 48 rotations and
//! reflections of the cube, to one with `x <= y <= z <= (side - 1) / 2`.
//! Searching only from those cells still finds every folding up to symmetry.
//! Orientations are not reduced, so mirrored copies of a folding may still
//! be reported from the same cell.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::{Orientation, Point};

/// Start cell and direction of the first segment of one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    pub point: Point,
    pub orientation: Orientation,
}

impl Seed {
    pub const fn new(point: Point, orientation: Orientation) -> Self {
        Self { point, orientation }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.point, self.orientation)
    }
}

/// Parses `x,y,z:orientation`, e.g. `0,1,0:up`.
impl FromStr for Seed {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let (point, orientation) = input
            .split_once(':')
            .ok_or_else(|| Error::parse("seed", input))?;
        Ok(Seed::new(point.parse()?, orientation.parse()?))
    }
}

/// Cells of the fundamental domain, each paired with all six orientations.
pub fn symmetry_reduced(side: usize) -> Vec<Seed> {
    let half = (side.saturating_sub(1) / 2) as i32;
    let mut seeds = Vec::new();

    for x in 0..=half {
        for y in x..=half {
            for z in y..=half {
                let point = Point::new(x, y, z);
                seeds.extend(Orientation::ALL.iter().map(|&o| Seed::new(point, o)));
            }
        }
    }

    seeds
}

/// Every cell of the cube with every orientation.
pub fn all(side: usize) -> Vec<Seed> {
    let side = side as i32;
    let mut seeds = Vec::new();

    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                let point = Point::new(x, y, z);
                seeds.extend(Orientation::ALL.iter().map(|&o| Seed::new(point, o)));
            }
        }
    }

    seeds
}

//! Integer points, segment orientations and cube rotations.
//!
//! A segment points in one of six axis directions. Orientations are always
//! enumerated in the same order (Left, Right, Up, Down, Front, Back) so that
//! a search visits foldings, and reports solutions, in a reproducible order.
//! Consecutive segments must turn: a segment never shares its predecessor's
//! axis, which rules out both running straight and folding back.

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A cell position (or a step between cells) in the cube lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every coordinate lies in `0..side`.
    #[inline]
    pub fn in_cube(self, side: usize) -> bool {
        let side = side as i32;
        (0..side).contains(&self.x) && (0..side).contains(&self.y) && (0..side).contains(&self.z)
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Point> for i32 {
    type Output = Point;

    #[inline]
    fn mul(self, point: Point) -> Point {
        Point::new(self * point.x, self * point.y, self * point.z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Parses `x,y,z` (whitespace and surrounding parentheses are ignored).
impl FromStr for Point {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_start_matches('(').trim_end_matches(')');
        let coords: Vec<i32> = trimmed
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| Error::parse("point", input))?;

        match coords[..] {
            [x, y, z] => Ok(Point::new(x, y, z)),
            _ => Err(Error::parse("point", input)),
        }
    }
}

/// Direction family of an orientation, ignoring sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Direction a segment runs from its start cell.
///
/// "No orientation" (before the first segment, or once every rotation has
/// been tried) is expressed as `Option<Orientation>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
}

impl Orientation {
    /// All orientations in enumeration order.
    pub const ALL: [Orientation; 6] = [
        Orientation::Left,
        Orientation::Right,
        Orientation::Up,
        Orientation::Down,
        Orientation::Front,
        Orientation::Back,
    ];

    pub const fn axis(self) -> Axis {
        match self {
            Orientation::Left | Orientation::Right => Axis::X,
            Orientation::Up | Orientation::Down => Axis::Z,
            Orientation::Front | Orientation::Back => Axis::Y,
        }
    }

    /// Unit step from one cell of the segment to the next.
    pub const fn step(self) -> Point {
        match self {
            Orientation::Left => Point::new(-1, 0, 0),
            Orientation::Right => Point::new(1, 0, 0),
            Orientation::Up => Point::new(0, 0, 1),
            Orientation::Down => Point::new(0, 0, -1),
            Orientation::Front => Point::new(0, -1, 0),
            Orientation::Back => Point::new(0, 1, 0),
        }
    }

    /// Position of this orientation in [`Orientation::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Orientation::Left => "Left",
            Orientation::Right => "Right",
            Orientation::Up => "Up",
            Orientation::Down => "Down",
            Orientation::Front => "Front",
            Orientation::Back => "Back",
        }
    }

    /// Returns true if a segment pointing this way may follow `previous`.
    #[inline]
    pub fn turns_from(self, previous: Option<Orientation>) -> bool {
        previous.map_or(true, |previous| previous.axis() != self.axis())
    }

    /// First valid orientation for a segment following `previous`.
    ///
    /// Never exhausted: at least four orientations are always valid.
    pub fn reset(previous: Option<Orientation>) -> Orientation {
        match previous.map(Orientation::axis) {
            Some(Axis::X) => Orientation::Up,
            _ => Orientation::Left,
        }
    }

    /// Next valid orientation after `self` for a segment following
    /// `previous`, or `None` once the rotations are exhausted.
    pub fn advance(self, previous: Option<Orientation>) -> Option<Orientation> {
        Self::ALL[self.index() + 1..]
            .iter()
            .copied()
            .find(|candidate| candidate.turns_from(previous))
    }

    /// All valid orientations after `previous`, in enumeration order.
    pub fn candidates(previous: Option<Orientation>) -> impl Iterator<Item = Orientation> {
        std::iter::successors(Some(Self::reset(previous)), move |current| {
            current.advance(previous)
        })
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the orientation names in any case, or a signed axis (`+x`, `-z`).
impl FromStr for Orientation {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let orientation = match input.trim().to_ascii_lowercase().as_str() {
            "left" | "-x" => Orientation::Left,
            "right" | "+x" | "x" => Orientation::Right,
            "up" | "+z" | "z" => Orientation::Up,
            "down" | "-z" => Orientation::Down,
            "front" | "-y" => Orientation::Front,
            "back" | "+y" | "y" => Orientation::Back,
            _ => return Err(Error::parse("orientation", input)),
        };
        Ok(orientation)
    }
}

/// All 24 rotations of a cube about its centre.
///
/// Organized as 6 face-up choices x 4 rotations around vertical:
/// - Rotations 0-3: +Z face up
/// - Rotations 4-7: +Y face up
/// - Rotations 8-11: -Z face up
/// - Rotations 12-15: -Y face up
/// - Rotations 16-19: +X face up
/// - Rotations 20-23: -X face up
pub const ROTATIONS: [fn(Point) -> Point; 24] = [
    // +Z face up (identity orientation), rotate around Z axis
    |p| Point::new(p.x, p.y, p.z),
    |p| Point::new(-p.y, p.x, p.z),
    |p| Point::new(-p.x, -p.y, p.z),
    |p| Point::new(p.y, -p.x, p.z),
    // +Y face up, rotate around Y axis
    |p| Point::new(p.x, -p.z, p.y),
    |p| Point::new(p.z, p.x, p.y),
    |p| Point::new(-p.x, p.z, p.y),
    |p| Point::new(-p.z, -p.x, p.y),
    // -Z face up, rotate around Z axis
    |p| Point::new(p.x, -p.y, -p.z),
    |p| Point::new(p.y, p.x, -p.z),
    |p| Point::new(-p.x, p.y, -p.z),
    |p| Point::new(-p.y, -p.x, -p.z),
    // -Y face up, rotate around Y axis
    |p| Point::new(p.x, p.z, -p.y),
    |p| Point::new(-p.z, p.x, -p.y),
    |p| Point::new(-p.x, -p.z, -p.y),
    |p| Point::new(p.z, -p.x, -p.y),
    // +X face up, rotate around X axis
    |p| Point::new(p.z, p.y, -p.x),
    |p| Point::new(-p.y, p.z, -p.x),
    |p| Point::new(-p.z, -p.y, -p.x),
    |p| Point::new(p.y, -p.z, -p.x),
    // -X face up, rotate around X axis
    |p| Point::new(-p.z, p.y, p.x),
    |p| Point::new(-p.y, -p.z, p.x),
    |p| Point::new(p.z, -p.y, p.x),
    |p| Point::new(p.y, p.z, p.x),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let start = Point::new(1, 2, 3);
        assert_eq!(start + Orientation::Left.step(), Point::new(0, 2, 3));
        assert_eq!(3 * Orientation::Up.step(), Point::new(0, 0, 3));
        assert_eq!(start + 2 * Orientation::Front.step(), Point::new(1, 0, 3));
        assert_eq!(Point::new(4, 4, 4) - start, Point::new(3, 2, 1));
    }

    #[test]
    fn test_in_cube() {
        assert!(Point::ORIGIN.in_cube(1));
        assert!(Point::new(3, 3, 3).in_cube(4));
        assert!(!Point::new(4, 0, 0).in_cube(4));
        assert!(!Point::new(0, -1, 0).in_cube(4));
    }

    #[test]
    fn test_unconstrained_segment_has_six_orientations() {
        let all: Vec<Orientation> = Orientation::candidates(None).collect();
        assert_eq!(all, Orientation::ALL.to_vec());
        assert_eq!(Orientation::reset(None), Orientation::Left);
        assert_eq!(Orientation::Back.advance(None), None);
    }

    #[test]
    fn test_constrained_segment_has_four_orientations() {
        for previous in Orientation::ALL {
            let candidates: Vec<Orientation> = Orientation::candidates(Some(previous)).collect();
            assert_eq!(candidates.len(), 4, "after {previous}");
            assert!(candidates.iter().all(|o| o.axis() != previous.axis()));
            assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_enumeration_order_skips_previous_axis() {
        let after_x: Vec<Orientation> = Orientation::candidates(Some(Orientation::Right)).collect();
        assert_eq!(
            after_x,
            [Orientation::Up, Orientation::Down, Orientation::Front, Orientation::Back]
        );

        let after_z: Vec<Orientation> = Orientation::candidates(Some(Orientation::Down)).collect();
        assert_eq!(
            after_z,
            [Orientation::Left, Orientation::Right, Orientation::Front, Orientation::Back]
        );

        assert_eq!(Orientation::reset(Some(Orientation::Front)), Orientation::Left);
        assert_eq!(Orientation::Down.advance(Some(Orientation::Front)), None);
    }

    #[test]
    fn test_steps_are_unit_vectors_on_their_axis() {
        for orientation in Orientation::ALL {
            let step = orientation.step();
            assert_eq!(step.x.abs() + step.y.abs() + step.z.abs(), 1);
            let moves_on_axis = match orientation.axis() {
                Axis::X => step.x != 0,
                Axis::Y => step.y != 0,
                Axis::Z => step.z != 0,
            };
            assert!(moves_on_axis, "{orientation} steps off its axis");
        }
    }

    #[test]
    fn test_parse_orientation_and_point() {
        assert_eq!("back".parse::<Orientation>().unwrap(), Orientation::Back);
        assert_eq!("-X".parse::<Orientation>().unwrap(), Orientation::Left);
        assert!("sideways".parse::<Orientation>().is_err());

        assert_eq!("1, 2,3".parse::<Point>().unwrap(), Point::new(1, 2, 3));
        assert_eq!("(0,1,0)".parse::<Point>().unwrap(), Point::new(0, 1, 0));
        assert!("1,2".parse::<Point>().is_err());
    }

    #[test]
    fn test_rotations_are_distinct() {
        let probe = Point::new(1, 2, 3);
        let mut images: Vec<Point> = ROTATIONS.iter().map(|rotate| rotate(probe)).collect();
        images.sort();
        images.dedup();
        assert_eq!(images.len(), 24);
    }
}

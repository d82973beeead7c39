//! Chain definitions, the per-position segment model and solutions.
//!
//! A chain is a list of segment lengths. Each length counts the cells of one
//! straight run, including the cell it shares with the previous segment, so a
//! chain of lengths `l0, l1, ...` covers `1 + sum(li - 1)` cells.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::{Orientation, Point};
use crate::grid::MAX_SIDE;

/// Validated, immutable list of segment lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    lengths: Vec<usize>,
}

impl ChainSpec {
    /// Creates a chain, rejecting an empty list or any length below one.
    ///
    /// A straight run longer than [`MAX_SIDE`] cannot fit in any supported
    /// cube and is rejected as well.
    pub fn new(lengths: Vec<usize>) -> Result<Self> {
        if lengths.is_empty() {
            return Err(Error::InvalidChainSpec("chain has no segments".into()));
        }
        if let Some(position) = lengths
            .iter()
            .position(|&length| !(1..=MAX_SIDE).contains(&length))
        {
            return Err(Error::InvalidChainSpec(format!(
                "segment {position} has length {}, expected 1 to {MAX_SIDE}",
                lengths[position]
            )));
        }
        Ok(Self { lengths })
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Number of distinct cells the folded chain occupies.
    pub fn cell_count(&self) -> usize {
        1 + self.lengths.iter().map(|length| length - 1).sum::<usize>()
    }

    /// Side of the cube this chain exactly fills, if its cell count is a cube.
    pub fn cube_side(&self) -> Option<usize> {
        let cells = self.cell_count();
        (1..=cells)
            .take_while(|side| side * side * side <= cells)
            .find(|side| side * side * side == cells)
    }
}

/// Parses comma or whitespace separated lengths, e.g. `3,2,3,2`.
impl FromStr for ChainSpec {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let lengths = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::parse("chain", input))?;
        Self::new(lengths)
    }
}

/// A named chain shipped with the solver.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub side: usize,
    pub lengths: &'static [usize],
}

impl Preset {
    pub fn chain(&self) -> ChainSpec {
        ChainSpec {
            lengths: self.lengths.to_vec(),
        }
    }
}

/// The common 27-cube wooden snake.
pub const CLASSIC_3X3X3: &[usize] = &[3, 3, 3, 3, 2, 2, 2, 3, 3, 2, 2, 3, 2, 3, 2, 2, 3];

/// A 64-cube snake folding into a 4x4x4 cube.
pub const REFERENCE_4X4X4: &[usize] = &[
    3, 2, 3, 2, 2, 4, 2, 3, 2, 3, 2, 3, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 2, 2, 2, 2, 2, 3, 4, 2, 2, 2,
    4, 2, 3, 2, 2, 2, 2, 2, 2, 2, 2, 2, 4, 2,
];

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "classic",
        description: "3x3x3 snake cube, 17 segments",
        side: 3,
        lengths: CLASSIC_3X3X3,
    },
    Preset {
        name: "reference",
        description: "4x4x4 snake cube, 46 segments",
        side: 4,
        lengths: REFERENCE_4X4X4,
    },
];

/// Looks up a preset by name, ignoring case.
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Mutable search state for one chain position.
///
/// Start and orientation are only changed while the segment is unlocked;
/// `end` is recomputed whenever either changes. Locking is performed by
/// [`crate::placement::reserve`], which also marks the grid.
#[derive(Debug, Clone)]
pub struct Segment {
    index: usize,
    length: usize,
    start: Point,
    end: Point,
    orientation: Option<Orientation>,
    previous: Option<Orientation>,
    locked: bool,
}

impl Segment {
    pub fn new(index: usize, length: usize) -> Self {
        Self {
            index,
            length,
            start: Point::ORIGIN,
            end: Point::ORIGIN,
            orientation: None,
            previous: None,
            locked: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Orientation of the preceding segment, `None` for the first one.
    pub fn previous(&self) -> Option<Orientation> {
        self.previous
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Moves the segment to a new start cell after the given predecessor
    /// orientation and clears its own orientation.
    ///
    /// Precondition: the segment is unlocked.
    pub fn set_start(&mut self, start: Point, previous: Option<Orientation>) -> Result<()> {
        self.ensure_unlocked("move")?;
        self.start = start;
        self.previous = previous;
        self.orientation = None;
        self.end = start;
        Ok(())
    }

    /// Points the segment in a new direction and recomputes its end.
    ///
    /// Precondition: the segment is unlocked.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        self.ensure_unlocked("rotate")?;
        let reach = i32::try_from(self.length.saturating_sub(1)).map_err(|_| {
            Error::invariant(format!(
                "segment {} is too long to place: {}",
                self.index, self.length
            ))
        })?;
        self.orientation = Some(orientation);
        self.end = self.start + reach * orientation.step();
        Ok(())
    }

    /// Cells this segment reserves: `start + step ..= end`.
    ///
    /// The start cell belongs to the previous segment (or the seed) and is
    /// never included. Empty while no orientation is set.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        span(self.start, self.length, self.orientation)
    }

    /// Snapshot of the segment, if it has an orientation.
    pub fn placed(&self) -> Option<PlacedSegment> {
        self.orientation.map(|orientation| PlacedSegment {
            index: self.index,
            length: self.length,
            start: self.start,
            end: self.end,
            orientation,
        })
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Returns the segment to its freshly allocated state.
    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.index, self.length);
    }

    fn ensure_unlocked(&self, action: &str) -> Result<()> {
        if self.locked {
            return Err(Error::invariant(format!(
                "cannot {action} segment {} while it is locked",
                self.index
            )));
        }
        Ok(())
    }
}

fn span(start: Point, length: usize, orientation: Option<Orientation>) -> impl Iterator<Item = Point> {
    let (step, count) = match orientation {
        Some(orientation) => (orientation.step(), length.saturating_sub(1) as i32),
        None => (Point::ORIGIN, 0),
    };
    (1..=count).map(move |distance| start + distance * step)
}

/// A segment as it sits in a finished folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedSegment {
    pub index: usize,
    pub length: usize,
    pub start: Point,
    pub end: Point,
    pub orientation: Orientation,
}

impl PlacedSegment {
    /// Cells reserved by this segment, excluding its shared start cell.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        span(self.start, self.length, Some(self.orientation))
    }
}

/// A complete folding: every segment in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    segments: Vec<PlacedSegment>,
}

impl Solution {
    pub fn new(segments: Vec<PlacedSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PlacedSegment] {
        &self.segments
    }

    /// The seed this folding started from.
    pub fn seed(&self) -> Option<crate::seeds::Seed> {
        self.segments.first().map(|first| crate::seeds::Seed {
            point: first.start,
            orientation: first.orientation,
        })
    }

    /// Every cell in the order the chain passes through it.
    pub fn path(&self) -> Vec<Point> {
        let mut path: Vec<Point> = self.segments.first().map(|s| s.start).into_iter().collect();
        for segment in &self.segments {
            path.extend(segment.cells());
        }
        path
    }

    /// Returns true if consecutive segments never share an axis.
    pub fn alternates_axes(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].orientation.axis() != pair[1].orientation.axis())
    }

    /// Returns true if the path visits every cell of the cube exactly once.
    pub fn covers_cube(&self, side: usize) -> bool {
        let path = self.path();
        if path.len() != side * side * side || !path.iter().all(|cell| cell.in_cube(side)) {
            return false;
        }
        let mut sorted = path;
        sorted.sort();
        sorted.windows(2).all(|pair| pair[0] != pair[1])
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(
                f,
                "Segment {}, length {}: {} from {} to {}",
                segment.index, segment.length, segment.orientation, segment.start, segment.end
            )?;
        }
        Ok(())
    }
}

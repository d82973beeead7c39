//! Iterative depth-first search over segment orientations.
//!
//! A [`SearchRun`] owns the occupancy grid and one [`Segment`] per chain
//! position. For each seed it walks a cursor along the chain:
//! - on arriving at a position, the segment takes the first orientation that
//!   turns away from its predecessor's axis
//! - on retrying a position, it takes the next such orientation
//! - a segment that fits is locked in and the cursor moves forward
//! - a position with no orientations left releases its predecessor and the
//!   cursor moves back
//!
//! The first segment's orientation is fixed by the seed, so the run ends once
//! the cursor falls back to it. Reaching the end of the chain with every cell
//! filled yields a solution, after which the last segment is released and
//! rotated like any other failure.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::chain::{ChainSpec, Segment, Solution};
use crate::error::{Error, Result};
use crate::geometry::Orientation;
use crate::grid::Grid;
use crate::placement;
use crate::seeds::Seed;

/// How the cursor reached its current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Moved forward onto the position: start from the first orientation.
    Arrived,
    /// Came back after a failure or a backtrack: try the next orientation.
    Retry,
}

/// Mutable state for searching one chain in one cube.
///
/// A run is started with [`SearchRun::solutions`], which fully resets the
/// state. Independent seeds may reuse the same instance one after another, or
/// use one instance each on separate threads.
#[derive(Debug)]
pub struct SearchRun {
    side: usize,
    grid: Grid,
    segments: Vec<Segment>,
    seed: Option<Seed>,
    cursor: usize,
    entry: Entry,
    positions: u64,
    found: usize,
    finished: bool,
    stop: Option<Arc<AtomicBool>>,
}

impl SearchRun {
    pub fn new(chain: &ChainSpec, side: usize) -> Result<Self> {
        let segments = chain
            .lengths()
            .iter()
            .enumerate()
            .map(|(index, &length)| Segment::new(index, length))
            .collect();

        Ok(Self {
            side,
            grid: Grid::new(side)?,
            segments,
            seed: None,
            cursor: 0,
            entry: Entry::Arrived,
            positions: 0,
            found: 0,
            finished: true,
            stop: None,
        })
    }

    /// Polls `stop` before every step; once it is set the current run
    /// unwinds cleanly and ends.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placements attempted in the current run, including the seed's.
    pub fn positions(&self) -> u64 {
        self.positions
    }

    /// Returns true once the current run has exhausted its search space.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Resets the state and starts searching from `seed`.
    ///
    /// The returned iterator yields solutions lazily in a deterministic order.
    pub fn solutions(&mut self, seed: Seed) -> Result<Solutions<'_>> {
        self.start(seed)?;
        Ok(Solutions { run: self })
    }

    /// Runs the search from `seed` to completion and collects every solution.
    pub fn solve_seed(&mut self, seed: Seed) -> Result<Vec<Solution>> {
        self.solutions(seed)?.collect()
    }

    fn start(&mut self, seed: Seed) -> Result<()> {
        if !seed.point.in_cube(self.side) {
            return Err(Error::SeedOutOfBounds {
                point: seed.point,
                side: self.side,
            });
        }

        self.grid.clear();
        for segment in &mut self.segments {
            segment.clear();
        }
        self.seed = Some(seed);
        self.cursor = 0;
        self.entry = Entry::Arrived;
        self.positions = 0;
        self.found = 0;
        self.finished = false;

        // no segment reserves the seed cell, so it is marked by hand
        self.grid.occupy(seed.point)?;
        if let Some(first) = self.segments.first_mut() {
            first.set_start(seed.point, None)?;
        }

        debug!(seed = %seed, side = self.side, segments = self.segments.len(), "starting run");
        Ok(())
    }

    /// Advances the search to the next solution, or `None` once the run ends.
    pub fn next_solution(&mut self) -> Result<Option<Solution>> {
        while !self.finished {
            if let Some(solution) = self.step()? {
                return Ok(Some(solution));
            }
        }
        Ok(None)
    }

    /// Performs one transition: a placement attempt, a backtrack, or the end
    /// of the run. Returns the solution completed by this transition, if any.
    fn step(&mut self) -> Result<Option<Solution>> {
        if self.stop_requested() {
            self.abandon()?;
            return Ok(None);
        }

        let Some(orientation) = self.candidate() else {
            if self.cursor == 0 {
                self.finish()?;
            } else {
                self.backtrack()?;
            }
            return Ok(None);
        };

        self.positions += 1;
        let segment = &mut self.segments[self.cursor];
        segment.set_orientation(orientation)?;

        if !placement::reserve(&mut self.grid, segment)? {
            self.entry = Entry::Retry;
            return Ok(None);
        }

        self.step_forward()
    }

    /// Orientation to attempt at the cursor, or `None` when exhausted.
    fn candidate(&self) -> Option<Orientation> {
        let segment = &self.segments[self.cursor];
        match (self.cursor, self.entry) {
            (0, Entry::Arrived) => self.seed.map(|seed| seed.orientation),
            (0, Entry::Retry) => None,
            (_, Entry::Arrived) => Some(Orientation::reset(segment.previous())),
            (_, Entry::Retry) => segment
                .orientation()
                .and_then(|current| current.advance(segment.previous())),
        }
    }

    /// Moves past a freshly locked segment. Returns a solution when the chain
    /// is complete and fills the cube.
    fn step_forward(&mut self) -> Result<Option<Solution>> {
        let placed = &self.segments[self.cursor];
        let (end, orientation) = (placed.end(), placed.orientation());
        self.cursor += 1;

        if self.cursor < self.segments.len() {
            self.segments[self.cursor].set_start(end, orientation)?;
            self.entry = Entry::Arrived;
            return Ok(None);
        }

        let solution = if self.grid.is_full() {
            let solution = self.snapshot()?;
            self.found += 1;
            trace!(positions = self.positions, found = self.found, "found solution");
            Some(solution)
        } else {
            None
        };

        // keep searching: release the last segment and rotate it
        self.backtrack()?;
        Ok(solution)
    }

    /// Steps the cursor back one position, releasing the segment there.
    fn backtrack(&mut self) -> Result<()> {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .ok_or_else(|| Error::invariant("backtracked past the first segment"))?;
        placement::release(&mut self.grid, &mut self.segments[self.cursor])?;
        self.entry = Entry::Retry;
        Ok(())
    }

    fn snapshot(&self) -> Result<Solution> {
        self.segments
            .iter()
            .map(|segment| {
                segment.placed().ok_or_else(|| {
                    Error::invariant(format!("segment {} has no orientation", segment.index()))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Solution::new)
    }

    /// Ends the run normally: only the seed cell may remain occupied.
    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        if let Some(seed) = self.seed {
            self.grid.vacate(seed.point)?;
        }
        if !self.grid.is_empty() {
            return Err(Error::invariant(format!(
                "{} cells still occupied after the run ended",
                self.grid.occupied_count()
            )));
        }

        if let Some(seed) = self.seed {
            debug!(
                seed = %seed,
                solutions = self.found,
                positions = self.positions,
                "run exhausted"
            );
        }
        Ok(())
    }

    /// Ends the run early, releasing every locked segment.
    fn abandon(&mut self) -> Result<()> {
        warn!(
            cursor = self.cursor,
            positions = self.positions,
            "stop requested, abandoning run"
        );
        for segment in self.segments.iter_mut().rev() {
            placement::release(&mut self.grid, segment)?;
        }
        self.cursor = 0;
        self.finish()
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }
}

/// Lazy, finite sequence of the solutions of one run.
///
/// Yields `Err` at most once, for a broken internal invariant, and then ends.
pub struct Solutions<'a> {
    run: &'a mut SearchRun,
}

impl Solutions<'_> {
    /// Placements attempted so far in this run.
    pub fn positions(&self) -> u64 {
        self.run.positions
    }
}

impl Iterator for Solutions<'_> {
    type Item = Result<Solution>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.run.next_solution() {
            Ok(solution) => solution.map(Ok),
            Err(error) => {
                self.run.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl FusedIterator for Solutions<'_> {}

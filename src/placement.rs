//! Placement validation: reserving and releasing a segment's cells.
//!
//! A segment reserves the cells `start + step ..= end`. Its start cell is
//! shared with the previous segment's end (or is the seed cell) and is
//! therefore already occupied; it is never checked or marked again.

use crate::chain::Segment;
use crate::error::{Error, Result};
use crate::grid::Grid;

/// Returns true if the segment, as currently oriented, stays inside the
/// cube and only covers empty cells. Does not touch the grid.
pub fn fits(grid: &Grid, segment: &Segment) -> bool {
    // the run is axis-aligned and monotonic, so an in-bounds end implies
    // every intermediate cell is in bounds too
    grid.contains(segment.end()) && segment.cells().all(|cell| !grid.is_occupied(cell))
}

/// Attempts to lock the segment into the grid.
///
/// Preconditions: the segment is unlocked, has an orientation, and its start
/// cell is occupied. Returns `Ok(false)` without mutating anything when the
/// segment leaves the cube or overlaps a filled cell.
pub fn reserve(grid: &mut Grid, segment: &mut Segment) -> Result<bool> {
    if segment.is_locked() {
        return Err(Error::invariant(format!(
            "segment {} is already locked",
            segment.index()
        )));
    }
    if segment.orientation().is_none() {
        return Err(Error::invariant(format!(
            "segment {} has no orientation to place",
            segment.index()
        )));
    }
    if !grid.is_occupied(segment.start()) {
        return Err(Error::invariant(format!(
            "segment {} starts from unoccupied cell {}",
            segment.index(),
            segment.start()
        )));
    }

    if !fits(grid, segment) {
        return Ok(false);
    }

    for cell in segment.cells() {
        grid.occupy(cell)?;
    }
    segment.set_locked(true);
    Ok(true)
}

/// Unlocks the segment and empties the cells it reserved.
///
/// Releasing an unlocked segment is a no-op.
pub fn release(grid: &mut Grid, segment: &mut Segment) -> Result<()> {
    if !segment.is_locked() {
        return Ok(());
    }

    let before = grid.occupied_count();
    for cell in segment.cells() {
        grid.vacate(cell)?;
    }

    let expected = segment.length().saturating_sub(1);
    if before - grid.occupied_count() != expected {
        return Err(Error::invariant(format!(
            "releasing segment {} freed {} cells, expected {expected}",
            segment.index(),
            before - grid.occupied_count()
        )));
    }

    segment.set_locked(false);
    Ok(())
}

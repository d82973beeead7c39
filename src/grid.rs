//! Occupancy grid and solution renderings for an N x N x N cube.
//!
//! Cells are stored in a flat array in x-major order
//! (`idx = x * side * side + y * side + z`). The same indexing is used for the
//! labelled grids that canonical keys and text renderings are built from.

use crate::chain::Solution;
use crate::error::{Error, Result};
use crate::geometry::{Point, ROTATIONS};

/// Largest supported cube side.
pub const MAX_SIDE: usize = 64;

/// Converts a point inside the cube to a linear cell index.
#[inline(always)]
pub fn coord_to_idx(side: usize, point: Point) -> usize {
    (point.x as usize) * side * side + (point.y as usize) * side + (point.z as usize)
}

/// Converts a linear cell index to a point.
#[inline(always)]
pub fn idx_to_coord(side: usize, cell_index: usize) -> Point {
    Point::new(
        (cell_index / (side * side)) as i32,
        ((cell_index / side) % side) as i32,
        (cell_index % side) as i32,
    )
}

/// Checks that a cube side can be searched.
pub fn validate_side(side: usize) -> Result<()> {
    if side == 0 || side > MAX_SIDE {
        return Err(Error::InvalidSide {
            side,
            max: MAX_SIDE,
        });
    }
    Ok(())
}

/// Filled/empty state of every cell for one search run.
///
/// Keeps a running count of occupied cells so that a full cube and
/// bookkeeping mismatches can be detected without a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<bool>,
    occupied: usize,
}

impl Grid {
    pub fn new(side: usize) -> Result<Self> {
        validate_side(side)?;
        Ok(Self {
            side,
            cells: vec![false; side * side * side],
            occupied: 0,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns true if the point lies inside the cube.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.in_cube(self.side)
    }

    /// Returns true if the cell is filled. Points outside the cube are never
    /// occupied.
    #[inline]
    pub fn is_occupied(&self, point: Point) -> bool {
        self.contains(point) && self.cells[coord_to_idx(self.side, point)]
    }

    /// Marks an empty in-bounds cell as filled.
    pub fn occupy(&mut self, point: Point) -> Result<()> {
        let cell = self.checked_index(point)?;
        if self.cells[cell] {
            return Err(Error::invariant(format!("cell {point} is already occupied")));
        }
        self.cells[cell] = true;
        self.occupied += 1;
        Ok(())
    }

    /// Marks a filled in-bounds cell as empty.
    pub fn vacate(&mut self, point: Point) -> Result<()> {
        let cell = self.checked_index(point)?;
        if !self.cells[cell] {
            return Err(Error::invariant(format!("cell {point} is already vacant")));
        }
        self.cells[cell] = false;
        self.occupied -= 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.occupied = 0;
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// All filled cells in index order.
    pub fn occupied_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(|(cell, _)| idx_to_coord(self.side, cell))
    }

    fn checked_index(&self, point: Point) -> Result<usize> {
        if !self.contains(point) {
            return Err(Error::invariant(format!(
                "cell {point} is outside a cube of side {}",
                self.side
            )));
        }
        Ok(coord_to_idx(self.side, point))
    }
}

/// Builds the rotation lookup table for a cube of the given side.
///
/// For each of the 24 rotations and each cell, computes where that cell ends up
/// after rotating the grid around its center point.
///
/// Uses doubled coordinates to handle both odd (3x3x3) and even (4x4x4) grids
/// without floating point: center_doubled = side - 1.
fn build_rotation_table(side: usize) -> Vec<Vec<usize>> {
    let side_m1 = side as i32 - 1;
    let cell_count = side * side * side;

    ROTATIONS
        .iter()
        .map(|rotate| {
            (0..cell_count)
                .map(|source| {
                    let cell = idx_to_coord(side, source);
                    // doubled centered coordinates: avoids half-integer centers for even sides
                    let centered = 2 * cell - Point::new(side_m1, side_m1, side_m1);
                    let rotated = rotate(centered);
                    let dest = Point::new(
                        (rotated.x + side_m1) / 2,
                        (rotated.y + side_m1) / 2,
                        (rotated.z + side_m1) / 2,
                    );
                    coord_to_idx(side, dest)
                })
                .collect()
        })
        .collect()
}

/// Labels each cell with the index of the segment that reserved it.
///
/// The seed cell belongs to segment 0. Cells the solution does not reach are
/// `None`.
pub fn solution_to_grid(solution: &Solution, side: usize) -> Vec<Option<usize>> {
    let mut grid = vec![None; side * side * side];
    let Some(first) = solution.segments().first() else {
        return grid;
    };

    if first.start.in_cube(side) {
        grid[coord_to_idx(side, first.start)] = Some(first.index);
    }
    for segment in solution.segments() {
        for cell in segment.cells().filter(|cell| cell.in_cube(side)) {
            grid[coord_to_idx(side, cell)] = Some(segment.index);
        }
    }

    grid
}

/// Labels each cell with its 1-based position along the chain (0 = unvisited).
fn path_key(solution: &Solution, side: usize) -> Vec<u32> {
    let mut key = vec![0u32; side * side * side];
    for (step, cell) in solution.path().into_iter().enumerate() {
        if cell.in_cube(side) {
            key[coord_to_idx(side, cell)] = step as u32 + 1;
        }
    }
    key
}

/// Reflects a grid key across the x-axis (mirror through the yz center plane).
fn reflect_key_x(original: &[u32], side: usize) -> Vec<u32> {
    let mut reflected = vec![0u32; original.len()];

    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                let source = x * side * side + y * side + z;
                let dest = (side - 1 - x) * side * side + y * side + z;
                reflected[dest] = original[source];
            }
        }
    }

    reflected
}

/// Finds the lexicographically smallest rotation of a grid key.
fn find_smallest_rotation(original: &[u32], table: &[Vec<usize>]) -> Vec<u32> {
    let mut smallest = original.to_vec();
    let mut rotated = vec![0u32; original.len()];

    // try all rotations except identity (index 0)
    for rotation_mapping in &table[1..] {
        // move each source cell value into its rotated destination
        for (source_cell, &dest_cell) in rotation_mapping.iter().enumerate() {
            rotated[dest_cell] = original[source_cell];
        }

        if rotated < smallest {
            smallest.copy_from_slice(&rotated);
        }
    }

    smallest
}

/// Reusable symmetry tables for canonicalising solutions of one cube size.
#[derive(Debug, Clone)]
pub struct Symmetry {
    side: usize,
    rotations: Vec<Vec<usize>>,
}

impl Symmetry {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            rotations: build_rotation_table(side),
        }
    }

    /// Computes the canonical form of a solution under rotations and reflections.
    ///
    /// Two foldings share a key exactly when one is a rotated or mirrored copy
    /// of the other.
    pub fn canonical_key(&self, solution: &Solution) -> Vec<u32> {
        let key = path_key(solution, self.side);
        let smallest = find_smallest_rotation(&key, &self.rotations);
        let reflected = reflect_key_x(&key, self.side);
        let reflected_smallest = find_smallest_rotation(&reflected, &self.rotations);

        smallest.min(reflected_smallest)
    }
}

/// Computes the canonical key of one solution. Prefer [`Symmetry`] when
/// canonicalising many solutions of the same cube.
pub fn canonical_key(solution: &Solution, side: usize) -> Vec<u32> {
    Symmetry::new(side).canonical_key(solution)
}

/// Character used for a segment index in text renderings.
fn segment_char(index: usize) -> char {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    DIGITS.get(index).map_or('#', |&digit| char::from(digit))
}

/// Formats a solution as a human-readable string.
///
/// Displays the z-slices side by side; each cell shows the index of the
/// segment that reserved it (0-9, then A-Z, then a-z). Empty cells show as '.'.
pub fn format_solution(solution: &Solution, side: usize) -> String {
    let grid = solution_to_grid(solution, side);
    let mut lines = Vec::with_capacity(side + 1);

    // header: z=0, z=1, ..., z=side-1
    let header: Vec<String> = (0..side)
        .map(|z| format!("{:<width$}", format!("z={z}"), width = side))
        .collect();
    lines.push(header.join("  "));

    // rows from top (y=side-1) to bottom (y=0)
    for y in (0..side).rev() {
        let slices: Vec<String> = (0..side)
            .map(|z| {
                (0..side)
                    .map(|x| match grid[x * side * side + y * side + z] {
                        Some(index) => segment_char(index),
                        None => '.',
                    })
                    .collect()
            })
            .collect();
        lines.push(slices.join("  "));
    }

    let mut output = String::new();
    for line in lines {
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::PlacedSegment;
    use crate::geometry::Orientation;

    fn placed(index: usize, length: usize, start: Point, orientation: Orientation) -> PlacedSegment {
        PlacedSegment {
            index,
            length,
            start,
            end: start + (length as i32 - 1) * orientation.step(),
            orientation,
        }
    }

    /// Hamiltonian path of the 2x2x2 cube: Right, Up, Left, Back, Right, Down, Left.
    fn two_cube_solution() -> Solution {
        let turns = [
            Orientation::Right,
            Orientation::Up,
            Orientation::Left,
            Orientation::Back,
            Orientation::Right,
            Orientation::Down,
            Orientation::Left,
        ];
        let mut start = Point::ORIGIN;
        let segments = turns
            .iter()
            .enumerate()
            .map(|(index, &orientation)| {
                let segment = placed(index, 2, start, orientation);
                start = segment.end;
                segment
            })
            .collect();
        Solution::new(segments)
    }

    #[test]
    fn test_identity_rotation_is_unchanged() {
        for side in [2, 3, 4] {
            let table = build_rotation_table(side);
            for cell in 0..side * side * side {
                assert_eq!(
                    table[0][cell], cell,
                    "Identity rotation should not move cell {cell} (side {side})"
                );
            }
        }
    }

    #[test]
    fn test_rotations_are_permutations() {
        for side in [3, 4] {
            let cell_count = side * side * side;
            let table = build_rotation_table(side);
            assert_eq!(table.len(), ROTATIONS.len());
            for (rot, mapping) in table.iter().enumerate() {
                let mut seen = vec![false; cell_count];
                for (src, &dest) in mapping.iter().enumerate() {
                    assert!(dest < cell_count, "Rotation {rot} maps cell {src} out of bounds");
                    assert!(!seen[dest], "Rotation {rot} maps two cells to {dest}");
                    seen[dest] = true;
                }
            }
        }
    }

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for side in [1, 3, 4] {
            for idx in 0..side * side * side {
                let point = idx_to_coord(side, idx);
                assert!(point.in_cube(side), "idx_to_coord({side}, {idx}) produced {point}");
                assert_eq!(coord_to_idx(side, point), idx);
            }
        }
    }

    #[test]
    fn test_occupy_and_vacate_track_count() {
        let mut grid = Grid::new(3).unwrap();
        let cell = Point::new(2, 1, 0);

        grid.occupy(cell).unwrap();
        assert!(grid.is_occupied(cell));
        assert_eq!(grid.occupied_count(), 1);
        assert!(matches!(grid.occupy(cell), Err(Error::InvariantViolation(_))));

        grid.vacate(cell).unwrap();
        assert!(grid.is_empty());
        assert!(matches!(grid.vacate(cell), Err(Error::InvariantViolation(_))));
        assert!(grid.occupy(Point::new(3, 0, 0)).is_err());
        assert!(!grid.is_occupied(Point::new(-1, 0, 0)));
    }

    #[test]
    fn test_rejects_unusable_sides() {
        assert!(matches!(Grid::new(0), Err(Error::InvalidSide { .. })));
        assert!(Grid::new(MAX_SIDE + 1).is_err());
        assert!(Grid::new(1).is_ok());
    }

    #[test]
    fn test_mirrored_solution_shares_canonical_key() {
        let solution = two_cube_solution();
        assert!(solution.covers_cube(2));

        // mirror through the x centre plane: Left and Right swap
        let mirrored = Solution::new(
            solution
                .segments()
                .iter()
                .map(|segment| {
                    let start = Point::new(1 - segment.start.x, segment.start.y, segment.start.z);
                    let orientation = match segment.orientation {
                        Orientation::Left => Orientation::Right,
                        Orientation::Right => Orientation::Left,
                        other => other,
                    };
                    placed(segment.index, segment.length, start, orientation)
                })
                .collect(),
        );

        let symmetry = Symmetry::new(2);
        assert_ne!(mirrored, solution);
        assert_eq!(symmetry.canonical_key(&mirrored), symmetry.canonical_key(&solution));
        assert_eq!(canonical_key(&solution, 2), symmetry.canonical_key(&solution));
    }

    #[test]
    fn test_format_solution() {
        insta::assert_snapshot!(format_solution(&two_cube_solution(), 2), @r"
        z=0  z=1
        65  34
        00  21
        ");
    }

    #[test]
    fn test_format_partial_solution() {
        let solution = Solution::new(vec![placed(0, 3, Point::ORIGIN, Orientation::Back)]);
        insta::assert_snapshot!(format_solution(&solution, 3), @r"
        z=0  z=1  z=2
        0..  ...  ...
        0..  ...  ...
        0..  ...  ...
        ");
    }
}

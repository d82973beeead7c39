//! File I/O for saving and loading snake cube solutions.
//!
//! Binary format for `solutions.bin` (little endian):
//! - u32: cube side
//! - u32: solution count
//! - repeat per solution:
//!   - u32: segment count
//!   - repeat per segment:
//!     - 3 bytes: start (x, y, z)
//!     - 3 bytes: end (x, y, z)
//!     - 1 byte: orientation index (Left, Right, Up, Down, Front, Back)

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::chain::{PlacedSegment, Solution};
use crate::error::{Error, Result};
use crate::geometry::{Orientation, Point};
use crate::grid::{format_solution, MAX_SIDE};

pub const SOLUTIONS_BIN: &str = "solutions.bin";
pub const SOLUTIONS_TXT: &str = "solutions.txt";

/// Solutions read back from disk together with their cube side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSolutions {
    pub side: usize,
    pub solutions: Vec<Solution>,
}

/// Saves solutions to both binary and text files in `dir`.
pub fn save(dir: &Path, side: usize, solutions: &[Solution]) -> Result<()> {
    save_text(dir, side, solutions)?;
    save_binary(dir, side, solutions)?;
    Ok(())
}

/// Renders the text listing written to `solutions.txt`.
pub fn format_report(side: usize, solutions: &[Solution]) -> String {
    let mut output = format!("Found {} solutions:\n\n", solutions.len());
    for (i, solution) in solutions.iter().enumerate() {
        output.push_str(&format!("Solution {}:\n", i + 1));
        output.push_str(&solution.to_string());
        output.push_str(&format_solution(solution, side));
        output.push('\n');
    }
    output
}

/// Saves solutions in human-readable text format.
fn save_text(dir: &Path, side: usize, solutions: &[Solution]) -> Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTIONS_TXT))?);
    file.write_all(format_report(side, solutions).as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Saves solutions in compact binary format for fast loading.
fn save_binary(dir: &Path, side: usize, solutions: &[Solution]) -> Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTIONS_BIN))?);

    file.write_all(&(side as u32).to_le_bytes())?;
    file.write_all(&(solutions.len() as u32).to_le_bytes())?;

    for solution in solutions {
        file.write_all(&(solution.segments().len() as u32).to_le_bytes())?;
        for segment in solution.segments() {
            file.write_all(&point_bytes(segment.start))?;
            file.write_all(&point_bytes(segment.end))?;
            file.write_all(&[segment.orientation.index() as u8])?;
        }
    }

    file.flush()?;
    Ok(())
}

fn point_bytes(point: Point) -> [u8; 3] {
    [point.x as u8, point.y as u8, point.z as u8]
}

/// Reads a fixed number of bytes, reporting a short file as corrupt.
fn read_bytes<const N: usize>(reader: &mut impl Read) -> Result<[u8; N]> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::CorruptSolutionFile("unexpected end of file".into()),
        _ => Error::Io(e),
    })?;
    Ok(buffer)
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    Ok(u32::from_le_bytes(read_bytes(reader)?))
}

fn read_point(reader: &mut impl Read) -> Result<Point> {
    let [x, y, z]: [u8; 3] = read_bytes(reader)?;
    Ok(Point::new(x as i32, y as i32, z as i32))
}

/// Reads one segment and recovers its length from its span.
fn read_segment(reader: &mut impl Read, index: usize) -> Result<PlacedSegment> {
    let start = read_point(reader)?;
    let end = read_point(reader)?;
    let [orientation_byte]: [u8; 1] = read_bytes(reader)?;

    let orientation = Orientation::from_index(orientation_byte as usize).ok_or_else(|| {
        Error::CorruptSolutionFile(format!("unknown orientation {orientation_byte}"))
    })?;

    let span = end - start;
    let distance = span.x.abs() + span.y.abs() + span.z.abs();
    if start + distance * orientation.step() != end {
        return Err(Error::CorruptSolutionFile(format!(
            "segment {index} from {start} to {end} does not run {orientation}"
        )));
    }

    Ok(PlacedSegment {
        index,
        length: distance as usize + 1,
        start,
        end,
        orientation,
    })
}

/// Checks that segments join end to start, turn at every joint and fill
/// the cube exactly once.
fn validate_folding(solution: &Solution, side: usize, number: usize) -> Result<()> {
    for pair in solution.segments().windows(2) {
        let (previous, segment) = (&pair[0], &pair[1]);
        if segment.start != previous.end {
            return Err(Error::CorruptSolutionFile(format!(
                "solution {number}: segment {} starts at {} but segment {} ends at {}",
                segment.index, segment.start, previous.index, previous.end
            )));
        }
    }
    if !solution.alternates_axes() {
        return Err(Error::CorruptSolutionFile(format!(
            "solution {number}: consecutive segments share an axis"
        )));
    }
    if !solution.covers_cube(side) {
        return Err(Error::CorruptSolutionFile(format!(
            "solution {number} does not fill a cube of side {side}"
        )));
    }
    Ok(())
}

/// Loads all solutions from the binary file in `dir`.
pub fn load_all(dir: &Path) -> Result<SavedSolutions> {
    let mut file = BufReader::new(File::open(dir.join(SOLUTIONS_BIN))?);

    let side = read_u32(&mut file)? as usize;
    if side == 0 || side > MAX_SIDE {
        return Err(Error::CorruptSolutionFile(format!("cube side {side}")));
    }
    let solution_count = read_u32(&mut file)? as usize;

    let mut solutions = Vec::new();
    for number in 1..=solution_count {
        let segment_count = read_u32(&mut file)? as usize;
        let segments = (0..segment_count)
            .map(|index| read_segment(&mut file, index))
            .collect::<Result<Vec<_>>>()?;
        let solution = Solution::new(segments);
        validate_folding(&solution, side, number)?;
        solutions.push(solution);
    }

    Ok(SavedSolutions { side, solutions })
}

/// Returns the number of saved solutions without loading them all.
pub fn count(dir: &Path) -> Result<usize> {
    let mut file = File::open(dir.join(SOLUTIONS_BIN))?;
    let _side = read_u32(&mut file)?;
    Ok(read_u32(&mut file)? as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainSpec, Puzzle, SolveOptions};
    use tempfile::tempdir;

    fn two_cube_solutions() -> Vec<Solution> {
        let puzzle = Puzzle::new(ChainSpec::new(vec![2; 7]).unwrap(), 2).unwrap();
        puzzle
            .solve(&puzzle.default_seeds(), &SolveOptions::default())
            .unwrap()
            .solutions
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let solutions = two_cube_solutions();

        save(dir.path(), 2, &solutions).unwrap();
        let saved = load_all(dir.path()).unwrap();

        assert_eq!(saved.side, 2);
        assert_eq!(saved.solutions, solutions);
        assert_eq!(count(dir.path()).unwrap(), 18);

        let text = std::fs::read_to_string(dir.path().join(SOLUTIONS_TXT)).unwrap();
        assert!(text.starts_with("Found 18 solutions:"));
        assert!(text.contains("Solution 18:"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(load_all(dir.path()), Err(Error::Io(_))));
        assert!(matches!(count(dir.path()), Err(Error::Io(_))));
    }

    #[test]
    fn test_rejects_inconsistent_segment() {
        let dir = tempdir().unwrap();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        // runs +x but claims to point Up
        bytes.extend_from_slice(&[0, 0, 0, 1, 0, 0, Orientation::Up.index() as u8]);
        std::fs::write(dir.path().join(SOLUTIONS_BIN), bytes).unwrap();

        assert!(matches!(
            load_all(dir.path()),
            Err(Error::CorruptSolutionFile(_))
        ));
    }

    fn write_single_solution(dir: &Path, side: u32, segments: &[[u8; 7]]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&side.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(segments.len() as u32).to_le_bytes());
        for segment in segments {
            bytes.extend_from_slice(segment);
        }
        std::fs::write(dir.join(SOLUTIONS_BIN), bytes).unwrap();
    }

    #[test]
    fn test_rejects_impossible_foldings() {
        let right = Orientation::Right.index() as u8;
        let up = Orientation::Up.index() as u8;
        let back = Orientation::Back.index() as u8;
        let dir = tempdir().unwrap();

        // second segment does not start where the first ends
        write_single_solution(dir.path(), 2, &[[0, 0, 0, 1, 0, 0, right], [0, 1, 0, 0, 1, 1, up]]);
        assert!(matches!(
            load_all(dir.path()),
            Err(Error::CorruptSolutionFile(_))
        ));

        // well formed run that leaves a cube of side 2
        write_single_solution(dir.path(), 2, &[[1, 0, 0, 2, 0, 0, right], [2, 0, 0, 2, 1, 0, back]]);
        assert!(matches!(
            load_all(dir.path()),
            Err(Error::CorruptSolutionFile(_))
        ));

        // continuous and in bounds but only three of eight cells
        write_single_solution(dir.path(), 2, &[[0, 0, 0, 1, 0, 0, right], [1, 0, 0, 1, 0, 1, up]]);
        assert!(matches!(
            load_all(dir.path()),
            Err(Error::CorruptSolutionFile(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let dir = tempdir().unwrap();
        let solutions = two_cube_solutions();
        save(dir.path(), 2, &solutions).unwrap();

        let path = dir.path().join(SOLUTIONS_BIN);
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        assert!(matches!(
            load_all(dir.path()),
            Err(Error::CorruptSolutionFile(_))
        ));
    }
}

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::location::{Dimension, Location};
use crate::placement::Placement;
use crate::region::RegionId;
use crate::solver::{PlacementSolver, SolverFailure};

/// Characters used to print regions of boards that were not built from text.
const DEFAULT_REGION_DISPLAYS: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
const OVERFLOW_DISPLAY: char = '#';

/// A square board of color regions.
///
/// Boards come out of [`GridExtractor`](crate::extract::GridExtractor) when reading a photo,
/// or out of a [`BoardBuilder`](crate::builder::BoardBuilder) when written by hand.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) cells: Array2<RegionId>,
    pub(crate) size: Dimension,
    // indexed by RegionId::index
    pub(crate) region_displays: Vec<char>,
}

impl Board {
    /// Wrap a square array of region ids, labelling regions with the default alphabet.
    ///
    /// Returns [`None`] if `cells` is empty or not square.
    pub fn from_cells(cells: Array2<RegionId>) -> Option<Self> {
        let (rows, columns) = cells.dim();
        if rows != columns {
            return None;
        }
        let size = Dimension::new(rows)?;

        let region_count = cells.iter().map(|id| id.index() + 1).max().unwrap_or(0);
        let region_displays = (0..region_count)
            .map(|index| DEFAULT_REGION_DISPLAYS.chars().nth(index).unwrap_or(OVERFLOW_DISPLAY))
            .collect();

        Some(Self {
            cells,
            size,
            region_displays,
        })
    }

    /// Number of rows, which is also the number of columns.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// The region of the cell at `location`, or [`None`] if it lies off the board.
    pub fn region_at(&self, location: Location) -> Option<RegionId> {
        self.cells.get(location.as_index()).copied()
    }

    /// Number of distinct regions present on the board.
    pub fn region_count(&self) -> usize {
        self.cells.iter().collect::<HashSet<_>>().len()
    }

    /// Every cell with its region, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Location, RegionId)> + '_ {
        self.cells.indexed_iter().map(|(index, id)| (Location::from(index), *id))
    }

    /// Solves this board, deferring to a [`PlacementSolver`] and pairing the board with the markers it found.
    ///
    /// Returns according to the result of [`PlacementSolver::solve`].
    pub fn solve(self) -> Result<SolvedBoard, SolverFailure> {
        let placement = PlacementSolver::from(&self).solve()?;
        Ok(SolvedBoard {
            board: self,
            placement,
        })
    }

    fn display_of(&self, id: RegionId) -> char {
        self.region_displays.get(id.index()).copied().unwrap_or(OVERFLOW_DISPLAY)
    }

    fn print(&self, placement: Option<&Placement>) -> String {
        let mut out = String::with_capacity(self.size.get() * (self.size.get() + 1));

        for (row_index, row) in self.cells.rows().into_iter().enumerate() {
            for (column, id) in row.iter().enumerate() {
                let display = self.display_of(*id);
                out.push(match placement {
                    Some(placement) if placement.contains(Location(row_index, column)) => display.to_ascii_uppercase(),
                    _ => display.to_ascii_lowercase(),
                });
            }
            out.push('\n');
        }

        out
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(None))
    }
}

/// A [`Board`] together with a complete [`Placement`] of markers on it.
#[derive(Clone, Debug)]
pub struct SolvedBoard {
    board: Board,
    placement: Placement,
}

impl SolvedBoard {
    /// The board that was solved.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The markers found on it.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Split back into the board and its markers.
    pub fn into_parts(self) -> (Board, Placement) {
        (self.board, self.placement)
    }
}

/// Prints the board with marked cells upper-cased.
impl Display for SolvedBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board.print(Some(&self.placement)))
    }
}

use std::str::FromStr;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};

use crate::board::Board;
use crate::location::{Coord, Dimension, Location};
use crate::region::RegionTable;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A region was painted outside the bounds given by `size` on the builder.
    FeatureOutOfBounds,
    /// A row was given with a different number of cells than the board is wide.
    RowLengthMismatch {
        /// The offending row.
        row: Coord,
        /// How many cells it held.
        len: usize,
    },
    /// [`BoardBuilder::build`] was called while this cell had no region.
    Unpainted(Location),
}

/// A builder for boards written by hand, one character per region.
///
/// Regions receive ids in the order their characters first appear in row-major order, matching how
/// [`GridExtractor`](crate::extract::GridExtractor) numbers colors.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    size: Dimension,
    cells: Array2<Option<char>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl BoardBuilder {
    /// Construct a new, entirely unpainted builder for a `size` by `size` board.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            size,
            cells: Array2::from_elem((size.get(), size.get()), None),
            invalid_reasons: Default::default(),
        }
    }

    /// Assign the cell at `location` to the region drawn as `display`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn paint(&mut self, location: Location, display: char) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match self.cells.get_mut(location.as_index()) {
            Some(cell) => cell.assign_elem(Some(display)),
            None => self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds),
        }

        self
    }

    /// Paint a whole row, one character per column.
    ///
    /// May cause the builder to enter a [`RowLengthMismatch`](BuilderInvalidReason::RowLengthMismatch) invalid state if `displays` does not span the board exactly,
    /// or a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `row` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn paint_row(&mut self, row: Coord, displays: &str) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let displays = displays.chars().collect_vec();
        if displays.len() != self.size.get() {
            self.invalid_reasons.push(BuilderInvalidReason::RowLengthMismatch { row, len: displays.len() });
            return self;
        }

        for (column, display) in displays.into_iter().enumerate() {
            self.paint(Location(row, column), display);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    ///
    /// Fails if the builder is invalid or any cell was left unpainted.
    pub fn build(&self) -> Result<Board, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }

        let unpainted = self.cells.indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| BuilderInvalidReason::Unpainted(Location::from(index)))
            .collect_vec();
        if !unpainted.is_empty() {
            return Err(unpainted);
        }

        // every cell is painted by now
        let displays = self.cells.map(|cell| cell.unwrap_or_default());
        let mut table = RegionTable::new();
        let cells = table.assign_grid(&displays);
        let region_displays = table.keys().to_vec();

        Ok(Board {
            cells,
            size: self.size,
            region_displays,
        })
    }
}

/// Parses one row per non-blank line, e.g. `"aab\nabb\nccc"`. Surrounding whitespace on each line is ignored.
impl FromStr for Board {
    type Err = Vec<BuilderInvalidReason>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines().map(str::trim).filter(|line| !line.is_empty()).collect_vec();
        let size = Dimension::new(rows.len()).ok_or_else(|| vec![BuilderInvalidReason::FeatureOutOfBounds])?;

        let mut builder = BoardBuilder::with_size(size);
        for (row, displays) in rows.into_iter().enumerate() {
            builder.paint_row(row, displays);
        }
        builder.build()
    }
}

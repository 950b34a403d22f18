use std::num::NonZero;

use ndarray::Ix;

/// A row or column index.
pub type Coord = usize;
/// Side length of a square board; boards always hold at least one cell.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A cell `(row, column)` on a board. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The row of this location.
    pub fn row(&self) -> Coord {
        self.0
    }

    /// The column of this location.
    pub fn column(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.0, self.1)
    }

    // stepping off the top or left edge wraps around to a huge coordinate, which no board contains
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

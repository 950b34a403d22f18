use strum::VariantArray;

use crate::location::Location;

/// Directions from a candidate marker to the cells of the previous row that must stay empty.
///
/// Only the row directly above is ever checked; rows further up may hold diagonal neighbors along the same line.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug)]
pub(crate) enum DiagonalStep {
    UpLeft,
    UpRight,
}

impl DiagonalStep {
    pub(crate) fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::UpLeft => location.offset_by((-1, -1)),
            Self::UpRight => location.offset_by((-1, 1)),
        }
    }

    /// Every location diagonally adjacent to `location` in the previous row.
    pub(crate) fn touching(location: Location) -> impl Iterator<Item = Location> {
        Self::VARIANTS.iter().map(move |step| step.attempt_from(location))
    }
}

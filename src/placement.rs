use crate::location::{Coord, Location};

/// A solved assignment of one marker per board row.
///
/// Markers are stored by row, so a [`Placement`] never holds two markers in one row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    columns: Vec<Coord>,
}

impl Placement {
    pub(crate) fn from_columns(columns: Vec<Coord>) -> Self {
        Self { columns }
    }

    /// Number of markers placed.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no marker has been placed.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column holding the marker of `row`, if that row has one.
    pub fn column_of(&self, row: Coord) -> Option<Coord> {
        self.columns.get(row).copied()
    }

    /// Whether a marker sits at `location`.
    pub fn contains(&self, location: Location) -> bool {
        self.column_of(location.row()) == Some(location.column())
    }

    /// Marker locations in row order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.columns.iter().enumerate().map(|(row, column)| Location(row, *column))
    }
}

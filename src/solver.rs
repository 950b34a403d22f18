//! Backtracking search for marker placements.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::board::Board;
use crate::location::{Coord, Dimension, Location};
use crate::placement::Placement;
use crate::region::RegionId;
use crate::step::DiagonalStep;

/// Reasons a [`PlacementSolver`] may fail.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SolverFailure {
    /// Every column of every row was tried without completing a placement, i.e. the board as stated is unsolvable.
    #[error("no marker placement satisfies this {size}x{size} board")]
    Unsatisfiable {
        /// Side length of the board that was searched.
        size: Dimension,
    },
}

/// Markers committed so far during one search, owned by that search alone.
struct SearchState {
    // column of the marker in each row placed so far
    columns: Vec<Coord>,
    columns_used: Vec<bool>,
    regions_used: HashSet<RegionId>,
    visited: usize,
    backtracks: usize,
}

impl SearchState {
    fn new(size: Dimension) -> Self {
        Self {
            columns: Vec::with_capacity(size.get()),
            columns_used: vec![false; size.get()],
            regions_used: HashSet::with_capacity(size.get()),
            visited: 0,
            backtracks: 0,
        }
    }

    fn is_placed(&self, location: Location) -> bool {
        self.columns.get(location.row()) == Some(&location.column())
    }

    fn is_legal(&self, location: Location, region: RegionId) -> bool {
        if self.columns_used[location.column()] {
            return false;
        }
        if self.regions_used.contains(&region) {
            return false;
        }
        !DiagonalStep::touching(location).any(|neighbor| self.is_placed(neighbor))
    }

    fn commit(&mut self, location: Location, region: RegionId) {
        self.columns.push(location.column());
        self.columns_used[location.column()] = true;
        self.regions_used.insert(region);
    }

    fn retract(&mut self, location: Location, region: RegionId) {
        self.columns.pop();
        self.columns_used[location.column()] = false;
        self.regions_used.remove(&region);
        self.backtracks += 1;
    }
}

/// Depth-first search for one marker per row such that no two markers share a column or a region,
/// and no marker touches the marker of the row above diagonally.
///
/// Columns are tried in ascending order, so the result is the first such placement in that order.
/// Use [`Self::solve`] to attempt to find a solution.
pub struct PlacementSolver<'a> {
    board: &'a Board,
}

impl<'a> From<&'a Board> for PlacementSolver<'a> {
    fn from(board: &'a Board) -> Self {
        Self { board }
    }
}

impl PlacementSolver<'_> {
    /// Search for a full placement, returning [`Ok`] with one marker per row or [`Err`] with a [`SolverFailure`] reason.
    ///
    /// Never returns a partial placement.
    pub fn solve(&self) -> Result<Placement, SolverFailure> {
        let size = self.board.size();
        let mut state = SearchState::new(size);

        let found = self.place_from(&mut state, 0, size.get());
        debug!(visited = state.visited, backtracks = state.backtracks, found, "placement search finished");

        if found {
            Ok(Placement::from_columns(state.columns))
        } else {
            Err(SolverFailure::Unsatisfiable { size })
        }
    }

    fn place_from(&self, state: &mut SearchState, row: Coord, remaining: usize) -> bool {
        if remaining == 0 {
            return true;
        }

        for column in 0..self.board.size().get() {
            let location = Location(row, column);
            let Some(region) = self.board.region_at(location) else {
                continue;
            };
            state.visited += 1;

            if !state.is_legal(location, region) {
                continue;
            }

            state.commit(location, region);
            if self.place_from(state, row + 1, remaining - 1) {
                return true;
            }
            state.retract(location, region);
        }

        false
    }
}

#![warn(missing_docs)]

//! # `chromaqueen`
//!
//! A solver for color-region Queens puzzles that works from a screenshot or photo of the puzzle.
//! The puzzle is an N×N grid split into N colored regions; exactly one marker goes in every row, every column and every
//! region, and no two markers may touch diagonally.
//!
//! Hand [`solve()`] an image and a [`MarkerGlyph`](render::MarkerGlyph), and it returns a redrawn board with the glyph on
//! every solved cell. For working with files, build a [`Pipeline`] from a [`Config`].
//! Boards can also be written out by hand with a [`BoardBuilder`](builder::BoardBuilder) and solved with [`Board::solve`].
//!
//! # Internals
//! Solving runs in three stages, each usable on its own:
//!
//! 1. [`GridExtractor`](extract::GridExtractor) traces closed borders in the image, picks the play area among them
//! with a [`BoundaryPolicy`](extract::BoundaryPolicy), crops to it and counts the cells inside. The grid side N is the
//! square root of that count; anything other than a perfect square is rejected. Each cell's color is averaged over its
//! interior, away from the grid lines, and equal averages are numbered as one region in a
//! [`RegionColorTable`](region::RegionColorTable).
//! 2. [`PlacementSolver`](solver::PlacementSolver) backtracks row by row, trying columns left to right and pruning any
//! column or region already used as well as the two cells diagonally below the previous row's marker.
//! The first full placement found is returned; a board with none is reported as
//! [`Unsatisfiable`](solver::SolverFailure::Unsatisfiable), never as a partial answer.
//! 3. [`Renderer`](render::Renderer) redraws every cell in its region color, draws grid lines and composites the marker
//! glyph over the solved cells.
//!
//! Nothing is shared between calls except a [`Pipeline`]'s decoded glyph, so independent requests may run concurrently.

pub use board::{Board, SolvedBoard};
pub use builder::BoardBuilder;
pub use config::{Config, ExtractorConfig, GridLines, RenderConfig};
pub use error::{Error, ErrorKind};
pub use location::{Dimension, Location};
pub use pipeline::{solve, Pipeline};
pub use placement::Placement;

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub(crate) mod step;
pub(crate) mod placement;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod pipeline;
pub mod builder;
pub mod extract;
pub mod region;
pub mod render;
pub mod solver;
#[cfg(feature = "wasm")]
pub mod wasm;

use thiserror::Error;

use crate::extract::ExtractionFailure;
use crate::region::RegionId;
use crate::solver::SolverFailure;

/// Broad classes of [`Error`], for callers that answer each class differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The image could not be read as a puzzle board; retake the photo.
    Extraction,
    /// The board was read but has no solution; the puzzle itself is malformed.
    Unsatisfiable,
    /// The marker glyph could not be loaded.
    Asset,
    /// Decoding the input or writing the output failed.
    Io,
}

/// Everything that can go wrong between receiving an image and writing its solution.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`ExtractionFailure`].
    #[error("could not read the puzzle grid: {0}")]
    Extraction(#[from] ExtractionFailure),
    /// See [`SolverFailure`].
    #[error("puzzle cannot be solved: {0}")]
    Unsatisfiable(#[from] SolverFailure),
    /// The marker glyph could not be decoded.
    #[error("marker glyph from {origin} could not be loaded")]
    Asset {
        /// Where the glyph was read from.
        origin: String,
        /// The underlying decode error.
        #[source]
        source: image::ImageError,
    },
    /// A board referenced a region its color table never assigned.
    #[error("region {0} has no recorded color")]
    UnknownRegion(RegionId),
    /// Reading the puzzle image or writing the rendered solution failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) | Self::UnknownRegion(_) => ErrorKind::Extraction,
            Self::Unsatisfiable(_) => ErrorKind::Unsatisfiable,
            Self::Asset { .. } => ErrorKind::Asset,
            Self::Image(_) => ErrorKind::Io,
        }
    }
}

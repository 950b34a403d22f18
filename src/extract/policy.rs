use itertools::Itertools;

use crate::extract::contour::{area, Contour};

/// How the play area and its cells are picked out of traced contours.
///
/// [`GridExtractor`](crate::extract::GridExtractor) asks the policy twice: once with every contour of the
/// source image, to choose the border whose bounding box becomes the grid, and once with the contours of
/// that cropped grid, to learn how many cells it holds.
pub trait BoundaryPolicy {
    /// The contour enclosing the puzzle, or [`None`] if no contour qualifies.
    fn select_play_area<'c>(&self, contours: &'c [Contour<u32>]) -> Option<&'c Contour<u32>>;
    /// The number of cells represented by `contours`, traced inside the cropped play area.
    fn count_cells(&self, contours: &[Contour<u32>]) -> usize;
}

/// The policy for screenshots of the puzzle shown on a plain page.
///
/// Assumes the largest traced border is the frame of the page or image itself and the second largest
/// runs around the outside of the puzzle's dark outline. Cropping to that border leaves a one pixel ring
/// of page around the grid, which traces as one outer and one hole border; every other border is a cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecondLargestContour;

impl SecondLargestContour {
    /// Borders larger than the play area, by rank.
    pub const FRAME_CONTOURS: usize = 1;
    /// Borders inside the cropped grid that are not cells.
    pub const RING_CONTOURS: usize = 2;
}

impl BoundaryPolicy for SecondLargestContour {
    fn select_play_area<'c>(&self, contours: &'c [Contour<u32>]) -> Option<&'c Contour<u32>> {
        contours.iter()
            .map(|contour| (area(contour), contour))
            .sorted_by(|a, b| b.0.total_cmp(&a.0))
            .nth(Self::FRAME_CONTOURS)
            .map(|(_, contour)| contour)
    }

    fn count_cells(&self, contours: &[Contour<u32>]) -> usize {
        contours.len().saturating_sub(Self::RING_CONTOURS)
    }
}

//! Reading a [`Board`] out of a photo or screenshot of the puzzle.

use image::{imageops, RgbImage};
use ndarray::Array2;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::ExtractorConfig;
use crate::location::Dimension;
use crate::region::{RegionColor, RegionColorTable};

pub use contour::{area, find_contours, BorderType, BoundingBox, Contour};
pub use policy::{BoundaryPolicy, SecondLargestContour};

pub mod contour;
pub mod policy;

/// Reasons a [`GridExtractor`] may fail to read a board.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ExtractionFailure {
    /// The boundary policy found no contour to use as the play area.
    #[error("found {found} closed contours, not enough to locate the play area")]
    TooFewContours {
        /// Number of contours traced in the source image.
        found: usize,
    },
    /// No cell contours were left inside the play area.
    #[error("no cells were detected inside the play area")]
    NoCells,
    /// The cells counted inside the play area do not form a square grid.
    #[error("{total_cells} cells were detected, which does not form a square grid")]
    NonSquareCellCount {
        /// Number of cells counted.
        total_cells: usize,
    },
    /// Cells are too small to keep any pixels once grid lines are padded away.
    #[error("cells of {width}x{height} px leave nothing to sample inside {padding} px of padding")]
    CellTooSmall {
        /// Width of one cell.
        width: u32,
        /// Height of one cell.
        height: u32,
        /// Padding removed from every side.
        padding: u32,
    },
}

/// The result of reading a board: the cropped grid image, where it was found, the board, and the color of each region.
#[derive(Clone, Debug)]
pub struct ExtractedGrid {
    /// The source image cropped to the play area.
    pub grid: RgbImage,
    /// Where [`Self::grid`] lies in the source image.
    pub bounds: BoundingBox,
    /// One region per cell.
    pub board: Board,
    /// Average color of each region, used to redraw the board.
    pub colors: RegionColorTable,
}

/// Locates the puzzle grid inside an image and reads each cell's region from its average color.
///
/// The geometry heuristics live in the [`BoundaryPolicy`] `P`; [`SecondLargestContour`] is the default.
#[derive(Clone, Debug)]
pub struct GridExtractor<P = SecondLargestContour> {
    config: ExtractorConfig,
    policy: P,
}

impl GridExtractor {
    /// An extractor using the default [`SecondLargestContour`] policy.
    pub fn new(config: ExtractorConfig) -> Self {
        Self::with_policy(config, SecondLargestContour)
    }
}

impl Default for GridExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl<P: BoundaryPolicy> GridExtractor<P> {
    /// An extractor deferring play area and cell detection to `policy`.
    pub fn with_policy(config: ExtractorConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Read the board shown in `image`.
    ///
    /// A fresh [`RegionColorTable`] is built for every call.
    pub fn extract(&self, image: &RgbImage) -> Result<ExtractedGrid, ExtractionFailure> {
        let contours = find_contours(&imageops::grayscale(image));
        debug!(contours = contours.len(), "traced source image");

        let Some(play_area) = self.policy.select_play_area(&contours) else {
            warn!(found = contours.len(), "no play area contour");
            return Err(ExtractionFailure::TooFewContours { found: contours.len() });
        };
        let bounds = BoundingBox::of(play_area);
        debug!(?bounds, "play area located");

        let grid = imageops::crop_imm(image, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
        let cell_contours = find_contours(&imageops::grayscale(&grid));
        let total_cells = self.policy.count_cells(&cell_contours);

        let size = grid_size(total_cells)?;
        let n = size.get() as u32;
        let (cell_width, cell_height) = (grid.width() / n, grid.height() / n);
        let padding = self.config.cell_padding;
        let trim = padding.saturating_mul(2);
        if cell_width <= trim || cell_height <= trim {
            warn!(cell_width, cell_height, padding, "cells too small to sample");
            return Err(ExtractionFailure::CellTooSmall { width: cell_width, height: cell_height, padding });
        }
        debug!(size = n, cell_width, cell_height, "grid geometry resolved");

        let sample = Sample {
            width: cell_width - trim,
            height: cell_height - trim,
        };
        let cell_colors = Array2::from_shape_fn((size.get(), size.get()), |(row, column)| {
            sample.mean_color(&grid, column as u32 * cell_width + padding, row as u32 * cell_height + padding)
        });

        let mut colors = RegionColorTable::new();
        let cells = colors.assign_grid(&cell_colors);
        let board = Board::from_cells(cells).ok_or(ExtractionFailure::NoCells)?;
        info!(size = n, regions = colors.len(), "board extracted");

        Ok(ExtractedGrid {
            grid,
            bounds,
            board,
            colors,
        })
    }
}

fn grid_size(total_cells: usize) -> Result<Dimension, ExtractionFailure> {
    let side = (total_cells as f64).sqrt() as usize;
    let size = Dimension::new(side).ok_or_else(|| {
        warn!(total_cells, "no cells detected");
        ExtractionFailure::NoCells
    })?;

    if side * side != total_cells {
        warn!(total_cells, "cell count is not a perfect square");
        return Err(ExtractionFailure::NonSquareCellCount { total_cells });
    }

    Ok(size)
}

/// The size of the window averaged inside each cell.
struct Sample {
    width: u32,
    height: u32,
}

impl Sample {
    /// Mean color over the window with its top left corner at `(x, y)`, truncated per channel.
    fn mean_color(&self, grid: &RgbImage, x: u32, y: u32) -> RegionColor {
        let mut sums = [0u64; 3];
        for py in y..y + self.height {
            for px in x..x + self.width {
                for (sum, channel) in sums.iter_mut().zip(grid.get_pixel(px, py).0) {
                    *sum += channel as u64;
                }
            }
        }

        let count = self.width as u64 * self.height as u64;
        RegionColor(sums.map(|sum| (sum / count) as u8))
    }
}

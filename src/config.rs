use std::path::PathBuf;

use strum::{Display, EnumString, VariantNames};

/// Everything a [`Pipeline`](crate::Pipeline) needs from its caller.
#[derive(Clone, Debug)]
pub struct Config {
    /// Image drawn on every solved cell.
    pub marker_asset_path: PathBuf,
    /// Where the rendered solution is written, always as PNG.
    pub output_path: PathBuf,
    /// Tuning for reading the board.
    pub extractor: ExtractorConfig,
    /// Tuning for drawing the solution.
    pub render: RenderConfig,
}

impl Config {
    /// A configuration with default extraction and rendering settings.
    pub fn new(marker_asset_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            marker_asset_path: marker_asset_path.into(),
            output_path: output_path.into(),
            extractor: Default::default(),
            render: Default::default(),
        }
    }
}

/// Settings for [`GridExtractor`](crate::extract::GridExtractor).
#[derive(Clone, Copy, Debug)]
pub struct ExtractorConfig {
    /// Pixels ignored on every side of a cell when averaging its color, so grid lines stay out of the sample.
    pub cell_padding: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { cell_padding: 15 }
    }
}

/// Which cell edges get a grid line.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, VariantNames, Eq, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum GridLines {
    /// Only the top edge of each cell.
    TopEdges,
    /// Every edge, closing the board's outline.
    #[default]
    AllEdges,
}

/// Settings for [`Renderer`](crate::render::Renderer).
#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    /// Unpainted pixels left around each cell's fill.
    pub border: u32,
    /// Marker side length as a fraction of the smaller cell dimension.
    pub glyph_scale: f64,
    /// Grid line style.
    pub grid_lines: GridLines,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            border: 1,
            glyph_scale: 0.7,
            grid_lines: GridLines::default(),
        }
    }
}

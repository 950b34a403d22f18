use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::{ImageFormat, RgbImage};
use tracing::info;

use crate::board::SolvedBoard;
use crate::config::{Config, ExtractorConfig, RenderConfig};
use crate::error::Error;
use crate::extract::{BoundaryPolicy, ExtractedGrid, GridExtractor, SecondLargestContour};
use crate::region::RegionColorTable;
use crate::render::{MarkerGlyph, Renderer};

/// Read the puzzle shown in `image`, solve it, and draw the solution with `glyph` on every marked cell.
///
/// The returned image has the size of the play area found in `image`. Uses default extraction and rendering settings;
/// see [`Pipeline`] for a configurable, file-based variant.
pub fn solve(image: &RgbImage, glyph: &MarkerGlyph) -> Result<RgbImage, Error> {
    let extractor = GridExtractor::new(ExtractorConfig::default());
    let renderer = Renderer::new(RenderConfig::default());

    solve_board(&extractor, image)?.render(&renderer, glyph)
}

/// A solved board with what is needed to draw it.
struct SolvedGrid {
    grid: RgbImage,
    colors: RegionColorTable,
    solved: SolvedBoard,
}

impl SolvedGrid {
    fn render(&self, renderer: &Renderer, glyph: &MarkerGlyph) -> Result<RgbImage, Error> {
        renderer.render(self.grid.dimensions(), &self.solved, &self.colors, glyph)
    }
}

fn solve_board<P: BoundaryPolicy>(extractor: &GridExtractor<P>, image: &RgbImage) -> Result<SolvedGrid, Error> {
    let ExtractedGrid { grid, board, colors, .. } = extractor.extract(image)?;
    let solved = board.solve()?;
    info!("solved board:\n{}", solved);

    Ok(SolvedGrid { grid, colors, solved })
}

/// Solves puzzle images from disk according to a [`Config`].
///
/// A pipeline holds no per-request state besides the marker glyph, which is decoded on first use and then shared,
/// so one pipeline may serve many requests, including from several threads at once.
pub struct Pipeline<P = SecondLargestContour> {
    config: Config,
    extractor: GridExtractor<P>,
    renderer: Renderer,
    glyph: OnceLock<MarkerGlyph>,
}

impl Pipeline {
    /// A pipeline using the default [`SecondLargestContour`] policy.
    pub fn new(config: Config) -> Self {
        Self::with_policy(config, SecondLargestContour)
    }
}

impl<P: BoundaryPolicy> Pipeline<P> {
    /// A pipeline locating grids with `policy`.
    pub fn with_policy(config: Config, policy: P) -> Self {
        Self {
            extractor: GridExtractor::with_policy(config.extractor, policy),
            renderer: Renderer::new(config.render),
            glyph: OnceLock::new(),
            config,
        }
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and solve the board in `image` without rendering it.
    pub fn solve_board(&self, image: &RgbImage) -> Result<SolvedBoard, Error> {
        solve_board(&self.extractor, image).map(|solved| solved.solved)
    }

    /// Read, solve and render the board in `image`.
    ///
    /// The marker glyph is only loaded once the board is solved, so extraction and solving failures are reported
    /// even when the glyph is missing.
    pub fn render(&self, image: &RgbImage) -> Result<RgbImage, Error> {
        let solved = solve_board(&self.extractor, image)?;
        solved.render(&self.renderer, self.glyph()?)
    }

    /// Decode the image at `input`, render its solution and write it to the configured output path as PNG.
    ///
    /// Returns the path written.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let image = image::open(input.as_ref())?.to_rgb8();
        let rendered = self.render(&image)?;

        let output = &self.config.output_path;
        rendered.save_with_format(output, ImageFormat::Png)?;
        info!(output = %output.display(), "solution written");

        Ok(output.clone())
    }

    fn glyph(&self) -> Result<&MarkerGlyph, Error> {
        if let Some(glyph) = self.glyph.get() {
            return Ok(glyph);
        }

        let path = &self.config.marker_asset_path;
        let glyph = MarkerGlyph::open(path).map_err(|source| Error::Asset {
            origin: path.display().to_string(),
            source,
        })?;
        Ok(self.glyph.get_or_init(|| glyph))
    }
}

//! Redrawing a solved board as a clean image with a marker on every solved cell.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::debug;

use crate::board::SolvedBoard;
use crate::config::{GridLines, RenderConfig};
use crate::error::Error;
use crate::location::Location;
use crate::region::RegionColorTable;

const GRID_LINE: Rgb<u8> = Rgb([0, 0, 0]);

/// The image drawn over each solved cell.
///
/// Glyphs are never mutated once loaded, so one glyph can be shared by any number of renders.
#[derive(Clone, Debug)]
pub struct MarkerGlyph {
    pixels: RgbaImage,
    has_alpha: bool,
}

impl MarkerGlyph {
    /// Decode a glyph from an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        Ok(Self::from_dynamic(image::open(path)?))
    }

    /// Wrap a decoded image, blending with its alpha channel if it has one.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            has_alpha: image.color().has_alpha(),
            pixels: image.to_rgba8(),
        }
    }

    /// A glyph blended through its alpha channel.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels, has_alpha: true }
    }

    /// An opaque glyph, copied over the cell as is.
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self::from_dynamic(DynamicImage::ImageRgb8(pixels))
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// A copy scaled to `side` by `side` pixels.
    pub fn resized(&self, side: u32) -> Self {
        Self {
            pixels: imageops::resize(&self.pixels, side, side, FilterType::Triangle),
            has_alpha: self.has_alpha,
        }
    }

    /// Draw this glyph onto `canvas` with its top left corner at `(left, top)`.
    ///
    /// With an alpha channel each channel becomes `alpha * glyph + (1 - alpha) * canvas`, truncated;
    /// without one the glyph's pixels replace the canvas. Pixels falling outside `canvas` are dropped.
    pub fn overlay(&self, canvas: &mut RgbImage, left: u32, top: u32) {
        for (x, y, glyph) in self.pixels.enumerate_pixels() {
            let (Some(cx), Some(cy)) = (left.checked_add(x), top.checked_add(y)) else {
                continue;
            };
            let Some(under) = canvas.get_pixel_mut_checked(cx, cy) else {
                continue;
            };

            if self.has_alpha {
                let alpha = glyph.0[3] as f64 / 255.0;
                for (out, over) in under.0.iter_mut().zip(glyph.0) {
                    *out = (alpha * over as f64 + (1.0 - alpha) * *out as f64) as u8;
                }
            } else {
                *under = Rgb([glyph.0[0], glyph.0[1], glyph.0[2]]);
            }
        }
    }
}

/// Draws a [`SolvedBoard`] at a given size: each cell filled with its region's color, grid lines between cells,
/// and a centered [`MarkerGlyph`] on every solved cell.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// A renderer using `config`.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render `solved` onto a fresh `width` by `height` image.
    ///
    /// Cell sizes are `width / n` by `height / n`, truncated. Fails with [`Error::UnknownRegion`] if a cell's
    /// region is missing from `colors`.
    pub fn render(
        &self,
        (width, height): (u32, u32),
        solved: &SolvedBoard,
        colors: &RegionColorTable,
        glyph: &MarkerGlyph,
    ) -> Result<RgbImage, Error> {
        let board = solved.board();
        let n = board.size().get() as u32;
        let cell = Cell {
            width: width / n,
            height: height / n,
        };

        let side = (cell.width.min(cell.height) as f64 * self.config.glyph_scale) as u32;
        let marker = (side > 0).then(|| glyph.resized(side));
        debug!(cell_width = cell.width, cell_height = cell.height, marker_side = side, "rendering solution");

        let mut canvas = RgbImage::from_pixel(width, height, GRID_LINE);
        for (location, id) in board.cells() {
            let color = colors.color_of(id).ok_or(Error::UnknownRegion(id))?;
            let (left, top) = cell.origin(location);

            if let Some(fill) = cell.fill(left, top, self.config.border) {
                draw_filled_rect_mut(&mut canvas, fill, color.into());
            }
            self.draw_lines(&mut canvas, &cell, left, top);

            if let Some(marker) = marker.as_ref().filter(|_| solved.placement().contains(location)) {
                marker.overlay(
                    &mut canvas,
                    left + cell.width.saturating_sub(side) / 2,
                    top + cell.height.saturating_sub(side) / 2,
                );
            }
        }

        Ok(canvas)
    }

    fn draw_lines(&self, canvas: &mut RgbImage, cell: &Cell, left: u32, top: u32) {
        let (x0, y0) = (left as f32, top as f32);
        let (x1, y1) = (
            (left + cell.width).min(canvas.width().saturating_sub(1)) as f32,
            (top + cell.height).min(canvas.height().saturating_sub(1)) as f32,
        );

        draw_line_segment_mut(canvas, (x0, y0), (x1, y0), GRID_LINE);
        if self.config.grid_lines == GridLines::AllEdges {
            draw_line_segment_mut(canvas, (x0, y0), (x0, y1), GRID_LINE);
            draw_line_segment_mut(canvas, (x1, y0), (x1, y1), GRID_LINE);
            draw_line_segment_mut(canvas, (x0, y1), (x1, y1), GRID_LINE);
        }
    }
}

/// Pixel size of one board cell.
struct Cell {
    width: u32,
    height: u32,
}

impl Cell {
    fn origin(&self, location: Location) -> (u32, u32) {
        (location.column() as u32 * self.width, location.row() as u32 * self.height)
    }

    /// The filled part of the cell at `(left, top)`: from `border` to `size - border` inclusive on both axes.
    fn fill(&self, left: u32, top: u32, border: u32) -> Option<Rect> {
        let width = (self.width + 1).checked_sub(2 * border).filter(|w| *w > 0)?;
        let height = (self.height + 1).checked_sub(2 * border).filter(|h| *h > 0)?;
        Some(Rect::at((left + border) as i32, (top + border) as i32).of_size(width, height))
    }
}

//! Border tracing over grayscale images, on top of [`imageproc::contours`].
//!
//! Every nonzero pixel is foreground. Each connected foreground region yields one outer border,
//! and each hole inside it one hole border, so a one pixel wide ring traces twice.

use image::{imageops, GrayImage};
use imageproc::geometry::contour_area;
use imageproc::point::Point;
use itertools::{Itertools, MinMaxResult};

pub use imageproc::contours::{BorderType, Contour};

/// An integer rectangle `(x, y, width, height)` in image coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    /// Smallest rectangle holding every point of `contour`.
    pub fn of(contour: &Contour<u32>) -> Self {
        let span = |range: MinMaxResult<u32>| match range {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(v) => (v, 1),
            MinMaxResult::MinMax(min, max) => (min, max - min + 1),
        };
        let (x, width) = span(contour.points.iter().map(|p| p.x).minmax());
        let (y, height) = span(contour.points.iter().map(|p| p.y).minmax());

        Self { x, y, width, height }
    }
}

/// Area enclosed by the polygon through the border's points. Chains of fewer than three points enclose nothing.
pub fn area(contour: &Contour<u32>) -> f64 {
    contour_area(&contour.points)
}

/// Trace every outer and hole border in `image`, in raster order of their starting pixels.
///
/// The image is framed by one pixel of background first, so regions touching the image edge,
/// the whole image included, are still enclosed by a border.
pub fn find_contours(image: &GrayImage) -> Vec<Contour<u32>> {
    let mut framed = GrayImage::new(image.width() + 2, image.height() + 2);
    imageops::replace(&mut framed, image, 1, 1);

    imageproc::contours::find_contours::<u32>(&framed)
        .into_iter()
        .map(|contour| Contour {
            points: contour.points.into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect(),
            ..contour
        })
        .collect()
}

use std::fmt::Display;
use std::io::Cursor;

use image::ImageFormat;
use wasm_bindgen::prelude::*;

use crate::error::Error;
use crate::render::MarkerGlyph;

/// Solve the puzzle in the encoded image `puzzle`, marking solved cells with the encoded image `marker`.
///
/// Returns the rendered solution as PNG bytes, or throws an `Error` describing why it could not be produced.
#[wasm_bindgen(js_name = solvePng)]
pub fn solve_png(puzzle: &[u8], marker: &[u8]) -> Result<Vec<u8>, JsValue> {
    let puzzle = image::load_from_memory(puzzle).map_err(to_js)?.to_rgb8();
    let glyph = image::load_from_memory(marker)
        .map(MarkerGlyph::from_dynamic)
        .map_err(|source| to_js(Error::Asset { origin: "memory".into(), source }))?;

    let rendered = crate::solve(&puzzle, &glyph).map_err(to_js)?;

    let mut out = Cursor::new(Vec::new());
    rendered.write_to(&mut out, ImageFormat::Png).map_err(to_js)?;
    Ok(out.into_inner())
}

fn to_js(error: impl Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

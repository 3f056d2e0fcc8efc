//! Glyph metrics read from TrueType/OpenType files with `fontdue`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::MeasurementError;
use crate::metrics::{BoundingBox, GlyphMetricsProvider};

/// Resolution used to turn point sizes into pixels.
pub const RENDER_DPI: f64 = 96.0;

/// Parses each font file once and keeps it for later measurements.
#[derive(Default)]
pub struct TrueTypeMetrics {
    fonts: Mutex<FxHashMap<PathBuf, Arc<Font>>>,
}

impl TrueTypeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&self, path: &Path) -> Result<Arc<Font>, MeasurementError> {
        if let Some(font) = self.fonts.lock().get(path) {
            return Ok(Arc::clone(font));
        }

        let load_error = |message: String| MeasurementError::FontLoad {
            path: path.to_path_buf(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| load_error(e.to_string()))?;
        log::debug!("Loaded font {}", path.display());

        let font = Arc::new(font);
        self.fonts.lock().insert(path.to_path_buf(), Arc::clone(&font));
        Ok(font)
    }

    pub fn cached_fonts(&self) -> usize {
        self.fonts.lock().len()
    }
}

impl GlyphMetricsProvider for TrueTypeMetrics {
    fn bounding_box(
        &self,
        point_size: f64,
        angle: f64,
        font_file: &Path,
        text: &str,
    ) -> Result<BoundingBox, MeasurementError> {
        let font = self.load(font_file)?;
        let px = (point_size * RENDER_DPI / 72.0) as f32;
        Ok(ink_extents(&font, px, text).rotated(angle))
    }
}

/// Union of glyph boxes laid out left to right with kerning.
///
/// A glyph without ink (space, tab) contributes the pen point where it
/// starts, so leading and interior blanks widen the box like rendered text.
fn ink_extents(font: &Font, px: f32, text: &str) -> BoundingBox {
    let mut pen = 0.0_f32;
    let mut prev: Option<char> = None;
    let mut ink: Option<BoundingBox> = None;

    for ch in text.chars() {
        if let Some(left) = prev {
            pen += font.horizontal_kern(left, ch, px).unwrap_or(0.0);
        }
        let metrics = font.metrics(ch, px);
        let outline = metrics.bounds;
        let glyph = if outline.width > 0.0 && outline.height > 0.0 {
            BoundingBox {
                x_min: f64::from(pen + outline.xmin),
                y_min: f64::from(outline.ymin),
                x_max: f64::from(pen + outline.xmin + outline.width),
                y_max: f64::from(outline.ymin + outline.height),
            }
        } else {
            let x = f64::from(pen);
            BoundingBox { x_min: x, y_min: 0.0, x_max: x, y_max: 0.0 }
        };
        ink = Some(match ink {
            Some(acc) => acc.union(&glyph),
            None => glyph,
        });
        pen += metrics.advance_width;
        prev = Some(ch);
    }

    ink.unwrap_or_default()
}

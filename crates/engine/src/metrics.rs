//! Rendered text widths.
//!
//! A cell's fit width is the widest of its lines, each measured as the
//! glyph bounding box of the line plus a padding of one "n" glyph scaled
//! by 1.07 and rounded up. This is the spreadsheet column autosize
//! heuristic; the constants must not drift or columns stop matching what
//! spreadsheet applications produce for the same content.

use std::path::{Path, PathBuf};

use crate::error::MeasurementError;
use crate::font::{FontDescriptor, FontFileResolver};

/// Glyph measured to derive per-cell padding.
pub const PADDING_GLYPH: &str = "n";

/// Scale applied to the padding glyph width before rounding up.
pub const PADDING_SCALE: f64 = 1.07;

/// Pixels (96 DPI) per millimetre; converts a measured width to column units.
pub const PIXELS_PER_MILLIMETER: f64 = 96.0 / 25.4;

/// Axis-aligned extents of rendered text, in pixels, y up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Extents after rotating counter-clockwise by `degrees` around the origin.
    pub fn rotated(&self, degrees: f64) -> BoundingBox {
        if degrees == 0.0 {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let corners = [
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_max, self.y_max),
            (self.x_min, self.y_max),
        ];
        corners
            .iter()
            .map(|&(x, y)| {
                let (rx, ry) = (x * cos - y * sin, x * sin + y * cos);
                BoundingBox { x_min: rx, y_min: ry, x_max: rx, y_max: ry }
            })
            .reduce(|a, b| a.union(&b))
            .unwrap_or(*self)
    }
}

/// Source of glyph geometry for a string set in a font file.
pub trait GlyphMetricsProvider {
    fn bounding_box(
        &self,
        point_size: f64,
        angle: f64,
        font_file: &Path,
        text: &str,
    ) -> Result<BoundingBox, MeasurementError>;
}

pub struct TextMetricsMeasurer<M, R> {
    provider: M,
    resolver: R,
}

impl<M: GlyphMetricsProvider, R: FontFileResolver> TextMetricsMeasurer<M, R> {
    pub fn new(provider: M, resolver: R) -> Self {
        Self { provider, resolver }
    }

    pub fn provider(&self) -> &M {
        &self.provider
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Width of a single line in pixels.
    pub fn measure_line_width(&self, line: &str, font: &FontDescriptor) -> Result<f64, MeasurementError> {
        let file = self.resolver.resolve(font)?;
        self.line_width_in(&file, font, line)
    }

    /// `ceil(width("n") * 1.07)` for `font`.
    pub fn padding(&self, font: &FontDescriptor) -> Result<f64, MeasurementError> {
        let file = self.resolver.resolve(font)?;
        self.padding_in(&file, font)
    }

    /// Width a cell needs to show `value` unclipped, in column units.
    /// `None` when the cell is empty.
    pub fn measure_cell_fit_width(
        &self,
        value: Option<&str>,
        font: &FontDescriptor,
    ) -> Result<Option<f64>, MeasurementError> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        let file = self.resolver.resolve(font)?;
        let padding = self.padding_in(&file, font)?;
        self.fit_width_in(&file, value, font, padding).map(Some)
    }

    pub(crate) fn resolve(&self, font: &FontDescriptor) -> Result<PathBuf, MeasurementError> {
        self.resolver.resolve(font)
    }

    /// Padding measured in an already resolved font file.
    pub(crate) fn padding_in(&self, file: &Path, font: &FontDescriptor) -> Result<f64, MeasurementError> {
        Ok((self.line_width_in(file, font, PADDING_GLYPH)? * PADDING_SCALE).ceil())
    }

    /// Fit width with the font file and padding already known.
    pub(crate) fn fit_width_in(
        &self,
        file: &Path,
        value: &str,
        font: &FontDescriptor,
        padding: f64,
    ) -> Result<f64, MeasurementError> {
        let mut widest = 0.0_f64;
        for line in value.split('\n') {
            let body = self.line_width_in(file, font, line)?;
            widest = widest.max(body + padding);
        }
        Ok(widest / PIXELS_PER_MILLIMETER)
    }

    fn line_width_in(&self, file: &Path, font: &FontDescriptor, line: &str) -> Result<f64, MeasurementError> {
        let bbox = self.provider.bounding_box(font.size, 0.0, file, line)?;
        Ok(bbox.width())
    }
}

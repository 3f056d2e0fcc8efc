//! Font descriptors and mapping them onto TrueType files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sheetfit_config::settings::Settings;

use crate::error::MeasurementError;
use crate::font_path::FontSearchPath;

/// Font used to render a cell.
///
/// `family` is either a family name ("Calibri") or a font file reference
/// ("NotoSansJP-Regular.otf"), resolved against the font search path when
/// relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Calibri", 11.0)
    }
}

/// Hashable identity of a [`FontDescriptor`].
pub type FontKey = (String, OrderedFloat<f64>, bool, bool);

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_font_family.clone(), settings.default_font_size)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn key(&self) -> FontKey {
        (self.family.clone(), OrderedFloat(self.size), self.bold, self.italic)
    }

    /// True when `family` names a font file rather than a family.
    pub fn is_file_reference(&self) -> bool {
        let lower = self.family.to_ascii_lowercase();
        [".ttf", ".otf", ".ttc"].iter().any(|ext| lower.ends_with(ext))
    }
}

/// Maps a font descriptor to the file the glyph metrics are read from.
pub trait FontFileResolver {
    fn resolve(&self, font: &FontDescriptor) -> Result<PathBuf, MeasurementError>;
}

/// File names for the four style variants of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFiles {
    pub regular: String,
    pub bold: String,
    pub italic: String,
    pub bold_italic: String,
}

impl FontFiles {
    pub fn new(
        regular: impl Into<String>,
        bold: impl Into<String>,
        italic: impl Into<String>,
        bold_italic: impl Into<String>,
    ) -> Self {
        Self {
            regular: regular.into(),
            bold: bold.into(),
            italic: italic.into(),
            bold_italic: bold_italic.into(),
        }
    }

    /// One file for every style.
    pub fn single(file: impl Into<String>) -> Self {
        let file = file.into();
        Self::new(file.clone(), file.clone(), file.clone(), file)
    }

    fn pick(&self, bold: bool, italic: bool) -> &str {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic][style_index(bold, italic)]
    }
}

fn style_index(bold: bool, italic: bool) -> usize {
    match (bold, italic) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

/// Well-known families, file names as shipped with Windows/Office.
/// Order: regular, bold, italic, bold italic.
const KNOWN_FONTS: &[(&str, [&str; 4])] = &[
    ("arial", ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"]),
    ("calibri", ["CALIBRI.TTF", "CALIBRIB.TTF", "CALIBRII.TTF", "CALIBRIZ.TTF"]),
    ("comic sans ms", ["comic.ttf", "comicbd.ttf", "comic.ttf", "comicbd.ttf"]),
    ("courier new", ["cour.ttf", "courbd.ttf", "couri.ttf", "courbi.ttf"]),
    ("georgia", ["georgia.ttf", "georgiab.ttf", "georgiai.ttf", "georgiaz.ttf"]),
    ("impact", ["impact.ttf", "impact.ttf", "impact.ttf", "impact.ttf"]),
    ("liberation sans", [
        "LiberationSans-Regular.ttf",
        "LiberationSans-Bold.ttf",
        "LiberationSans-Italic.ttf",
        "LiberationSans-BoldItalic.ttf",
    ]),
    ("liberation serif", [
        "LiberationSerif-Regular.ttf",
        "LiberationSerif-Bold.ttf",
        "LiberationSerif-Italic.ttf",
        "LiberationSerif-BoldItalic.ttf",
    ]),
    ("lucida console", ["lucon.ttf", "lucon.ttf", "lucon.ttf", "lucon.ttf"]),
    ("lucida sans unicode", ["l_10646.ttf", "l_10646.ttf", "l_10646.ttf", "l_10646.ttf"]),
    ("microsoft sans serif", ["micross.ttf", "micross.ttf", "micross.ttf", "micross.ttf"]),
    ("palatino linotype", ["pala.ttf", "palab.ttf", "palai.ttf", "palabi.ttf"]),
    ("symbol", ["symbol.ttf", "symbol.ttf", "symbol.ttf", "symbol.ttf"]),
    ("tahoma", ["tahoma.ttf", "tahomabd.ttf", "tahoma.ttf", "tahomabd.ttf"]),
    ("times new roman", ["times.ttf", "timesbd.ttf", "timesi.ttf", "timesbi.ttf"]),
    ("trebuchet ms", ["trebuc.ttf", "trebucbd.ttf", "trebucit.ttf", "trebucbi.ttf"]),
    ("verdana", ["verdana.ttf", "verdanab.ttf", "verdanai.ttf", "verdanaz.ttf"]),
];

/// Resolves families to files inside the current font search path.
pub struct TrueTypeFontResolver {
    search_path: Arc<FontSearchPath>,
    /// Lowercased family name -> files; consulted before the built-in table
    extra: FxHashMap<String, FontFiles>,
}

impl TrueTypeFontResolver {
    pub fn new(search_path: Arc<FontSearchPath>) -> Self {
        Self {
            search_path,
            extra: FxHashMap::default(),
        }
    }

    /// Register (or override) the files for a family.
    pub fn with_font(mut self, family: &str, files: FontFiles) -> Self {
        self.extra.insert(family.to_lowercase(), files);
        self
    }

    pub fn search_path(&self) -> &FontSearchPath {
        &self.search_path
    }

    /// File name for `font`, before joining with the search path.
    pub fn file_name(&self, font: &FontDescriptor) -> Result<String, MeasurementError> {
        if font.is_file_reference() {
            return Ok(font.family.clone());
        }

        let family = font.family.trim().to_lowercase();
        if let Some(files) = self.extra.get(&family) {
            return Ok(files.pick(font.bold, font.italic).to_string());
        }

        KNOWN_FONTS
            .iter()
            .find(|(name, _)| *name == family)
            .map(|(_, files)| files[style_index(font.bold, font.italic)].to_string())
            .ok_or_else(|| MeasurementError::UnknownFont {
                family: font.family.clone(),
            })
    }
}

impl FontFileResolver for TrueTypeFontResolver {
    fn resolve(&self, font: &FontDescriptor) -> Result<PathBuf, MeasurementError> {
        let file = self.file_name(font)?;
        let path = if Path::new(&file).is_absolute() {
            PathBuf::from(file)
        } else {
            // The search path carries its trailing separator
            PathBuf::from(format!("{}{}", self.search_path.current(), file))
        };

        if !path.is_file() {
            return Err(MeasurementError::FontFileMissing {
                family: font.family.clone(),
                path,
            });
        }
        log::debug!("Resolved font '{}' to {}", font.family, path.display());
        Ok(path)
    }
}

// Layout settings
// Loaded from ~/.config/sheetfit/settings.json

use serde::{Deserialize, Serialize};
use sheetfit_core::BoundsScan;
use std::fs;
use std::path::{Path, PathBuf};

use crate::default_font_directory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Fonts
    #[serde(rename = "fonts.directory")]
    pub font_directory: String,

    #[serde(rename = "font.defaultFamily")]
    pub default_font_family: String,

    #[serde(rename = "font.defaultSize")]
    pub default_font_size: f64,

    // Bounds
    #[serde(rename = "bounds.scan")]
    pub bounds_scan: BoundsScan,

    // Layout passes
    #[serde(rename = "layout.wrapText")]
    pub wrap_text: bool,

    #[serde(rename = "layout.adjustColumnWidths")]
    pub adjust_column_widths: bool,

    #[serde(rename = "layout.resetSelection")]
    pub reset_selection: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Fonts
            font_directory: default_font_directory(),
            default_font_family: "Calibri".to_string(),
            default_font_size: 11.0,
            // Bounds
            bounds_scan: BoundsScan::Precise,
            // Layout
            wrap_text: true,
            adjust_column_widths: true,
            reset_selection: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetfit");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, self.commented_json()) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    fn commented_json(&self) -> String {
        let font_dir = serde_json::to_string(&self.font_directory).unwrap_or_else(|_| "\"\"".into());
        let family = serde_json::to_string(&self.default_font_family).unwrap_or_else(|_| "\"\"".into());
        format!(
            r#"{{
    // Directory holding the TrueType files used to measure text
    "fonts.directory": {font_dir},

    // Font for cells without an explicit one
    "font.defaultFamily": {family},
    "font.defaultSize": {size},

    // Populated-range search: "precise" or "rightOfMax" (legacy order)
    "bounds.scan": "precise",

    // Passes run after a sheet is built
    "layout.wrapText": {wrap},
    "layout.adjustColumnWidths": {adjust},
    "layout.resetSelection": {reset}
}}
"#,
            size = self.default_font_size,
            wrap = self.wrap_text,
            adjust = self.adjust_column_widths,
            reset = self.reset_selection,
        )
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

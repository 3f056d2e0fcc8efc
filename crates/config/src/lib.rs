// Configuration loading

pub mod settings;

/// Platform font directory, with trailing separator.
pub fn default_font_directory() -> String {
    if cfg!(target_os = "windows") {
        "C:\\Windows\\Fonts\\".to_string()
    } else if cfg!(target_os = "macos") {
        "/Library/Fonts/".to_string()
    } else {
        "/usr/share/fonts/truetype/".to_string()
    }
}

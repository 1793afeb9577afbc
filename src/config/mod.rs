//! Configuration management for Trellis
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. Every section falls back to its defaults, so a config
//! file only needs to name what it changes.

use crate::backend::pixmap::FontMetrics;
use crate::backend::{Color, TextStyle};
use crate::tiling::Tiling;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 1000;

/// Main configuration struct containing all Trellis settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrellisConfig {
    /// General compositor settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Headless output
    #[serde(default)]
    pub output: OutputConfig,

    /// Window management settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Status bar
    #[serde(default)]
    pub bar: BarConfig,

    /// Pop-up menu look
    #[serde(default)]
    pub menu: MenuConfig,

    /// Built-in block font
    #[serde(default)]
    pub font: FontConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,

    /// Frame rate of the event loop (0 = 60, at most 1000)
    pub max_fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub width: i32,
    pub height: i32,

    /// Colour behind all views
    pub background: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Width of the grab band around each view (pixels)
    pub border_thickness: i32,

    /// Strategy used by the tile action
    pub tiling: Tiling,

    /// Smallest width/height an interactive resize can reach
    pub min_size: i32,

    /// Outline drawn around the focused view
    pub focus_color: Color,

    /// Outline drawn around unfocused views
    pub border_color: Color,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BarConfig {
    pub enabled: bool,
    pub height: i32,

    /// Horizontal space between the bar edge and its labels
    pub padding: i32,
    pub background: Color,
    pub foreground: Color,
    pub position: BarPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MenuConfig {
    /// Space around and between items (pixels)
    pub border: i32,
    pub background: Color,

    /// Colours of the hovered item
    pub active_fg: Color,
    pub active_bg: Color,

    /// Colours of every other item
    pub inactive_fg: Color,
    pub inactive_bg: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Horizontal advance per character (pixels)
    pub advance: i32,
    pub line_height: i32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_fps: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            background: Color::rgb(0x1F, 0x29, 0x37),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            border_thickness: 5,
            tiling: Tiling::default(),
            min_size: 1,
            focus_color: Color::rgb(0x7C, 0x3A, 0xED),   // Purple
            border_color: Color::rgb(0x37, 0x41, 0x51), // Gray
        }
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            height: 24,
            padding: 8,
            background: Color::rgb(0x11, 0x18, 0x27),
            foreground: Color::rgb(0xE5, 0xE7, 0xEB),
            position: BarPosition::Top,
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            border: 4,
            background: Color::rgb(0x37, 0x41, 0x51),
            active_fg: Color::WHITE,
            active_bg: Color::rgb(0x7C, 0x3A, 0xED),
            inactive_fg: Color::rgb(0xE5, 0xE7, 0xEB),
            inactive_bg: Color::rgb(0x1F, 0x29, 0x37),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        let metrics = FontMetrics::default();
        Self {
            advance: metrics.advance,
            line_height: metrics.line_height,
        }
    }
}

impl GeneralConfig {
    /// Effective frame rate.
    pub fn fps(&self) -> u32 {
        if self.max_fps == 0 {
            60
        } else {
            self.max_fps
        }
    }
}

impl MenuConfig {
    pub fn active_style(&self) -> TextStyle {
        TextStyle {
            fg: self.active_fg,
            bg: self.active_bg,
        }
    }

    pub fn inactive_style(&self) -> TextStyle {
        TextStyle {
            fg: self.inactive_fg,
            bg: self.inactive_bg,
        }
    }
}

impl FontConfig {
    pub fn metrics(&self) -> FontMetrics {
        FontMetrics {
            advance: self.advance,
            line_height: self.line_height,
        }
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Ok(Path::new(&home).join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

impl TrellisConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path.as_ref())?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: TrellisConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.general.max_fps > MAX_FPS {
            anyhow::bail!(
                "Invalid max_fps {}: must be at most {}",
                self.general.max_fps,
                MAX_FPS
            );
        }

        if self.output.width <= 0 || self.output.height <= 0 {
            anyhow::bail!(
                "Invalid output size {}x{}: both sides must be positive",
                self.output.width,
                self.output.height
            );
        }

        if self.window.border_thickness < 0 {
            anyhow::bail!("Invalid border_thickness: must not be negative");
        }

        if self.window.min_size < 1 {
            anyhow::bail!("Invalid min_size: must be at least 1");
        }

        if self.bar.enabled && (self.bar.height <= 0 || self.bar.height >= self.output.height) {
            anyhow::bail!("Invalid bar height: must be positive and smaller than the output");
        }

        if self.bar.padding < 0 || self.menu.border < 0 {
            anyhow::bail!("Invalid spacing: bar padding and menu border must not be negative");
        }

        if self.font.advance <= 0 || self.font.line_height <= 0 {
            anyhow::bail!("Invalid font metrics: advance and line_height must be positive");
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod property_tests;

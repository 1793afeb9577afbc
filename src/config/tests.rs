//! Unit tests for configuration module
//!
//! Tests configuration parsing, validation, serialization and the
//! fallback to defaults for sections a file leaves out.

use super::*;
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_configuration_is_valid() {
    let config = TrellisConfig::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.window.border_thickness, 5);
    assert_eq!(config.window.min_size, 1);
    assert_eq!(config.window.tiling, Tiling::RightThenDown);
    assert_eq!(config.menu.border, 4);
    assert_eq!(config.general.fps(), 60);
    assert!(config.bar.enabled);
}

#[test]
fn test_configuration_from_file() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("trellis.toml");

    let test_config = r##"
[general]
debug = true
max_fps = 30

[output]
width = 640
height = 480
background = "#000000"

[window]
border_thickness = 8
tiling = "two-thirds-sidebar"
min_size = 20
focus_color = "#FF000080"
border_color = "#374151"

[bar]
enabled = true
height = 20
padding = 4
background = "#111827"
foreground = "#E5E7EB"
position = "bottom"

[menu]
border = 2

[font]
advance = 6
line_height = 12
"##;

    fs::write(&file_path, test_config)?;
    let config = TrellisConfig::load(&file_path)?;

    assert!(config.general.debug);
    assert_eq!(config.general.fps(), 30);
    assert_eq!((config.output.width, config.output.height), (640, 480));
    assert_eq!(config.window.border_thickness, 8);
    assert_eq!(config.window.tiling, Tiling::TwoThirdsSidebar);
    assert_eq!(config.window.focus_color, Color::rgba(255, 0, 0, 0x80));
    assert_eq!(config.bar.position, BarPosition::Bottom);
    assert_eq!(config.menu.border, 2);
    // the rest of the menu section keeps its defaults
    assert_eq!(config.menu.active_fg, MenuConfig::default().active_fg);
    assert_eq!(
        config.font.metrics(),
        FontMetrics {
            advance: 6,
            line_height: 12
        }
    );

    Ok(())
}

#[test]
fn test_partial_configuration_uses_defaults() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("partial.toml");
    fs::write(&file_path, "[window]\ntiling = \"even-vertically\"\n")?;

    let config = TrellisConfig::load(&file_path)?;
    assert_eq!(config.window.tiling, Tiling::EvenVertically);
    assert_eq!(config.window.border_thickness, 5);
    assert_eq!(config.output, OutputConfig::default());
    assert_eq!(config.bar, BarConfig::default());

    Ok(())
}

#[test]
fn test_malformed_toml_handling() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("malformed.toml");

    fs::write(&file_path, "[window\nborder_thickness = \"wide\"\n").unwrap();
    assert!(TrellisConfig::load(&file_path).is_err());
}

#[test]
fn test_bad_color_is_rejected() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("color.toml");

    fs::write(&file_path, "[window]\nfocus_color = \"purple\"\n").unwrap();
    let err = TrellisConfig::load(&file_path).unwrap_err();
    assert!(format!("{:#}", err).contains("purple"));
}

#[test]
fn test_unknown_tiling_is_rejected() {
    assert!(toml::from_str::<TrellisConfig>("[window]\ntiling = \"spiral\"\n").is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(TrellisConfig::load(dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_configuration_validation() {
    let config = TrellisConfig::default();

    let mut invalid = config.clone();
    invalid.output.width = 0;
    assert!(invalid.validate().is_err());

    let mut invalid = config.clone();
    invalid.window.border_thickness = -1;
    assert!(invalid.validate().is_err());

    let mut invalid = config.clone();
    invalid.window.min_size = 0;
    assert!(invalid.validate().is_err());

    let mut invalid = config.clone();
    invalid.bar.height = invalid.output.height;
    assert!(invalid.validate().is_err());

    // a disabled bar's height is irrelevant
    invalid.bar.enabled = false;
    assert!(invalid.validate().is_ok());

    let mut invalid = config;
    invalid.font.advance = 0;
    assert!(invalid.validate().is_err());
}

#[test]
fn test_frame_rate_is_bounded() {
    let mut config = TrellisConfig::default();
    config.general.max_fps = MAX_FPS;
    assert!(config.validate().is_ok());

    config.general.max_fps = u32::MAX;
    let err = config.validate().unwrap_err();
    assert!(format!("{:#}", err).contains("max_fps"));

    let parsed: TrellisConfig = toml::from_str("[general]\nmax_fps = 2000000000\n").unwrap();
    assert!(parsed.validate().is_err());
}

#[test]
fn test_save_and_reload() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("saved.toml");

    let mut config = TrellisConfig::default();
    config.window.tiling = Tiling::EvenVertically;
    config.output.background = Color::rgba(1, 2, 3, 4);
    config.save(&file_path)?;

    let contents = fs::read_to_string(&file_path)?;
    assert!(contents.contains("even-vertically"));
    assert!(contents.contains("#01020304"));

    assert_eq!(TrellisConfig::load(&file_path)?, config);
    Ok(())
}

#[test]
fn test_expand_home() -> Result<()> {
    let plain = Path::new("/etc/trellis.toml");
    assert_eq!(expand_home(plain)?, plain.to_path_buf());

    if let Ok(home) = std::env::var("HOME") {
        assert_eq!(
            expand_home(Path::new("~/.config/trellis/trellis.toml"))?,
            Path::new(&home).join(".config/trellis/trellis.toml")
        );
    }
    Ok(())
}

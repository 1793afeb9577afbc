//! Property-based tests for configuration validation

use super::*;
use proptest::prelude::*;

prop_compose! {
    fn valid_window_config()(
        border_thickness in 0i32..64,
        min_size in 1i32..500,
        tiling in prop_oneof![
            Just(Tiling::RightThenDown),
            Just(Tiling::TwoThirdsSidebar),
            Just(Tiling::EvenVertically),
        ],
    ) -> WindowConfig {
        WindowConfig {
            border_thickness,
            tiling,
            min_size,
            ..WindowConfig::default()
        }
    }
}

prop_compose! {
    fn valid_config()(
        width in 64i32..8192,
        height in 64i32..8192,
        window in valid_window_config(),
        bar_enabled in any::<bool>(),
        bar_height in 1i32..64,
    ) -> TrellisConfig {
        let mut config = TrellisConfig::default();
        config.output.width = width;
        config.output.height = height;
        config.window = window;
        config.bar.enabled = bar_enabled;
        config.bar.height = bar_height;
        config
    }
}

proptest! {
    #[test]
    fn test_generated_configs_validate(config in valid_config()) {
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_configs_survive_toml(config in valid_config()) {
        let text = toml::to_string(&config).unwrap();
        let parsed: TrellisConfig = toml::from_str(&text).unwrap();
        prop_assert_eq!(parsed, config);
    }

    #[test]
    fn test_min_size_bound(min_size in -10i32..10) {
        let mut config = TrellisConfig::default();
        config.window.min_size = min_size;
        prop_assert_eq!(config.validate().is_ok(), min_size >= 1);
    }

    #[test]
    fn test_border_thickness_bound(thickness in -10i32..10) {
        let mut config = TrellisConfig::default();
        config.window.border_thickness = thickness;
        prop_assert_eq!(config.validate().is_ok(), thickness >= 0);
    }
}

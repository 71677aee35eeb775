//! Loading `CarouselConfig` from TOML and JSON files.

use std::io::Write;

use ftui_carousel::{BreakpointRule, Carousel, CarouselConfig, ConfigError};

const TOML: &str = r#"
item_count = 8
infinite = false
slides_to_show = 3
slides_to_scroll = 3
gap = 12
autoplay = true
autoplay_speed_ms = 4000

[[responsive]]
max_width = 768
slides_to_show = 2

[[responsive]]
max_width = 480
slides_to_show = 1
gap = 4
"#;

#[test]
fn toml_overrides_and_defaults() {
    let config = CarouselConfig::from_toml_str(TOML).unwrap();
    assert_eq!(config.item_count, 8);
    assert!(!config.infinite);
    assert_eq!(config.slides_to_show, 3);
    assert_eq!(config.gap, 12);
    assert!(config.autoplay);
    assert_eq!(config.autoplay_speed_ms, 4000);
    // Unspecified fields keep their defaults.
    assert_eq!(config.transition_ms, CarouselConfig::default().transition_ms);
    assert!(config.pause_on_hover);
    assert_eq!(
        config.responsive,
        vec![
            BreakpointRule::new(768, 2),
            BreakpointRule::new(480, 1).with_gap(4),
        ]
    );
    assert!(config.validate().is_empty());
}

#[test]
fn toml_file_drives_a_carousel() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TOML.as_bytes()).unwrap();

    let config = CarouselConfig::from_toml_file(file.path()).unwrap();
    let mut carousel = Carousel::new(config);
    assert!(carousel.is_playing());
    assert!(carousel.notify_viewport_changed(400));
    assert_eq!(carousel.layout().slides_to_show, 1);
    assert_eq!(carousel.layout().gap, 4);
}

#[test]
fn json_round_trips_through_serde() {
    let json = r#"{ "item_count": 4, "vertical": true, "swipe_threshold_px": 20.0 }"#;
    let config = CarouselConfig::from_json_str(json).unwrap();
    assert_eq!(config.item_count, 4);
    assert!(config.vertical);
    assert_eq!(config.swipe_threshold_px, 20.0);
    assert!(config.infinite);
}

#[test]
fn malformed_input_reports_parser() {
    let err = CarouselConfig::from_toml_str("item_count = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));

    let err = CarouselConfig::from_json_str("{").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CarouselConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn loaded_config_can_be_validated() {
    let err = CarouselConfig::from_toml_str("slides_to_show = 0")
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

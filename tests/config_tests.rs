use std::path::PathBuf;

use photo_album::Error;
use photo_album::config::{ButtonStyle, CancelBehavior, Configuration, PairingStrategy};
use photo_album::geometry::Rgba;

#[test]
fn defaults_when_empty() {
    let cfg = Configuration::from_yaml_str("").unwrap().validated().unwrap();
    assert_eq!(cfg.screenshot_root, PathBuf::from("screenshots"));
    assert_eq!((cfg.screen.width, cfg.screen.height), (1920, 1080));
    assert_eq!(cfg.grid.columns, 4);
    assert_eq!(cfg.pairing, PairingStrategy::LastUnderscore);
    assert_eq!(cfg.cancel_behavior, CancelBehavior::KeepSelection);
    assert_eq!(cfg.transition_steps, 50);
    assert_eq!(cfg.button.style, ButtonStyle::Scale);
    assert!((cfg.particles.spawn_chance - 0.1).abs() < f64::EPSILON);
    assert_eq!(cfg.trail_length, 20);
    assert!(cfg.background_scan);
    assert!(cfg.music.is_none());
    assert!((cfg.music_volume - 0.15).abs() < f32::EPSILON);
}

#[test]
fn parse_music_keys() {
    let yaml = "music: /opt/album/bg_music.mp3\nmusic-volume: 0.4\n";
    let cfg = Configuration::from_yaml_str(yaml).unwrap().validated().unwrap();
    assert_eq!(cfg.music, Some(PathBuf::from("/opt/album/bg_music.mp3")));
    assert!((cfg.music_volume - 0.4).abs() < f32::EPSILON);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r##"
screenshot-root: "/shots"
pairing: last-dot
cancel-behavior: clear-selection
transition-steps: 10
button:
  style: grow
  max-expansion: 20
particles:
  spawn-chance: 0.5
  seed: 9
theme:
  highlight: "#00ffff"
"##;
    let cfg = Configuration::from_yaml_str(yaml).unwrap().validated().unwrap();
    assert_eq!(cfg.screenshot_root, PathBuf::from("/shots"));
    assert_eq!(cfg.pairing, PairingStrategy::LastDot);
    assert_eq!(cfg.cancel_behavior, CancelBehavior::ClearSelection);
    assert_eq!(cfg.transition_steps, 10);
    assert_eq!(cfg.button.style, ButtonStyle::Grow);
    assert_eq!(cfg.button.max_expansion, 20);
    assert_eq!(cfg.button.steps, 3);
    assert_eq!(cfg.particles.seed, Some(9));
    let theme = cfg.theme.resolve().unwrap();
    assert_eq!(theme.highlight, Rgba::rgb(0x00, 0xFF, 0xFF));
    assert_eq!(theme.selected_tint, Rgba::GREEN);
}

#[test]
fn unknown_keys_rejected() {
    let err = Configuration::from_yaml_str("photo-library-path: /x\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn out_of_range_values_rejected() {
    for yaml in [
        "grid:\n  columns: 0\n",
        "transition-steps: 0\n",
        "button:\n  steps: 0\n",
        "button:\n  pressed-scale: 0.5\n",
        "particles:\n  spawn-chance: 1.5\n",
        "screen:\n  width: 0\n",
        "music-volume: 1.5\n",
        "music-volume: -0.1\n",
        "theme:\n  highlight: not-a-colour\n",
    ] {
        let err = Configuration::from_yaml_str(yaml)
            .unwrap()
            .validated()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{yaml}");
    }
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("album.yaml");
    std::fs::write(&path, "assets-dir: /opt/album/assets\nfont: Roboto\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.assets_dir, PathBuf::from("/opt/album/assets"));
    assert_eq!(cfg.font.as_deref(), Some("Roboto"));

    let missing = Configuration::from_yaml_file(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(missing, Error::Io(_)));
}

use super::*;

#[test]
fn default_scheme_matches_reference_layout() {
    let cfg = FrameSequenceConfig::default();
    assert_eq!(cfg.max_frames, 300);
    assert_eq!(cfg.locator(0), "character/male0001.png");
    assert_eq!(cfg.locator(299), "character/male0300.png");
    assert_eq!(cfg.locators().count(), 300);
}

#[test]
fn pad_width_is_a_minimum() {
    let cfg = FrameSequenceConfig {
        prefix: "f".to_string(),
        pad_width: 2,
        first: 99,
        max_frames: 3,
        extension: "jpg".to_string(),
    };
    let all: Vec<String> = cfg.locators().collect();
    assert_eq!(all, vec!["f99.jpg", "f100.jpg", "f101.jpg"]);
}

#[test]
fn json_fields_default_when_missing() {
    let cfg = FrameSequenceConfig::from_reader(r#"{ "max_frames": 12 }"#.as_bytes()).unwrap();
    assert_eq!(cfg.max_frames, 12);
    assert_eq!(cfg.prefix, "character/male");
    assert_eq!(cfg.pad_width, 4);
}

#[test]
fn json_rejects_unknown_fields() {
    let err = FrameSequenceConfig::from_reader(r#"{ "frames": 12 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("parse sequence config JSON"));
}

#[test]
fn validate_rejects_bad_schemes() {
    let base = FrameSequenceConfig::default();

    let zero = FrameSequenceConfig {
        max_frames: 0,
        ..base.clone()
    };
    assert!(zero.validate().is_err());

    let abs = FrameSequenceConfig {
        prefix: "/etc/frame".to_string(),
        ..base.clone()
    };
    assert!(abs.validate().is_err());

    let parent = FrameSequenceConfig {
        prefix: "../frames/f".to_string(),
        ..base.clone()
    };
    assert!(parent.validate().is_err());

    let ext = FrameSequenceConfig {
        extension: ".png".to_string(),
        ..base.clone()
    };
    assert!(ext.validate().is_err());

    let pad = FrameSequenceConfig {
        pad_width: 40,
        ..base
    };
    assert!(pad.validate().is_err());
}

#[test]
fn from_path_reports_missing_file() {
    let err = FrameSequenceConfig::from_path("definitely/missing/seq.json").unwrap_err();
    assert!(err.to_string().contains("open sequence config JSON"));
}

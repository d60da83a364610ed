//! Config hash stability.
//!
//! GREEN when:
//! - the same layers hash identically across calls
//! - a changed value or an extra override layer changes the hash
//! - an override layer that restates base values leaves the hash unchanged

use gsw_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
allowed_cities: [Bridgewatch, Lymhurst, Martlock]
ore:
  sheetName: Ore
  target: [T4_ORE, T4_ORE_LEVEL1@1, T5_ORE]
  t4_line: 2
  t5_line: 40
"#;

const OVERRIDE_TIME_SCALE: &str = r#"
market:
  time_scale: "6"
"#;

const RESTATE_SHEET: &str = r#"
ore:
  sheetName: Ore
"#;

#[test]
fn same_input_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn different_values_different_hash() {
    let changed = BASE_YAML.replace("t5_line: 40", "t5_line: 41");
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[&changed]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn override_layer_changes_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, OVERRIDE_TIME_SCALE]).unwrap();
    assert_ne!(base.config_hash, layered.config_hash);
    assert_eq!(layered.config_json["market"]["time_scale"], "6");
    assert_eq!(layered.config_json["ore"]["t5_line"], 40);
}

#[test]
fn restating_a_value_keeps_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, RESTATE_SHEET]).unwrap();
    assert_eq!(base.config_hash, layered.config_hash);
}

#[test]
fn file_and_string_loading_agree() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("items.yaml");
    std::fs::write(&path, BASE_YAML).unwrap();

    let from_file = gsw_config::load_layered_yaml(&[path.to_str().unwrap()]).unwrap();
    let from_str = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(from_file.config_hash, from_str.config_hash);
}

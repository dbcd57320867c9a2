use gw_config::load_layered_yaml_from_strings;

const BASE: &str = r#"
api:
  base_url: "https://api.wynncraft.com"
  timeout_secs: 10
watch:
  guild: "Sins of Seedia"
  interval_secs: 60
"#;

const BASE_REORDERED: &str = r#"
watch:
  interval_secs: 60
  guild: "Sins of Seedia"
api:
  timeout_secs: 10
  base_url: "https://api.wynncraft.com"
"#;

const OVERLAY: &str = r#"
watch:
  interval_secs: 300
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_changes_hash_and_value() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE, OVERLAY]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
    assert_eq!(b.app.watch.interval_secs, 300);
    assert_eq!(
        b.config_json.pointer("/watch/guild").and_then(|v| v.as_str()),
        Some("Sins of Seedia")
    );
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

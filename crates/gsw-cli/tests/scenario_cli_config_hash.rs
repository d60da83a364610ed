use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn hash_line(stdout: &[u8]) -> String {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string()
}

#[test]
fn scenario_config_hash_is_stable_and_layer_sensitive() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().join("base.yaml");
    let over = tmp.path().join("local.yaml");
    fs::write(
        &base,
        "allowed_cities: [Lymhurst]\nore:\n  sheetName: Ore\n  target: [T4_ORE]\n  t4_line: 2\n",
    )
    .unwrap();
    fs::write(&over, "market:\n  time_scale: \"6\"\n").unwrap();

    let run = |paths: &[&std::path::Path]| {
        Command::cargo_bin("gsw")
            .unwrap()
            .arg("config-hash")
            .args(paths)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("config_hash="))
            .get_output()
            .stdout
            .clone()
    };

    let a = hash_line(&run(&[&base]));
    let b = hash_line(&run(&[&base]));
    let c = hash_line(&run(&[&base, &over]));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), "config_hash=".len() + 64);
}

#[test]
fn scenario_secret_literal_in_config_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("leaky.yaml");
    fs::write(&path, "allowed_cities: []\ntoken: ghp_abcdefghijklmnop\n").unwrap();

    Command::cargo_bin("gsw")
        .unwrap()
        .arg("config-hash")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"));
}

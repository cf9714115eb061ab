//! CLI integration tests: run the actual wardrobe binary.
//! Tests that need a running backend are marked `#[ignore]`.

use std::path::Path;
use std::process::Command;

fn wardrobe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wardrobe"))
}

/// Command running in `dir`, with preferences stored in `dir/prefs.json`.
fn wardrobe_in(dir: &Path) -> Command {
    let cfg_dir = dir.join(".wardrobe");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    let prefs = dir.join("prefs.json");
    std::fs::write(
        cfg_dir.join("config.toml"),
        format!("[preferences]\npath = {:?}\n", prefs.display().to_string()),
    )
    .unwrap();

    let mut cmd = wardrobe();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_cli_help_lists_commands() {
    let output = wardrobe().arg("--help").output().expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["list", "facets", "outfits", "shop", "prefs", "tui"] {
        assert!(stdout.contains(cmd), "help should mention {cmd}");
    }
}

#[test]
fn test_cli_shop_requires_names() {
    let output = wardrobe().arg("shop").output().expect("failed to execute");
    assert!(!output.status.success(), "shop without names should fail");
}

#[test]
fn test_cli_prefs_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();

    let set = wardrobe_in(tmp.path())
        .args(["prefs", "set", "style=casual", "season=winter"])
        .output()
        .expect("failed to execute");
    assert!(
        set.status.success(),
        "prefs set failed: {}",
        String::from_utf8_lossy(&set.stderr)
    );
    assert!(tmp.path().join("prefs.json").exists());

    let show = wardrobe_in(tmp.path())
        .args(["prefs", "show", "--json"])
        .output()
        .expect("failed to execute");
    assert!(show.status.success());
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&show.stdout).trim())
            .expect("invalid JSON output");
    assert_eq!(value["style"], "casual");
    assert_eq!(value["season"], "winter");

    let clear = wardrobe_in(tmp.path())
        .args(["prefs", "clear"])
        .output()
        .expect("failed to execute");
    assert!(clear.status.success());
}

#[test]
fn test_cli_prefs_rejects_unknown_option() {
    let tmp = tempfile::tempdir().unwrap();
    let output = wardrobe_in(tmp.path())
        .args(["prefs", "set", "style=glamorous"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(!tmp.path().join("prefs.json").exists());
}

#[test]
#[ignore]
fn test_cli_list_json() {
    let output = wardrobe()
        .args(["list", "--json"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "wardrobe list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let _: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
}

#[test]
#[ignore]
fn test_cli_facets_json() {
    let output = wardrobe()
        .args(["facets", "--json"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())
            .expect("invalid JSON output");
    assert_eq!(value["categories"][0], "all");
}

#[test]
#[ignore]
fn test_cli_shop_json_has_every_name() {
    let output = wardrobe()
        .args(["shop", "Hoodie", "Jeans", "--json"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())
            .expect("invalid JSON output");
    assert!(value.get("Hoodie").is_some());
    assert!(value.get("Jeans").is_some());
}

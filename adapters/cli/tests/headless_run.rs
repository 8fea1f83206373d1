use std::process::Command;

#[test]
fn single_wave_run_writes_progress() {
    let out = std::env::temp_dir().join(format!(
        "ember-keepers-progress-{}.toml",
        std::process::id()
    ));
    let output = Command::new(env!("CARGO_BIN_EXE_ember-keepers"))
        .args(["--waves", "1", "--seed", "3", "--progress-out"])
        .arg(&out)
        .output()
        .expect("failed to run ember-keepers");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wave 1 started"));
    assert!(stdout.contains("summary: reached wave 1"));

    let progress = std::fs::read_to_string(&out).expect("progress record written");
    assert!(progress.contains("highest_wave = 1"));
    let _ = std::fs::remove_file(out);
}

#[test]
fn unknown_hero_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_ember-keepers"))
        .args(["--waves", "1", "--heroes", "nobody"])
        .output()
        .expect("failed to run ember-keepers");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown hero `nobody`"));
}

use assert_cmd::Command;
use predicates::prelude::*;

fn pyscrape() -> Command {
    Command::cargo_bin("pyscrape").unwrap()
}

#[test]
fn help_lists_all_modes() {
    pyscrape()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("whats-new"))
        .stdout(predicate::str::contains("latest-versions"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("pep"));
}

#[test]
fn unknown_mode_is_rejected() {
    pyscrape()
        .arg("latest-version") // singular, not a mode
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn bare_invocation_shows_help() {
    pyscrape().assert().failure();
}

#[test]
fn missing_mode_is_an_input_error() {
    pyscrape()
        .arg("-v")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no mode given"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    pyscrape()
        .args(["whats-new", "-q", "-v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn generate_config_writes_sample_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("pyscrape.toml");

    pyscrape()
        .args(["--generate-config", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[urls]"));
    assert!(content.contains("[http]"));
    assert!(content.contains("[output]"));
}

#[test]
fn invalid_config_file_is_an_input_error() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("broken.toml");
    std::fs::write(&config_path, "timeout = \"not a number\" [[[").unwrap();

    pyscrape()
        .args(["pep", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .code(2);
}

#[test]
fn version_flag_prints_package_version() {
    pyscrape()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

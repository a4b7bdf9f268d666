use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("blog-cli").unwrap();
    cmd.env_remove("BLOG_SERVER");
    cmd
}

#[test]
fn help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("upload"));
}

#[test]
fn status_without_token_file() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");

    cli()
        .arg("--token-file")
        .arg(&token_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No token found"));
}

#[test]
fn status_shows_saved_token() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "short-token\n").unwrap();

    cli()
        .arg("--token-file")
        .arg(&token_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("short-token"))
        .stdout(predicate::str::contains("Length: 11 characters"));
}

#[test]
fn create_fails_when_server_is_unreachable() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");

    cli()
        .args(["--server", "http://127.0.0.1:9"])
        .arg("--token-file")
        .arg(&token_file)
        .args(["create", "--title", "Hello", "--description", "World"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error"));
}

#[test]
fn create_requires_a_title() {
    cli()
        .args(["create", "--description", "World"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn logout_with_revoked_token_still_clears_it() {
    let server = MockServer::start();
    let logout = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/logout")
            .header("authorization", "Bearer stale-token");
        then.status(401)
            .header("www-authenticate", "Bearer")
            .body("");
    });

    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "stale-token").unwrap();

    cli()
        .args(["--server", &server.base_url()])
        .arg("--token-file")
        .arg(&token_file)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("already invalid"));

    logout.assert();
    assert!(!token_file.exists());
}

#[test]
fn logout_keeps_token_when_server_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/auth/logout");
        then.status(500).body("boom");
    });

    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "good-token").unwrap();

    cli()
        .args(["--server", &server.base_url()])
        .arg("--token-file")
        .arg(&token_file)
        .arg("logout")
        .assert()
        .failure();

    assert!(token_file.exists());
}

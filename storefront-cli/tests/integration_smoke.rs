//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn storefront() -> Command {
    let mut cmd = Command::cargo_bin("storefront").unwrap();
    cmd.env_remove("DATABASE_URL").env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help_lists_commands() {
    storefront()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("link"));
}

#[test]
fn test_serve_help() {
    storefront()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_migrate_without_database_url_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    storefront()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_link_builds_listing_url() {
    storefront()
        .args(["link", "--from", "page=4&sortBy=price-desc", "--brand", "3,7", "--gender", "girl"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "/products?sortBy=price-desc&brandId=3&brandId=7&gender=girl\n",
        ));
}

#[test]
fn test_link_clear_keeps_sort() {
    storefront()
        .args(["link", "--from", "brandId=1&discount=0-5&sortBy=name-asc", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::diff("/products?sortBy=name-asc\n"));
}

#[test]
fn test_link_rejects_bad_gender() {
    storefront()
        .args(["link", "--gender", "robot"])
        .assert()
        .failure();
}

#[test]
fn test_config_show_prints_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    storefront()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("default_page_size = 10"));
}

#[test]
fn test_config_show_reads_local_file() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("storefront.toml"),
        "[database]\nurl = \"postgres://shop:secret@db/catalog\"\n",
    )
    .unwrap();

    storefront()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres://shop:***@db/catalog"))
        .stdout(predicate::str::contains("secret").not());
}

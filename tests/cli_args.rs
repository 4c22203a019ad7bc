//! Integration tests for the carrier-sync binary
//!
//! Runs the built binary against pages on disk. The API base points at a
//! closed local port so every request fails fast and fallbacks are exercised.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

const UNREACHABLE_API: &str = "http://127.0.0.1:9/wp-json/carrier/v1";

const PAGE: &str = r##"<!DOCTYPE html>
<html><head><title>Carrier</title></head>
<body>
<a href="tel:0" data-carrier="phone">Call 0</a>
<a href="#" data-carrier="whatsapp">WhatsApp 0</a>
<div id="tabs"><ul class="nav nav-tabs"></ul><div class="tab-content"></div></div>
</body></html>"##;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_carrier-sync"))
        .args(args)
        .env_remove("CARRIER_API_BASE")
        .env_remove("CARRIER_API_KEY")
        .output()
        .expect("Failed to execute carrier-sync")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("carrier-sync"), "Help should mention carrier-sync");
    assert!(stdout.contains("--in-place"), "Help should mention --in-place");
}

#[test]
fn test_missing_page_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.html");
    let output = run_cli(&[missing.to_str().unwrap(), "--no-cache"]);
    assert!(!output.status.success(), "Expected missing page to fail");
}

#[test]
fn test_unreachable_api_renders_fallbacks_to_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let page = temp_dir.path().join("index.html");
    fs::write(&page, PAGE).unwrap();

    let output = run_cli(&[
        page.to_str().unwrap(),
        "--no-cache",
        "--api-base",
        UNREACHABLE_API,
        "--timeout-secs",
        "2",
        "--default-phone",
        "18885550199",
        "--default-whatsapp",
        "18885550100",
    ]);

    assert!(output.status.success(), "Sync failures must not fail the run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#"href="tel:18885550199""#));
    assert!(stdout.contains("Call 18885550199"));
    assert!(stdout.contains(r#"href="https://wa.me/18885550100""#));
    assert!(stdout.contains("Unable to load blog posts right now."));
}

#[test]
fn test_in_place_rewrites_page_and_caches_nothing_on_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let page = temp_dir.path().join("index.html");
    let cache_dir = temp_dir.path().join("cache");
    fs::write(&page, PAGE).unwrap();

    let output = run_cli(&[
        page.to_str().unwrap(),
        "--in-place",
        "--cache-dir",
        cache_dir.to_str().unwrap(),
        "--api-base",
        UNREACHABLE_API,
        "--timeout-secs",
        "2",
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "In-place runs should not print the page");
    let rewritten = fs::read_to_string(&page).unwrap();
    assert!(rewritten.contains(r#"href="tel:18005550100""#));
    assert!(!cache_dir.join("carrier_numbers_v3.json").exists());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use carrier_sync::cli::{Cli, OutputTarget};
    use std::path::PathBuf;

    #[test]
    fn test_cli_output_flag() {
        let cli = Cli::parse_from(["carrier-sync", "page.html", "--output", "out.html"]);
        assert_eq!(cli.output_target(), OutputTarget::File(PathBuf::from("out.html")));
    }

    #[test]
    fn test_cli_defaults_match_sync_config() {
        let cli = Cli::parse_from(["carrier-sync", "page.html"]);
        let config = cli.sync_config();
        assert_eq!(config.posts_per_page, 5);
        assert_eq!(config.request_timeout.as_secs(), 5);
        assert_eq!(config.contacts_ttl.as_secs(), 3600);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["carrier-sync", "page.html", "--plan"]).is_err());
    }
}

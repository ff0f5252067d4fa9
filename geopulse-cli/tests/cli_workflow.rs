//! End-to-end tests for the `geopulse` binary.
//!
//! Every test points `--config` at a temporary file so the user's
//! configuration is never touched. Reports go to a local HTTP stand-in.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread::JoinHandle;

use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn run_cli(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geopulse"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command")
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Temp dir with a config whose log file lives inside it.
fn setup() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = temp.path().join("config.ini");
    let log = temp.path().join("geopulse.log");

    let output = run_cli(&config, &["config", "set", "logging.file", log.to_str().unwrap()]);
    assert_success(&output, "config set logging.file");

    (temp, config)
}

/// One-shot HTTP collector. Resolves to the request body it received.
fn start_collector(response_body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/send-location", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];

        let (header_end, content_length) = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers");
            buffer.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..pos]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .map(|v| v.trim().parse::<usize>().unwrap())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
        };

        while buffer.len() < header_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before body");
            buffer.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response_body.len(),
            response_body
        );
        stream.write_all(response.as_bytes()).unwrap();

        String::from_utf8_lossy(&buffer[header_end..header_end + content_length]).to_string()
    });

    (url, handle)
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_set_get_roundtrip() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["config", "set", "acquisition.max_attempts", "5"]);
    assert_success(&output, "config set");

    let output = run_cli(&config, &["config", "get", "acquisition.max_attempts"]);
    assert_success(&output, "config get");
    assert_eq!(stdout(&output).trim(), "5");
}

#[test]
fn test_config_list_shows_sections() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["config", "list"]);
    assert_success(&output, "config list");

    let text = stdout(&output);
    for section in ["[server]", "[acquisition]", "[location]", "[logging]"] {
        assert!(text.contains(section), "missing {} in:\n{}", section, text);
    }
    assert!(text.contains("latitude = (not set)"));
}

#[test]
fn test_config_path_honours_override() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["config", "path"]);
    assert_success(&output, "config path");
    assert_eq!(stdout(&output).trim(), config.display().to_string());
}

#[test]
fn test_unknown_key_fails() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["config", "get", "server.nope"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("server.nope"));
}

// ============================================================================
// Locate and send
// ============================================================================

#[test]
fn test_locate_with_static_source() {
    let (_temp, config) = setup();
    for (key, value) in [
        ("location.source", "static"),
        ("location.latitude", "-33.8688"),
        ("location.longitude", "151.2093"),
        ("location.permission", "granted"),
    ] {
        assert_success(&run_cli(&config, &["config", "set", key, value]), key);
    }

    let output = run_cli(&config, &["locate"]);
    assert_success(&output, "locate");

    let text = stdout(&output);
    assert!(text.contains("Latitude:  -33.868800"));
    assert!(text.contains("Longitude: 151.209300"));
}

#[test]
fn test_send_posts_given_coordinates() {
    let (_temp, config) = setup();
    let (url, collector) = start_collector(r#"{"success":true}"#);
    assert_success(
        &run_cli(&config, &["config", "set", "server.report_url", &url]),
        "config set server.report_url",
    );

    let output = run_cli(&config, &["send", "--lat", "48.8566", "--long", "2.3522"]);
    assert_success(&output, "send");
    assert!(stdout(&output).contains("Location sent successfully"));

    let body: serde_json::Value = serde_json::from_str(&collector.join().unwrap()).unwrap();
    assert_eq!(body["lat"], 48.8566);
    assert_eq!(body["long"], 2.3522);
}

#[test]
fn test_send_rejects_out_of_range_coordinates() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["send", "--lat", "123", "--long", "0"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[test]
fn test_send_requires_both_coordinates() {
    let (_temp, config) = setup();

    let output = run_cli(&config, &["send", "--lat", "10"]);

    assert!(!output.status.success());
}

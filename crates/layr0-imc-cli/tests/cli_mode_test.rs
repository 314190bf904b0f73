use std::process::Command;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POSITIONS: &str = r#"
positions:
  - symbol: SBIN
    exchange: NSE
    action: BUY
    product: CNC
    pricetype: LIMIT
    quantity: "10"
    price: "750.50"
"#;

fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_layr0-imc-cli")
}

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn check_validates_settings_and_positions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(&dir, "config.yaml", "host: http://127.0.0.1:5000\napi_key: test\n");
    let positions = write(&dir, "positions.yaml", POSITIONS);

    let output = Command::new(binary())
        .arg("check")
        .arg("--config")
        .arg(&config)
        .arg("--positions")
        .arg(&positions)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to start layr0-imc-cli binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Positions OK (1 legs)"));
}

#[test]
fn check_rejects_invalid_leg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(&dir, "config.yaml", "host: http://127.0.0.1:5000\n");
    let positions = write(
        &dir,
        "positions.yaml",
        "- {symbol: SBIN, exchange: NSE, action: BUY, product: CNC, pricetype: LIMIT, quantity: 10}\n",
    );

    let output = Command::new(binary())
        .args(["check", "--config"])
        .arg(&config)
        .arg("--positions")
        .arg(&positions)
        .output()
        .expect("Failed to start layr0-imc-cli binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid legs"), "stderr: {stderr}");
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(binary())
        .args(["check", "--config"])
        .arg(dir.path().join("absent.yaml"))
        .output()
        .expect("Failed to start layr0-imc-cli binary");

    assert!(!output.status.success());
}

#[tokio::test]
async fn margin_command_prints_breakdown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/margin"))
        .and(body_partial_json(json!({"apikey": "cli-key"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "total_margin_required": 3752.50,
                "span_margin": 3000.00,
                "exposure_margin": 752.50
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(&dir, "config.yaml", &format!("host: {}\n", server.uri()));
    let positions = write(&dir, "positions.yaml", POSITIONS);

    let output = tokio::process::Command::new(binary())
        .arg("margin")
        .arg("--config")
        .arg(&config)
        .arg("--api-key")
        .arg("cli-key")
        .arg("--positions")
        .arg(&positions)
        .output()
        .await
        .expect("Failed to start layr0-imc-cli binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("₹3,752.50"));
    assert!(stdout.contains("₹752.50"));
}

#[tokio::test]
async fn margin_command_reports_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/margin"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"status": "error", "message": "Invalid symbol"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(
        &dir,
        "config.yaml",
        &format!("host: {}\napi_key: test\n", server.uri()),
    );
    let positions = write(&dir, "positions.yaml", POSITIONS);

    let output = tokio::process::Command::new(binary())
        .args(["margin", "--config"])
        .arg(&config)
        .arg("--positions")
        .arg(&positions)
        .output()
        .await
        .expect("Failed to start layr0-imc-cli binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error: Invalid symbol"));
}

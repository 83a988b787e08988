// Tests for the HTTP handlers and renderers

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;

use pcie_exporter::exporter::server::{healthz_handler, metrics_handler, tree_handler};
use pcie_exporter::exporter::{scrape_metrics, serve, AppState, ScrapeCounters};
use pcie_exporter::{ExporterConfig, PcieError};

use super::fixtures::{bridge_gpu_nic, SysfsFixture};

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_metrics_handler_serves_metrics() {
    let fixture = bridge_gpu_nic();
    let state = AppState::new(fixture.root().to_path_buf());

    let response = metrics_handler(State(state.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("pcie_devices_total 2\n"));
    assert!(body.contains("pcie_link_negotiated_ok{device=\"0000:00:01.0\""));
    assert!(body.contains("pcie_link_negotiated_ok{device=\"0000:01:00.0\""));
    assert!(body.contains("pcie_link_speed_ratio{device=\"0000:01:00.0\""));
    assert!(body.contains("pcie_exporter_last_scrape_success 1\n"));
    assert_eq!(state.counters.scrapes(), 1);
    assert_eq!(state.counters.errors(), 0);
}

#[tokio::test]
async fn test_metrics_handler_reports_failure_with_ok_status() {
    let fixture = SysfsFixture::empty();
    let state = AppState::new(fixture.root().to_path_buf());

    let response = metrics_handler(State(state.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("pcie_exporter_last_scrape_success 0\n"));
    assert!(body.contains("pcie_exporter_scrape_errors_total 1\n"));
    assert!(body.contains("# pcie_exporter_error read pci devices from"));
    assert_eq!(state.counters.errors(), 1);
}

#[tokio::test]
async fn test_tree_handler_serves_json_tree() {
    let fixture = bridge_gpu_nic();
    let state = AppState::new(fixture.root().to_path_buf());

    let response = tree_handler(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).contains("application/json"));

    let body = body_string(response).await;
    assert!(body.contains(r#""bus_id":"0000:01:00.0""#));
    assert!(body.contains(r#""link_capacity":"32 GT/s PCIe x16""#));
    assert!(body.contains(r#""link_status":"16 GT/s PCIe x8""#));

    let roots: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(roots.as_array().unwrap().len(), 2);
    assert!(roots[1].get("children").is_none());
}

#[tokio::test]
async fn test_tree_handler_error_body() {
    let fixture = SysfsFixture::empty();
    let state = AppState::new(fixture.root().to_path_buf());

    let response = tree_handler(State(state)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("read pci devices from"));
}

#[tokio::test]
async fn test_healthz() {
    assert_eq!(healthz_handler().await, "ok\n");
}

#[test]
fn test_counters_accumulate_across_scrapes() {
    let fixture = bridge_gpu_nic();
    let missing = SysfsFixture::empty();
    let counters = ScrapeCounters::new();

    scrape_metrics(fixture.root(), &counters);
    scrape_metrics(missing.root(), &counters);
    let body = scrape_metrics(fixture.root(), &counters);

    assert!(body.contains("pcie_exporter_scrapes_total 3\n"));
    assert!(body.contains("pcie_exporter_scrape_errors_total 1\n"));
    assert!(body.contains("pcie_exporter_last_scrape_success 1\n"));
    assert!(!body.contains("# pcie_exporter_error"));
}

#[test]
fn test_overflowing_speed_ratio_is_not_exported() {
    let fixture = SysfsFixture::new();
    let device = fixture.device("pci0000:00/0000:03:00.0");
    fixture.link(&device, ("1e308 GT/s\n", "1e-10 GT/s\n"), ("4\n", "4\n"));

    let body = scrape_metrics(fixture.root(), &ScrapeCounters::new());

    assert!(body.contains("pcie_devices_total 1\n"));
    assert!(!body.contains("pcie_link_speed_ratio{"));
    assert!(body.contains("pcie_link_width_ratio{device=\"0000:03:00.0\""));
    assert!(!body.contains("inf"));
}

#[tokio::test]
async fn test_serve_reports_busy_port_as_server_error() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = ExporterConfig {
        listen_address: occupied.local_addr().unwrap().to_string(),
        ..Default::default()
    };

    let err = serve(&config).await.unwrap_err();
    assert!(matches!(err, PcieError::Server(_)));
    assert!(err.to_string().starts_with("Server error: bind 127.0.0.1:"));
}

#[tokio::test]
async fn test_serve_rejects_unparsable_listen_address() {
    let config = ExporterConfig {
        listen_address: "not-an-address".to_string(),
        ..Default::default()
    };

    let err = serve(&config).await.unwrap_err();
    assert!(matches!(err, PcieError::Config(_)));
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;

// These tests run the server against an unreachable database on purpose:
// the health check and root endpoint behavior must hold even when the
// store is down.

#[tokio::test]
async fn root_reports_service_info() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["name"], "Admin API");
    assert!(payload["endpoints"]["health"].is_string(), "{}", payload);

    Ok(())
}

#[tokio::test]
async fn health_reports_unhealthy_store() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["status"], "unhealthy");
    assert_eq!(payload["database"], "disconnected");
    assert!(payload["timestamp"].is_string(), "{}", payload);
    // Raw error detail is attached outside production
    assert!(payload["error"].is_string(), "{}", payload);

    Ok(())
}

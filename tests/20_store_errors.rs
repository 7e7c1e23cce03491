mod common;

use anyhow::Result;
use reqwest::StatusCode;

const CONNECTION_MESSAGE: &str =
    "Database connection error. Please check the database configuration.";

// Every handler must catch store failures at the boundary and classify
// connection-level errors with the distinguishing message; nothing may
// propagate uncaught.

#[tokio::test]
async fn category_listing_classifies_connection_failure() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/ecommerce/categories?page=2&limit=5&query=shoes",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], CONNECTION_MESSAGE);
    // Development mode attaches the raw error
    assert!(payload["error"].is_string(), "{}", payload);

    Ok(())
}

#[tokio::test]
async fn user_listing_classifies_connection_failure() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/user/users?status=ACTIVE&sort=role_name&dir=desc",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], CONNECTION_MESSAGE);

    Ok(())
}

#[tokio::test]
async fn role_select_classifies_connection_failure() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user/roles/select", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], CONNECTION_MESSAGE);

    Ok(())
}

#[tokio::test]
async fn malformed_body_still_gets_the_error_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // A body that is not JSON at all must reach the handler and come back
    // in the same JSON envelope as every other failure, never as a
    // plain-text extractor rejection
    let res = client
        .post(format!("{}/api/ecommerce/categories", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], CONNECTION_MESSAGE);

    Ok(())
}

#[tokio::test]
async fn user_create_fails_closed_when_store_is_down() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Actor resolution is the first store access, so the create path also
    // surfaces the connection classification rather than a panic or hang
    let res = client
        .post(format!("{}/api/user/users", server.base_url))
        .json(&serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "roleId": "3f8c9a52-3f3e-4f9a-9c21-2f3f6a1b4d5e"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], CONNECTION_MESSAGE);

    Ok(())
}

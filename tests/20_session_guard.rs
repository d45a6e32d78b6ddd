mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn dashboard_without_session_redirects_to_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client()?;

    let res = client.get(format!("{}/dashboard", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/login");

    // A forged cookie is no better than none
    let res = client
        .get(format!("{}/dashboard", server.base_url))
        .header("cookie", "session_token=not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/login");
    Ok(())
}

#[tokio::test]
async fn posts_api_without_session_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client()?;

    let res = client.get(format!("{}/api/posts", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true, "unexpected body: {}", body);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

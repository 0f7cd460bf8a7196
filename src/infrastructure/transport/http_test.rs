use anyhow::Result;
use mockito::Matcher;
use reqwest::header::HeaderValue;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::json;
use test_utils::xmlrpc_fault;
use test_utils::xmlrpc_value;

use super::HttpChannel;
use crate::domain::models::BoaError;
use crate::domain::models::RpcChannel;
use crate::domain::models::RpcFault;
use crate::domain::models::RpcRequest;

fn channel(url: String) -> HttpChannel {
    return HttpChannel::new(&format!("{url}/api"), None, "boa-api-client/test").unwrap();
}

#[tokio::test]
async fn it_posts_xmlrpc_calls() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .match_header("content-type", "text/xml")
        .match_header("user-agent", "boa-api-client/test")
        .match_header("cookie", "SESSabc=123")
        .match_body(Matcher::Regex(
            "<methodName>boa.count</methodName>.*<boolean>0</boolean>".to_string(),
        ))
        .with_status(200)
        .with_header("set-cookie", "SESSabc=456; path=/")
        .with_body(xmlrpc_value("<int>12</int>"))
        .create_async()
        .await;

    let mut req = RpcRequest::new("boa.count", vec![json!(false)]);
    req.headers
        .insert(COOKIE, HeaderValue::from_static("SESSabc=123"));

    let res = channel(server.url()).call(req).await?;

    assert_eq!(res.outcome, Ok(json!(12)));
    assert_eq!(res.headers.get(SET_COOKIE).unwrap(), "SESSabc=456; path=/");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_returns_faults_as_outcomes() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .with_status(200)
        .with_body(xmlrpc_fault(401, "Wrong username or password."))
        .create_async()
        .await;

    let res = channel(server.url())
        .call(RpcRequest::new("user.login", vec![json!("a"), json!("b")]))
        .await?;

    assert_eq!(
        res.outcome,
        Err(RpcFault {
            code: 401,
            message: "Wrong username or password.".to_string(),
        })
    );
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_http_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .with_status(500)
        .create_async()
        .await;

    let res = channel(server.url())
        .call(RpcRequest::new("boa.count", vec![]))
        .await;

    assert!(matches!(res, Err(BoaError::Transport(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_when_endpoint_is_not_xmlrpc() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .with_status(200)
        .with_body("<html><body>Welcome to Boa</body></html>")
        .create_async()
        .await;

    let res = channel(server.url())
        .call(RpcRequest::new("user.login", vec![]))
        .await;

    match res {
        Err(BoaError::Protocol(msg)) => assert!(msg.contains("not a Boa API endpoint")),
        _ => panic!("expected a protocol error"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_when_unreachable() {
    let channel = HttpChannel::new("http://127.0.0.1:1/api", None, "boa-api-client/test").unwrap();
    let res = channel.call(RpcRequest::new("boa.count", vec![])).await;

    assert!(matches!(res, Err(BoaError::Transport(_))));
}

#[tokio::test]
async fn it_fetches_output_through_redirects() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let redirect = server
        .mock("GET", "/output/42")
        .with_status(301)
        .with_header("location", &format!("{}/files/42.txt", server.url()))
        .create_async()
        .await;
    let file = server
        .mock("GET", "/files/42.txt")
        .with_status(200)
        .with_body("counts[] = 12\n")
        .create_async()
        .await;

    let url = format!("{}/output/42", server.url());
    let res = channel(server.url()).fetch(&url).await?;

    assert_eq!(res, b"counts[] = 12\n".to_vec());
    redirect.assert_async().await;
    file.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_fetch_purged_output() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/output/42")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/output/42", server.url());
    let res = channel(server.url()).fetch(&url).await;

    assert!(matches!(res, Err(BoaError::Transport(_))));
    mock.assert_async().await;
}

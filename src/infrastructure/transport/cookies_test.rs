use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::ACCEPT;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::json;

use super::CookieTransport;
use super::Credentials;
use super::CSRF_HEADER;
use crate::infrastructure::transport::scripted::Reply;
use crate::infrastructure::transport::scripted::ScriptedChannel;

fn set_cookie_headers(values: &[&str]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for val in values {
        headers.append(SET_COOKIE, HeaderValue::from_str(val).unwrap());
    }
    return headers;
}

#[test]
fn it_sends_no_credentials_before_capture() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    let mut headers = HeaderMap::new();
    transport.send_headers(&mut headers);

    assert!(headers.is_empty());
    assert!(transport.credentials().is_empty());
}

#[test]
fn it_captures_the_cookie_pair_from_set_cookie() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&[
        "SESSabc=123; expires=Sun, 19-Nov-2026 08:00:00 GMT; path=/; HttpOnly",
    ]));

    assert_eq!(
        transport.credentials().cookie,
        Some("SESSabc=123".to_string())
    );
}

#[test]
fn it_joins_and_replaces_cookies() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&["first=1; path=/"]));
    transport.parse_response(&set_cookie_headers(&["second=2; path=/", "third=3"]));

    assert_eq!(
        transport.credentials().cookie,
        Some("second=2; third=3".to_string())
    );
}

#[test]
fn it_keeps_credentials_when_response_has_none() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&["first=1"]));
    transport.parse_response(&HeaderMap::new());

    assert_eq!(transport.credentials().cookie, Some("first=1".to_string()));
}

#[test]
fn it_captures_csrf_from_response_headers() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    let mut headers = HeaderMap::new();
    headers.insert(CSRF_HEADER, HeaderValue::from_static("token-1"));
    transport.parse_response(&headers);

    assert_eq!(transport.credentials().csrf, Some("token-1".to_string()));
}

#[test]
fn it_attaches_credentials_without_touching_other_headers() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&["SESSabc=123"]));
    transport.add_csrf("token-1");

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/xml"));
    transport.send_headers(&mut headers);

    assert_eq!(headers.get(ACCEPT).unwrap(), "text/xml");
    assert_eq!(headers.get(COOKIE).unwrap(), "SESSabc=123");
    assert_eq!(headers.get(CSRF_HEADER).unwrap(), "token-1");
}

#[test]
fn it_adds_csrf_idempotently() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.add_csrf("token-1");
    transport.add_csrf("token-1");

    let mut headers = HeaderMap::new();
    transport.send_headers(&mut headers);

    assert_eq!(headers.get_all(CSRF_HEADER).iter().count(), 1);
    assert_eq!(headers.get(CSRF_HEADER).unwrap(), "token-1");
}

#[test]
fn it_authenticates_with_a_fallback_cookie() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    assert!(!transport.is_authenticated());

    transport.authenticate("token-1", "fallback=1");

    assert_eq!(
        transport.credentials(),
        Credentials {
            cookie: Some("fallback=1".to_string()),
            csrf: Some("token-1".to_string()),
            authenticated: true,
        }
    );
}

#[test]
fn it_keeps_a_captured_cookie_when_authenticating() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&["SESSabc=123; path=/"]));
    transport.authenticate("token-1", "fallback=1");

    assert_eq!(transport.credentials().cookie, Some("SESSabc=123".to_string()));
    assert!(transport.is_authenticated());
}

#[test]
fn it_clears_credentials() {
    let transport = CookieTransport::new(Box::<ScriptedChannel>::default());
    transport.parse_response(&set_cookie_headers(&["SESSabc=123"]));
    transport.authenticate("token-1", "fallback=1");
    transport.clear();

    assert_eq!(transport.credentials(), Credentials::default());
    assert!(!transport.is_authenticated());

    let mut headers = HeaderMap::new();
    transport.send_headers(&mut headers);
    assert!(headers.is_empty());
}

#[tokio::test]
async fn it_wraps_calls_with_capture_and_replay() -> Result<()> {
    let channel = ScriptedChannel::default();
    channel
        .reply(Reply::with_cookie(json!({"token": "abc"}), "SESSabc=123; path=/"))
        .reply(Reply::ok(json!(true)));

    let transport = CookieTransport::new(Box::new(channel.clone()));

    let first = transport.call("user.login", vec![]).await?;
    assert_eq!(first, Ok(json!({"token": "abc"})));
    assert!(channel.last_request().headers.get(COOKIE).is_none());

    transport.call("boa.count", vec![json!(false)]).await?;
    let second = channel.last_request();
    assert_eq!(second.method, "boa.count");
    assert_eq!(second.params, vec![json!(false)]);
    assert_eq!(second.headers.get(COOKIE).unwrap(), "SESSabc=123");

    return Ok(());
}

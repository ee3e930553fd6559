use czds_api::{AccessToken, ApiError, Credentials, Endpoints, ErrorKind, HttpSession, Session};
use futures_util::TryStreamExt;
use httpmock::Method::HEAD;
use httpmock::prelude::*;
use serde_json::json;

fn session_for(server: &MockServer) -> HttpSession {
    let endpoints = Endpoints::default()
        .api_url(server.base_url())
        .auth_url(server.url("/api/authenticate"));
    HttpSession::new(endpoints)
        .unwrap()
        .with_token(AccessToken::new("tok"))
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/authenticate")
                .json_body(json!({"username": "user", "password": "pw"}));
            then.status(200)
                .json_body(json!({"accessToken": "fresh", "message": "Authentication Successful"}));
        })
        .await;

    let endpoints = Endpoints::default()
        .api_url(server.base_url())
        .auth_url(server.url("/api/authenticate"));
    let mut session = HttpSession::new(endpoints).unwrap();
    let creds = Credentials::new("user", "pw").unwrap();
    let token = session.login(&creds).await.unwrap();

    assert_eq!(token.as_str(), "fresh");
    assert_eq!(session.token().map(AccessToken::as_str), Some("fresh"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/authenticate");
            then.status(401);
        })
        .await;

    let endpoints = Endpoints::default().auth_url(server.url("/api/authenticate"));
    let mut session = HttpSession::new(endpoints).unwrap();
    let err = session
        .login(&Credentials::new("user", "wrong").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let links = vec![
        server.url("/czds/downloads/example.zone"),
        server.url("/czds/downloads/test.zone"),
    ];
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/czds/downloads/links")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!(links));
        })
        .await;

    let list = session_for(&server).list().await.unwrap();
    assert_eq!(list, links);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/czds/downloads/links");
            then.status(500);
        })
        .await;

    let err = session_for(&server).list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn test_details_reads_headers() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/czds/downloads/example.zone");
            then.status(200)
                .header("content-type", "application/x-gzip")
                .header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
                .body(vec![0u8; 1000]);
        })
        .await;

    let url = server.url("/czds/downloads/example.zone");
    let details = session_for(&server).details(&url).await.unwrap();
    assert_eq!(details.name, "example");
    assert_eq!(details.content_length, Some(1000));
    assert_eq!(details.content_type, "application/x-gzip");
    assert_eq!(
        details.last_modified.map(|t| t.to_rfc3339()),
        Some("2015-10-21T07:28:00+00:00".to_string())
    );
}

#[tokio::test]
async fn test_download_streams_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/czds/downloads/example.zone");
            then.status(200).body("example. 86400 IN SOA a. b. 1 2 3 4 5\n");
        })
        .await;

    let url = server.url("/czds/downloads/example.zone");
    let stream = session_for(&server).download(&url).await.unwrap();
    let chunks: Vec<_> = stream.try_collect().await.unwrap();
    let body: Vec<u8> = chunks.concat();
    assert!(body.starts_with(b"example. 86400"));
}

#[tokio::test]
async fn test_download_status_mapping() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/czds/downloads/denied.zone");
            then.status(403);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/czds/downloads/terms.zone");
            then.status(409);
        })
        .await;

    let session = session_for(&server);
    let denied = session
        .download(&server.url("/czds/downloads/denied.zone"))
        .await
        .err()
        .unwrap();
    let terms = session
        .download(&server.url("/czds/downloads/terms.zone"))
        .await
        .err()
        .unwrap();
    assert!(matches!(denied, ApiError::NoPermission));
    assert!(matches!(terms, ApiError::TermsRequired));
}

#[tokio::test]
async fn test_tlds_keyed_by_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/czds/tlds");
            then.status(200).json_body(json!([
                {"tld": "zulu", "ulable": "zulu", "currentStatus": "available", "sftp": false},
                {"tld": "alpha", "ulable": "alpha", "currentStatus": "approved", "sftp": true},
            ]));
        })
        .await;

    let tlds = session_for(&server).tlds().await.unwrap();
    let names: Vec<_> = tlds.keys().cloned().collect();
    assert_eq!(names, vec!["alpha", "zulu"]);
    assert!(tlds["alpha"].sftp);
}

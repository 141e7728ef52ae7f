//! Integration tests for HTTP transport

use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use konyx_transport::{HttpRequest, HttpTransport, HttpTransportConfig, Transport, TransportError};
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sends_method_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/dev/KNY-AX91-001/cmd"))
        .and(header("authorization", "Bearer token123"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"type":"ping"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ack":{}}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest::new(
        Method::POST,
        format!("{}/api/v1/dev/KNY-AX91-001/cmd", mock_server.uri()),
    )
    .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer token123"))
    .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    .with_body(br#"{"type":"ping"}"#.to_vec());

    let response = transport.send_http(request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, br#"{"ack":{}}"#.to_vec());
}

#[rstest]
#[case(400)]
#[case(401)]
#[case(404)]
#[case(500)]
#[case(503)]
#[tokio::test]
async fn test_error_statuses_are_returned_not_raised(#[case] status: u16) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest::new(Method::GET, format!("{}/api/v1/devices", mock_server.uri()));

    let response = transport.send_http(request).await.unwrap();
    assert_eq!(response.status, status);
    assert!(!response.is_success());
    assert_eq!(response.text_lossy(), "nope");
}

#[tokio::test]
async fn test_cookies_are_replayed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=r-123; Path=/; HttpOnly")
                .set_body_string("{}"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("cookie", "refreshToken=r-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accessToken":"t2"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new().unwrap();

    let login = HttpRequest::new(Method::POST, format!("{}/api/v1/auth/login", mock_server.uri()));
    assert_eq!(transport.send_http(login).await.unwrap().status, 200);

    let refresh = HttpRequest::new(
        Method::POST,
        format!("{}/api/v1/auth/refresh", mock_server.uri()),
    );
    assert_eq!(transport.send_http(refresh).await.unwrap().status, 200);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let transport = HttpTransport::with_config(HttpTransportConfig {
        connect_timeout: std::time::Duration::from_secs(2),
        ..Default::default()
    })
    .unwrap();

    // Nothing listens on port 1 of the loopback interface
    let request = HttpRequest::new(Method::GET, "http://127.0.0.1:1/health");
    let err = transport.send_http(request).await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::Connection(_) | TransportError::Http(_)
    ));
}

/// Serve one raw HTTP response on a fresh listener, then close the socket
async fn serve_once(raw: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket.write_all(raw.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    // Announces 100 bytes, sends 9
    let base = serve_once(
        "HTTP/1.1 401 Unauthorized\r\nContent-Type: text/plain\r\nContent-Length: 100\r\n\r\ntoken exp",
    )
    .await;

    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest::new(Method::GET, format!("{base}/api/v1/devices"));

    let response = transport.send_http(request).await.unwrap();
    assert_eq!(response.status, 401);
    assert!(response.body.is_empty());
    assert_eq!(response.status_text(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_truncated_success_body_is_transport_error() {
    let base = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[{\"deviceId\"",
    )
    .await;

    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest::new(Method::GET, format!("{base}/api/v1/devices"));

    let err = transport.send_http(request).await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::Http(_) | TransportError::Connection(_)
    ));
}

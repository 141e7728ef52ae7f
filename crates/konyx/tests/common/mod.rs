//! Common test utilities and helpers

use std::path::Path;

use konyx::{ApiClient, Session};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token handed out by the `login_success` fixture
#[allow(dead_code)]
pub const LOGIN_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.old";

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// JSON response from a fixture
#[allow(dead_code)]
pub fn fixture_response(status: u16, name: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(load_response_fixture(name), "application/json")
}

/// Client pointing at the mock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri()).expect("Failed to build client")
}

/// Session signed in through a mocked login that also sets the refresh cookie
#[allow(dead_code)]
pub async fn signed_in_session(server: &MockServer) -> Session {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            fixture_response(200, "login_success")
                .insert_header("set-cookie", "refreshToken=r-123; Path=/api/v1/auth; HttpOnly"),
        )
        .expect(1)
        .mount(server)
        .await;

    let session = Session::new(client_for(server));
    session
        .login("ops@konyx.io", "correct horse")
        .await
        .expect("Login failed");
    session
}

/// Raw TCP server answering one connection per scripted response, in order
///
/// Returns the base URL and a handle yielding the request heads it read.
#[allow(dead_code)]
pub async fn serve_raw(responses: Vec<&'static str>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for raw in responses {
            let (mut socket, _) = listener.accept().await.expect("Accept failed");
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("Read failed");
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            heads.push(String::from_utf8_lossy(&head).into_owned());
            socket.write_all(raw.as_bytes()).await.expect("Write failed");
            socket.shutdown().await.expect("Shutdown failed");
        }
        heads
    });

    (format!("http://{addr}"), handle)
}

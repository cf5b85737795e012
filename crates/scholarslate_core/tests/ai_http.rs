use scholarslate_core::ai::http::HttpAiClient;
use scholarslate_core::ai::{HighlightRequest, TranscriptionRequest};
use scholarslate_core::{AiError, HighlightService, ImageDataUri, TranscriptionService};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves one canned HTTP response and hands back the raw request text.
async fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (HttpAiClient, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    (
        HttpAiClient::with_client(client, format!("http://{addr}/")),
        server,
    )
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        let text = String::from_utf8_lossy(&buffer);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if buffer.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn key_point_request() -> HighlightRequest {
    HighlightRequest {
        text: "Helicase unwinds DNA.".to_string(),
    }
}

#[tokio::test]
async fn key_points_round_trip_over_http() {
    let (client, server) = serve_once("200 OK", "application/json", r#"{"points":[]}"#).await;

    let points = client.extract_points(key_point_request()).await.unwrap();
    assert!(points.points.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /highlight-points HTTP/1.1"));
    assert!(request.contains(r#""text":"Helicase unwinds DNA.""#));
}

#[tokio::test]
async fn non_success_status_maps_to_service_error() {
    let (client, server) =
        serve_once("503 Service Unavailable", "text/plain", "overloaded").await;

    let err = client.extract_points(key_point_request()).await.unwrap_err();
    assert_eq!(
        err,
        AiError::Service {
            status: 503,
            message: "overloaded".to_string(),
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn success_without_points_is_malformed() {
    let (client, server) = serve_once("200 OK", "application/json", r#"{"foo":1}"#).await;

    let err = client.extract_points(key_point_request()).await.unwrap_err();
    assert!(matches!(err, AiError::MalformedResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn transcription_posts_data_uri_and_reads_text() {
    let (client, server) = serve_once(
        "200 OK",
        "application/json",
        r#"{"text":"Ligase seals nicks."}"#,
    )
    .await;
    let image = ImageDataUri::from_bytes("image/png", b"\x89PNG");

    let transcript = client
        .transcribe(TranscriptionRequest { image })
        .await
        .unwrap();
    assert_eq!(transcript.text, "Ligase seals nicks.");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /transcribe HTTP/1.1"));
    assert!(request.contains("data:image/png;base64,"));
}

#[tokio::test]
async fn transcription_rejects_non_json_body() {
    let (client, server) = serve_once("200 OK", "text/html", "<html>oops</html>").await;
    let image = ImageDataUri::from_bytes("image/jpeg", b"\xff\xd8");

    let err = client
        .transcribe(TranscriptionRequest { image })
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::MalformedResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn fetch_image_uses_response_content_type() {
    let (client, server) = serve_once("200 OK", "image/gif", "GIF89a").await;
    let url = format!("{}/sample.gif", client.base_url());

    let image = client.fetch_image(&url).await.unwrap();
    assert_eq!(image.mime_type(), "image/gif");
    assert_eq!(image.decode_bytes().unwrap(), b"GIF89a");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /sample.gif HTTP/1.1"));
}

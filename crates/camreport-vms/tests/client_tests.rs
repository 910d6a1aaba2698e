//! VMS client tests against a mocked HTTP server.

use std::io::Cursor;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use camreport_models::{Resolution, Session, VideoSourceId};
use camreport_vms::{VmsClient, VmsError};

const CAMERA: &str = "SERVER1/DeviceIpint.1/SourceEndpoint.video:0:0";
// "root:secret"
const BASIC_AUTH: &str = "Basic cm9vdDpzZWNyZXQ=";

fn tiny_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 130, 140]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

async fn client_for(server: &MockServer) -> VmsClient {
    let addr = server.address();
    let session = Session::new(addr.ip().to_string(), addr.port(), "root", "secret");
    VmsClient::new(session).unwrap()
}

#[tokio::test]
async fn live_snapshot_sends_resolution_and_auth() {
    let server = MockServer::start().await;
    let jpeg = tiny_jpeg();

    Mock::given(method("GET"))
        .and(path(format!("/live/media/snapshot/{CAMERA}")))
        .and(query_param("w", "1920"))
        .and(query_param("h", "1080"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(jpeg.clone())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let snapshot = client
        .fetch_live_snapshot(&VideoSourceId::new(CAMERA), Resolution::FullHd)
        .await
        .unwrap();

    assert_eq!(snapshot.bytes, jpeg);
    assert_eq!(snapshot.mime, "image/jpeg");
}

#[tokio::test]
async fn original_resolution_omits_dimensions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/live/media/snapshot/{CAMERA}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tiny_jpeg()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .fetch_live_snapshot(&VideoSourceId::new(CAMERA), Resolution::Original)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap_or("").is_empty());
}

#[tokio::test]
async fn archive_snapshot_url_carries_utc_timestamp() {
    let server = MockServer::start().await;
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/archive/media/{CAMERA}/20240307T143005.000")))
        .and(query_param("format", "mjpeg"))
        .and(query_param("w", "1280"))
        .and(query_param("h", "720"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(tiny_jpeg())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let snapshot = client
        .fetch_archive_snapshot(&VideoSourceId::new(CAMERA), &ts, Resolution::Hd)
        .await
        .unwrap();

    assert!(!snapshot.bytes.is_empty());
}

#[tokio::test]
async fn archive_follows_stream_url_and_extracts_frame() {
    let server = MockServer::start().await;
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();
    let jpeg = tiny_jpeg();

    let mut mjpeg_body = b"--frame\r\ncontent-type: image/jpeg\r\n\r\n".to_vec();
    mjpeg_body.extend_from_slice(&jpeg);
    mjpeg_body.extend_from_slice(b"\r\n--frame--\r\n");

    Mock::given(method("GET"))
        .and(path(format!("/archive/media/{CAMERA}/20240307T143005.000")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "httpproxy": format!("{}/proxy/archive/stream", server.uri())
                }))
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/proxy/archive/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(mjpeg_body)
                .insert_header("content-type", "multipart/x-mixed-replace"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let snapshot = client
        .fetch_archive_snapshot(&VideoSourceId::new(CAMERA), &ts, Resolution::Original)
        .await
        .unwrap();

    assert_eq!(snapshot.mime, "image/jpeg");
    assert_eq!(snapshot.bytes, jpeg);
}

#[tokio::test]
async fn archive_404_is_no_archive_data() {
    let server = MockServer::start().await;
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .fetch_archive_snapshot(&VideoSourceId::new(CAMERA), &ts, Resolution::Hd)
        .await
        .unwrap_err();

    assert!(matches!(err, VmsError::NoArchiveData));
}

#[tokio::test]
async fn unauthorized_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(matches!(
        client.test_connection().await.unwrap_err(),
        VmsError::Auth
    ));
    assert!(matches!(
        client
            .fetch_live_snapshot(&VideoSourceId::new(CAMERA), Resolution::Hd)
            .await
            .unwrap_err(),
        VmsError::Auth
    ));
}

#[tokio::test]
async fn server_errors_are_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .fetch_live_snapshot(&VideoSourceId::new(CAMERA), Resolution::Hd)
        .await
        .unwrap_err();

    assert!(matches!(err, VmsError::Server(503)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_server_classifies_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(tiny_jpeg())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let addr = server.address();
    let session = Session::new(addr.ip().to_string(), addr.port(), "root", "secret");
    let client = VmsClient::with_timeout(session, Duration::from_millis(200)).unwrap();

    let err = client
        .fetch_live_snapshot(&VideoSourceId::new(CAMERA), Resolution::Hd)
        .await
        .unwrap_err();
    assert!(matches!(err, VmsError::Timeout));
    assert!(err.is_transient());
}

#[tokio::test]
async fn camera_list_parses_wrapped_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera/list"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cameras": [
                {
                    "displayId": "1",
                    "displayName": "Entrance",
                    "videoStreams": [
                        { "accessPoint": format!("hosts/{CAMERA}") }
                    ]
                },
                {
                    "displayId": "2",
                    "displayName": "No stream camera",
                    "videoStreams": []
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cameras = client.list_cameras().await.unwrap();

    // The streamless camera is skipped, the hosts/ prefix is stripped.
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].name, "Entrance");
    assert_eq!(cameras[0].id.as_str(), CAMERA);
}

#[tokio::test]
async fn camera_list_parses_bare_array_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "cam-7",
                "videoStreams": [ { "accessPoint": CAMERA } ]
            }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cameras = client.list_cameras().await.unwrap();

    assert_eq!(cameras.len(), 1);
    // Falls back to the id when no display name is present.
    assert_eq!(cameras[0].name, "cam-7");
}

//! Wiremock integration tests for the Flickr catalog client.

use photoreel::{FlickrCatalog, PhotoCatalog, PhotoreelError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_photoset_json() -> serde_json::Value {
    serde_json::json!({
        "photoset": {
            "id": "72157600000000000",
            "page": 1,
            "total": 3,
            "photo": [
                {
                    "id": "101",
                    "title": "Harbour at dawn",
                    "url_l": "https://live.staticflickr.com/65535/101_l.jpg",
                    "description": {"_content": "Fog over the water"}
                },
                {
                    "id": "102",
                    "title": "Too small for url_l"
                },
                {
                    "id": "103",
                    "title": "",
                    "url_l": "https://live.staticflickr.com/65535/103_l.jpg",
                    "description": {"_content": ""}
                }
            ]
        },
        "stat": "ok"
    })
}

fn catalog(server: &MockServer) -> FlickrCatalog {
    FlickrCatalog::new(reqwest::Client::new(), "test-key", "72157600000000000")
        .base_url(server.uri())
}

#[tokio::test]
async fn sends_expected_query_and_maps_photos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .and(query_param("method", "flickr.photosets.getPhotos"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("photoset_id", "72157600000000000"))
        .and(query_param("format", "json"))
        .and(query_param("nojsoncallback", "1"))
        .and(query_param("extras", "url_l,description,title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_photoset_json()))
        .expect(1)
        .mount(&server)
        .await;

    let photos = catalog(&server).fetch_photos().await;

    assert_eq!(photos.len(), 2, "photo without url_l should be dropped");
    assert_eq!(photos[0].url, "https://live.staticflickr.com/65535/101_l.jpg");
    assert_eq!(photos[0].title, "Harbour at dawn");
    assert_eq!(photos[0].description, "Fog over the water");
    assert_eq!(photos[1].url, "https://live.staticflickr.com/65535/103_l.jpg");
    assert_eq!(photos[1].description, "");
}

#[tokio::test]
async fn provider_error_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stat": "fail",
            "code": 100,
            "message": "Invalid API Key (Key has invalid format)"
        })))
        .mount(&server)
        .await;

    let client = catalog(&server);
    assert!(client.fetch_photos().await.is_empty());

    let err = client.try_fetch_photos().await.unwrap_err();
    assert!(matches!(err, PhotoreelError::Catalog { code: 100, .. }));
}

#[tokio::test]
async fn http_error_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream busy"))
        .mount(&server)
        .await;

    let client = catalog(&server);
    assert!(client.fetch_photos().await.is_empty());
    assert!(matches!(
        client.try_fetch_photos().await,
        Err(PhotoreelError::UpstreamStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn malformed_body_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("jsonFlickrApi({\"stat\":\"ok\"})"))
        .mount(&server)
        .await;

    let client = catalog(&server);
    assert!(client.fetch_photos().await.is_empty());
    assert!(matches!(
        client.try_fetch_photos().await,
        Err(PhotoreelError::Json(_))
    ));
}

#[tokio::test]
async fn unreachable_host_degrades_to_empty() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client =
        FlickrCatalog::new(reqwest::Client::new(), "test-key", "set").base_url(uri);
    assert!(client.fetch_photos().await.is_empty());
}

#[tokio::test]
async fn empty_photoset_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "photoset": {"id": "1", "photo": []},
            "stat": "ok"
        })))
        .mount(&server)
        .await;

    assert!(catalog(&server).fetch_photos().await.is_empty());
}

#[test]
fn catalog_name() {
    let client = FlickrCatalog::new(reqwest::Client::new(), "k", "s");
    assert_eq!(client.name(), "flickr");
}

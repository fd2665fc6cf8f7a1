//! Flickr photoset client.
//!
//! Queries `flickr.photosets.getPhotos` for a single page of a photoset and
//! maps each photo's large rendition (`url_l`) to a [`PhotoRecord`].
//! See: <https://www.flickr.com/services/api/flickr.photosets.getPhotos.html>

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::PhotoCatalog;
use crate::types::PhotoRecord;
use crate::{PhotoreelError, Result};

/// Default base URL for the Flickr REST API.
pub const DEFAULT_FLICKR_BASE_URL: &str = "https://api.flickr.com";

const REST_PATH: &str = "/services/rest/";
const GET_PHOTOS_METHOD: &str = "flickr.photosets.getPhotos";
const EXTRAS: &str = "url_l,description,title";

/// Client for a single Flickr photoset.
#[derive(Clone)]
pub struct FlickrCatalog {
    http: Client,
    api_key: String,
    photoset_id: String,
    base_url: String,
}

impl FlickrCatalog {
    /// Create a client for `photoset_id` against the public Flickr API.
    pub fn new(http: Client, api_key: impl Into<String>, photoset_id: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            photoset_id: photoset_id.into(),
            base_url: DEFAULT_FLICKR_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the photoset, surfacing every failure as an error.
    ///
    /// Photos without a `url_l` rendition are dropped.
    pub async fn try_fetch_photos(&self) -> Result<Vec<PhotoRecord>> {
        let url = format!("{}{REST_PATH}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("method", GET_PHOTOS_METHOD),
                ("api_key", self.api_key.as_str()),
                ("photoset_id", self.photoset_id.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
                ("extras", EXTRAS),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PhotoreelError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let payload: PhotosetResponse = serde_json::from_str(&body)?;
        let photos = payload.into_photos()?;

        let total = photos.len();
        let records: Vec<PhotoRecord> = photos.into_iter().filter_map(into_record).collect();
        debug!(
            photoset = %self.photoset_id,
            total,
            eligible = records.len(),
            "fetched flickr photoset"
        );
        Ok(records)
    }
}

#[async_trait]
impl PhotoCatalog for FlickrCatalog {
    fn name(&self) -> &str {
        "flickr"
    }

    async fn fetch_photos(&self) -> Vec<PhotoRecord> {
        match self.try_fetch_photos().await {
            Ok(records) => records,
            Err(e) => {
                warn!(photoset = %self.photoset_id, error = %e, "flickr catalog unavailable");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// `flickr.photosets.getPhotos` response envelope.
///
/// On failure Flickr answers HTTP 200 with `"stat": "fail"` plus a numeric
/// `code` and a `message`.
#[derive(Debug, Deserialize)]
struct PhotosetResponse {
    stat: String,
    #[serde(default)]
    photoset: Option<Photoset>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl PhotosetResponse {
    fn into_photos(self) -> Result<Vec<FlickrPhoto>> {
        if self.stat != "ok" {
            return Err(PhotoreelError::Catalog {
                code: self.code.unwrap_or_default(),
                message: self.message.unwrap_or_else(|| format!("stat={}", self.stat)),
            });
        }
        self.photoset
            .map(|set| set.photo)
            .ok_or_else(|| PhotoreelError::InvalidInput("response has no photoset".into()))
    }
}

#[derive(Debug, Deserialize)]
struct Photoset {
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

#[derive(Debug, Deserialize)]
struct FlickrPhoto {
    #[serde(default)]
    url_l: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<Description>,
}

/// Flickr wraps free text as `{"_content": "..."}`.
#[derive(Debug, Deserialize)]
struct Description {
    #[serde(rename = "_content", default)]
    content: String,
}

fn into_record(photo: FlickrPhoto) -> Option<PhotoRecord> {
    let url = photo.url_l.filter(|u| !u.is_empty())?;
    Some(PhotoRecord {
        url,
        title: photo.title.unwrap_or_default(),
        description: photo.description.map(|d| d.content).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ok_response() {
        let json = r#"{
            "photoset": {
                "id": "721",
                "photo": [
                    {"id": "1", "title": "Harbour", "url_l": "https://live.staticflickr.com/1/1_l.jpg",
                     "description": {"_content": "Morning fog"}},
                    {"id": "2", "title": "No large size"}
                ]
            },
            "stat": "ok"
        }"#;
        let payload: PhotosetResponse = serde_json::from_str(json).unwrap();
        let photos = payload.into_photos().unwrap();
        assert_eq!(photos.len(), 2);

        let records: Vec<_> = photos.into_iter().filter_map(into_record).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://live.staticflickr.com/1/1_l.jpg");
        assert_eq!(records[0].title, "Harbour");
        assert_eq!(records[0].description, "Morning fog");
    }

    #[test]
    fn fail_stat_becomes_catalog_error() {
        let json = r#"{"stat": "fail", "code": 1, "message": "Photoset not found"}"#;
        let payload: PhotosetResponse = serde_json::from_str(json).unwrap();
        let err = payload.into_photos().unwrap_err();
        assert!(matches!(err, PhotoreelError::Catalog { code: 1, .. }));
    }

    #[test]
    fn ok_without_photoset_is_rejected() {
        let payload: PhotosetResponse = serde_json::from_str(r#"{"stat": "ok"}"#).unwrap();
        assert!(payload.into_photos().is_err());
    }

    #[test]
    fn empty_url_is_ineligible() {
        let photo = FlickrPhoto {
            url_l: Some(String::new()),
            title: None,
            description: None,
        };
        assert!(into_record(photo).is_none());
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let catalog = FlickrCatalog::new(Client::new(), "key", "set").base_url("http://127.0.0.1:1/");
        assert_eq!(catalog.base_url, "http://127.0.0.1:1");
    }
}

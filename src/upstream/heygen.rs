use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use super::background::Background;
use super::error::UpstreamError;
use crate::store::VideoStatus;

const HEYGEN_GENERATE_URL: &str = "https://api.heygen.com/v2/video/generate";
const HEYGEN_STATUS_URL: &str = "https://api.heygen.com/v1/video_status.get";
const SERVICE: &str = "HeyGen";

/// Rendering request for one avatar video
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub script: String,
    pub avatar_id: String,
    pub voice_id: String,
    pub background: Background,
    /// Shrink the avatar off-screen so only the background and voice remain
    pub faceless: bool,
}

/// Provider-side state of a rendered video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderVideo {
    pub video_id: String,
    pub status: VideoStatus,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
    pub created_at: Option<i64>,
}

impl ProviderVideo {
    /// Completed and carrying a downloadable URL
    pub fn is_ready(&self) -> bool {
        self.status == VideoStatus::Completed && self.video_url.is_some()
    }
}

/// Avatar-video generation collaborator
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Submit a render; returns the provider's video id
    async fn create_video(&self, request: &VideoRequest) -> Result<String, UpstreamError>;

    async fn video_status(&self, video_id: &str) -> Result<ProviderVideo, UpstreamError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct GenerateData {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct StatusData {
    status: Option<String>,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    duration: Option<f64>,
    created_at: Option<i64>,
}

fn normalize_status(raw: Option<&str>) -> VideoStatus {
    match raw {
        Some("completed") => VideoStatus::Completed,
        Some("failed") => VideoStatus::Failed,
        Some("pending") | Some("waiting") => VideoStatus::Pending,
        _ => VideoStatus::Processing,
    }
}

/// HeyGen REST client
///
/// Constructed even without an API key; every call then fails with
/// [`UpstreamError::MissingCredential`].
#[derive(Debug, Clone)]
pub struct HeyGenClient {
    client: Client,
    api_key: Option<String>,
}

impl HeyGenClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential(SERVICE))
    }

    fn build_body(request: &VideoRequest) -> Value {
        let mut character = json!({
            "type": "avatar",
            "avatar_id": request.avatar_id,
            "avatar_style": "normal",
        });
        if request.faceless {
            character["scale"] = json!(0.001);
            character["offset"] = json!({ "x": -1000, "y": -1000 });
        }

        json!({
            "video_inputs": [{
                "character": character,
                "voice": {
                    "type": "text",
                    "input_text": request.script,
                    "voice_id": request.voice_id,
                },
                "background": request.background,
            }],
            "dimension": { "width": 1080, "height": 1920 },
            "aspect_ratio": "9:16",
            "test": false,
        })
    }

    async fn error_message(response: reqwest::Response) -> UpstreamError {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        error!(status = %status, message = %message, "HeyGen returned error");
        UpstreamError::Api {
            service: SERVICE,
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl VideoGenerator for HeyGenClient {
    #[instrument(skip_all, fields(faceless = request.faceless))]
    async fn create_video(&self, request: &VideoRequest) -> Result<String, UpstreamError> {
        let api_key = self.api_key()?;
        debug!(
            background_type = ?request.background.kind,
            background_url = %request.background.url,
            "Submitting HeyGen render"
        );

        let response = self
            .client
            .post(HEYGEN_GENERATE_URL)
            .header("X-Api-Key", api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| UpstreamError::http(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(Self::error_message(response).await);
        }

        let envelope: Envelope<GenerateData> = response
            .json()
            .await
            .map_err(|e| UpstreamError::parse(SERVICE, e.to_string()))?;
        let video_id = envelope
            .data
            .and_then(|data| data.video_id)
            .ok_or_else(|| UpstreamError::parse(SERVICE, "missing video_id"))?;

        info!("HeyGen accepted render {}", video_id);
        Ok(video_id)
    }

    #[instrument(skip(self))]
    async fn video_status(&self, video_id: &str) -> Result<ProviderVideo, UpstreamError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(HEYGEN_STATUS_URL)
            .query(&[("video_id", video_id)])
            .header("X-Api-Key", api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::http(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(Self::error_message(response).await);
        }

        let envelope: Envelope<StatusData> = response
            .json()
            .await
            .map_err(|e| UpstreamError::parse(SERVICE, e.to_string()))?;
        let data = envelope
            .data
            .ok_or_else(|| UpstreamError::parse(SERVICE, "missing data"))?;

        Ok(ProviderVideo {
            video_id: video_id.to_string(),
            status: normalize_status(data.status.as_deref()),
            video_url: data.video_url,
            thumbnail_url: data.thumbnail_url,
            duration: data.duration,
            created_at: data.created_at,
        })
    }
}

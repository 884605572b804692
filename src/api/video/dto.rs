use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::VideoJob;
use crate::upstream::{Audience, Background, BackgroundKind, ProviderVideo};

/// Body of `POST /api/v1/video-faceless`
#[derive(Debug, Deserialize, Validate)]
pub struct FacelessRequest {
    pub action: Option<String>,
    #[validate(length(max = 5000, message = "script must be at most 5000 characters"))]
    pub script: Option<String>,
    pub voice_id: Option<String>,
    pub style: Option<String>,
    pub background_url: Option<String>,
    pub background_type: Option<BackgroundKind>,
    pub video_id: Option<String>,
}

/// Body of `POST /api/v1/heygen`
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarRequest {
    pub action: Option<String>,
    #[validate(length(max = 500, message = "topic must be at most 500 characters"))]
    pub topic: Option<String>,
    #[serde(default)]
    pub audience_type: Audience,
    #[validate(length(max = 5000, message = "script must be at most 5000 characters"))]
    pub script: Option<String>,
    pub avatar_id: Option<String>,
    pub voice_id: Option<String>,
    pub background_url: Option<String>,
    pub background_type: Option<BackgroundKind>,
    pub video_id: Option<String>,
}

/// Body of `POST /api/v1/get-video`, also used as the GET query
#[derive(Debug, Deserialize, Validate)]
pub struct VideoLookup {
    pub video_id: Option<String>,
}

/// Rendering options shared by faceless and avatar videos
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub avatar_id: Option<String>,
    pub voice_id: Option<String>,
    pub style: Option<String>,
    pub background_url: Option<String>,
    pub background_type: Option<BackgroundKind>,
}

#[derive(Debug, Serialize)]
pub struct FacelessCreated {
    pub success: bool,
    pub video_id: String,
    pub heygen_video_id: String,
    pub provider: &'static str,
    pub status: &'static str,
    pub background: Background,
    pub message: &'static str,
}

/// Either a tracked job or a provider-only status
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VideoView {
    Tracked(VideoJob),
    Provider(ProviderVideo),
}

#[derive(Debug, Serialize)]
pub struct VideoStatusResponse {
    pub success: bool,
    pub video: VideoView,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub success: bool,
    pub videos: Vec<VideoJob>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmittedVideo {
    pub video_id: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AvatarVideoResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    pub video: SubmittedVideo,
    pub background: Background,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub success: bool,
    pub video: ProviderVideo,
    pub ready_to_publish: bool,
    pub message: String,
}

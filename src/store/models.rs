use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::publish::Platform;

/// Text payload of a publication
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct PostContent {
    #[serde(default)]
    #[validate(length(min = 1, message = "content.text is required"))]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PostContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Flat status of a publication, for comparisons and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Pending,
    Scheduled,
    Published,
    Failed,
}

/// Publication state together with the fields that only exist in that state
///
/// Serialized flat into the job record: `status` plus `scheduledFor`,
/// `publishedAt` or `error` depending on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PublicationState {
    Pending,
    Scheduled {
        #[serde(rename = "scheduledFor")]
        scheduled_for: DateTime<Utc>,
    },
    Published {
        #[serde(rename = "publishedAt")]
        published_at: DateTime<Utc>,
    },
    Failed {
        error: String,
    },
}

/// One publish request against one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationJob {
    pub id: String,
    pub platform: Platform,
    pub content: PostContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(flatten)]
    state: PublicationState,
    pub created_at: DateTime<Utc>,
}

impl PublicationJob {
    fn new(
        id: String,
        platform: Platform,
        content: PostContent,
        media_url: Option<String>,
        state: PublicationState,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            platform,
            content,
            media_url,
            state,
            created_at,
        }
    }

    /// A job that was delivered at `created_at`
    pub fn published(
        id: String,
        platform: Platform,
        content: PostContent,
        media_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let state = PublicationState::Published {
            published_at: created_at,
        };
        Self::new(id, platform, content, media_url, state, created_at)
    }

    pub fn failed(
        id: String,
        platform: Platform,
        content: PostContent,
        media_url: Option<String>,
        error: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let state = PublicationState::Failed {
            error: error.into(),
        };
        Self::new(id, platform, content, media_url, state, created_at)
    }

    pub fn scheduled(
        id: String,
        platform: Platform,
        content: PostContent,
        media_url: Option<String>,
        scheduled_for: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let state = PublicationState::Scheduled { scheduled_for };
        Self::new(id, platform, content, media_url, state, created_at)
    }

    pub fn state(&self) -> &PublicationState {
        &self.state
    }

    pub fn status(&self) -> PublicationStatus {
        match self.state {
            PublicationState::Pending => PublicationStatus::Pending,
            PublicationState::Scheduled { .. } => PublicationStatus::Scheduled,
            PublicationState::Published { .. } => PublicationStatus::Published,
            PublicationState::Failed { .. } => PublicationStatus::Failed,
        }
    }

    pub fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        match self.state {
            PublicationState::Scheduled { scheduled_for } => Some(scheduled_for),
            _ => None,
        }
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            PublicationState::Published { published_at } => Some(published_at),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            PublicationState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VideoState {
    Pending,
    Processing,
    #[serde(rename_all = "camelCase")]
    Completed {
        completed_at: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        completed_at: DateTime<Utc>,
        error: String,
    },
}

/// A job can only leave a non-terminal state once
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Video job {id} is already {status:?}")]
pub struct TransitionError {
    pub id: String,
    pub status: VideoStatus,
}

/// One avatar/faceless video rendering request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJob {
    pub id: String,
    #[serde(flatten)]
    state: VideoState,
    pub script: String,
    pub voice_id: String,
    pub style: String,
    pub background_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_video_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VideoJob {
    /// A job the provider has accepted and is rendering
    pub fn processing(
        id: String,
        script: String,
        voice_id: String,
        style: String,
        background_url: String,
        provider_video_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            state: VideoState::Processing,
            script,
            voice_id,
            style,
            background_url,
            provider_video_id,
            created_at,
        }
    }

    pub fn state(&self) -> &VideoState {
        &self.state
    }

    pub fn status(&self) -> VideoStatus {
        match self.state {
            VideoState::Pending => VideoStatus::Pending,
            VideoState::Processing => VideoStatus::Processing,
            VideoState::Completed { .. } => VideoStatus::Completed,
            VideoState::Failed { .. } => VideoStatus::Failed,
        }
    }

    pub fn media_url(&self) -> Option<&str> {
        match &self.state {
            VideoState::Completed { media_url, .. } => media_url.as_deref(),
            _ => None,
        }
    }

    pub fn complete(
        &mut self,
        media_url: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.ensure_open()?;
        self.state = VideoState::Completed {
            completed_at: at,
            media_url,
        };
        Ok(())
    }

    pub fn fail(&mut self, error: impl Into<String>, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.ensure_open()?;
        self.state = VideoState::Failed {
            completed_at: at,
            error: error.into(),
        };
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), TransitionError> {
        let status = self.status();
        if status.is_terminal() {
            return Err(TransitionError {
                id: self.id.clone(),
                status,
            });
        }
        Ok(())
    }
}
